//! Marker rendering and subscription resolution with real signing keys.

use chrono::{Duration, Utc};
use streamtag_core::{EntityRef, Key};
use streamtag_helpers::{
    HelperError, StreamName, StreamParams, SubscriptionError, resolve_stream, stream_from,
};
use streamtag_sgid::{BiscuitSigner, Expiry, SgidError, SgidVerifier, SignGlobalId, SigningKey};

fn keys() -> (BiscuitSigner, SgidVerifier) {
    let key = SigningKey::generate().unwrap();
    let verifier = SgidVerifier::new(key.public_key());
    (BiscuitSigner::new(key, "chat"), verifier)
}

/// Pull `data-<name>="..."` out of rendered markup.
fn data_attr(html: &str, name: &str) -> Option<String> {
    let needle = format!(r#"data-{name}=""#);
    let start = html.find(&needle)? + needle.len();
    let end = html[start..].find('"')?;
    Some(html[start..start + end].to_string())
}

#[test]
fn entity_marker_subscribes_to_entity_stream() {
    let (signer, verifier) = keys();
    let room = EntityRef::new("Room", 12);

    let html = stream_from(&signer, [Key::from(room.clone())]).unwrap().into_string();
    assert!(html.starts_with(r#"<div data-controller="stream-from""#));
    assert!(data_attr(&html, "stream-from-identifier-value").is_none());

    let sgid = data_attr(&html, "stream-from-sgid-value").expect("sgid attribute");
    let params = StreamParams {
        sgid: Some(sgid),
        identifier: None,
    };

    let stream = resolve_stream(&verifier, &params).unwrap();
    assert_eq!(stream, StreamName::for_entity("chat", &room).unwrap());
}

#[test]
fn compound_marker_embeds_verifiable_sgids() {
    let (signer, verifier) = keys();

    let html = stream_from(
        &signer,
        [
            None,
            Some(Key::entity("Room", 3)),
            Some(Key::from("messages")),
        ],
    )
    .unwrap()
    .into_string();

    assert!(data_attr(&html, "stream-from-sgid-value").is_none());
    let identifier = data_attr(&html, "stream-from-identifier-value").unwrap();

    let (sgid, suffix) = identifier.rsplit_once(':').unwrap();
    assert_eq!(suffix, "messages");
    assert_eq!(verifier.locate(sgid).unwrap().to_uri(), "gid://chat/Room/3");
}

#[test]
fn compound_markers_rendered_twice_share_a_stream() {
    let (signer, verifier) = keys();
    let room_keys = || [Key::entity("Room", 1), Key::from("room-2")];

    let render = || {
        let html = stream_from(&signer, room_keys()).unwrap().into_string();
        data_attr(&html, "stream-from-identifier-value").unwrap()
    };
    let first = render();
    let second = render();
    assert_ne!(first, second);

    let expected = StreamName::for_keys("chat", room_keys()).unwrap();
    for identifier in [first, second] {
        let params = StreamParams {
            sgid: None,
            identifier: Some(identifier),
        };
        assert_eq!(resolve_stream(&verifier, &params).unwrap(), expected);
    }
}

#[test]
fn unsigned_entity_stream_cannot_be_subscribed() {
    let (_, verifier) = keys();
    let room_stream = StreamName::for_entity("chat", &EntityRef::new("Room", 1)).unwrap();

    for identifier in [room_stream.to_string(), format!("lobby:{room_stream}")] {
        let err = resolve_stream(
            &verifier,
            &StreamParams {
                sgid: None,
                identifier: Some(identifier),
            },
        )
        .unwrap_err();
        assert!(matches!(
            err,
            HelperError::Subscription(SubscriptionError::ReservedIdentifier(_))
        ));
    }
}

#[test]
fn marker_sgids_do_not_expire() {
    let (signer, verifier) = keys();
    let html = stream_from(&signer, [Key::entity("Room", 1)]).unwrap().into_string();
    let sgid = data_attr(&html, "stream-from-sgid-value").unwrap();

    let verified = verifier.verify(&sgid).unwrap();
    assert!(verified.expires_at.is_none());
}

#[test]
fn expired_sgid_subscription_is_rejected() {
    let (signer, verifier) = keys();
    let stale = signer
        .sign(
            &EntityRef::new("Room", 1),
            Expiry::At(Utc::now() - Duration::minutes(5)),
        )
        .unwrap();

    let err = resolve_stream(
        &verifier,
        &StreamParams {
            sgid: Some(stale.into_string()),
            identifier: None,
        },
    )
    .unwrap_err();
    assert!(matches!(err, HelperError::Signing(SgidError::Expired { .. })));
}

#[test]
fn unlocatable_entity_fails_render() {
    let (signer, _) = keys();
    let err = stream_from(&signer, [Key::entity("Room", "")]).unwrap_err();
    assert!(matches!(err, HelperError::Signing(SgidError::InvalidGlobalId(_))));
}
