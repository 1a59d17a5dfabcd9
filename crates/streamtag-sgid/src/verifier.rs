//! Verifying signed global ids.

use crate::error::SgidError;
use biscuit_auth::builder::AuthorizerBuilder;
use biscuit_auth::{Authorizer, Biscuit, PublicKey};
use chrono::{DateTime, Utc};
use streamtag_core::GlobalId;

/// Verifies signed global ids minted for one purpose.
#[derive(Debug, Clone)]
pub struct SgidVerifier {
    public_key: PublicKey,
    purpose: String,
}

/// The contents of a verified signed global id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedSgid {
    pub global_id: GlobalId,
    pub purpose: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl SgidVerifier {
    pub fn new(public_key: PublicKey) -> Self {
        Self {
            public_key,
            purpose: "default".to_string(),
        }
    }

    pub fn with_purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = purpose.into();
        self
    }

    /// Verify `token` and return the entity it points at.
    pub fn locate(&self, token: &str) -> Result<GlobalId, SgidError> {
        self.verify(token).map(|v| v.global_id)
    }

    /// Verify signature, expiry and purpose of `token`.
    pub fn verify(&self, token: &str) -> Result<VerifiedSgid, SgidError> {
        let biscuit = Biscuit::from_base64(token.trim(), self.public_key.clone())
            .map_err(|e| SgidError::ParseFailed(e.to_string()))?;

        let expires_at = expiry_from_blocks(&biscuit);
        let now = Utc::now();

        let mut authorizer = AuthorizerBuilder::new()
            .code(format!(
                r#"
                time({now});
                allow if true;
                "#,
                now = now.timestamp()
            ))
            .map_err(|e| SgidError::VerificationFailed(e.to_string()))?
            .build(&biscuit)
            .map_err(|e| SgidError::VerificationFailed(e.to_string()))?;

        if let Err(e) = authorizer.authorize() {
            // Report a lapsed expiry distinctly from a bad token
            if let Some(at) = expires_at
                && at <= now
            {
                return Err(SgidError::Expired {
                    expired_at: at.to_rfc3339(),
                });
            }
            return Err(SgidError::VerificationFailed(e.to_string()));
        }

        let purpose = string_fact(&mut authorizer, "purpose")?;
        if purpose != self.purpose {
            tracing::debug!(
                expected = %self.purpose,
                found = %purpose,
                "signed global id purpose mismatch"
            );
            return Err(SgidError::PurposeMismatch {
                expected: self.purpose.clone(),
                found: purpose,
            });
        }

        let global_id = GlobalId::parse(&string_fact(&mut authorizer, "gid")?)?;

        Ok(VerifiedSgid {
            global_id,
            purpose,
            expires_at,
        })
    }
}

/// Whether `token` is shaped like a signed id, without checking its signature.
///
/// Used to tell signed parts of a compound identifier apart from plain
/// tokens before verifying them.
pub fn looks_signed(token: &str) -> bool {
    biscuit_auth::UnverifiedBiscuit::from_base64(token.trim()).is_ok()
}

/// Facts in appended blocks are not visible to authorizer queries, so the
/// expiry is read back from the printed block source.
///
/// Any holder can append a block, so an `expires_at` fact only counts when
/// the same block enforces it with a `$time < ts` check. The earliest
/// enforced expiry wins.
fn expiry_from_blocks(biscuit: &Biscuit) -> Option<DateTime<Utc>> {
    (1..biscuit.block_count())
        .filter_map(|idx| biscuit.print_block_source(idx).ok())
        .filter_map(|source| enforced_expiry(&source))
        .min()
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
}

/// The `expires_at` timestamp of a block source, if the block also checks it.
fn enforced_expiry(source: &str) -> Option<i64> {
    let ts = parse_expires_at(source)?;
    source.contains(&format!("$time < {ts}")).then_some(ts)
}

/// Find `expires_at(<int>);` in a block source.
fn parse_expires_at(source: &str) -> Option<i64> {
    source.lines().find_map(|line| {
        line.trim()
            .strip_prefix("expires_at(")?
            .split(')')
            .next()?
            .trim()
            .parse()
            .ok()
    })
}

fn string_fact(authorizer: &mut Authorizer, name: &str) -> Result<String, SgidError> {
    let rule: biscuit_auth::builder::Rule = format!("data($x) <- {name}($x)")
        .parse()
        .map_err(|e: biscuit_auth::error::Token| SgidError::VerificationFailed(e.to_string()))?;

    let results: Vec<(String,)> = authorizer
        .query(rule)
        .map_err(|e| SgidError::VerificationFailed(e.to_string()))?;

    results
        .into_iter()
        .next()
        .map(|(s,)| s)
        .ok_or_else(|| SgidError::MissingFact {
            fact: name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::SigningKey;
    use crate::signer::{BiscuitSigner, Expiry, SignGlobalId};
    use biscuit_auth::builder::BlockBuilder;
    use biscuit_auth::macros::{check, fact};
    use chrono::Duration;
    use streamtag_core::EntityRef;

    fn signer() -> BiscuitSigner {
        BiscuitSigner::new(SigningKey::generate().unwrap(), "chat")
    }

    #[test]
    fn test_sign_and_locate() {
        let signer = signer();
        let sgid = signer
            .sign(&EntityRef::new("Room", 42), Expiry::Never)
            .unwrap();

        let verifier = SgidVerifier::new(signer.key().public_key());
        let verified = verifier.verify(sgid.as_str()).unwrap();
        assert_eq!(verified.global_id.to_uri(), "gid://chat/Room/42");
        assert_eq!(verified.purpose, "default");
        assert!(verified.expires_at.is_none());
    }

    #[test]
    fn test_unexpired_id_verifies() {
        let signer = signer();
        let sgid = signer
            .sign(&EntityRef::new("Room", 1), Expiry::In(Duration::hours(1)))
            .unwrap();

        let verified = SgidVerifier::new(signer.key().public_key())
            .verify(sgid.as_str())
            .unwrap();
        assert!(verified.expires_at.is_some());
    }

    #[test]
    fn test_expired_id_is_rejected() {
        let signer = signer();
        let sgid = signer
            .sign(
                &EntityRef::new("Room", 1),
                Expiry::At(Utc::now() - Duration::hours(1)),
            )
            .unwrap();

        let err = SgidVerifier::new(signer.key().public_key())
            .locate(sgid.as_str())
            .unwrap_err();
        assert!(matches!(err, SgidError::Expired { .. }));
    }

    #[test]
    fn test_wrong_key_is_rejected() {
        let sgid = signer()
            .sign(&EntityRef::new("Room", 1), Expiry::Never)
            .unwrap();
        let other = SigningKey::generate().unwrap();

        let err = SgidVerifier::new(other.public_key())
            .locate(sgid.as_str())
            .unwrap_err();
        assert!(matches!(err, SgidError::ParseFailed(_)));
    }

    #[test]
    fn test_purpose_mismatch() {
        let signer = signer().with_purpose("stream");
        let sgid = signer
            .sign(&EntityRef::new("Room", 1), Expiry::Never)
            .unwrap();

        let verifier = SgidVerifier::new(signer.key().public_key());
        let err = verifier.locate(sgid.as_str()).unwrap_err();
        assert!(matches!(err, SgidError::PurposeMismatch { .. }));

        let gid = verifier.with_purpose("stream").locate(sgid.as_str()).unwrap();
        assert_eq!(gid.model_name(), "Room");
    }

    #[test]
    fn test_garbage_token() {
        let key = SigningKey::generate().unwrap();
        let err = SgidVerifier::new(key.public_key())
            .locate("not-a-token")
            .unwrap_err();
        assert!(matches!(err, SgidError::ParseFailed(_)));
    }

    #[test]
    fn test_looks_signed() {
        let sgid = signer()
            .sign(&EntityRef::new("Room", 1), Expiry::Never)
            .unwrap();
        assert!(looks_signed(sgid.as_str()));
        assert!(!looks_signed("room-2"));
        assert!(!looks_signed(""));
    }

    #[test]
    fn test_parse_expires_at() {
        assert_eq!(parse_expires_at("expires_at(1700000000);\n"), Some(1700000000));
        assert_eq!(
            parse_expires_at("check if time($time), $time < 5;\n  expires_at(5);"),
            Some(5)
        );
        assert_eq!(parse_expires_at("tenant(\"a\");"), None);
    }

    #[test]
    fn test_enforced_expiry_needs_matching_check() {
        assert_eq!(
            enforced_expiry("expires_at(5);\ncheck if time($time), $time < 5;"),
            Some(5)
        );
        assert_eq!(enforced_expiry("expires_at(5);\n"), None);
        assert_eq!(
            enforced_expiry("expires_at(5);\ncheck if time($time), $time < 9;"),
            None
        );
    }

    #[test]
    fn test_appended_expiry_fact_without_check_is_ignored() {
        let signer = signer();
        let sgid = signer
            .sign(&EntityRef::new("Room", 1), Expiry::Never)
            .unwrap();
        let public_key = signer.key().public_key();

        // Anyone holding the token can append a block
        let tampered = Biscuit::from_base64(sgid.as_str(), public_key.clone())
            .unwrap()
            .append(BlockBuilder::new().fact(fact!("expires_at(1)")).unwrap())
            .unwrap()
            .to_base64()
            .unwrap();

        let verified = SgidVerifier::new(public_key).verify(&tampered).unwrap();
        assert_eq!(verified.global_id.to_uri(), "gid://chat/Room/1");
        assert!(verified.expires_at.is_none());
    }

    #[test]
    fn test_earliest_enforced_expiry_is_reported() {
        let signer = signer();
        let sgid = signer
            .sign(&EntityRef::new("Room", 1), Expiry::In(Duration::days(7)))
            .unwrap();
        let public_key = signer.key().public_key();

        let sooner = (Utc::now() + Duration::hours(1)).timestamp();
        let attenuated = Biscuit::from_base64(sgid.as_str(), public_key.clone())
            .unwrap()
            .append(
                BlockBuilder::new()
                    .fact(fact!("expires_at({ts})", ts = sooner))
                    .and_then(|b| {
                        b.check(check!("check if time($time), $time < {ts}", ts = sooner))
                    })
                    .unwrap(),
            )
            .unwrap()
            .to_base64()
            .unwrap();

        let verified = SgidVerifier::new(public_key).verify(&attenuated).unwrap();
        assert_eq!(verified.expires_at.map(|at| at.timestamp()), Some(sooner));
    }
}
