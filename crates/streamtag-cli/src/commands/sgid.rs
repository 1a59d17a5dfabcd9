//! Signed global id commands.
//!
//! `streamtag sgid sign` - Sign a global id for an entity.
//! `streamtag sgid verify` - Verify a signed global id.

use anyhow::Context;
use chrono::Duration;
use streamtag_core::EntityRef;
use streamtag_sgid::{Expiry, SignGlobalId};

use super::Settings;

/// Parse a duration string like "24h", "7d", "30m" or "45s".
/// A bare number is taken as hours.
pub fn parse_duration(s: &str) -> anyhow::Result<Duration> {
    let s = s.trim().to_lowercase();
    let (amount, unit) = match s.char_indices().last() {
        Some((idx, c)) if c.is_ascii_alphabetic() => (&s[..idx], Some(c)),
        _ => (s.as_str(), None),
    };
    let n: i64 = amount
        .parse()
        .with_context(|| format!("Invalid duration: {s:?}"))?;

    match unit {
        None | Some('h') => Ok(Duration::hours(n)),
        Some('d') => Ok(Duration::days(n)),
        Some('m') => Ok(Duration::minutes(n)),
        Some('s') => Ok(Duration::seconds(n)),
        Some(other) => anyhow::bail!("Unknown duration unit '{other}' in {s:?}"),
    }
}

pub fn sign(
    settings: &Settings,
    model: &str,
    id: &str,
    expires: Option<&str>,
    purpose: Option<String>,
) -> anyhow::Result<()> {
    let mut signer = settings.signer()?;
    if let Some(purpose) = purpose {
        signer = signer.with_purpose(purpose);
    }

    let expiry = match expires {
        Some(e) => Expiry::In(parse_duration(e)?),
        None => Expiry::Never,
    };

    let sgid = signer.sign(&EntityRef::new(model, id), expiry)?;
    println!("{sgid}");
    Ok(())
}

pub fn verify(settings: &Settings, sgid: &str, purpose: Option<String>) -> anyhow::Result<()> {
    let mut verifier = settings.verifier()?;
    if let Some(purpose) = purpose {
        verifier = verifier.with_purpose(purpose);
    }

    let verified = verifier.verify(sgid).context("Signed global id is not valid")?;

    println!("✔ Valid signed global id");
    println!("  Global id: {}", verified.global_id);
    println!("  Model:     {}", verified.global_id.model_name());
    println!("  Id:        {}", verified.global_id.model_id());
    println!("  Purpose:   {}", verified.purpose);
    match verified.expires_at {
        Some(at) => println!("  Expires:   {}", at.to_rfc3339()),
        None => println!("  Expires:   never"),
    }
    Ok(())
}
