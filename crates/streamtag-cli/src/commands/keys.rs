//! `streamtag keys generate` - Generate a new signing key.

use std::path::PathBuf;
use streamtag_sgid::SigningKey;

pub fn generate(output: Option<PathBuf>) -> anyhow::Result<()> {
    let key = SigningKey::generate()?;

    match output {
        Some(dir) => {
            key.save_to_dir(&dir)?;
            let private_path = dir.join("private.key");
            let public_path = dir.join("public.key");

            println!("✔ Generated signing key:");
            println!("  Private key: {}", private_path.display());
            println!("  Public key:  {}", public_path.display());
            println!();
            println!("⚠️  Keep your private key secure! Never commit it to version control.");
            println!();
            println!("Set as environment variables:");
            println!("  export STREAMTAG_PRIVATE_KEY=$(cat {})", private_path.display());
            println!("  export STREAMTAG_PUBLIC_KEY=$(cat {})", public_path.display());
        }
        None => {
            println!("Private key (keep secure!):");
            println!("{}", key.private_key_hex());
            println!();
            println!("Public key:");
            println!("{}", key.public_key_hex());
            println!();
            println!("Use --output <dir> to save keys to files.");
        }
    }

    tracing::info!(public_key = %key.public_key_hex(), "generated signing key");
    Ok(())
}
