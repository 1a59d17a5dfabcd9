use clap::{Parser, Subcommand};
use std::path::PathBuf;
use streamtag_core::StreamTagConfig;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::Settings;

#[derive(Parser, Debug)]
#[command(name = "streamtag", version, about = "Streamtag CLI")]
struct Cli {
    /// Path to streamtag.yaml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Application name used in global ids (overrides the config file)
    #[arg(long, global = true)]
    app: Option<String>,

    /// Private key: path to a key file or the hex key itself
    #[arg(long, global = true, env = "STREAMTAG_PRIVATE_KEY", hide_env_values = true)]
    key: Option<String>,

    /// Public key: path to a key file or the hex key itself
    #[arg(long, global = true, env = "STREAMTAG_PUBLIC_KEY")]
    public_key: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Signing key management
    Keys {
        #[command(subcommand)]
        cmd: KeysCommand,
    },

    /// Sign and verify global ids
    Sgid {
        #[command(subcommand)]
        cmd: SgidCommand,
    },

    /// Render a stream-from marker.
    ///
    /// Keys written as `entity:Model/id` are entity references; anything
    /// else is used as a plain token.
    Render {
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Resolve subscription params (JSON) to a stream name
    Resolve {
        /// e.g. '{"identifier": "room-1"}' or '{"sgid": "..."}'
        params: String,
    },
}

#[derive(Subcommand, Debug)]
enum KeysCommand {
    /// Generate a new Ed25519 signing key
    Generate {
        /// Directory to write private.key and public.key into
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum SgidCommand {
    /// Sign a global id for an entity
    Sign {
        #[arg(long)]
        model: String,

        #[arg(long)]
        id: String,

        /// Lifetime such as "30m", "24h", "7d"; never expires when omitted
        #[arg(long)]
        expires: Option<String>,

        /// Purpose to stamp into the id (defaults to the configured purpose)
        #[arg(long)]
        purpose: Option<String>,
    },

    /// Verify a signed global id and print what it locates
    Verify {
        sgid: String,

        #[arg(long)]
        purpose: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => StreamTagConfig::from_file(path)?,
        None => StreamTagConfig::default(),
    };
    if let Some(app) = cli.app {
        config.app = app;
        config.validate()?;
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::new(config, cli.key, cli.public_key);

    match cli.cmd {
        Command::Keys {
            cmd: KeysCommand::Generate { output },
        } => commands::keys::generate(output)?,

        Command::Sgid { cmd } => match cmd {
            SgidCommand::Sign {
                model,
                id,
                expires,
                purpose,
            } => commands::sgid::sign(&settings, &model, &id, expires.as_deref(), purpose)?,
            SgidCommand::Verify { sgid, purpose } => {
                commands::sgid::verify(&settings, &sgid, purpose)?
            }
        },

        Command::Render { keys } => {
            println!("{}", commands::render::render(&settings, &keys)?);
        }

        Command::Resolve { params } => {
            println!("{}", commands::render::resolve(&settings, &params)?);
        }
    }

    Ok(())
}
