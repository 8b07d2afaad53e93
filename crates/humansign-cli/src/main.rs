//! HumanSign CLI - verify, inspect and seal document authorship proofs.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod output;

use commands::{hash, inspect, seal, verify};
use config::{IntakeArgs, KeyArgs};

#[derive(Parser)]
#[command(name = "humansign")]
#[command(about = "HumanSign document proof verification CLI")]
struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true, env = "HUMANSIGN_LOG_JSON")]
    log_json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify a document against its .humansign proof
    Verify {
        /// Path to the document
        document: PathBuf,
        /// Path to the .humansign file
        humansign: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Print the verified session instead of scoring it
        #[arg(long)]
        session: bool,
        /// Document MIME type (default: guessed from the file name)
        #[arg(long)]
        content_type: Option<String>,
        /// Fewest events a session may have
        #[arg(long, env = "HUMANSIGN_MIN_EVENTS")]
        min_events: Option<usize>,
        #[command(flatten)]
        key: KeyArgs,
        #[command(flatten)]
        intake: IntakeArgs,
    },
    /// Print the SHA-256 of a file
    Hash {
        /// Path to the file
        file: PathBuf,
    },
    /// Decode a .humansign file WITHOUT verifying it
    Inspect {
        /// Path to the .humansign file
        humansign: PathBuf,
    },
    /// Seal captured events into a signed (HMAC) .humansign token
    Seal {
        /// JSON array of `[ts, kind]` / `[ts, kind, payload]` events
        #[arg(long)]
        events: PathBuf,
        /// Document the proof is bound to
        #[arg(long)]
        document: PathBuf,
        /// Subject identifier
        #[arg(long)]
        subject: String,
        /// Session number
        #[arg(long)]
        session_index: i64,
        /// Repetition index
        #[arg(long)]
        rep: Option<i64>,
        /// Events per block
        #[arg(long, default_value_t = 50)]
        block_size: usize,
        /// HMAC secret used to sign
        #[arg(long, env = "HUMANSIGN_HMAC_SECRET")]
        hmac_secret: String,
        /// Write the token here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() {
    // .env values become defaults for `env = ...` arguments.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let result = match cli.command {
        Commands::Verify {
            document,
            humansign,
            json,
            session,
            content_type,
            min_events,
            key,
            intake,
        } => verify::run(verify::VerifyArgs {
            document,
            humansign,
            json,
            session,
            content_type,
            min_events,
            key,
            intake,
        }),
        Commands::Hash { file } => hash::run(file),
        Commands::Inspect { humansign } => inspect::run(humansign),
        Commands::Seal {
            events,
            document,
            subject,
            session_index,
            rep,
            block_size,
            hmac_secret,
            output,
        } => seal::run(seal::SealArgs {
            events,
            document,
            subject,
            session_index,
            rep,
            block_size,
            hmac_secret,
            output,
        }),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
