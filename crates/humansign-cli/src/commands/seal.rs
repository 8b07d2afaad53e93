//! Seal command implementation (development tooling).

use humansign_canonical::HexDigest;
use humansign_core::{seal_envelope, ChainBuilder, Envelope, Event, SealingKey};
use std::fs::{self, File};
use std::path::PathBuf;
use tracing::info;

pub struct SealArgs {
    pub events: PathBuf,
    pub document: PathBuf,
    pub subject: String,
    pub session_index: i64,
    pub rep: Option<i64>,
    pub block_size: usize,
    pub hmac_secret: String,
    pub output: Option<PathBuf>,
}

pub fn run(args: SealArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.block_size == 0 {
        return Err("--block-size must be at least 1".into());
    }

    let raw = fs::read(&args.events)
        .map_err(|e| format!("Failed to read {}: {}", args.events.display(), e))?;
    let events: Vec<Event> =
        serde_json::from_slice(&raw).map_err(|e| format!("Invalid events file: {}", e))?;
    if events.is_empty() {
        return Err("events file contains no events".into());
    }
    if let Some(i) = events
        .windows(2)
        .position(|w| w[1].timestamp < w[0].timestamp)
    {
        return Err(format!(
            "events are not in time order: event {} is earlier than event {}",
            i + 1,
            i
        )
        .into());
    }

    let mut builder = ChainBuilder::new();
    for batch in events.chunks(args.block_size) {
        builder.push_events(batch.to_vec())?;
    }

    let document = File::open(&args.document)
        .map_err(|e| format!("Failed to open {}: {}", args.document.display(), e))?;
    let document_hash = HexDigest::of_reader(document)
        .map_err(|e| format!("Failed to read {}: {}", args.document.display(), e))?;

    let chain = builder.finish();
    info!(blocks = chain.len(), events = events.len(), "chain built");

    let envelope = Envelope {
        subject: args.subject,
        session_index: args.session_index,
        rep: args.rep,
        document_hash: document_hash.to_hex(),
        chain,
    };
    let token = seal_envelope(
        &envelope,
        &SealingKey::HmacSecret(args.hmac_secret.into_bytes()),
    )?;

    match args.output {
        Some(path) => fs::write(&path, token)
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?,
        None => println!("{}", token),
    }
    Ok(())
}
