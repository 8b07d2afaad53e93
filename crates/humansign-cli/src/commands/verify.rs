//! Verify command implementation.

use humansign_verify::{Verifier, VerifierConfig};
use std::fs::{self, File};
use std::path::PathBuf;
use tracing::debug;

use crate::config::{IntakeArgs, KeyArgs};
use crate::output::{failure_json, format_failure, format_json, format_report};

pub struct VerifyArgs {
    pub document: PathBuf,
    pub humansign: PathBuf,
    pub json: bool,
    pub session: bool,
    pub content_type: Option<String>,
    pub min_events: Option<usize>,
    pub key: KeyArgs,
    pub intake: IntakeArgs,
}

pub fn run(args: VerifyArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = VerifierConfig {
        intake: args.intake.policy(),
        ..VerifierConfig::default()
    };
    config.envelope.max_token_bytes = args.intake.token_limit();
    if let Some(min_events) = args.min_events {
        config.features.min_events = min_events;
    }

    let document_name = file_name(&args.document);
    let humansign_name = file_name(&args.humansign);
    let document_size = fs::metadata(&args.document)
        .map_err(|e| format!("Failed to stat {}: {}", args.document.display(), e))?
        .len();
    let humansign_size = fs::metadata(&args.humansign)
        .map_err(|e| format!("Failed to stat {}: {}", args.humansign.display(), e))?
        .len();
    config
        .intake
        .check_document(&document_name, args.content_type.as_deref(), document_size)?;
    config.intake.check_humansign(&humansign_name, humansign_size)?;
    debug!(document_size, humansign_size, "intake checks passed");

    let key = args.key.load()?;
    let verifier = Verifier::with_key(&config, &key)?;

    let humansign = fs::read(&args.humansign)
        .map_err(|e| format!("Failed to read {}: {}", args.humansign.display(), e))?;
    let document = File::open(&args.document)
        .map_err(|e| format!("Failed to open {}: {}", args.document.display(), e))?;

    if args.session {
        return match verifier.verify_session(document, &humansign) {
            Ok(session) => {
                println!("{}", format_json(&serde_json::to_value(&session)?));
                Ok(())
            }
            Err(err) => fail(&err, args.json),
        };
    }

    match verifier.verify(document, &humansign) {
        Ok(report) => {
            if args.json {
                println!("{}", format_json(&serde_json::to_value(&report)?));
            } else {
                println!("{}", format_report(&report));
            }
            Ok(())
        }
        Err(err) => fail(&err, args.json),
    }
}

fn fail(
    err: &humansign_verify::PipelineError,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json_output {
        println!("{}", format_json(&failure_json(err)));
    } else {
        println!("{}", format_failure(err));
    }
    std::process::exit(1);
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
