//! Output formatting utilities.

use humansign_verify::{PipelineError, VerificationReport};
use serde_json::{json, Value};

/// Formats a value as pretty JSON.
pub fn format_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// JSON body for a failed verification.
pub fn failure_json(err: &PipelineError) -> Value {
    let mut body = json!({
        "status": "FAILED",
        "error": err.kind().as_str(),
        "message": err.to_string(),
    });
    if let Some(index) = err.block_index() {
        body["block_index"] = json!(index);
    }
    body
}

/// Human-readable lines for a successful report.
pub fn format_report(report: &VerificationReport) -> String {
    let a = &report.authorship;
    format!(
        "VERIFIED\n  signature valid: {}\n  hash match:      {}\n  organic human:   {:.1}%\n  ai assisted:     {:.1}%\n  pasted:          {:.1}%",
        report.integrity.signature_valid,
        report.integrity.hash_match,
        a.organic_human * 100.0,
        a.ai_assisted * 100.0,
        a.pasted * 100.0,
    )
}

/// One-line failure summary.
pub fn format_failure(err: &PipelineError) -> String {
    match err.block_index() {
        Some(index) => format!("FAILED: {} at block {} ({})", err.kind(), index, err),
        None => format!("FAILED: {} ({})", err.kind(), err),
    }
}
