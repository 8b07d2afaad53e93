//! Inspect command implementation.
//!
//! Decodes the token segments for debugging. Nothing here is verified.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use humansign_core::extract_token;
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;

use crate::output::format_json;

pub fn run(humansign: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let raw = fs::read(&humansign)
        .map_err(|e| format!("Failed to read {}: {}", humansign.display(), e))?;
    let token = extract_token(&raw)?;

    let segments: Vec<&str> = token.split('.').collect();
    let [header, payload, _signature] = segments.as_slice() else {
        return Err("token must have three segments".into());
    };
    let header = decode_segment(header).map_err(|e| format!("Invalid header: {}", e))?;
    let payload = decode_segment(payload).map_err(|e| format!("Invalid payload: {}", e))?;

    println!("{}", format_json(&summarize(&header, &payload)));
    Ok(())
}

fn decode_segment(segment: &str) -> Result<Value, Box<dyn std::error::Error>> {
    let bytes = URL_SAFE_NO_PAD.decode(segment)?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn summarize(header: &Value, payload: &Value) -> Value {
    let blocks = payload.get("chain").and_then(Value::as_array);
    let event_count: usize = blocks
        .map(|blocks| {
            blocks
                .iter()
                .filter_map(|b| b.get("events").and_then(Value::as_array))
                .map(Vec::len)
                .sum()
        })
        .unwrap_or(0);

    json!({
        "verified": false,
        "header": header,
        "payload": {
            "subject": payload.get("subject"),
            "sessionIndex": payload.get("sessionIndex"),
            "rep": payload.get("rep"),
            "document_hash": payload.get("document_hash"),
            "blocks": blocks.map(Vec::len).unwrap_or(0),
            "events": event_count,
        }
    })
}
