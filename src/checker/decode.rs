//! Decoder for the spell-check service's callback-wrapped responses.
//!
//! The service answers with `<callback>(<json>)`. Everything that knows about
//! that wrapper, and about the payload's field names, lives here.

use crate::error::CheckError;
use crate::SpellError;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

lazy_static! {
    static ref CALLBACK_PAYLOAD: Regex = Regex::new(r"\((.+)\)").unwrap();
    static ref MARKUP_TAG: Regex = Regex::new(r"<[^>]*>").unwrap();
}

/// Decoded result for a single chunk, before chunk tagging
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkReport {
    pub error_count: usize,
    pub errors: Vec<SpellError>,
    pub corrected_text: String,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    result: Option<RawResult>,
}

#[derive(Debug, Deserialize)]
struct RawResult {
    #[serde(default)]
    errata_count: usize,
    #[serde(default)]
    errata: Vec<Errata>,
    #[serde(default)]
    html: String,
}

#[derive(Debug, Deserialize)]
struct Errata {
    #[serde(rename = "orgStr")]
    org_str: String,
    #[serde(rename = "candWord")]
    cand_word: String,
    #[serde(default)]
    help: Option<String>,
}

/// Extract and decode the JSON payload from a callback-wrapped response body.
pub fn decode_response(body: &str) -> Result<ChunkReport, CheckError> {
    let payload = CALLBACK_PAYLOAD
        .captures(body)
        .and_then(|caps| caps.get(1))
        .ok_or_else(|| CheckError::Parse("callback wrapper not found".to_string()))?;

    let envelope: Envelope = serde_json::from_str(payload.as_str())
        .map_err(|e| CheckError::Parse(e.to_string()))?;

    let result = envelope
        .message
        .and_then(|message| message.result)
        .ok_or(CheckError::ResultMissing)?;

    let errors = result
        .errata
        .into_iter()
        .map(|errata| SpellError {
            original_text: errata.org_str,
            candidate_text: errata.cand_word,
            help_text: errata.help.filter(|help| !help.trim().is_empty()),
            chunk_index: 0,
        })
        .collect();

    Ok(ChunkReport {
        error_count: result.errata_count,
        errors,
        corrected_text: strip_markup(&result.html),
    })
}

/// Remove HTML tags and decode the handful of entities the service emits
pub fn strip_markup(html: &str) -> String {
    MARKUP_TAG
        .replace_all(html, "")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
