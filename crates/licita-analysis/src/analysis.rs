//! The structured result of analyzing a tender document.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Fields extracted from a tender document by the analysis service.
///
/// Every field is free text; the service is asked for all of them and the
/// response is rejected if any is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenderAnalysis {
    /// Brief summary of the tender.
    pub summary: String,
    /// Experience the bidder must prove.
    pub required_experience: String,
    /// Classification codes the bidder must hold.
    pub required_codes: String,
    /// Experience required from the proposed personnel.
    pub personnel_experience: String,
    /// Financial indicators (liquidity, indebtedness, ...).
    pub financial_indicators: String,
    /// Documents the bidder must submit.
    pub required_documents: String,
}

const FIELDS: [(&str, &str); 6] = [
    ("summary", "Brief summary of the tender document."),
    ("required_experience", "Experience required from the bidder."),
    ("required_codes", "Classification codes required from the bidder."),
    (
        "personnel_experience",
        "Specific experience required from the personnel assigned to the contract.",
    ),
    ("financial_indicators", "Required financial indicators."),
    ("required_documents", "Documents the bidder must submit."),
];

/// JSON schema sent as the strict `response_format` of the request.
pub fn analysis_schema() -> Value {
    let properties: serde_json::Map<String, Value> = FIELDS
        .iter()
        .map(|(name, description)| {
            (
                (*name).to_string(),
                json!({ "type": "string", "description": description }),
            )
        })
        .collect();
    let required: Vec<&str> = FIELDS.iter().map(|(name, _)| *name).collect();

    json!({
        "name": "TenderAnalysis",
        "description": "Analyze a public tender document and extract specific information.",
        "schema": {
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false,
        },
        "strict": true,
    })
}

/// Cut `text` to at most `max_chars` characters without splitting a char.
///
/// `max_chars == 0` disables truncation.
pub fn truncate_input(text: &str, max_chars: usize) -> &str {
    if max_chars == 0 {
        return text;
    }
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
