//! Analysis Response Interpreter: turns the model's raw reply into an `AnalysisResult`.
//!
//! The model is asked for `{"JD Match":"%","MissingKeywords":[],"Profile Summary":""}`
//! but nothing enforces that shape. Decoding is strict; anything that does not
//! decode (after one fence-stripping retry) becomes a fallback result holding
//! the reply verbatim. Decode failure is the designed degraded path, not an error.

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::llm_client::strip_json_fences;

pub const DEFAULT_MATCH: &str = "0";
pub const DEFAULT_SUMMARY: &str = "No summary provided.";

/// The match percentage exactly as the model sent it: `"72%"`, `"72"` or `72`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JdMatch {
    Number(f64),
    Text(String),
}

impl Default for JdMatch {
    fn default() -> Self {
        JdMatch::Text(DEFAULT_MATCH.to_string())
    }
}

impl JdMatch {
    /// Numeric percentage. Unparseable or non-finite values become 0.0.
    pub fn normalized(&self) -> f64 {
        match self {
            JdMatch::Number(n) if n.is_finite() => *n,
            JdMatch::Number(_) => 0.0,
            JdMatch::Text(text) => normalize_percentage(text),
        }
    }
}

/// A fully decoded model reply. Field order is the serialization order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    #[serde(rename = "JD Match", default)]
    pub jd_match: JdMatch,
    #[serde(rename = "MissingKeywords", default)]
    pub missing_keywords: Vec<String>,
    #[serde(rename = "Profile Summary", default = "default_summary")]
    pub profile_summary: String,
}

fn default_summary() -> String {
    DEFAULT_SUMMARY.to_string()
}

impl MatchReport {
    pub fn match_percentage(&self) -> f64 {
        self.jd_match.normalized()
    }

    pub fn band(&self) -> MatchBand {
        MatchBand::from_percentage(self.match_percentage())
    }
}

/// Raw reply kept when structured decoding fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFallback {
    pub raw_response: String,
}

/// Exactly one of: a structured report, or the raw reply.
///
/// Serialized untagged: a structured result is the report object itself, a
/// fallback is `{"raw_response": "..."}`. An object carrying `raw_response`
/// next to any other key is rejected on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisResult {
    Fallback(RawFallback),
    Structured(MatchReport),
}

impl<'de> Deserialize<'de> for AnalysisResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let object = Map::<String, Value>::deserialize(deserializer)?;
        if object.contains_key("raw_response") {
            if object.len() > 1 {
                return Err(de::Error::custom(
                    "`raw_response` cannot be combined with report fields",
                ));
            }
            return RawFallback::deserialize(Value::Object(object))
                .map(AnalysisResult::Fallback)
                .map_err(de::Error::custom);
        }
        MatchReport::deserialize(Value::Object(object))
            .map(AnalysisResult::Structured)
            .map_err(de::Error::custom)
    }
}

impl AnalysisResult {
    pub fn fallback(raw: impl Into<String>) -> Self {
        AnalysisResult::Fallback(RawFallback {
            raw_response: raw.into(),
        })
    }

    pub fn as_structured(&self) -> Option<&MatchReport> {
        match self {
            AnalysisResult::Structured(report) => Some(report),
            AnalysisResult::Fallback(_) => None,
        }
    }

    pub fn raw_response(&self) -> Option<&str> {
        match self {
            AnalysisResult::Fallback(f) => Some(&f.raw_response),
            AnalysisResult::Structured(_) => None,
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, AnalysisResult::Structured(_))
    }
}

/// Presentation band for a normalized percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchBand {
    Excellent,
    Good,
    NeedsImprovement,
}

impl MatchBand {
    pub fn from_percentage(pct: f64) -> Self {
        if pct >= 85.0 {
            MatchBand::Excellent
        } else if pct >= 60.0 {
            MatchBand::Good
        } else {
            MatchBand::NeedsImprovement
        }
    }
}

/// Interprets a raw model reply. Never fails.
pub fn interpret(raw_response: &str) -> AnalysisResult {
    if let Some(report) = decode_report(raw_response) {
        return AnalysisResult::Structured(report);
    }

    let unfenced = strip_json_fences(raw_response);
    if unfenced.len() != raw_response.len() {
        if let Some(report) = decode_report(unfenced) {
            tracing::debug!("Decoded model reply after stripping code fences");
            return AnalysisResult::Structured(report);
        }
    }

    tracing::debug!(
        "Model reply is not a structured report ({} bytes), keeping raw text",
        raw_response.len()
    );
    AnalysisResult::fallback(raw_response)
}

/// Strict decode: the text must be a JSON object whose known keys have the right types.
fn decode_report(text: &str) -> Option<MatchReport> {
    let object: Map<String, Value> = serde_json::from_str(text).ok()?;
    serde_json::from_value(Value::Object(object)).ok()
}

/// Strips one trailing `%` and parses the rest. Anything unparseable is 0.0.
pub fn normalize_percentage(text: &str) -> f64 {
    let trimmed = text.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    match number.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Inverse of `normalize_percentage` for already-normalized values.
pub fn format_percentage(value: f64) -> String {
    format!("{value}%")
}
