//! Shape inference over sampled JSON values.

use serde_json::Value;
use tracing::{debug, warn};

use crate::schema::{JsonSample, JsonShape};

/// How many parsed values are kept for display.
pub const MAX_DISPLAY_SAMPLES: usize = 3;

/// How much of an unparseable value is quoted in the log.
const PREVIEW_CHARS: usize = 100;

/// Derives a structural schema from raw sampled values.
///
/// Raw string values are parsed as JSON (BigQuery returns JSON cells as
/// text); values that fail to parse are logged and skipped rather than
/// failing the column. The shapes of all surviving values are folded
/// into one [`JsonShape`] before the display truncation happens.
pub struct Inferencer;

impl Inferencer {
    pub fn new() -> Self {
        Self
    }

    /// Infer the shape of `raw_values` for `column`.
    ///
    /// Returns `None` when no value parsed, in which case the column
    /// gets no annotation at all.
    pub fn infer(&self, column: &str, raw_values: &[Value]) -> Option<JsonSample> {
        let mut parsed = Vec::with_capacity(raw_values.len());
        for raw in raw_values {
            match raw {
                Value::String(text) => match serde_json::from_str(text) {
                    Ok(value) => parsed.push(value),
                    Err(e) => {
                        warn!(
                            "Skipping unparseable JSON in column '{}': {} (value: {})",
                            column,
                            e,
                            preview(text)
                        );
                    }
                },
                other => parsed.push(other.clone()),
            }
        }

        if parsed.is_empty() {
            debug!("No parseable JSON values for column '{}'", column);
            return None;
        }

        let schema = parsed
            .iter()
            .map(JsonShape::of)
            .fold(JsonShape::Unknown, JsonShape::merge);

        parsed.truncate(MAX_DISPLAY_SAMPLES);
        Some(JsonSample {
            schema,
            samples: parsed,
        })
    }
}

impl Default for Inferencer {
    fn default() -> Self {
        Self::new()
    }
}

/// First [`PREVIEW_CHARS`] characters, safe on multi-byte boundaries.
fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}
