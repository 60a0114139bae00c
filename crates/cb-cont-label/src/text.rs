//! Text grammar for cost specifications.
//!
//! ```text
//! line  := token (WS token)*
//! token := name (':' cost)? (':' probability)?
//! ```

use crate::error::{LabelError, Result};
use crate::hash::hash_action;
use crate::label::{CostEntry, HEADER_PROBABILITY, SHARED_TOKEN};
use crate::obs;

/// Separator between the label section of an input line and its features.
pub const FEATURE_SEPARATOR: char = '|';

const MAX_COST_SPEC_PARTS: usize = 3;

/// Label tokens of an input line: everything before the first `|`, split on
/// ASCII whitespace.
pub fn label_tokens(line: &str) -> Vec<&str> {
    let section = match line.find(FEATURE_SEPARATOR) {
        Some(idx) => &line[..idx],
        None => line,
    };
    section.split_ascii_whitespace().collect()
}

/// Split a token on `:`, dropping empty pieces.
pub fn split_cost_spec(token: &str) -> Vec<&str> {
    token.split(':').filter(|part| !part.is_empty()).collect()
}

/// Parse the longest float prefix of `raw` (`"0.5x"` reads as `0.5`). `NaN`
/// literals come back as NaN; input with no numeric prefix is replaced by
/// `0.0` with a warning.
pub fn parse_float(raw: &str, field: &'static str) -> f32 {
    let trimmed = raw.trim();
    let prefix = (1..=trimmed.len())
        .rev()
        .filter(|&end| trimmed.is_char_boundary(end))
        .find_map(|end| trimmed[..end].parse::<f32>().ok());
    match prefix {
        Some(v) => v,
        None => {
            obs::emit_float_unparseable(field, raw);
            0.0
        }
    }
}

/// Parse one `name[:cost[:probability]]` token.
pub fn parse_cost_entry(token: &str, seed: u32) -> Result<CostEntry> {
    let parts = split_cost_spec(token);
    if parts.is_empty() || parts.len() > MAX_COST_SPEC_PARTS {
        return Err(LabelError::MalformedCostSpec {
            token: token.to_string(),
            parts: parts.len(),
        });
    }

    let name = parts[0];
    let mut entry = CostEntry::unobserved(hash_action(name, seed));

    if let Some(raw) = parts.get(1) {
        entry.cost = parse_float(raw, "cost");
        if entry.cost.is_nan() {
            return Err(LabelError::NaNCost {
                action: name.to_string(),
                raw: raw.to_string(),
            });
        }
    }

    if let Some(raw) = parts.get(2) {
        entry.probability = parse_float(raw, "probability");
        if entry.probability.is_nan() {
            return Err(LabelError::NaNProbability {
                action: name.to_string(),
                raw: raw.to_string(),
            });
        }
    }

    if entry.probability > 1.0 {
        obs::emit_probability_clamped(token, entry.probability, 1.0);
        entry.probability = 1.0;
    }
    if entry.probability < 0.0 {
        obs::emit_probability_clamped(token, entry.probability, 0.0);
        entry.probability = 0.0;
    }

    if name == SHARED_TOKEN {
        if parts.len() == 1 {
            entry.probability = HEADER_PROBABILITY;
        } else {
            obs::emit_shared_with_costs(token);
        }
    }

    Ok(entry)
}
