//! Continuous-action bandit label: an ordered sequence of cost observations.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::CodecConfig;
use crate::error::Result;
use crate::text;

/// Cost sentinel: the action's cost was not observed.
pub const COST_UNKNOWN: f32 = f32::MAX;

/// Probability sentinel: the entry marks a shared/header example, not an action.
pub const HEADER_PROBABILITY: f32 = -1.0;

/// Action name that introduces a shared/header example.
pub const SHARED_TOKEN: &str = "shared";

/// Importance weight reported for every label.
pub const DEFAULT_WEIGHT: f32 = 1.0;

/// One action's observed or declared outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostEntry {
    /// Hashed action identifier.
    pub action: u32,
    /// Observed cost, or [`COST_UNKNOWN`].
    #[serde(with = "json_float")]
    pub cost: f32,
    /// Logging-policy probability in `[0, 1]`, or [`HEADER_PROBABILITY`].
    #[serde(with = "json_float")]
    pub probability: f32,
    /// Learner scratch space. Zero after parsing, carried opaque otherwise.
    #[serde(with = "json_float")]
    pub partial_prediction: f32,
}

/// Serde form for `f32` fields. Finite values are numbers; `inf`, `-inf`
/// and `NaN` are strings, since JSON has no literal for them.
mod json_float {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    const INF: &str = "inf";
    const NEG_INF: &str = "-inf";
    const NAN: &str = "NaN";

    pub fn serialize<S: Serializer>(value: &f32, s: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            s.serialize_f32(*value)
        } else if value.is_nan() {
            s.serialize_str(NAN)
        } else if value.is_sign_positive() {
            s.serialize_str(INF)
        } else {
            s.serialize_str(NEG_INF)
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f32),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<f32, D::Error> {
        match Repr::deserialize(d)? {
            Repr::Number(v) => Ok(v),
            Repr::Text(text) => match text.as_str() {
                INF => Ok(f32::INFINITY),
                NEG_INF => Ok(f32::NEG_INFINITY),
                NAN => Ok(f32::NAN),
                other => Err(D::Error::custom(format!(
                    "expected a number, \"{INF}\", \"{NEG_INF}\" or \"{NAN}\", got {other:?}"
                ))),
            },
        }
    }
}

/// Tagged view of a [`CostEntry`] with the sentinels resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntryKind {
    Header,
    Observation {
        action: u32,
        cost: Option<f32>,
        probability: f32,
    },
}

impl CostEntry {
    /// Entry for `action` with unknown cost and zero probability.
    pub fn unobserved(action: u32) -> Self {
        CostEntry {
            action,
            cost: COST_UNKNOWN,
            probability: 0.0,
            partial_prediction: 0.0,
        }
    }

    pub fn new(action: u32, cost: f32, probability: f32) -> Self {
        CostEntry {
            action,
            cost,
            probability,
            partial_prediction: 0.0,
        }
    }

    pub fn has_known_cost(&self) -> bool {
        self.cost != COST_UNKNOWN
    }

    pub fn is_header(&self) -> bool {
        self.probability == HEADER_PROBABILITY
    }

    /// Known cost with a positive selection probability.
    pub fn is_supervised(&self) -> bool {
        self.has_known_cost() && self.probability > 0.0
    }

    pub fn kind(&self) -> EntryKind {
        if self.is_header() {
            EntryKind::Header
        } else {
            EntryKind::Observation {
                action: self.action,
                cost: self.has_known_cost().then_some(self.cost),
                probability: self.probability,
            }
        }
    }
}

impl fmt::Display for CostEntry {
    /// Renders the entry in the text grammar. Numeric action ids re-hash to
    /// themselves under seed 0.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_header() {
            f.write_str(SHARED_TOKEN)
        } else if !self.has_known_cost() && self.probability == 0.0 {
            write!(f, "{}", self.action)
        } else {
            write!(f, "{}:{}:{}", self.action, self.cost, self.probability)
        }
    }
}

/// Continuous-action bandit label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub costs: Vec<CostEntry>,
}

impl Label {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(costs: Vec<CostEntry>) -> Self {
        Label { costs }
    }

    /// Parse text tokens with the default hash seed.
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Result<Self> {
        Self::parse_with(tokens, &CodecConfig::default())
    }

    pub fn parse_with<S: AsRef<str>>(tokens: &[S], config: &CodecConfig) -> Result<Self> {
        let mut label = Label::new();
        label.parse_tokens_with(tokens, config)?;
        Ok(label)
    }

    /// Replace this label's entries with the ones parsed from `tokens`.
    ///
    /// On error the label is left empty.
    pub fn parse_tokens_with<S: AsRef<str>>(
        &mut self,
        tokens: &[S],
        config: &CodecConfig,
    ) -> Result<()> {
        self.costs.clear();
        self.costs.reserve(tokens.len());
        for token in tokens {
            match text::parse_cost_entry(token.as_ref(), config.hash_seed) {
                Ok(entry) => self.costs.push(entry),
                Err(e) => {
                    self.costs.clear();
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    pub fn reset(&mut self) {
        self.costs.clear();
    }

    /// True unless some entry has both a known cost and a positive probability.
    pub fn is_test(&self) -> bool {
        !self.costs.iter().any(CostEntry::is_supervised)
    }

    /// True iff the label is a single header entry.
    pub fn is_header(&self) -> bool {
        matches!(self.costs.as_slice(), [only] if only.is_header())
    }

    pub fn weight(&self) -> f32 {
        DEFAULT_WEIGHT
    }

    /// Deep-copy `src` into `self`, replacing all prior entries.
    pub fn copy_from(&mut self, src: &Label) {
        self.costs.clone_from(&src.costs);
    }

    /// Render the label back into the text grammar.
    ///
    /// Header entries always render as `shared`, so a header whose action is
    /// not `hash_action("shared", seed)` comes back with that hash when the
    /// text is parsed again. Every other entry round-trips under seed 0.
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.costs.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}
