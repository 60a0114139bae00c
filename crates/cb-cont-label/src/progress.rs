//! Column values for the learner's periodic progress line.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::label::Label;

pub const KNOWN_LABEL: &str = " known";
pub const UNKNOWN_LABEL: &str = " unknown";
pub const NO_ACTION: &str = "no action";

/// Width of the right-aligned prediction column.
pub const PREDICTION_WIDTH: usize = 8;

/// One point of a predicted density over the continuous action space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionPdfValue {
    pub action: f32,
    pub pdf_value: f32,
}

pub fn label_column(is_test: bool) -> &'static str {
    if is_test {
        UNKNOWN_LABEL
    } else {
        KNOWN_LABEL
    }
}

/// `action:value...` for the first density point, or `no action`.
pub fn prediction_column(density: &[ActionPdfValue]) -> String {
    match density.first() {
        Some(p) => format!("{}:{}...", p.action, p.pdf_value),
        None => NO_ACTION.to_string(),
    }
}

/// Total feature count of a multi-example group, skipping header examples.
pub fn group_feature_count<'a, I>(group: I) -> usize
where
    I: IntoIterator<Item = (&'a Label, usize)>,
{
    group
        .into_iter()
        .filter(|(label, _)| !label.is_header())
        .map(|(_, n)| n)
        .sum()
}

/// Label and prediction columns for one progress line.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressRow {
    pub label: &'static str,
    pub prediction: String,
    pub num_features: usize,
}

impl ProgressRow {
    pub fn new(label: &Label, density: &[ActionPdfValue], num_features: usize) -> Self {
        ProgressRow {
            label: label_column(label.is_test()),
            prediction: prediction_column(density),
            num_features,
        }
    }

    /// Row for a multi-example group: the label column comes from `label`,
    /// features are summed over the non-header members.
    pub fn for_group<'a, I>(label: &Label, density: &[ActionPdfValue], group: I) -> Self
    where
        I: IntoIterator<Item = (&'a Label, usize)>,
    {
        Self::new(label, density, group_feature_count(group))
    }
}

impl fmt::Display for ProgressRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>8} {:>width$} {:>8}",
            self.label,
            self.prediction,
            self.num_features,
            width = PREDICTION_WIDTH
        )
    }
}
