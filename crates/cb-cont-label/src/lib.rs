//! Continuous-action contextual-bandit labels.
//!
//! - [`Label`]: ordered cost observations parsed from `name[:cost[:probability]]`
//!   tokens, with test/header classification
//! - [`EvalLabel`]: a declared action plus an event label, for offline evaluation
//! - [`cache`]: fixed-width binary records for fast re-reading of parsed data
//! - [`LabelCodec`]: the uniform interface the learner drives both label types through
//!
//! Sentinels: a cost of [`COST_UNKNOWN`] means unobserved; a probability of
//! [`HEADER_PROBABILITY`] marks a shared/header example.

pub mod cache;
pub mod codec;
pub mod config;
pub mod error;
pub mod eval;
pub mod hash;
pub mod label;
pub mod obs;
pub mod progress;
pub mod telemetry;
pub mod text;

pub use cache::{decode_label, encode_label, encode_label_into, read_label, write_label};
pub use codec::{CacheReader, CacheWriter, LabelCodec};
pub use config::CodecConfig;
pub use error::{LabelError, Result};
pub use eval::EvalLabel;
pub use hash::hash_action;
pub use label::{
    CostEntry, EntryKind, Label, COST_UNKNOWN, DEFAULT_WEIGHT, HEADER_PROBABILITY, SHARED_TOKEN,
};
pub use progress::{ActionPdfValue, ProgressRow};
pub use telemetry::init_tracing;
pub use text::label_tokens;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
