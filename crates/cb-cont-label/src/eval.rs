//! Evaluation label: a declared action wrapped around an event [`Label`].
//!
//! Text form is `action token...`; the cache record is the declared action as
//! a `u32` followed by the event's label record.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::cache::{self, Cursor, ACTION_LEN};
use crate::config::CodecConfig;
use crate::error::{LabelError, Result};
use crate::hash::hash_action;
use crate::label::Label;

/// Minimum number of tokens on an evaluation line: the action plus one event token.
pub const MIN_EVAL_TOKENS: usize = 2;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvalLabel {
    /// Hashed identifier of the evaluated action.
    pub action: u32,
    pub event: Label,
}

impl EvalLabel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Result<Self> {
        Self::parse_with(tokens, &CodecConfig::default())
    }

    pub fn parse_with<S: AsRef<str>>(tokens: &[S], config: &CodecConfig) -> Result<Self> {
        let mut label = EvalLabel::new();
        label.parse_tokens_with(tokens, config)?;
        Ok(label)
    }

    /// Hash the first token into `action` and parse the rest into `event`.
    pub fn parse_tokens_with<S: AsRef<str>>(
        &mut self,
        tokens: &[S],
        config: &CodecConfig,
    ) -> Result<()> {
        let (first, rest) = match tokens {
            [first, rest @ ..] if tokens.len() >= MIN_EVAL_TOKENS => (first, rest),
            _ => {
                self.reset();
                return Err(LabelError::MissingEvalAction {
                    tokens: tokens.len(),
                });
            }
        };
        self.action = hash_action(first.as_ref(), config.hash_seed);
        if let Err(e) = self.event.parse_tokens_with(rest, config) {
            self.action = 0;
            return Err(e);
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        self.action = 0;
        self.event.reset();
    }

    pub fn is_test(&self) -> bool {
        self.event.is_test()
    }

    pub fn weight(&self) -> f32 {
        self.event.weight()
    }

    pub fn copy_from(&mut self, src: &EvalLabel) {
        self.event.copy_from(&src.event);
        self.action = src.action;
    }

    pub fn encoded_len(&self) -> usize {
        ACTION_LEN + cache::encoded_len(&self.event)
    }

    /// Append the cache record to `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.action.to_le_bytes());
        cache::encode_label_into(out, &self.event);
    }

    pub fn write_cache<W: Write>(&self, w: &mut W) -> Result<usize> {
        let head = cache::write_action(w, self.action)?;
        Ok(head + cache::write_label(w, &self.event)?)
    }

    /// Read one record into `self`, returning the bytes consumed.
    ///
    /// A short record leaves the label reset.
    pub fn read_cache<R: Read>(&mut self, r: &mut R) -> Result<usize> {
        self.reset();
        let action = cache::read_action(r)?;
        match cache::read_label(r, &mut self.event) {
            Ok(n) => {
                self.action = action;
                Ok(ACTION_LEN + n)
            }
            Err(LabelError::TruncatedCache { needed, got }) => Err(LabelError::TruncatedCache {
                needed: needed.saturating_add(ACTION_LEN),
                got: got + ACTION_LEN,
            }),
            Err(e) => Err(e),
        }
    }

    /// Decode one record from the front of `bytes`.
    pub fn decode(bytes: &[u8]) -> Result<(Self, usize)> {
        let mut c = Cursor::new(bytes);
        let action = c.read_u32()?;
        let event = c.read_label()?;
        Ok((EvalLabel { action, event }, c.off))
    }

    /// Render back into the text grammar: `action event...`.
    ///
    /// An empty event renders as the bare action, which [`EvalLabel::parse`]
    /// rejects with [`LabelError::MissingEvalAction`]. The action is written
    /// as its hash, so it round-trips under seed 0 only when it came from a
    /// numeric name.
    pub fn to_text(&self) -> String {
        if self.event.is_empty() {
            self.action.to_string()
        } else {
            format!("{} {}", self.action, self.event)
        }
    }
}
