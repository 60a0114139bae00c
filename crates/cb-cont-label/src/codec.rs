//! Uniform interface over label types, plus cache file readers and writers
//! written against it.

use std::io::{BufRead, Write};
use std::marker::PhantomData;

use crate::cache;
use crate::config::CodecConfig;
use crate::error::Result;
use crate::eval::EvalLabel;
use crate::label::Label;
use crate::text;

/// Operations every label type supports for the surrounding learner.
pub trait LabelCodec: Default + Clone + PartialEq + std::fmt::Debug {
    /// Short name used in logs.
    const KIND: &'static str;

    /// Return to the default (empty) state.
    fn reset(&mut self);

    /// Replace the contents with the label parsed from `tokens`.
    fn parse_tokens_with(&mut self, tokens: &[&str], config: &CodecConfig) -> Result<()>;

    /// Append the cache record to `w`, returning the bytes written.
    fn write_cache<W: Write>(&self, w: &mut W) -> Result<usize>;

    /// Replace the contents with one cache record from `r`, returning the
    /// bytes consumed.
    fn read_cache<R: std::io::Read>(&mut self, r: &mut R) -> Result<usize>;

    /// Importance weight.
    fn weight(&self) -> f32;

    /// Whether the label lacks supervision.
    fn is_test(&self) -> bool;

    /// Deep copy from `src`.
    fn copy_from(&mut self, src: &Self);

    /// Parse the label section of a full input line.
    fn parse_line(&mut self, line: &str, config: &CodecConfig) -> Result<()> {
        self.parse_tokens_with(&text::label_tokens(line), config)
    }
}

impl LabelCodec for Label {
    const KIND: &'static str = "cb_cont";

    fn reset(&mut self) {
        Label::reset(self);
    }

    fn parse_tokens_with(&mut self, tokens: &[&str], config: &CodecConfig) -> Result<()> {
        Label::parse_tokens_with(self, tokens, config)
    }

    fn write_cache<W: Write>(&self, w: &mut W) -> Result<usize> {
        cache::write_label(w, self)
    }

    fn read_cache<R: std::io::Read>(&mut self, r: &mut R) -> Result<usize> {
        cache::read_label(r, self)
    }

    fn weight(&self) -> f32 {
        Label::weight(self)
    }

    fn is_test(&self) -> bool {
        Label::is_test(self)
    }

    fn copy_from(&mut self, src: &Self) {
        Label::copy_from(self, src);
    }
}

impl LabelCodec for EvalLabel {
    const KIND: &'static str = "cb_cont_eval";

    fn reset(&mut self) {
        EvalLabel::reset(self);
    }

    fn parse_tokens_with(&mut self, tokens: &[&str], config: &CodecConfig) -> Result<()> {
        EvalLabel::parse_tokens_with(self, tokens, config)
    }

    fn write_cache<W: Write>(&self, w: &mut W) -> Result<usize> {
        EvalLabel::write_cache(self, w)
    }

    fn read_cache<R: std::io::Read>(&mut self, r: &mut R) -> Result<usize> {
        EvalLabel::read_cache(self, r)
    }

    fn weight(&self) -> f32 {
        EvalLabel::weight(self)
    }

    fn is_test(&self) -> bool {
        EvalLabel::is_test(self)
    }

    fn copy_from(&mut self, src: &Self) {
        EvalLabel::copy_from(self, src);
    }
}

/// Writes a sequence of label records to a cache stream.
pub struct CacheWriter<W: Write> {
    inner: W,
    labels: u64,
    bytes: u64,
}

impl<W: Write> CacheWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            labels: 0,
            bytes: 0,
        }
    }

    pub fn write<L: LabelCodec>(&mut self, label: &L) -> Result<usize> {
        let n = label.write_cache(&mut self.inner)?;
        self.labels += 1;
        self.bytes += n as u64;
        Ok(n)
    }

    pub fn labels_written(&self) -> u64 {
        self.labels
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes
    }

    /// Flush and hand back the underlying stream.
    pub fn finish(mut self) -> Result<W> {
        self.inner.flush()?;
        tracing::debug!(
            event = "cache.finished",
            labels = self.labels,
            bytes = self.bytes
        );
        Ok(self.inner)
    }
}

/// Reads label records back from a cache stream.
///
/// A clean end of stream at a record boundary ends iteration; a partial
/// record is a `TruncatedCache` error.
pub struct CacheReader<R: BufRead, L: LabelCodec> {
    inner: R,
    bytes: u64,
    _label: PhantomData<L>,
}

impl<R: BufRead, L: LabelCodec> CacheReader<R, L> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            bytes: 0,
            _label: PhantomData,
        }
    }

    /// Read the next record into `label`. Returns `false` at end of stream.
    pub fn read_into(&mut self, label: &mut L) -> Result<bool> {
        if self.inner.fill_buf()?.is_empty() {
            label.reset();
            return Ok(false);
        }
        let n = label.read_cache(&mut self.inner)?;
        self.bytes += n as u64;
        Ok(true)
    }

    pub fn next_label(&mut self) -> Result<Option<L>> {
        let mut label = L::default();
        Ok(self.read_into(&mut label)?.then_some(label))
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes
    }
}

impl<R: BufRead, L: LabelCodec> Iterator for CacheReader<R, L> {
    type Item = Result<L>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_label().transpose()
    }
}
