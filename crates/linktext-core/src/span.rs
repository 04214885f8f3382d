use thiserror::Error;

/// Byte range into the document source.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Result<Self, SpanError> {
        if start <= end {
            Ok(Self { start, end })
        } else {
            Err(SpanError::Inverted { start, end })
        }
    }

    /// Source text covered by the span, if it lies on character boundaries.
    pub fn slice<'s>(&self, source: &'s str) -> Result<&'s str, SpanError> {
        source.get(self.start..self.end).ok_or(SpanError::OutOfBounds {
            start: self.start,
            end: self.end,
            len: source.len(),
        })
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum SpanError {
    #[error("span {start}..{end} is inverted")]
    Inverted { start: usize, end: usize },
    #[error("span {start}..{end} is outside the source or splits a character (source length {len})")]
    OutOfBounds { start: usize, end: usize, len: usize },
}
