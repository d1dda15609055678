//! Row and column range specifications
//!
//! Searches accept any `IntoIterator<Item = u32> + Clone` as a range, so std
//! ranges work directly. [`RangeSpec`] is the owned, nameable form used when a
//! range has to be stored or parsed from text (`"3..10"`, `"rev:3..10"`,
//! `"2.."`, `"1,5,6"`).

use std::fmt;
use std::iter::FusedIterator;
use std::str::FromStr;

use sheet_seek_core::{Error, Result};

/// An ordered sequence of 1-based row or column indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeSpec {
    /// Half-open `start..end` every `step`-th index, visited upwards
    Span { start: u32, end: u32, step: u32 },
    /// The indices of a [`RangeSpec::Span`], visited from the last one down
    ReversedSpan { start: u32, end: u32, step: u32 },
    /// Explicit indices, visited in the given order
    List(Vec<u32>),
    /// Explicit indices, visited last to first
    ReversedList(Vec<u32>),
    /// `start, start + step, ...` without end
    Unbounded { start: u32, step: u32 },
}

impl RangeSpec {
    /// Half-open span `start..end`, like `range(start, end)`
    pub fn span(start: u32, end: u32) -> Self {
        RangeSpec::Span {
            start,
            end,
            step: 1,
        }
    }

    /// Half-open span with a step, like `range(start, end, step)`
    pub fn span_step(start: u32, end: u32, step: u32) -> Result<Self> {
        Ok(RangeSpec::Span {
            start,
            end,
            step: check_step(step)?,
        })
    }

    /// Explicit list of indices
    pub fn list<I: IntoIterator<Item = u32>>(indices: I) -> Self {
        RangeSpec::List(indices.into_iter().collect())
    }

    /// Every index from `start` on
    pub fn from(start: u32) -> Self {
        RangeSpec::Unbounded { start, step: 1 }
    }

    /// Every `step`-th index from `start` on
    pub fn from_step(start: u32, step: u32) -> Result<Self> {
        Ok(RangeSpec::Unbounded {
            start,
            step: check_step(step)?,
        })
    }

    /// The same indices in the opposite order.
    ///
    /// An unbounded range has no last element to start from.
    pub fn reversed(self) -> Result<Self> {
        match self {
            RangeSpec::Span { start, end, step } => Ok(RangeSpec::ReversedSpan { start, end, step }),
            RangeSpec::ReversedSpan { start, end, step } => Ok(RangeSpec::Span { start, end, step }),
            RangeSpec::List(indices) => Ok(RangeSpec::ReversedList(indices)),
            RangeSpec::ReversedList(indices) => Ok(RangeSpec::List(indices)),
            RangeSpec::Unbounded { start, .. } => Err(Error::InvalidRange(format!(
                "cannot reverse unbounded range starting at {}",
                start
            ))),
        }
    }

    /// Whether the range ends
    pub fn is_finite(&self) -> bool {
        !matches!(self, RangeSpec::Unbounded { .. })
    }

    /// Number of indices, `None` for an unbounded range
    pub fn len(&self) -> Option<usize> {
        match self {
            RangeSpec::Span { start, end, step } | RangeSpec::ReversedSpan { start, end, step } => {
                Some(span_len(*start, *end, *step))
            }
            RangeSpec::List(indices) | RangeSpec::ReversedList(indices) => Some(indices.len()),
            RangeSpec::Unbounded { .. } => None,
        }
    }

    /// Whether a finite range holds no indices
    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// A fresh cursor positioned at the first index
    pub fn cursor(&self) -> RangeCursor {
        let state = match *self {
            RangeSpec::Span { start, end, step } => CursorState::Up {
                next: (start < end).then_some(start),
                end: Some(end),
                step,
            },
            RangeSpec::ReversedSpan { start, end, step } => CursorState::Down {
                next: span_last(start, end, step),
                start,
                step,
            },
            RangeSpec::List(ref indices) => CursorState::List {
                indices: indices.clone(),
                pos: 0,
                reversed: false,
            },
            RangeSpec::ReversedList(ref indices) => CursorState::List {
                indices: indices.clone(),
                pos: 0,
                reversed: true,
            },
            RangeSpec::Unbounded { start, step } => CursorState::Up {
                next: Some(start),
                end: None,
                step,
            },
        };
        RangeCursor { state }
    }
}

fn check_step(step: u32) -> Result<u32> {
    if step == 0 {
        return Err(Error::InvalidRange("step must be at least 1".into()));
    }
    Ok(step)
}

fn span_len(start: u32, end: u32, step: u32) -> usize {
    if start >= end {
        return 0;
    }
    ((end - start - 1) / step) as usize + 1
}

/// Last index of `start..end` stepping by `step`
fn span_last(start: u32, end: u32, step: u32) -> Option<u32> {
    (start < end).then(|| start + (end - start - 1) / step * step)
}

/// Pull-based producer of the indices of a [`RangeSpec`].
///
/// Each index is computed when it is pulled; a span never holds its indices.
/// An unbounded cursor ends when the next index would overflow `u32`.
#[derive(Debug, Clone)]
pub struct RangeCursor {
    state: CursorState,
}

#[derive(Debug, Clone)]
enum CursorState {
    Up {
        next: Option<u32>,
        end: Option<u32>,
        step: u32,
    },
    Down {
        next: Option<u32>,
        start: u32,
        step: u32,
    },
    List {
        indices: Vec<u32>,
        pos: usize,
        reversed: bool,
    },
}

impl Iterator for RangeCursor {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        match &mut self.state {
            CursorState::Up { next, end, step } => {
                let current = (*next)?;
                *next = current
                    .checked_add(*step)
                    .filter(|n| end.map_or(true, |end| *n < end));
                Some(current)
            }
            CursorState::Down { next, start, step } => {
                let current = (*next)?;
                *next = current.checked_sub(*step).filter(|n| *n >= *start);
                Some(current)
            }
            CursorState::List {
                indices,
                pos,
                reversed,
            } => {
                let len = indices.len();
                if *pos >= len {
                    return None;
                }
                let at = if *reversed { len - 1 - *pos } else { *pos };
                *pos += 1;
                Some(indices[at])
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match &self.state {
            CursorState::Up { next: None, .. } | CursorState::Down { next: None, .. } => 0,
            CursorState::Up {
                next: Some(next),
                end: Some(end),
                step,
            } => span_len(*next, *end, *step),
            CursorState::Up { end: None, .. } => return (1, None),
            CursorState::Down {
                next: Some(next),
                start,
                step,
            } => ((next - start) / step) as usize + 1,
            CursorState::List { indices, pos, .. } => indices.len() - pos,
        };
        (remaining, Some(remaining))
    }
}

impl FusedIterator for RangeCursor {}

impl IntoIterator for RangeSpec {
    type Item = u32;
    type IntoIter = RangeCursor;

    fn into_iter(self) -> RangeCursor {
        self.cursor()
    }
}

impl IntoIterator for &RangeSpec {
    type Item = u32;
    type IntoIter = RangeCursor;

    fn into_iter(self) -> RangeCursor {
        self.cursor()
    }
}

impl fmt::Display for RangeSpec {
    /// Writes the text form [`FromStr`] reads back. An empty list has none.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeSpec::Span { start, end, step: 1 } => write!(f, "{}..{}", start, end),
            RangeSpec::Span { start, end, step } => write!(f, "{}..{}:{}", start, end, step),
            RangeSpec::ReversedSpan { start, end, step: 1 } => {
                write!(f, "rev:{}..{}", start, end)
            }
            RangeSpec::ReversedSpan { start, end, step } => {
                write!(f, "rev:{}..{}:{}", start, end, step)
            }
            RangeSpec::List(indices) => write_indices(f, indices),
            RangeSpec::ReversedList(indices) => {
                f.write_str("rev:")?;
                write_indices(f, indices)
            }
            RangeSpec::Unbounded { start, step: 1 } => write!(f, "{}..", start),
            RangeSpec::Unbounded { start, step } => write!(f, "{}..:{}", start, step),
        }
    }
}

fn write_indices(f: &mut fmt::Formatter<'_>, indices: &[u32]) -> fmt::Result {
    for (i, index) in indices.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{}", index)?;
    }
    Ok(())
}

impl FromStr for RangeSpec {
    type Err = Error;

    /// Parse the range text syntax:
    ///
    /// - `3..10` half-open span, `3..=10` inclusive span
    /// - `2..8:2` span with step
    /// - `5..` / `5..:2` unbounded
    /// - `1,5,6` explicit list, `7` single index
    /// - `rev:` prefix reverses any finite form
    fn from_str(s: &str) -> Result<Self> {
        let text = s.trim();
        if let Some(rest) = text.strip_prefix("rev:") {
            return rest.parse::<RangeSpec>()?.reversed();
        }

        let invalid = || Error::InvalidRange(format!("'{}'", s));
        let number = |part: &str| part.trim().parse::<u32>().map_err(|_| invalid());

        let Some((start, rest)) = text.split_once("..") else {
            if text.is_empty() {
                return Err(invalid());
            }
            return text
                .split(',')
                .map(number)
                .collect::<Result<Vec<_>>>()
                .map(RangeSpec::List);
        };

        let start = number(start)?;
        let (end, step) = match rest.split_once(':') {
            Some((end, step)) => (end, number(step)?),
            None => (rest, 1),
        };

        let end = end.trim();
        if end.is_empty() {
            return RangeSpec::from_step(start, step);
        }

        let end = match end.strip_prefix('=') {
            Some(inclusive) => number(inclusive)?.checked_add(1).ok_or_else(invalid)?,
            None => number(end)?,
        };
        if end < start {
            return Err(Error::InvalidRange(format!(
                "'{}': end is before start (use rev: to scan backwards)",
                s
            )));
        }
        RangeSpec::span_step(start, end, step)
    }
}
