use std::{fmt, str::FromStr};
use thiserror::Error;

/// A line designator or premise citation: one line, or the closed range of a subproof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LineRef {
    Line(usize),
    Range(usize, usize),
}

impl LineRef {
    pub fn start(self) -> usize {
        match self {
            LineRef::Line(n) => n,
            LineRef::Range(s, _) => s,
        }
    }

    pub fn end(self) -> usize {
        match self {
            LineRef::Line(n) => n,
            LineRef::Range(_, e) => e,
        }
    }

    pub fn is_range(self) -> bool {
        matches!(self, LineRef::Range(_, _))
    }

    pub fn contains(self, line: usize) -> bool {
        (self.start()..=self.end()).contains(&line)
    }

    /// Orders by first line, then by last line.
    pub fn sort_key(self) -> (usize, usize) {
        (self.start(), self.end())
    }
}

impl fmt::Display for LineRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineRef::Line(n) => write!(f, "{n}"),
            LineRef::Range(s, e) => write!(f, "{s}-{e}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{0}` is not a line number or a line range")]
pub struct LineRefError(String);

impl FromStr for LineRef {
    type Err = LineRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || LineRefError(s.to_string());
        let number = |t: &str| t.trim().parse::<usize>().map_err(|_| err());

        match s.split_once('-') {
            Some((start, end)) => {
                let (start, end) = (number(start)?, number(end)?);
                if start > end {
                    return Err(err());
                }
                Ok(LineRef::Range(start, end))
            }
            None => Ok(LineRef::Line(number(s)?)),
        }
    }
}
