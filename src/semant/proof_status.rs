use crate::proof::{CitationError, LineRef, Proof, Rule};
use std::fmt;

/// The verdict on one numbered line, with the reason when it is not valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineStatus {
    Hypothesis,
    Verified(Rule),
    NotAFormula,
    Unknown,
    Unjustified,
    MalformedAnnotation(String),
    BadCitation(CitationError),
    Mismatch(Rule),
}

impl LineStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, LineStatus::Hypothesis | LineStatus::Verified(_))
    }

    pub fn is_error(&self) -> bool {
        !matches!(
            self,
            LineStatus::Hypothesis | LineStatus::Verified(_) | LineStatus::NotAFormula
        )
    }
}

impl fmt::Display for LineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineStatus::Hypothesis => write!(f, "hypothesis"),
            LineStatus::Verified(rule) => write!(f, "follows by {rule}"),
            LineStatus::NotAFormula => write!(f, "not a formula"),
            LineStatus::Unknown => write!(f, "no such line"),
            LineStatus::Unjustified => write!(f, "no justification given"),
            LineStatus::MalformedAnnotation(text) => write!(f, "cannot read annotation `{text}`"),
            LineStatus::BadCitation(err) => write!(f, "{err}"),
            LineStatus::Mismatch(rule) => write!(f, "does not follow by {rule}"),
        }
    }
}

/// Per-line verdicts for a whole proof.
#[derive(Debug, Clone, Default)]
pub struct ProofStatuses {
    problems: Vec<(LineRef, LineStatus)>,
    hypothesis_cnt: usize,
    verified_cnt: usize,
    unjustified_cnt: usize,
}

impl ProofStatuses {
    pub fn collect(proof: &Proof) -> Self {
        let mut statuses = Self::default();
        for (line, _) in proof.lines() {
            statuses.add(line, proof.line_status(line));
        }
        statuses
    }

    fn add(&mut self, line: LineRef, status: LineStatus) {
        match status {
            LineStatus::Hypothesis => self.hypothesis_cnt += 1,
            LineStatus::Verified(_) => self.verified_cnt += 1,
            LineStatus::NotAFormula => {}
            LineStatus::Unjustified => {
                self.unjustified_cnt += 1;
                self.problems.push((line, status));
            }
            _ => self.problems.push((line, status)),
        }
    }

    pub fn hypothesis_cnt(&self) -> usize {
        self.hypothesis_cnt
    }

    pub fn verified_cnt(&self) -> usize {
        self.verified_cnt
    }

    pub fn unjustified_cnt(&self) -> usize {
        self.unjustified_cnt
    }

    /// Lines that are neither valid nor merely unjustified.
    pub fn error_cnt(&self) -> usize {
        self.problems.len() - self.unjustified_cnt
    }

    /// Every line that is not valid, in order.
    pub fn problems(&self) -> &[(LineRef, LineStatus)] {
        &self.problems
    }

    pub fn all_valid(&self) -> bool {
        self.problems.is_empty()
    }
}
