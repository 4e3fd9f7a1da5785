use crate::proof::{LineRef, NodePath};
use thiserror::Error;

/// Why a cited premise could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CitationError {
    #[error("line {0} does not exist")]
    UnknownLine(LineRef),
    #[error("line {premise} is not available at line {line}")]
    NotEarlier { premise: LineRef, line: LineRef },
    #[error("line {0} is not a formula")]
    NotAFormula(LineRef),
    #[error("subproof {0} has no hypothesis formula or does not end in a conclusion")]
    MalformedSubproof(LineRef),
}

/// A tree that breaks the shape every proof must have.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    #[error("the root must be a subproof with at least one line")]
    BadRoot,
    #[error("the subproof at {0} has no hypothesis")]
    MissingHypothesisZone(NodePath),
    #[error("the subproof at {0} has no conclusion")]
    MissingConclusionZone(NodePath),
    #[error("the subproof at {0} has more than one hypothesis")]
    TooManyHypotheses(NodePath),
    #[error("the hypothesis-zone line at {0} comes after a conclusion")]
    ZoneOrder(NodePath),
}
