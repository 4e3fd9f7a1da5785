use crate::{formula::FormulaError, proof::Proof};
use std::{ops::Range, str::FromStr};
use thiserror::Error;
use tracing::debug;

mod frames;
mod lines;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    tab_size: usize,
}

impl LoadOptions {
    pub fn new(tab_size: usize) -> Self {
        Self {
            tab_size: tab_size.max(1),
        }
    }

    pub fn tab_size(&self) -> usize {
        self.tab_size
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self::new(2)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct LoadError {
    kind: LoadErrorKind,
    line: usize,
    span: Range<usize>,
}

impl LoadError {
    pub(crate) fn new(kind: LoadErrorKind, line: usize, span: Range<usize>) -> Self {
        Self { kind, line, span }
    }

    pub fn kind(&self) -> &LoadErrorKind {
        &self.kind
    }

    /// 1-based line of the input.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Byte range in the input.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadErrorKind {
    #[error("the proof is empty")]
    Empty,
    #[error("indentation goes more than one level deeper")]
    SkippedLevel,
    #[error("a subproof must start with a hypothesis")]
    OpenWithoutHypothesis,
    #[error("hypotheses of the proof must come before its conclusions")]
    HypothesisInConclusion,
    #[error("turnstile after the hypotheses have ended")]
    MisplacedTurnstile,
    #[error("subproof has no conclusion (missing turnstile?)")]
    MissingConclusion,
    #[error("subproof has more than one hypothesis")]
    TooManyHypotheses,
    #[error("formula line has no `.` annotation")]
    MissingAnnotation,
    #[error("invalid formula: {}", .0.kind())]
    Formula(FormulaError),
}

/// Reads Fitch text into a numbered and validated proof.
pub fn load(text: &str, options: &LoadOptions) -> Result<Proof, LoadError> {
    let mut builder = frames::TreeBuilder::new();
    for line in lines::read_lines(text, options.tab_size())? {
        builder.push_line(line)?;
    }

    let mut proof = Proof::indexed(builder.finish()?);
    proof.validate_all();
    debug!(lines = proof.line_count(), "loaded proof");

    Ok(proof)
}

impl FromStr for Proof {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        load(s, &LoadOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        formula::Formula,
        proof::{Annotation, LineRef, NodeLabel, Zone},
    };

    fn kind(text: &str) -> LoadErrorKind {
        load(text, &LoadOptions::default()).unwrap_err().kind().clone()
    }

    const SYLLOGISM: &str = "\
1. A imp B .hyp
2. B imp C .hyp
  3. A .hyp
  4. B .imp elim 1,3
  5. C .imp elim 2,4
6. A imp C .imp intro 3-5
";

    #[test]
    fn nests_by_indentation() {
        let proof: Proof = SYLLOGISM.parse().unwrap();
        assert_eq!(proof.line_count(), 6);

        let sub = proof.node_at_ref(LineRef::Range(3, 5)).unwrap();
        assert!(sub.is_subproof());
        assert_eq!(sub.children().len(), 3);
        assert!(sub.children()[0].is_hypothesis());
        assert_eq!(sub.children()[1].zone(), Zone::Conclusion);

        let last = proof.node_at_ref(LineRef::Line(6)).unwrap();
        assert_eq!(last.formula(), Some(&Formula::parse("A imp C").unwrap()));
    }

    #[test]
    fn explicit_turnstile_and_comments() {
        let proof: Proof = "\
# premises
1. A .hyp
proves
# body
2. A .repeat 1
"
        .parse()
        .unwrap();

        let root = proof.root();
        assert_eq!(root.children()[0].zone(), Zone::Hypothesis);
        assert_eq!(
            root.children()[2].label(),
            &NodeLabel::Comment {
                zone: Zone::Conclusion,
                text: "# body".into()
            }
        );
    }

    #[test]
    fn adjacent_subproofs_split_on_hypothesis() {
        let proof: Proof = "\
1. A or B .hyp
  2. A .hyp
  3. A .repeat 2
  4. B .hyp
  5. A .
6. A .
"
        .parse()
        .unwrap();
        assert!(proof.node_at_ref(LineRef::Range(2, 3)).is_some());
        assert!(proof.node_at_ref(LineRef::Range(4, 5)).is_some());
    }

    #[test]
    fn bar_layout() {
        let proof: Proof = "\
│1. A .hyp
├─
││2. B .hyp
│├─
││3. A .repeat 1
│4. B imp A .imp intro 2-3
"
        .parse()
        .unwrap();
        assert_eq!(proof.line_count(), 4);
        assert!(proof.node_at_ref(LineRef::Range(2, 3)).is_some());
    }

    #[test]
    fn custom_tab_size() {
        let text = "1. A .hyp\n    2. B .hyp\n    3. A .repeat 1\n4. B imp A .\n";
        let proof = load(text, &LoadOptions::new(4)).unwrap();
        assert!(proof.node_at_ref(LineRef::Range(2, 3)).is_some());
    }

    #[test]
    fn root_needs_no_hypothesis() {
        let proof: Proof = "1. P or not P .LEM".parse().unwrap();
        let node = proof.node_at_ref(LineRef::Line(1)).unwrap();
        assert!(node.is_validated());
        assert_eq!(node.zone(), Zone::Conclusion);
    }

    #[test]
    fn keeps_malformed_annotations() {
        let proof: Proof = "1. A .hyp\n2. A .repeat\n".parse().unwrap();
        let node = proof.node_at_ref(LineRef::Line(2)).unwrap();
        assert_eq!(node.annotation(), Some(&Annotation::Raw("repeat".into())));
        assert!(!node.is_validated());
    }

    #[test]
    fn structural_errors() {
        assert_eq!(kind(""), LoadErrorKind::Empty);
        assert_eq!(kind("1. A .hyp\n    2. B .hyp\n"), LoadErrorKind::SkippedLevel);
        assert_eq!(
            kind("1. A .hyp\n  2. B .\n"),
            LoadErrorKind::OpenWithoutHypothesis
        );
        assert_eq!(
            kind("1. A .hyp\n  2. B .hyp\n  3. B .repeat 2\n4. C .hyp\n"),
            LoadErrorKind::HypothesisInConclusion
        );
        assert_eq!(
            kind("1. A .hyp\n2. A .repeat 1\n3. B .hyp\n"),
            LoadErrorKind::HypothesisInConclusion
        );
        assert_eq!(
            kind("1. A .hyp\n2. A .repeat 1\nproves\n"),
            LoadErrorKind::MisplacedTurnstile
        );
        assert_eq!(
            kind("1. A .hyp\n  2. B .hyp\n3. A .\n"),
            LoadErrorKind::MissingConclusion
        );
        assert_eq!(
            kind("1. A .hyp\n  2. B .hyp\n  3. C .hyp\n  4. B .\n"),
            LoadErrorKind::TooManyHypotheses
        );
    }

    #[test]
    fn dedent_onto_a_hypothesis_opens_a_sibling() {
        let proof: Proof = "\
1. A .hyp
  2. B .hyp
    3. C .hyp
    4. C .repeat 3
  5. D .hyp
  6. D .repeat 5
7. A .repeat 1
"
        .parse()
        .unwrap();
        assert!(proof.node_at_ref(LineRef::Range(2, 4)).is_some());
        assert!(proof.node_at_ref(LineRef::Range(5, 6)).is_some());
    }

    #[test]
    fn errors_point_at_the_line() {
        let err = load("1. A .hyp\n  2. B .\n", &LoadOptions::default()).unwrap_err();
        assert_eq!(err.line(), 2);
        assert_eq!(err.span(), 15..18);
        assert_eq!(
            err.to_string(),
            "line 2: a subproof must start with a hypothesis"
        );
    }
}
