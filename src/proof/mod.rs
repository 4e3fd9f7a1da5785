use crate::formula::Formula;
use std::fmt;

mod annotation;
mod error;
mod index;
mod line_ref;
mod node;
mod path;
pub(crate) mod structure;
mod write;

pub use annotation::{Annotation, AnnotationError, Justification, PremiseKind, Rule};
pub use error::{CitationError, StructureError};
pub use index::LineIndex;
pub use line_ref::{LineRef, LineRefError};
pub use node::{FormulaLine, NodeLabel, ProofNode, Zone};
pub use path::NodePath;
pub use write::IndentStyle;

/// A whole proof: the tree plus its line index. The tree is the source of
/// truth; the index and every node's derived fields are rebuilt after each
/// structural change.
#[derive(Debug, Clone)]
pub struct Proof {
    root: ProofNode,
    index: LineIndex,
}

impl Proof {
    /// Wraps a tree built in code. Checks its shape, numbers it and validates it.
    pub fn from_root(root: ProofNode) -> Result<Self, StructureError> {
        structure::check_structure(&root)?;
        let mut proof = Self::indexed(root);
        proof.validate_all();
        Ok(proof)
    }

    pub(crate) fn indexed(mut root: ProofNode) -> Self {
        let index = LineIndex::build(&mut root);
        Self { root, index }
    }

    pub fn root(&self) -> &ProofNode {
        &self.root
    }

    pub fn index(&self) -> &LineIndex {
        &self.index
    }

    pub fn line_count(&self) -> usize {
        self.index.line_count()
    }

    pub fn rebuild_index(&mut self) {
        self.index = LineIndex::build(&mut self.root);
    }

    pub fn path_of(&self, line: LineRef) -> Option<&NodePath> {
        self.index.path_of(line)
    }

    pub fn node_at(&self, path: &NodePath) -> Option<&ProofNode> {
        path.indices()
            .iter()
            .try_fold(&self.root, |node, &i| node.children().get(i))
    }

    pub(crate) fn node_at_mut(&mut self, path: &NodePath) -> Option<&mut ProofNode> {
        path.indices()
            .iter()
            .try_fold(&mut self.root, |node, &i| node.children_mut().get_mut(i))
    }

    pub fn node_at_ref(&self, line: LineRef) -> Option<&ProofNode> {
        self.node_at(self.path_of(line)?)
    }

    /// Numbered lines in order.
    pub fn lines(&self) -> impl Iterator<Item = (LineRef, &ProofNode)> {
        self.index
            .lines()
            .filter_map(|(r, path)| Some((r, self.node_at(path)?)))
    }

    /// Whether `a` may be cited from `b`. False if either does not exist.
    pub fn is_earlier(&self, a: LineRef, b: LineRef) -> bool {
        match (self.path_of(a), self.path_of(b)) {
            (Some(a), Some(b)) => a.is_earlier(b),
            _ => false,
        }
    }

    /// Reads the subproof at `line` as "hypothesis implies last conclusion".
    pub fn subproof_as_implication(&self, line: LineRef) -> Result<Formula, CitationError> {
        let node = self
            .node_at_ref(line)
            .ok_or(CitationError::UnknownLine(line))?;
        if !node.is_subproof() {
            return Err(CitationError::NotAFormula(line));
        }

        let malformed = || CitationError::MalformedSubproof(line);
        let hypothesis = node.hypothesis_formula().ok_or_else(malformed)?;

        let last = node
            .children()
            .iter()
            .rev()
            .find(|c| !matches!(c.label(), NodeLabel::Comment { .. } | NodeLabel::Blank { .. }))
            .ok_or_else(malformed)?;

        match last.label() {
            NodeLabel::Conclusion(conclusion) => Ok(Formula::imp(
                hypothesis.clone(),
                conclusion.formula().clone(),
            )),
            _ => Err(malformed()),
        }
    }

    pub(crate) fn root_mut(&mut self) -> &mut ProofNode {
        &mut self.root
    }

    pub(crate) fn replace_root(&mut self, root: ProofNode) {
        self.root = root;
        self.rebuild_index();
    }
}

impl fmt::Display for Proof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text(IndentStyle::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hyp(text: &str) -> ProofNode {
        ProofNode::hypothesis(Formula::parse(text).unwrap())
    }

    fn conc(text: &str) -> ProofNode {
        ProofNode::conclusion(Formula::parse(text).unwrap(), Annotation::Empty)
    }

    fn sample() -> Proof {
        Proof::from_root(ProofNode::subproof(vec![
            hyp("A imp B"),
            ProofNode::subproof(vec![
                hyp("A"),
                conc("B"),
                ProofNode::comment(Zone::Conclusion, "# done"),
            ]),
            ProofNode::subproof(vec![hyp("C"), ProofNode::blank(Zone::Conclusion)]),
        ]))
        .unwrap()
    }

    #[test]
    fn subproof_reads_as_implication() {
        let proof = sample();
        assert_eq!(
            proof.subproof_as_implication(LineRef::Range(2, 4)),
            Ok(Formula::parse("A imp B").unwrap())
        );
    }

    #[test]
    fn subproof_without_conclusion_is_malformed() {
        let proof = sample();
        assert_eq!(
            proof.subproof_as_implication(LineRef::Range(5, 6)),
            Err(CitationError::MalformedSubproof(LineRef::Range(5, 6)))
        );
        assert_eq!(
            proof.subproof_as_implication(LineRef::Line(1)),
            Err(CitationError::NotAFormula(LineRef::Line(1)))
        );
    }

    #[test]
    fn is_earlier_uses_paths() {
        let proof = sample();
        assert!(proof.is_earlier(LineRef::Line(1), LineRef::Line(3)));
        assert!(proof.is_earlier(LineRef::Range(2, 4), LineRef::Line(5)));
        assert!(!proof.is_earlier(LineRef::Line(3), LineRef::Line(5)));
        assert!(!proof.is_earlier(LineRef::Line(9), LineRef::Line(5)));
    }

    #[test]
    fn node_lookup() {
        let proof = sample();
        assert_eq!(proof.line_count(), 6);
        let node = proof.node_at_ref(LineRef::Line(3)).unwrap();
        assert_eq!(node.formula(), Some(&Formula::atom("B")));
        assert_eq!(node.path(), &NodePath::new(vec![1, 1]));
        assert_eq!(proof.lines().count(), 6);
    }
}
