use crate::{
    formula::Formula,
    proof::{Annotation, LineRef, NodePath},
};
use std::fmt;

/// Which part of its subproof a line sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    Hypothesis,
    Conclusion,
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Hypothesis => write!(f, "hypothesis"),
            Zone::Conclusion => write!(f, "conclusion"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaLine {
    formula: Formula,
    annotation: Annotation,
}

impl FormulaLine {
    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    pub fn annotation(&self) -> &Annotation {
        &self.annotation
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeLabel {
    Subproof,
    /// Always annotated `hyp`.
    Hypothesis(FormulaLine),
    Conclusion(FormulaLine),
    Comment { zone: Zone, text: String },
    Blank { zone: Zone },
}

impl NodeLabel {
    pub fn zone(&self) -> Zone {
        match self {
            NodeLabel::Subproof | NodeLabel::Conclusion(_) => Zone::Conclusion,
            NodeLabel::Hypothesis(_) => Zone::Hypothesis,
            NodeLabel::Comment { zone, .. } | NodeLabel::Blank { zone } => *zone,
        }
    }

    pub fn formula_line(&self) -> Option<&FormulaLine> {
        match self {
            NodeLabel::Hypothesis(line) | NodeLabel::Conclusion(line) => Some(line),
            _ => None,
        }
    }
}

/// A node of the proof tree. Paths, designators and validity are derived and
/// recomputed after every structural change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofNode {
    label: NodeLabel,
    children: Vec<ProofNode>,
    path: NodePath,
    designator: Option<LineRef>,
    validated: bool,
}

impl ProofNode {
    fn new(label: NodeLabel, children: Vec<ProofNode>) -> Self {
        Self {
            label,
            children,
            path: NodePath::root(),
            designator: None,
            validated: false,
        }
    }

    pub fn subproof(children: Vec<ProofNode>) -> Self {
        Self::new(NodeLabel::Subproof, children)
    }

    /// A subproof with a blank hypothesis and a blank conclusion.
    pub fn blank_subproof() -> Self {
        Self::subproof(vec![
            Self::blank(Zone::Hypothesis),
            Self::blank(Zone::Conclusion),
        ])
    }

    pub fn hypothesis(formula: Formula) -> Self {
        Self::new(
            NodeLabel::Hypothesis(FormulaLine {
                formula,
                annotation: Annotation::hyp(),
            }),
            Vec::new(),
        )
    }

    pub fn conclusion(formula: Formula, annotation: Annotation) -> Self {
        Self::new(
            NodeLabel::Conclusion(FormulaLine {
                formula,
                annotation,
            }),
            Vec::new(),
        )
    }

    pub fn comment(zone: Zone, text: impl Into<String>) -> Self {
        Self::new(
            NodeLabel::Comment {
                zone,
                text: text.into(),
            },
            Vec::new(),
        )
    }

    pub fn blank(zone: Zone) -> Self {
        Self::new(NodeLabel::Blank { zone }, Vec::new())
    }

    pub fn label(&self) -> &NodeLabel {
        &self.label
    }

    pub fn children(&self) -> &[ProofNode] {
        &self.children
    }

    pub fn path(&self) -> &NodePath {
        &self.path
    }

    /// `None` until the node has been indexed as part of a proof.
    pub fn designator(&self) -> Option<LineRef> {
        self.designator
    }

    pub fn is_validated(&self) -> bool {
        self.validated
    }

    pub fn zone(&self) -> Zone {
        self.label.zone()
    }

    pub fn is_subproof(&self) -> bool {
        matches!(self.label, NodeLabel::Subproof)
    }

    pub fn is_hypothesis(&self) -> bool {
        matches!(self.label, NodeLabel::Hypothesis(_))
    }

    pub fn formula(&self) -> Option<&Formula> {
        self.label.formula_line().map(FormulaLine::formula)
    }

    pub fn annotation(&self) -> Option<&Annotation> {
        self.label.formula_line().map(FormulaLine::annotation)
    }

    /// The hypothesis formula of a subproof, if its hypothesis zone has one.
    pub fn hypothesis_formula(&self) -> Option<&Formula> {
        self.children
            .iter()
            .take_while(|c| c.zone() == Zone::Hypothesis)
            .find_map(|c| match &c.label {
                NodeLabel::Hypothesis(line) => Some(line.formula()),
                _ => None,
            })
    }

    /// Number of numbered lines in this subtree.
    pub fn leaf_count(&self) -> usize {
        if self.is_subproof() {
            self.children.iter().map(ProofNode::leaf_count).sum()
        } else {
            1
        }
    }

    /// Same labels and shape, ignoring derived data.
    pub fn same_structure(&self, other: &ProofNode) -> bool {
        self.label == other.label
            && self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(&other.children)
                .all(|(a, b)| a.same_structure(b))
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<ProofNode> {
        &mut self.children
    }

    pub(crate) fn set_path(&mut self, path: NodePath) {
        self.path = path;
    }

    pub(crate) fn set_designator(&mut self, designator: Option<LineRef>) {
        self.designator = designator;
    }

    pub(crate) fn set_validated(&mut self, validated: bool) {
        self.validated = validated;
    }

    pub(crate) fn annotation_mut(&mut self) -> Option<&mut Annotation> {
        match &mut self.label {
            NodeLabel::Conclusion(line) => Some(&mut line.annotation),
            _ => None,
        }
    }

    /// Moves a comment or blank line into `zone`. Formula lines and subproofs keep theirs.
    pub(crate) fn rezone(&mut self, target: Zone) {
        if let NodeLabel::Comment { zone, .. } | NodeLabel::Blank { zone } = &mut self.label {
            *zone = target;
        }
    }

    /// Forgets every derived field in this subtree so it is treated as new lines.
    pub(crate) fn detach(mut self) -> Self {
        self.clear_derived();
        self
    }

    fn clear_derived(&mut self) {
        self.path = NodePath::root();
        self.designator = None;
        self.validated = false;
        for child in &mut self.children {
            child.clear_derived();
        }
    }

    pub(crate) fn for_each_mut(&mut self, f: &mut impl FnMut(&mut ProofNode)) {
        f(self);
        for child in &mut self.children {
            child.for_each_mut(f);
        }
    }

    pub fn for_each(&self, f: &mut impl FnMut(&ProofNode)) {
        f(self);
        for child in &self.children {
            child.for_each(f);
        }
    }
}
