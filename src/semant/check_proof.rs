use crate::{
    formula::Formula,
    proof::{Annotation, CitationError, LineRef, NodeLabel, Proof, ProofNode, Rule},
    semant::{proof_status::LineStatus, rules::verifies},
};
use tracing::debug;

impl Proof {
    /// Why `line` is or is not valid.
    pub fn line_status(&self, line: LineRef) -> LineStatus {
        let Some(node) = self.node_at_ref(line) else {
            return LineStatus::Unknown;
        };

        let conclusion = match node.label() {
            NodeLabel::Hypothesis(_) => return LineStatus::Hypothesis,
            NodeLabel::Conclusion(conclusion) => conclusion,
            _ => return LineStatus::NotAFormula,
        };

        let justification = match conclusion.annotation() {
            Annotation::Empty => return LineStatus::Unjustified,
            Annotation::Raw(text) => return LineStatus::MalformedAnnotation(text.clone()),
            Annotation::Justified(j) => j,
        };

        let rule = justification.rule();
        if rule == Rule::Hyp {
            // Only the hypothesis zone may assume things.
            return LineStatus::Mismatch(rule);
        }

        let premises = match self.resolve_premises(justification.premises(), line) {
            Ok(premises) => premises,
            Err(err) => return LineStatus::BadCitation(err),
        };

        if verifies(rule, conclusion.formula(), &premises) {
            LineStatus::Verified(rule)
        } else {
            LineStatus::Mismatch(rule)
        }
    }

    /// True for hypotheses and for conclusions their annotation justifies.
    pub fn verified(&self, line: LineRef) -> bool {
        self.line_status(line).is_valid()
    }

    /// The formula `premise` stands for when cited from `line`.
    pub fn resolve_premise(&self, premise: LineRef, line: LineRef) -> Result<Formula, CitationError> {
        let path = self
            .path_of(premise)
            .ok_or(CitationError::UnknownLine(premise))?;
        let line_path = self.path_of(line).ok_or(CitationError::UnknownLine(line))?;

        if !path.is_earlier(line_path) {
            return Err(CitationError::NotEarlier { premise, line });
        }

        let node = self
            .node_at(path)
            .ok_or(CitationError::UnknownLine(premise))?;
        match node.label() {
            NodeLabel::Hypothesis(cited) | NodeLabel::Conclusion(cited) => {
                Ok(cited.formula().clone())
            }
            NodeLabel::Subproof => self.subproof_as_implication(premise),
            NodeLabel::Comment { .. } | NodeLabel::Blank { .. } => {
                Err(CitationError::NotAFormula(premise))
            }
        }
    }

    pub fn resolve_premises(
        &self,
        premises: &[LineRef],
        line: LineRef,
    ) -> Result<Vec<Formula>, CitationError> {
        premises
            .iter()
            .map(|&p| self.resolve_premise(p, line))
            .collect()
    }

    /// Recomputes every node's validity flag. Comments and blanks are valid;
    /// a subproof is valid when all of its lines are.
    pub fn validate_all(&mut self) {
        let flags = self
            .index()
            .lines()
            .map(|(line, _)| !self.line_status(line).is_error())
            .collect::<Vec<_>>();

        let valid = flags.iter().filter(|&&f| f).count();
        debug!(valid, lines = flags.len(), "validated proof");

        let mut flags = flags.into_iter();
        mark(self.root_mut(), &mut flags);
    }

    pub fn all_valid(&self) -> bool {
        self.root().is_validated()
    }
}

fn mark(node: &mut ProofNode, flags: &mut impl Iterator<Item = bool>) -> bool {
    let valid = if node.is_subproof() {
        node.children_mut()
            .iter_mut()
            .fold(true, |all, child| mark(child, flags) && all)
    } else {
        flags.next().unwrap_or(false)
    };
    node.set_validated(valid);
    valid
}
