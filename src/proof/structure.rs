use crate::proof::{NodePath, ProofNode, StructureError, Zone};

/// Checks the shape of a (possibly unlabeled) tree: hypothesis zones come
/// first, and every subproof but the root has both zones and at most one
/// hypothesis formula.
pub(crate) fn check_structure(root: &ProofNode) -> Result<(), StructureError> {
    if !root.is_subproof() || root.children().is_empty() {
        return Err(StructureError::BadRoot);
    }
    check_subproof(root, &NodePath::root())
}

fn check_subproof(node: &ProofNode, path: &NodePath) -> Result<(), StructureError> {
    let children = node.children();
    let hyp_len = children
        .iter()
        .take_while(|c| c.zone() == Zone::Hypothesis)
        .count();

    if let Some(i) = children[hyp_len..]
        .iter()
        .position(|c| c.zone() == Zone::Hypothesis)
    {
        return Err(StructureError::ZoneOrder(path.child(hyp_len + i)));
    }

    if !path.is_root() {
        if hyp_len == 0 {
            return Err(StructureError::MissingHypothesisZone(path.clone()));
        }
        if hyp_len == children.len() {
            return Err(StructureError::MissingConclusionZone(path.clone()));
        }
        if children[..hyp_len].iter().filter(|c| c.is_hypothesis()).count() > 1 {
            return Err(StructureError::TooManyHypotheses(path.clone()));
        }
    }

    for (i, child) in children.iter().enumerate() {
        if child.is_subproof() {
            check_subproof(child, &path.child(i))?;
        }
    }

    Ok(())
}

/// Refills zones an edit left empty with blank lines.
pub(crate) fn fill_empty_zones(root: &mut ProofNode) {
    if root.children().is_empty() {
        root.children_mut().push(ProofNode::blank(Zone::Conclusion));
    }
    for child in root.children_mut() {
        if child.is_subproof() {
            fill_subproof(child);
        }
    }
}

fn fill_subproof(node: &mut ProofNode) {
    let children = node.children_mut();
    if children.first().is_none_or(|c| c.zone() != Zone::Hypothesis) {
        children.insert(0, ProofNode::blank(Zone::Hypothesis));
    }
    if children.last().is_none_or(|c| c.zone() != Zone::Conclusion) {
        children.push(ProofNode::blank(Zone::Conclusion));
    }
    for child in children {
        if child.is_subproof() {
            fill_subproof(child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{formula::Formula, proof::Annotation};

    fn hyp(name: &str) -> ProofNode {
        ProofNode::hypothesis(Formula::atom(name))
    }

    fn conc(name: &str) -> ProofNode {
        ProofNode::conclusion(Formula::atom(name), Annotation::Empty)
    }

    #[test]
    fn root_may_have_many_or_no_hypotheses() {
        let root = ProofNode::subproof(vec![hyp("A"), hyp("B"), conc("A")]);
        assert_eq!(check_structure(&root), Ok(()));
        let root = ProofNode::subproof(vec![conc("A")]);
        assert_eq!(check_structure(&root), Ok(()));
    }

    #[test]
    fn subproofs_need_both_zones() {
        let root = ProofNode::subproof(vec![ProofNode::subproof(vec![hyp("A")])]);
        assert_eq!(
            check_structure(&root),
            Err(StructureError::MissingConclusionZone(NodePath::new(vec![0])))
        );

        let root = ProofNode::subproof(vec![hyp("A"), ProofNode::subproof(vec![conc("A")])]);
        assert_eq!(
            check_structure(&root),
            Err(StructureError::MissingHypothesisZone(NodePath::new(vec![1])))
        );
    }

    #[test]
    fn rejects_two_hypotheses_and_misordered_zones() {
        let root = ProofNode::subproof(vec![ProofNode::subproof(vec![hyp("A"), hyp("B"), conc("A")])]);
        assert_eq!(
            check_structure(&root),
            Err(StructureError::TooManyHypotheses(NodePath::new(vec![0])))
        );

        let root = ProofNode::subproof(vec![conc("A"), hyp("B")]);
        assert_eq!(
            check_structure(&root),
            Err(StructureError::ZoneOrder(NodePath::new(vec![1])))
        );
    }

    #[test]
    fn fills_emptied_zones_with_blanks() {
        let mut root = ProofNode::subproof(vec![ProofNode::subproof(vec![conc("A")])]);
        fill_empty_zones(&mut root);
        assert_eq!(check_structure(&root), Ok(()));
        assert_eq!(
            root.children()[0].children()[0].label(),
            &crate::proof::NodeLabel::Blank {
                zone: Zone::Hypothesis
            }
        );

        let mut root = ProofNode::subproof(Vec::new());
        fill_empty_zones(&mut root);
        assert_eq!(root.children().len(), 1);
    }
}
