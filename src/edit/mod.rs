//! Structural edits. Every edit works on a copy of the tree, which replaces
//! the proof only once it has the right shape; citations are then renumbered
//! and the whole proof revalidated.

use crate::proof::{
    Annotation, LineRef, NodeLabel, NodePath, Proof, ProofNode, StructureError, Zone,
    structure::{check_structure, fill_empty_zones},
};
use renumber::{CopyInfo, Renumbering};
use std::ops::Range;
use thiserror::Error;
use tracing::debug;

mod renumber;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Above,
    Below,
}

/// Where new lines go, relative to an existing line or subproof.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    line: LineRef,
    placement: Placement,
    level_down: bool,
}

impl Target {
    /// Above `line`. Above the hypothesis of a subproof means above the subproof.
    pub fn above(line: LineRef) -> Self {
        Self {
            line,
            placement: Placement::Above,
            level_down: false,
        }
    }

    pub fn below(line: LineRef) -> Self {
        Self {
            line,
            placement: Placement::Below,
            level_down: false,
        }
    }

    /// Below the last line of a subproof, go after the subproof instead.
    pub fn level_down(self) -> Self {
        Self {
            level_down: true,
            ..self
        }
    }

    pub fn line(&self) -> LineRef {
        self.line
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }
}

/// One line or subproof, or a run of consecutive siblings from `first` to `last`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    first: LineRef,
    last: LineRef,
}

impl Chunk {
    pub fn node(line: LineRef) -> Self {
        Self {
            first: line,
            last: line,
        }
    }

    pub fn span(first: LineRef, last: LineRef) -> Self {
        Self { first, last }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("line {0} does not exist")]
    UnknownLine(LineRef),
    #[error("{0} and {1} are not siblings in order")]
    NotSiblings(LineRef, LineRef),
    #[error("nothing can go below the hypothesis at line {0}")]
    BelowHypothesis(LineRef),
    #[error("line does not belong in a {zone} zone")]
    ZoneMismatch { zone: Zone },
    #[error("a subproof cannot go in a hypothesis zone")]
    SubproofInHypothesisZone,
    #[error("lines cannot be moved into themselves")]
    MoveIntoItself,
    #[error("line {0} is not a conclusion")]
    NotAConclusion(LineRef),
    #[error("only a hypothesis can be justified by hyp")]
    HypOnConclusion,
    #[error(transparent)]
    Structure(#[from] StructureError),
}

/// A position among the children of the subproof at `parent`.
#[derive(Debug, Clone)]
struct Slot {
    parent: NodePath,
    rank: usize,
    /// The line the position was computed from.
    line: LineRef,
}

impl Slot {
    fn of(path: &NodePath, line: LineRef) -> Result<Self, EditError> {
        match (path.parent(), path.last()) {
            (Some(parent), Some(rank)) => Ok(Self { parent, rank, line }),
            _ => Err(EditError::UnknownLine(line)),
        }
    }

    /// The same position once siblings `ranks` of `removed_from` are gone.
    fn after_removal(mut self, removed_from: &NodePath, ranks: &Range<usize>) -> Option<Self> {
        let depth = removed_from.depth();

        if self.parent == *removed_from {
            if self.rank > ranks.start && self.rank < ranks.end {
                return None;
            }
            if self.rank >= ranks.end {
                self.rank -= ranks.len();
            }
        } else if self.parent.depth() > depth && self.parent.starts_with(removed_from) {
            let index = self.parent.indices()[depth];
            if ranks.contains(&index) {
                return None;
            }
            if index >= ranks.end {
                self.parent.indices_mut()[depth] = index - ranks.len();
            }
        }

        Some(self)
    }
}

impl Proof {
    /// Inserts `nodes` at `target`. With no nodes, inserts one blank line.
    pub fn insert(&mut self, target: Target, nodes: Vec<ProofNode>) -> Result<(), EditError> {
        let nodes = if nodes.is_empty() {
            vec![ProofNode::blank(Zone::Conclusion)]
        } else {
            nodes.into_iter().map(ProofNode::detach).collect()
        };

        let slot = self.slot_for(target)?;
        let mut draft = self.root().clone();
        place(&mut draft, &slot, nodes, None)?;

        debug!(at = %target.line, "insert");
        self.commit(draft, None)
    }

    pub fn delete(&mut self, chunk: Chunk) -> Result<(), EditError> {
        let (parent, ranks) = self.resolve_chunk(chunk)?;

        let mut draft = self.root().clone();
        children_mut(&mut draft, &parent, chunk.first)?.drain(ranks);

        debug!(first = %chunk.first, last = %chunk.last, "delete");
        self.commit(draft, None)
    }

    /// Moves a chunk to `target`. Citations of the moved lines follow them.
    pub fn move_chunk(&mut self, chunk: Chunk, target: Target) -> Result<(), EditError> {
        let (parent, ranks) = self.resolve_chunk(chunk)?;
        let slot = self
            .slot_for(target)?
            .after_removal(&parent, &ranks)
            .ok_or(EditError::MoveIntoItself)?;

        let mut draft = self.root().clone();
        let moved = children_mut(&mut draft, &parent, chunk.first)?
            .drain(ranks)
            .collect();
        place(&mut draft, &slot, moved, None)?;

        debug!(first = %chunk.first, last = %chunk.last, to = %target.line, "move");
        self.commit(draft, None)
    }

    /// Copies a chunk to `target`. Citations inside the copy that point into
    /// the chunk are redirected to the copy.
    pub fn duplicate(&mut self, chunk: Chunk, target: Target) -> Result<(), EditError> {
        let (parent, ranks) = self.resolve_chunk(chunk)?;
        let slot = self.slot_for(target)?;

        let originals = self
            .node_at(&parent)
            .and_then(|p| p.children().get(ranks))
            .ok_or(EditError::UnknownLine(chunk.first))?;
        let first = originals.first().and_then(ProofNode::designator);
        let last = originals.last().and_then(ProofNode::designator);
        let (Some(first), Some(last)) = (first, last) else {
            return Err(EditError::UnknownLine(chunk.first));
        };

        let copies = originals
            .iter()
            .cloned()
            .map(ProofNode::detach)
            .collect::<Vec<_>>();
        let copy = CopyInfo {
            parent: slot.parent.clone(),
            ranks: slot.rank..slot.rank + copies.len(),
            source: (first.start(), last.end()),
        };

        let mut draft = self.root().clone();
        place(&mut draft, &slot, copies, None)?;

        debug!(first = %chunk.first, last = %chunk.last, to = %target.line, "duplicate");
        self.commit(draft, Some(copy))
    }

    /// Puts `node` where `line` is. A line replaced by a line keeps its
    /// number's identity, so citations of it stay.
    pub fn replace(&mut self, line: LineRef, node: ProofNode) -> Result<(), EditError> {
        let path = self
            .path_of(line)
            .ok_or(EditError::UnknownLine(line))?
            .clone();
        let old = self.node_at(&path).ok_or(EditError::UnknownLine(line))?;

        let zone = old.zone();
        let mut node = node.detach();
        if !old.is_subproof() && !node.is_subproof() {
            node.set_designator(old.designator());
        }

        let slot = Slot::of(&path, line)?;
        let mut draft = self.root().clone();
        children_mut(&mut draft, &slot.parent, line)?.remove(slot.rank);
        place(&mut draft, &slot, vec![node], Some(zone))?;

        debug!(%line, "replace");
        self.commit(draft, None)
    }

    /// Sets the annotation of a conclusion line.
    pub fn annotate(&mut self, line: LineRef, annotation: Annotation) -> Result<(), EditError> {
        let path = self
            .path_of(line)
            .ok_or(EditError::UnknownLine(line))?
            .clone();
        let slot = self
            .node_at_mut(&path)
            .and_then(ProofNode::annotation_mut)
            .ok_or(EditError::NotAConclusion(line))?;
        if annotation.is_hyp() {
            return Err(EditError::HypOnConclusion);
        }
        *slot = annotation;

        self.validate_all();
        Ok(())
    }

    fn slot_for(&self, target: Target) -> Result<Slot, EditError> {
        let line = target.line;
        let path = self.path_of(line).ok_or(EditError::UnknownLine(line))?;
        let node = self.node_at(path).ok_or(EditError::UnknownLine(line))?;
        let here = Slot::of(path, line)?;

        let in_subproof_hypotheses = node.zone() == Zone::Hypothesis && !here.parent.is_root();
        let is_last = self
            .node_at(&here.parent)
            .is_some_and(|p| here.rank + 1 == p.children().len());

        match target.placement {
            Placement::Above if in_subproof_hypotheses => Slot::of(&here.parent, line),
            Placement::Above => Ok(here),
            Placement::Below if in_subproof_hypotheses => Err(EditError::BelowHypothesis(line)),
            Placement::Below if target.level_down && is_last && !here.parent.is_root() => {
                let outer = Slot::of(&here.parent, line)?;
                Ok(Slot {
                    rank: outer.rank + 1,
                    ..outer
                })
            }
            Placement::Below => Ok(Slot {
                rank: here.rank + 1,
                ..here
            }),
        }
    }

    fn resolve_chunk(&self, chunk: Chunk) -> Result<(NodePath, Range<usize>), EditError> {
        let first = self
            .path_of(chunk.first)
            .ok_or(EditError::UnknownLine(chunk.first))?;
        let last = self
            .path_of(chunk.last)
            .ok_or(EditError::UnknownLine(chunk.last))?;

        let first = Slot::of(first, chunk.first)?;
        let last = Slot::of(last, chunk.last)?;
        if first.parent != last.parent || first.rank > last.rank {
            return Err(EditError::NotSiblings(chunk.first, chunk.last));
        }

        Ok((first.parent, first.rank..last.rank + 1))
    }

    fn commit(&mut self, mut draft: ProofNode, copy: Option<CopyInfo>) -> Result<(), EditError> {
        fill_empty_zones(&mut draft);
        check_structure(&draft)?;

        let renumbering = Renumbering::of(&draft);
        self.replace_root(draft);
        self.adjust_premises(&renumbering, copy.as_ref());
        self.validate_all();

        debug!(lines = self.line_count(), "edit committed");
        Ok(())
    }

    fn adjust_premises(&mut self, renumbering: &Renumbering, copy: Option<&CopyInfo>) {
        let copy_start = copy
            .and_then(|c| self.node_at(&c.parent.child(c.ranks.start)))
            .and_then(ProofNode::designator)
            .map(LineRef::start);

        self.root_mut().for_each_mut(&mut |node| {
            let copy = copy.filter(|c| c.contains(node.path())).zip(copy_start);
            let Some(justification) = node
                .annotation_mut()
                .and_then(Annotation::justification_mut)
            else {
                return;
            };

            for premise in justification.premises_mut() {
                *premise = copy
                    .and_then(|(c, start)| c.translate(*premise, start))
                    .unwrap_or_else(|| renumbering.apply(*premise));
            }
        });
    }
}

fn children_mut<'a>(
    root: &'a mut ProofNode,
    path: &NodePath,
    line: LineRef,
) -> Result<&'a mut Vec<ProofNode>, EditError> {
    path.indices()
        .iter()
        .try_fold(root, |node, &i| node.children_mut().get_mut(i))
        .map(ProofNode::children_mut)
        .ok_or(EditError::UnknownLine(line))
}

/// Comments and blanks fit any zone; everything else has its own.
fn fixed_zone(node: &ProofNode) -> Option<Zone> {
    match node.label() {
        NodeLabel::Comment { .. } | NodeLabel::Blank { .. } => None,
        label => Some(label.zone()),
    }
}

/// The zone of a position, or `None` on the boundary between the root's zones,
/// where the inserted lines decide.
fn slot_zone(children: &[ProofNode], is_root: bool, rank: usize) -> Option<Zone> {
    let prev = rank
        .checked_sub(1)
        .and_then(|i| children.get(i))
        .map(ProofNode::zone);
    let next = children.get(rank).map(ProofNode::zone);

    match (prev, next) {
        (Some(Zone::Hypothesis) | None, Some(Zone::Conclusion) | None) if is_root => None,
        (Some(Zone::Hypothesis) | None, Some(Zone::Conclusion) | None) => Some(Zone::Conclusion),
        (Some(zone), _) | (None, Some(zone)) => Some(zone),
    }
}

/// Whether a conclusion in `node` is annotated `hyp`, which the loader would
/// read back as a hypothesis after the turnstile.
fn claims_hyp(node: &ProofNode) -> bool {
    let mut found = false;
    node.for_each(&mut |n| {
        found |= matches!(n.label(), NodeLabel::Conclusion(_))
            && n.annotation().is_some_and(Annotation::is_hyp);
    });
    found
}

fn place(
    draft: &mut ProofNode,
    slot: &Slot,
    mut nodes: Vec<ProofNode>,
    zone: Option<Zone>,
) -> Result<(), EditError> {
    if nodes.iter().any(claims_hyp) {
        return Err(EditError::HypOnConclusion);
    }

    let children = children_mut(draft, &slot.parent, slot.line)?;
    let zone = zone
        .or_else(|| slot_zone(children, slot.parent.is_root(), slot.rank))
        .or_else(|| nodes.iter().find_map(fixed_zone))
        .unwrap_or(Zone::Conclusion);

    for node in &mut nodes {
        match fixed_zone(node) {
            None => node.rezone(zone),
            Some(_) if node.is_subproof() && zone == Zone::Hypothesis => {
                return Err(EditError::SubproofInHypothesisZone);
            }
            Some(own) if own != zone => return Err(EditError::ZoneMismatch { zone }),
            Some(_) => {}
        }
    }

    let rank = slot.rank.min(children.len());
    children.splice(rank..rank, nodes);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{formula::Formula, proof::Justification};
    use pretty_assertions::assert_eq;

    const SYLLOGISM: &str = "\
1. A imp B .hyp
2. B imp C .hyp
  3. A .hyp
  4. B .imp elim 1,3
  5. C .imp elim 2,4
6. A imp C .imp intro 3-5
";

    fn syllogism() -> Proof {
        SYLLOGISM.parse().unwrap()
    }

    fn annotation(proof: &Proof, line: usize) -> String {
        proof
            .node_at_ref(LineRef::Line(line))
            .and_then(ProofNode::annotation)
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    fn conclusion(text: &str) -> ProofNode {
        ProofNode::conclusion(Formula::parse(text).unwrap(), Annotation::Empty)
    }

    fn line(n: usize) -> LineRef {
        LineRef::Line(n)
    }

    #[test]
    fn deleting_a_cited_line_invalidates_its_users() {
        let mut proof = syllogism();
        proof.delete(Chunk::node(line(4))).unwrap();

        assert_eq!(proof.line_count(), 5);
        for n in 1..=3 {
            assert!(proof.verified(line(n)), "line {n}");
        }
        assert_eq!(annotation(&proof, 4), "imp elim 2,0");
        assert_eq!(annotation(&proof, 5), "imp intro 0-0");
        assert!(!proof.verified(line(4)));
        assert!(!proof.verified(line(5)));
        assert!(!proof.all_valid());
    }

    #[test]
    fn deleted_premise_is_not_taken_over_by_an_earlier_line() {
        let mut proof: Proof = "1. A and B .hyp\n2. A .and elim 1\n3. A .and elim 1\n4. A .repeat 2\n"
            .parse()
            .unwrap();
        proof.delete(Chunk::node(line(2))).unwrap();

        // Line 2 is now the old line 3, which has the same formula.
        assert_eq!(annotation(&proof, 3), "repeat 0");
        assert_eq!(
            proof.line_status(line(3)),
            crate::semant::LineStatus::BadCitation(crate::proof::CitationError::UnknownLine(
                LineRef::Line(0)
            ))
        );
        assert!(!proof.all_valid());

        let reloaded: Proof = proof.to_string().parse().unwrap();
        assert!(!reloaded.verified(line(3)));
    }

    #[test]
    fn replacing_a_subproof_leaves_its_citations_dangling() {
        let mut proof = syllogism();
        proof.replace(LineRef::Range(3, 5), conclusion("A")).unwrap();

        assert_eq!(proof.line_count(), 4);
        assert_eq!(annotation(&proof, 4), "imp intro 0-0");
        assert!(!proof.verified(line(4)));
    }

    #[test]
    fn inserting_shifts_later_citations() {
        let mut proof = syllogism();
        proof.insert(Target::below(line(2)), Vec::new()).unwrap();

        assert_eq!(proof.line_count(), 7);
        assert!(matches!(
            proof.node_at_ref(line(3)).unwrap().label(),
            NodeLabel::Blank {
                zone: Zone::Conclusion
            }
        ));
        assert_eq!(annotation(&proof, 5), "imp elim 1,4");
        assert_eq!(annotation(&proof, 6), "imp elim 2,5");
        assert_eq!(annotation(&proof, 7), "imp intro 4-6");
        assert!(proof.all_valid());
    }

    #[test]
    fn inserting_inside_a_subproof_grows_its_range() {
        let mut proof = syllogism();
        proof
            .insert(Target::below(line(5)), vec![ProofNode::comment(Zone::Conclusion, "# done")])
            .unwrap();

        assert!(proof.node_at_ref(LineRef::Range(3, 6)).is_some());
        assert_eq!(annotation(&proof, 7), "imp intro 3-6");
        assert!(proof.all_valid());
    }

    #[test]
    fn above_a_subproof_hypothesis_means_above_the_subproof() {
        let mut proof = syllogism();
        proof
            .insert(Target::above(line(3)), vec![conclusion("A imp B")])
            .unwrap();

        let new = proof.node_at_ref(line(3)).unwrap();
        assert_eq!(new.path(), &NodePath::new(vec![2]));
        assert!(proof.node_at_ref(LineRef::Range(4, 6)).is_some());
        assert_eq!(annotation(&proof, 7), "imp intro 4-6");
    }

    #[test]
    fn level_down_goes_after_the_subproof() {
        let mut proof = syllogism();
        proof
            .insert(Target::below(line(5)).level_down(), vec![conclusion("A imp C")])
            .unwrap();

        assert_eq!(proof.node_at_ref(line(6)).unwrap().path(), &NodePath::new(vec![3]));
        assert!(proof.node_at_ref(LineRef::Range(3, 5)).is_some());
        assert_eq!(annotation(&proof, 7), "imp intro 3-5");
    }

    #[test]
    fn rejected_edits_leave_the_proof_alone() {
        let mut proof = syllogism();
        let before = proof.to_string();

        assert_eq!(
            proof.insert(Target::below(line(3)), Vec::new()),
            Err(EditError::BelowHypothesis(line(3)))
        );
        assert_eq!(
            proof.insert(
                Target::above(line(1)),
                vec![ProofNode::subproof(vec![
                    ProofNode::hypothesis(Formula::atom("D")),
                    conclusion("D"),
                ])]
            ),
            Err(EditError::SubproofInHypothesisZone)
        );
        assert_eq!(
            proof.insert(Target::below(line(4)), vec![ProofNode::hypothesis(Formula::atom("D"))]),
            Err(EditError::ZoneMismatch {
                zone: Zone::Conclusion
            })
        );
        assert_eq!(
            proof.delete(Chunk::span(line(3), line(6))),
            Err(EditError::NotSiblings(line(3), line(6)))
        );
        assert_eq!(
            proof.delete(Chunk::node(line(9))),
            Err(EditError::UnknownLine(line(9)))
        );

        assert_eq!(proof.to_string(), before);
    }

    #[test]
    fn root_takes_more_hypotheses_at_its_boundary() {
        let mut proof = syllogism();
        proof
            .insert(Target::below(line(2)), vec![ProofNode::hypothesis(Formula::atom("D"))])
            .unwrap();
        assert!(proof.node_at_ref(line(3)).unwrap().is_hypothesis());
        assert_eq!(annotation(&proof, 7), "imp intro 4-6");
        assert!(proof.all_valid());
    }

    #[test]
    fn moving_carries_citations() {
        let mut proof = syllogism();
        proof
            .move_chunk(Chunk::node(line(1)), Target::below(line(2)))
            .unwrap();

        assert_eq!(
            proof.node_at_ref(line(1)).unwrap().formula(),
            Some(&Formula::parse("B imp C").unwrap())
        );
        assert_eq!(annotation(&proof, 4), "imp elim 2,3");
        assert_eq!(annotation(&proof, 5), "imp elim 1,4");
        assert!(proof.all_valid());
    }

    #[test]
    fn cannot_move_into_itself() {
        let mut proof = syllogism();
        assert_eq!(
            proof.move_chunk(Chunk::node(LineRef::Range(3, 5)), Target::below(line(4))),
            Err(EditError::MoveIntoItself)
        );
    }

    #[test]
    fn duplicated_subproof_cites_itself() {
        let mut proof = syllogism();
        proof
            .duplicate(Chunk::node(LineRef::Range(3, 5)), Target::below(line(6)))
            .unwrap();

        assert_eq!(proof.line_count(), 9);
        assert_eq!(annotation(&proof, 5), "imp elim 2,4");
        assert_eq!(annotation(&proof, 8), "imp elim 1,7");
        assert_eq!(annotation(&proof, 9), "imp elim 2,8");
        assert!(proof.all_valid());
    }

    #[test]
    fn deleting_a_subproof_hypothesis_leaves_a_blank() {
        let mut proof = syllogism();
        proof.delete(Chunk::node(line(3))).unwrap();

        let blank = proof.node_at_ref(line(3)).unwrap();
        assert!(matches!(
            blank.label(),
            NodeLabel::Blank {
                zone: Zone::Hypothesis
            }
        ));
        assert_eq!(proof.line_count(), 6);
        assert!(!proof.verified(line(6)));
    }

    #[test]
    fn deleting_everything_leaves_one_blank() {
        let mut proof = syllogism();
        proof.delete(Chunk::span(line(1), line(6))).unwrap();
        assert_eq!(proof.line_count(), 1);
        // The turnstile keeps the blank line out of the hypothesis zone.
        assert_eq!(proof.to_string(), "proves\n1.\n");
    }

    #[test]
    fn replacing_a_line_keeps_its_citations() {
        let mut proof = syllogism();
        proof.replace(line(4), conclusion("B")).unwrap();

        assert_eq!(annotation(&proof, 4), "");
        assert_eq!(annotation(&proof, 5), "imp elim 2,4");
        assert!(proof.verified(line(5)));
        assert!(!proof.verified(line(4)));

        assert_eq!(
            proof.replace(
                line(1),
                ProofNode::subproof(vec![ProofNode::hypothesis(Formula::atom("D")), conclusion("D")])
            ),
            Err(EditError::SubproofInHypothesisZone)
        );
    }

    #[test]
    fn annotating_conclusions() {
        let mut proof = syllogism();
        proof.replace(line(4), conclusion("B")).unwrap();

        let justification =
            Justification::new(crate::proof::Rule::ImpElim, vec![line(1), line(3)]);
        proof.annotate(line(4), justification.into()).unwrap();
        assert!(proof.all_valid());

        assert_eq!(
            proof.annotate(line(1), Annotation::Empty),
            Err(EditError::NotAConclusion(line(1)))
        );
    }

    #[test]
    fn conclusions_cannot_be_hypotheses() {
        let mut proof: Proof = "1. A .hyp\nproves\n2. A .repeat 1\n".parse().unwrap();
        let before = proof.to_string();
        let hyp_conclusion = || ProofNode::conclusion(Formula::atom("A"), Annotation::hyp());

        assert_eq!(
            proof.annotate(line(2), Annotation::hyp()),
            Err(EditError::HypOnConclusion)
        );
        assert_eq!(
            proof.insert(Target::below(line(2)), vec![hyp_conclusion()]),
            Err(EditError::HypOnConclusion)
        );
        assert_eq!(
            proof.replace(line(2), hyp_conclusion()),
            Err(EditError::HypOnConclusion)
        );
        assert_eq!(
            proof.insert(
                Target::below(line(2)),
                vec![ProofNode::subproof(vec![
                    ProofNode::hypothesis(Formula::atom("B")),
                    hyp_conclusion(),
                ])]
            ),
            Err(EditError::HypOnConclusion)
        );

        assert_eq!(proof.to_string(), before);
        assert!(before.parse::<Proof>().is_ok());
    }
}
