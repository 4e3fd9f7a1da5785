use crate::proof::{LineRef, NodePath, ProofNode};
use rustc_hash::FxHashMap;

/// Designator to path lookup, in enumeration order. Rebuilt from the tree after
/// every structural change. The root is never indexed.
#[derive(Debug, Clone, Default)]
pub struct LineIndex {
    entries: Vec<(LineRef, NodePath)>,
    positions: FxHashMap<LineRef, usize>,
    line_count: usize,
}

impl LineIndex {
    /// Labels every node below `root` with its path and designator and indexes it.
    pub(crate) fn build(root: &mut ProofNode) -> Self {
        let mut acc = Labeling {
            next_line: 1,
            entries: Vec::new(),
        };
        label(root, NodePath::root(), &mut acc);

        let positions = acc
            .entries
            .iter()
            .enumerate()
            .map(|(i, (r, _))| (*r, i))
            .collect();

        Self {
            line_count: acc.next_line - 1,
            entries: acc.entries,
            positions,
        }
    }

    pub fn path_of(&self, line: LineRef) -> Option<&NodePath> {
        self.positions.get(&line).map(|&i| &self.entries[i].1)
    }

    /// Subproofs and lines in pre-order.
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = (LineRef, &NodePath)> {
        self.entries.iter().map(|(r, p)| (*r, p))
    }

    /// Numbered lines only, `1..=line_count()` in order.
    pub fn lines(&self) -> impl DoubleEndedIterator<Item = (LineRef, &NodePath)> {
        self.entries().filter(|(r, _)| !r.is_range())
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }
}

struct Labeling {
    next_line: usize,
    entries: Vec<(LineRef, NodePath)>,
}

fn label(node: &mut ProofNode, path: NodePath, acc: &mut Labeling) {
    node.set_path(path.clone());

    if !node.is_subproof() {
        let line = LineRef::Line(acc.next_line);
        acc.next_line += 1;
        node.set_designator(Some(line));
        acc.entries.push((line, path));
        return;
    }

    let first = acc.next_line;
    // Subproofs are entered before their children; the range is patched once known.
    let slot = (!path.is_root()).then(|| {
        acc.entries.push((LineRef::Range(first, first), path.clone()));
        acc.entries.len() - 1
    });

    for (i, child) in node.children_mut().iter_mut().enumerate() {
        label(child, path.child(i), acc);
    }

    let range = LineRef::Range(first, acc.next_line.saturating_sub(1));
    node.set_designator(Some(range));
    if let Some(slot) = slot {
        acc.entries[slot].0 = range;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        formula::Formula,
        proof::{Annotation, Zone},
    };

    fn conc(name: &str) -> ProofNode {
        ProofNode::conclusion(Formula::atom(name), Annotation::Empty)
    }

    fn hyp(name: &str) -> ProofNode {
        ProofNode::hypothesis(Formula::atom(name))
    }

    #[test]
    fn numbers_lines_and_ranges_in_preorder() {
        let mut root = ProofNode::subproof(vec![
            hyp("A"),
            ProofNode::subproof(vec![
                hyp("B"),
                ProofNode::comment(Zone::Conclusion, "# note"),
                conc("C"),
            ]),
            conc("D"),
        ]);
        let index = LineIndex::build(&mut root);

        let entries = index.entries().map(|(r, p)| (r, p.clone())).collect::<Vec<_>>();
        assert_eq!(
            entries,
            vec![
                (LineRef::Line(1), NodePath::new(vec![0])),
                (LineRef::Range(2, 4), NodePath::new(vec![1])),
                (LineRef::Line(2), NodePath::new(vec![1, 0])),
                (LineRef::Line(3), NodePath::new(vec![1, 1])),
                (LineRef::Line(4), NodePath::new(vec![1, 2])),
                (LineRef::Line(5), NodePath::new(vec![2])),
            ]
        );
        assert_eq!(index.line_count(), 5);
        assert_eq!(root.designator(), Some(LineRef::Range(1, 5)));
        assert_eq!(root.children()[1].children()[2].path(), &NodePath::new(vec![1, 2]));
    }

    #[test]
    fn sole_subproof_does_not_collide_with_root() {
        let mut root = ProofNode::subproof(vec![ProofNode::subproof(vec![hyp("A"), conc("A")])]);
        let index = LineIndex::build(&mut root);
        assert_eq!(index.path_of(LineRef::Range(1, 2)), Some(&NodePath::new(vec![0])));
    }
}
