use crate::proof::{LineRef, NodePath, ProofNode};
use rustc_hash::FxHashMap;
use std::ops::Range;

/// Where each line and subproof of the old numbering lands in an edited tree.
/// Nodes that came through the edit keep their old designators until the index
/// is rebuilt, which is what identifies them here.
/// Lines are numbered from 1, so these never resolve.
const DANGLING_LINE: LineRef = LineRef::Line(0);
const DANGLING_RANGE: LineRef = LineRef::Range(0, 0);

#[derive(Debug, Default)]
pub(super) struct Renumbering {
    lines: FxHashMap<usize, usize>,
    subproofs: FxHashMap<(usize, usize), (usize, usize)>,
}

impl Renumbering {
    pub fn of(root: &ProofNode) -> Self {
        let mut acc = Numbering {
            next: 1,
            map: Self::default(),
        };
        for child in root.children() {
            acc.visit(child);
        }
        acc.map
    }

    /// The new citation for `premise`. A citation of a line that is gone, or
    /// of a range that lost a line, becomes one of the dangling references,
    /// which no line is ever numbered as.
    pub fn apply(&self, premise: LineRef) -> LineRef {
        match premise {
            LineRef::Line(n) => self.lines.get(&n).map_or(DANGLING_LINE, |&m| LineRef::Line(m)),
            LineRef::Range(s, e) => {
                let survives = e.saturating_sub(s) < self.lines.len()
                    && (s..=e).all(|n| self.lines.contains_key(&n));
                if !survives {
                    return DANGLING_RANGE;
                }
                if let Some(&(a, b)) = self.subproofs.get(&(s, e)) {
                    return LineRef::Range(a, b);
                }
                match (self.lines.get(&s), self.lines.get(&e)) {
                    (Some(&a), Some(&b)) if a <= b => LineRef::Range(a, b),
                    _ => DANGLING_RANGE,
                }
            }
        }
    }
}

struct Numbering {
    next: usize,
    map: Renumbering,
}

impl Numbering {
    fn visit(&mut self, node: &ProofNode) {
        if !node.is_subproof() {
            if let Some(LineRef::Line(old)) = node.designator() {
                self.map.lines.insert(old, self.next);
            }
            self.next += 1;
            return;
        }

        let first = self.next;
        for child in node.children() {
            self.visit(child);
        }
        if let Some(LineRef::Range(s, e)) = node.designator() {
            self.map.subproofs.insert((s, e), (first, self.next - 1));
        }
    }
}

/// Copied siblings `ranks` under `parent`, made from the old lines `source`.
#[derive(Debug, Clone)]
pub(super) struct CopyInfo {
    pub parent: NodePath,
    pub ranks: Range<usize>,
    pub source: (usize, usize),
}

impl CopyInfo {
    pub fn contains(&self, path: &NodePath) -> bool {
        let depth = self.parent.depth();
        path.depth() > depth
            && path.starts_with(&self.parent)
            && self.ranks.contains(&path.indices()[depth])
    }

    /// Moves a citation into the copied lines onto the copy starting at line `start`.
    pub fn translate(&self, premise: LineRef, start: usize) -> Option<LineRef> {
        let (from, to) = self.source;
        let inside = |n: usize| (from..=to).contains(&n);
        let shift = |n: usize| n - from + start;

        match premise {
            LineRef::Line(n) if inside(n) => Some(LineRef::Line(shift(n))),
            LineRef::Range(s, e) if inside(s) && inside(e) => {
                Some(LineRef::Range(shift(s), shift(e)))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proof::Proof;

    fn tree(text: &str) -> ProofNode {
        text.parse::<Proof>().unwrap().root().clone()
    }

    #[test]
    fn unchanged_tree_maps_to_itself() {
        let root = tree("1. A .hyp\n  2. B .hyp\n  3. B .repeat 2\n4. A .repeat 1\n");
        let map = Renumbering::of(&root);
        assert_eq!(map.apply(LineRef::Line(3)), LineRef::Line(3));
        assert_eq!(map.apply(LineRef::Range(2, 3)), LineRef::Range(2, 3));
    }

    #[test]
    fn removed_lines_dangle() {
        let mut root = tree("1. A .hyp\n2. A .repeat 1\n3. A .repeat 2\n4. A .repeat 3\n");
        root.children_mut().remove(1);
        let map = Renumbering::of(&root);
        assert_eq!(map.apply(LineRef::Line(1)), LineRef::Line(1));
        assert_eq!(map.apply(LineRef::Line(2)), DANGLING_LINE);
        assert_eq!(map.apply(LineRef::Line(3)), LineRef::Line(2));
        assert_eq!(map.apply(LineRef::Line(4)), LineRef::Line(3));
        assert_eq!(map.apply(LineRef::Range(1, 3)), DANGLING_RANGE);
        assert_eq!(map.apply(LineRef::Line(9)), DANGLING_LINE);
    }

    #[test]
    fn subproofs_follow_their_growth() {
        let mut root = tree("1. A .hyp\n  2. B .hyp\n  3. B .repeat 2\n4. A .repeat 1\n");
        root.children_mut()[1]
            .children_mut()
            .push(ProofNode::blank(crate::proof::Zone::Conclusion));
        let map = Renumbering::of(&root);
        assert_eq!(map.apply(LineRef::Range(2, 3)), LineRef::Range(2, 4));
        assert_eq!(map.apply(LineRef::Line(4)), LineRef::Line(5));
    }

    #[test]
    fn translates_into_copies() {
        let copy = CopyInfo {
            parent: NodePath::root(),
            ranks: 4..6,
            source: (2, 4),
        };
        assert_eq!(copy.translate(LineRef::Line(3), 8), Some(LineRef::Line(9)));
        assert_eq!(copy.translate(LineRef::Range(2, 4), 8), Some(LineRef::Range(8, 10)));
        assert_eq!(copy.translate(LineRef::Line(1), 8), None);
        assert!(copy.contains(&NodePath::new(vec![5, 0])));
        assert!(!copy.contains(&NodePath::new(vec![6])));
        assert!(!copy.contains(&NodePath::root()));
    }
}
