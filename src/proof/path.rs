use itertools::Itertools;
use std::fmt;

/// Child indices from the root down to a node. The root's path is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    pub fn parent(&self) -> Option<Self> {
        let (_, parent) = self.0.split_last()?;
        Some(Self(parent.to_vec()))
    }

    /// Index of this node among its siblings.
    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    pub fn starts_with(&self, prefix: &NodePath) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// A node may cite `self` only if `self` is earlier: it closes before `other`
    /// and lies in `other`'s ancestry or in one of its ancestors' earlier siblings.
    pub fn is_earlier(&self, other: &NodePath) -> bool {
        let Some((&last, prefix)) = self.0.split_last() else {
            return false;
        };

        self.0.len() <= other.0.len()
            && other.0[..prefix.len()] == *prefix
            && last < other.0[prefix.len()]
    }

    pub(crate) fn indices_mut(&mut self) -> &mut Vec<usize> {
        &mut self.0
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.iter().join(", "))
    }
}
