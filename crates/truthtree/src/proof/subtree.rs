use super::NodeId;

/// What a rule hands back to be grafted under the branch being expanded:
/// one child for sequential decomposition, two for a branch split. Chained
/// results are already linked inside the arena; only the top nodes are
/// recorded here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofSubtree {
    left: Option<NodeId>,
    right: Option<NodeId>,
}

impl ProofSubtree {
    /// A necessity rule with nothing reachable produces no nodes at all.
    pub fn empty() -> Self {
        Self {
            left: None,
            right: None,
        }
    }

    pub fn single(left: NodeId) -> Self {
        Self {
            left: Some(left),
            right: None,
        }
    }

    pub fn branching(left: NodeId, right: NodeId) -> Self {
        Self {
            left: Some(left),
            right: Some(right),
        }
    }

    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    pub fn right(&self) -> Option<NodeId> {
        self.right
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}
