//! The growing proof structure: an append-only arena of nodes, each
//! holding one formula asserted in one possible world.

use std::{fmt, sync::Arc};

use hashbrown::HashSet;
use itertools::Itertools;

use crate::formula::{AFormula, Formula, FormulaFactory, PossibleWorld, UnaryOp};

mod subtree;
pub use subtree::ProofSubtree;

pub mod rules;

/// Index of a node in its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
pub struct ProofTreeNode {
    formula: AFormula,
    world: PossibleWorld,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

impl ProofTreeNode {
    pub fn formula(&self) -> &AFormula {
        &self.formula
    }

    pub fn world(&self) -> PossibleWorld {
        self.world
    }

    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    pub fn right(&self) -> Option<NodeId> {
        self.right
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Two children split the proof into alternatives which must both
    /// close; one child is plain sequential continuation.
    pub fn is_branch_point(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }
}

/// The tableau. Nodes are created only by rule application through
/// [`rules::RuleApplyFactory`] and never removed or rewritten; grafting
/// fills the empty children of a leaf and is the only mutation, so the
/// tree grows monotonically.
#[derive(Debug)]
pub struct ProofTree {
    factory: Arc<FormulaFactory>,
    nodes: Vec<ProofTreeNode>,
    root: NodeId,
}

impl ProofTree {
    pub fn new(factory: Arc<FormulaFactory>, root_formula: AFormula) -> Self {
        let world = factory.initial_world();
        let root = ProofTreeNode {
            formula: root_formula,
            world,
            left: None,
            right: None,
        };
        Self {
            factory,
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    pub fn factory(&self) -> &Arc<FormulaFactory> {
        &self.factory
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &ProofTreeNode {
        &self.nodes[id.idx()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn push(
        &mut self,
        formula: AFormula,
        world: PossibleWorld,
        left: Option<NodeId>,
        right: Option<NodeId>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(ProofTreeNode {
            formula,
            world,
            left,
            right,
        });
        id
    }

    /// Attaches a rule's result under `leaf`, which must still be a leaf.
    pub fn graft(&mut self, leaf: NodeId, subtree: &ProofSubtree) {
        debug_assert!(self.node(leaf).is_leaf(), "grafting onto an inner node");
        let node = &mut self.nodes[leaf.idx()];
        node.left = subtree.left();
        node.right = subtree.right();
    }

    /// Every root-to-leaf path, leftmost first.
    pub fn branches(&self) -> Vec<Vec<NodeId>> {
        let mut out = Vec::new();
        let mut stack = vec![vec![self.root]];
        while let Some(mut path) = stack.pop() {
            let node = self.node(path[path.len() - 1]);
            match (node.left, node.right) {
                (None, _) => out.push(path),
                (Some(left), None) => {
                    path.push(left);
                    stack.push(path);
                }
                (Some(left), Some(right)) => {
                    let mut right_path = path.clone();
                    right_path.push(right);
                    path.push(left);
                    stack.push(right_path);
                    stack.push(path);
                }
            }
        }
        out
    }

    /// Incremental closure check: one pass over the branch keeping the
    /// formulas seen so far, O(branch length). A branch is closed as soon
    /// as it asserts a formula and its negation in the same world.
    pub fn branch_closes(&self, branch: &[NodeId]) -> bool {
        let mut seen: HashSet<(PossibleWorld, &Formula)> = HashSet::new();
        let mut seen_negated: HashSet<(PossibleWorld, &Formula)> = HashSet::new();
        for &id in branch {
            let node = self.node(id);
            let key = (node.world, node.formula.as_ref());
            if let Formula::Unary {
                op: UnaryOp::Negation,
                operand,
            } = node.formula.as_ref()
            {
                if seen.contains(&(node.world, operand.as_ref())) {
                    return true;
                }
                seen_negated.insert((node.world, operand.as_ref()));
            }
            if seen_negated.contains(&key) {
                return true;
            }
            seen.insert(key);
        }
        false
    }

    pub fn open_branches(&self) -> Vec<Vec<NodeId>> {
        self.branches()
            .into_iter()
            .filter(|branch| !self.branch_closes(branch))
            .collect()
    }

    pub fn is_fully_closed(&self) -> bool {
        self.branches().iter().all(|branch| self.branch_closes(branch))
    }

    /// Worlds reachable in one accessibility step from `world` along this
    /// branch; `backwards` follows edges against their direction (past
    /// operators).
    pub fn worlds_reachable_from(
        &self,
        branch: &[NodeId],
        world: PossibleWorld,
        backwards: bool,
    ) -> Vec<PossibleWorld> {
        branch
            .iter()
            .filter_map(|&id| match self.node(id).formula.as_ref() {
                Formula::WorldRelation { from, to } if !backwards && *from == world => Some(*to),
                Formula::WorldRelation { from, to } if backwards && *to == world => Some(*from),
                _ => None,
            })
            .unique()
            .collect()
    }

    /// Number of accessibility descriptors on the branch; grows only when
    /// a possibility is witnessed, which is what makes a necessity node
    /// worth revisiting.
    pub fn relation_count(&self, branch: &[NodeId]) -> usize {
        branch
            .iter()
            .filter(|&&id| matches!(self.node(id).formula.as_ref(), Formula::WorldRelation { .. }))
            .count()
    }

    fn fmt_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId, depth: usize) -> fmt::Result {
        let node = self.node(id);
        let indent = depth * 2;
        if matches!(node.formula.as_ref(), Formula::WorldRelation { .. }) {
            writeln!(f, "{:indent$}{}", "", node.formula)?;
        } else {
            writeln!(f, "{:indent$}{} @ {}", "", node.formula, node.world)?;
        }
        if let Some(left) = node.left {
            self.fmt_node(f, left, depth + 1)?;
        }
        if let Some(right) = node.right {
            self.fmt_node(f, right, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for ProofTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(f, self.root, 0)
    }
}
