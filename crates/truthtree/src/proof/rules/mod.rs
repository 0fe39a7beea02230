//! The tableau calculus. Each rule recognizes one formula shape and
//! produces the subtree fragment to graft under the branch being expanded.

use std::fmt::Debug;

use crate::{
    error::{Error, Result},
    formula::{AFormula, BinaryOp, Formula, PossibleWorld, UnaryOp},
    logic::Logic,
};

use super::{NodeId, ProofSubtree, ProofTree, ProofTreeNode};

mod classical;
mod modal;

pub use classical::{
    BiconditionalRule, ConjunctionRule, DisjunctionRule, DoubleNegationRule, ExclusiveOrRule,
    ImplicationRule, NandRule, NegatedBiconditionalRule, NegatedConjunctionRule,
    NegatedDisjunctionRule, NegatedExclusiveOrRule, NegatedImplicationRule, NegatedNandRule,
};
pub use modal::{
    NecessityRule, NegatedNecessityRule, NegatedPossibilityRule, NegatedStrictImplicationRule,
    PossibilityRule, StrictImplicationRule,
};

/// One decomposition rule of the calculus.
///
/// `apply` is only legal on a node `is_applicable` accepted; calling it
/// otherwise fails with [`Error::RuleMisapplied`]. Any applicable rule
/// produces a result equivalent to any other for the same node, so the
/// driver may reorder the set freely for efficiency.
pub trait Rule: Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether this rule decomposes the formula sitting at `node`.
    fn is_applicable(&self, logic: Logic, node: &ProofTreeNode) -> bool;

    /// Static fact about the rule, independent of any node: true when
    /// `apply` splits the branch in two. Drivers run non-branching rules
    /// first to keep trees small.
    fn would_branch_the_tree(&self) -> bool;

    /// Builds the subtree to graft under the branch being expanded.
    fn apply(&self, factory: &mut RuleApplyFactory<'_>) -> Result<ProofSubtree>;
}

/// The fixed, enumerable rule set, non-branching rules first. The order is
/// an efficiency heuristic only; the calculus is confluent.
pub fn rules() -> &'static [&'static dyn Rule] {
    static RULES: &[&dyn Rule] = &[
        // sequential
        &DoubleNegationRule,
        &ConjunctionRule,
        &NegatedDisjunctionRule,
        &NegatedImplicationRule,
        &NegatedNandRule,
        &StrictImplicationRule,
        &NegatedStrictImplicationRule,
        &NegatedPossibilityRule,
        &NegatedNecessityRule,
        &PossibilityRule,
        &NecessityRule,
        // branching
        &DisjunctionRule,
        &NegatedConjunctionRule,
        &ImplicationRule,
        &BiconditionalRule,
        &NegatedBiconditionalRule,
        &ExclusiveOrRule,
        &NegatedExclusiveOrRule,
        &NandRule,
    ];
    RULES
}

/// Mediates one rule application, bound to the tree, the node under
/// expansion and the branch it sits on. All node and formula creation goes
/// through here, so fresh names and worlds are drawn from the tree's
/// single sequence.
pub struct RuleApplyFactory<'t> {
    tree: &'t mut ProofTree,
    node: NodeId,
    branch: &'t [NodeId],
}

impl<'t> RuleApplyFactory<'t> {
    pub fn new(tree: &'t mut ProofTree, node: NodeId, branch: &'t [NodeId]) -> Self {
        Self { tree, node, branch }
    }

    pub fn logic(&self) -> Logic {
        self.tree.factory().logic()
    }

    /// The node under expansion.
    pub fn current(&self) -> &ProofTreeNode {
        self.tree.node(self.node)
    }

    pub fn current_formula(&self) -> AFormula {
        self.current().formula().clone()
    }

    pub fn current_world(&self) -> PossibleWorld {
        self.current().world()
    }

    /// New detached node in the current node's world.
    pub fn new_node(&mut self, formula: AFormula) -> NodeId {
        let world = self.current_world();
        self.tree.push(formula, world, None, None)
    }

    pub fn new_node_in_world(&mut self, formula: AFormula, world: PossibleWorld) -> NodeId {
        self.tree.push(formula, world, None, None)
    }

    /// New node already chained to `child`, for two-node sequential
    /// extensions.
    pub fn new_node_with_child(&mut self, formula: AFormula, child: NodeId) -> NodeId {
        let world = self.current_world();
        self.tree.push(formula, world, Some(child), None)
    }

    pub fn new_node_in_world_with_child(
        &mut self,
        formula: AFormula,
        world: PossibleWorld,
        child: NodeId,
    ) -> NodeId {
        self.tree.push(formula, world, Some(child), None)
    }

    pub fn new_unary(&self, op: UnaryOp, operand: AFormula) -> AFormula {
        self.tree.factory().new_unary(op, operand)
    }

    pub fn new_binary(&self, left: AFormula, op: BinaryOp, right: AFormula) -> AFormula {
        self.tree.factory().new_binary(left, op, right)
    }

    pub fn negate(&self, operand: &AFormula) -> AFormula {
        self.tree.factory().negate(operand)
    }

    pub fn new_modal_relation_descriptor(
        &self,
        from: PossibleWorld,
        to: PossibleWorld,
    ) -> AFormula {
        self.tree.factory().new_modal_relation_descriptor(from, to)
    }

    pub fn new_predicate_argument_instance_name(&self) -> String {
        self.tree.factory().next_fresh_name()
    }

    pub fn new_world(&self) -> PossibleWorld {
        self.tree.factory().new_world()
    }

    /// Worlds one accessibility step away from `world` on this branch.
    pub fn reachable_worlds(&self, world: PossibleWorld, backwards: bool) -> Vec<PossibleWorld> {
        self.tree.worlds_reachable_from(self.branch, world, backwards)
    }

    /// Whether the branch already asserts `formula` in `world`; necessity
    /// instantiation skips such worlds instead of duplicating them.
    pub fn branch_contains(&self, world: PossibleWorld, formula: &AFormula) -> bool {
        self.branch.iter().any(|&id| {
            let node = self.tree.node(id);
            node.world() == world && node.formula() == formula
        })
    }

    /// Guard every `apply` starts with.
    pub fn check_applicable(&self, rule: &dyn Rule) -> Result<()> {
        if rule.is_applicable(self.logic(), self.current()) {
            Ok(())
        } else {
            Err(Error::RuleMisapplied { rule: rule.name() })
        }
    }
}

/// Operand of a negation, if the formula is one.
pub(crate) fn negated(formula: &AFormula) -> Option<&AFormula> {
    match formula.as_ref() {
        Formula::Unary {
            op: UnaryOp::Negation,
            operand,
        } => Some(operand),
        _ => None,
    }
}

/// Splits a binary formula into its parts. A unary-shaped formula reaching
/// a binary pattern is a contract violation.
pub(crate) fn binary_parts(formula: &AFormula) -> Result<(AFormula, BinaryOp, AFormula)> {
    match formula.as_ref() {
        Formula::Binary { left, op, right } => Ok((left.clone(), *op, right.clone())),
        _ => Err(Error::UnboundOperand {
            found: formula.to_typeset(),
        }),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use crate::{
        error::Result,
        formula::{AFormula, FormulaFactory},
        logic::Logic,
        proof::{ProofSubtree, ProofTree},
    };

    use super::{Rule, RuleApplyFactory};

    pub fn tree_with(logic: Logic, build: impl Fn(&FormulaFactory) -> AFormula) -> ProofTree {
        let factory = Arc::new(FormulaFactory::new(logic));
        let root = build(&factory);
        ProofTree::new(factory, root)
    }

    pub fn apply_at_root(rule: &dyn Rule, tree: &mut ProofTree) -> Result<ProofSubtree> {
        let root = tree.root();
        let branch = vec![root];
        let mut factory = RuleApplyFactory::new(tree, root, &branch);
        rule.apply(&mut factory)
    }
}
