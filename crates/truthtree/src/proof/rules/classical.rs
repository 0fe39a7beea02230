//! Decomposition of the classical connectives.

use if_chain::if_chain;

use crate::{
    error::{Error, Result},
    formula::{BinaryOp, Formula, UnaryOp},
    logic::Logic,
    proof::{ProofSubtree, ProofTreeNode},
};

use super::{binary_parts, negated, Rule, RuleApplyFactory};

fn is_binary(node: &ProofTreeNode, op: BinaryOp) -> bool {
    matches!(node.formula().as_ref(), Formula::Binary { op: found, .. } if *found == op)
}

fn is_negated_binary(node: &ProofTreeNode, op: BinaryOp) -> bool {
    if_chain! {
        if let Formula::Unary { op: UnaryOp::Negation, operand } = node.formula().as_ref();
        if let Formula::Binary { op: found, .. } = operand.as_ref();
        then { *found == op } else { false }
    }
}

/// `~~A` extends the branch with `A`.
#[derive(Debug)]
pub struct DoubleNegationRule;

impl Rule for DoubleNegationRule {
    fn name(&self) -> &'static str {
        "double-negation"
    }

    fn is_applicable(&self, _logic: Logic, node: &ProofTreeNode) -> bool {
        if_chain! {
            if let Formula::Unary { op: UnaryOp::Negation, operand } = node.formula().as_ref();
            if let Formula::Unary { op: UnaryOp::Negation, .. } = operand.as_ref();
            then { true } else { false }
        }
    }

    fn would_branch_the_tree(&self) -> bool {
        false
    }

    fn apply(&self, factory: &mut RuleApplyFactory<'_>) -> Result<ProofSubtree> {
        factory.check_applicable(self)?;
        let formula = factory.current_formula();
        let inner = negated(&formula)
            .and_then(negated)
            .cloned()
            .ok_or(Error::RuleMisapplied { rule: self.name() })?;
        let node = factory.new_node(inner);
        Ok(ProofSubtree::single(node))
    }
}

/// `A & B` chains `A` then `B` on the same branch.
#[derive(Debug)]
pub struct ConjunctionRule;

impl Rule for ConjunctionRule {
    fn name(&self) -> &'static str {
        "conjunction"
    }

    fn is_applicable(&self, _logic: Logic, node: &ProofTreeNode) -> bool {
        is_binary(node, BinaryOp::Conjunction)
    }

    fn would_branch_the_tree(&self) -> bool {
        false
    }

    fn apply(&self, factory: &mut RuleApplyFactory<'_>) -> Result<ProofSubtree> {
        factory.check_applicable(self)?;
        let (left, _, right) = binary_parts(&factory.current_formula())?;
        let tail = factory.new_node(right);
        let head = factory.new_node_with_child(left, tail);
        Ok(ProofSubtree::single(head))
    }
}

/// `~(A & B)` splits into `~A` | `~B`.
#[derive(Debug)]
pub struct NegatedConjunctionRule;

impl Rule for NegatedConjunctionRule {
    fn name(&self) -> &'static str {
        "negated-conjunction"
    }

    fn is_applicable(&self, _logic: Logic, node: &ProofTreeNode) -> bool {
        is_negated_binary(node, BinaryOp::Conjunction)
    }

    fn would_branch_the_tree(&self) -> bool {
        true
    }

    fn apply(&self, factory: &mut RuleApplyFactory<'_>) -> Result<ProofSubtree> {
        factory.check_applicable(self)?;
        let formula = factory.current_formula();
        let inner = negated(&formula)
            .cloned()
            .ok_or(Error::RuleMisapplied { rule: self.name() })?;
        let (left, _, right) = binary_parts(&inner)?;
        let not_left = factory.negate(&left);
        let not_right = factory.negate(&right);
        let left_node = factory.new_node(not_left);
        let right_node = factory.new_node(not_right);
        Ok(ProofSubtree::branching(left_node, right_node))
    }
}

/// `A | B` splits into `A` | `B`.
#[derive(Debug)]
pub struct DisjunctionRule;

impl Rule for DisjunctionRule {
    fn name(&self) -> &'static str {
        "disjunction"
    }

    fn is_applicable(&self, _logic: Logic, node: &ProofTreeNode) -> bool {
        is_binary(node, BinaryOp::Disjunction)
    }

    fn would_branch_the_tree(&self) -> bool {
        true
    }

    fn apply(&self, factory: &mut RuleApplyFactory<'_>) -> Result<ProofSubtree> {
        factory.check_applicable(self)?;
        let (left, _, right) = binary_parts(&factory.current_formula())?;
        let left_node = factory.new_node(left);
        let right_node = factory.new_node(right);
        Ok(ProofSubtree::branching(left_node, right_node))
    }
}

/// `~(A | B)` chains `~A` then `~B`.
#[derive(Debug)]
pub struct NegatedDisjunctionRule;

impl Rule for NegatedDisjunctionRule {
    fn name(&self) -> &'static str {
        "negated-disjunction"
    }

    fn is_applicable(&self, _logic: Logic, node: &ProofTreeNode) -> bool {
        is_negated_binary(node, BinaryOp::Disjunction)
    }

    fn would_branch_the_tree(&self) -> bool {
        false
    }

    fn apply(&self, factory: &mut RuleApplyFactory<'_>) -> Result<ProofSubtree> {
        factory.check_applicable(self)?;
        let formula = factory.current_formula();
        let inner = negated(&formula)
            .cloned()
            .ok_or(Error::RuleMisapplied { rule: self.name() })?;
        let (left, _, right) = binary_parts(&inner)?;
        let not_right = factory.negate(&right);
        let tail = factory.new_node(not_right);
        let not_left = factory.negate(&left);
        let head = factory.new_node_with_child(not_left, tail);
        Ok(ProofSubtree::single(head))
    }
}

/// `A -> B` splits into `~A` | `B`.
#[derive(Debug)]
pub struct ImplicationRule;

impl Rule for ImplicationRule {
    fn name(&self) -> &'static str {
        "implication"
    }

    fn is_applicable(&self, _logic: Logic, node: &ProofTreeNode) -> bool {
        is_binary(node, BinaryOp::Implication)
    }

    fn would_branch_the_tree(&self) -> bool {
        true
    }

    fn apply(&self, factory: &mut RuleApplyFactory<'_>) -> Result<ProofSubtree> {
        factory.check_applicable(self)?;
        let (left, _, right) = binary_parts(&factory.current_formula())?;
        let not_left = factory.negate(&left);
        let left_node = factory.new_node(not_left);
        let right_node = factory.new_node(right);
        Ok(ProofSubtree::branching(left_node, right_node))
    }
}

/// `~(A -> B)` chains `A` then `~B`.
#[derive(Debug)]
pub struct NegatedImplicationRule;

impl Rule for NegatedImplicationRule {
    fn name(&self) -> &'static str {
        "negated-implication"
    }

    fn is_applicable(&self, _logic: Logic, node: &ProofTreeNode) -> bool {
        is_negated_binary(node, BinaryOp::Implication)
    }

    fn would_branch_the_tree(&self) -> bool {
        false
    }

    fn apply(&self, factory: &mut RuleApplyFactory<'_>) -> Result<ProofSubtree> {
        factory.check_applicable(self)?;
        let formula = factory.current_formula();
        let inner = negated(&formula)
            .cloned()
            .ok_or(Error::RuleMisapplied { rule: self.name() })?;
        let (left, _, right) = binary_parts(&inner)?;
        let not_right = factory.negate(&right);
        let tail = factory.new_node(not_right);
        let head = factory.new_node_with_child(left, tail);
        Ok(ProofSubtree::single(head))
    }
}

/// `A <-> B` splits into (`A` then `B`) | (`~A` then `~B`).
#[derive(Debug)]
pub struct BiconditionalRule;

impl Rule for BiconditionalRule {
    fn name(&self) -> &'static str {
        "biconditional"
    }

    fn is_applicable(&self, _logic: Logic, node: &ProofTreeNode) -> bool {
        is_binary(node, BinaryOp::Biconditional)
    }

    fn would_branch_the_tree(&self) -> bool {
        true
    }

    fn apply(&self, factory: &mut RuleApplyFactory<'_>) -> Result<ProofSubtree> {
        factory.check_applicable(self)?;
        let (left, _, right) = binary_parts(&factory.current_formula())?;
        let left_tail = factory.new_node(right.clone());
        let left_head = factory.new_node_with_child(left.clone(), left_tail);
        let not_right = factory.negate(&right);
        let right_tail = factory.new_node(not_right);
        let not_left = factory.negate(&left);
        let right_head = factory.new_node_with_child(not_left, right_tail);
        Ok(ProofSubtree::branching(left_head, right_head))
    }
}

/// `~(A <-> B)` splits into (`A` then `~B`) | (`~A` then `B`).
#[derive(Debug)]
pub struct NegatedBiconditionalRule;

impl Rule for NegatedBiconditionalRule {
    fn name(&self) -> &'static str {
        "negated-biconditional"
    }

    fn is_applicable(&self, _logic: Logic, node: &ProofTreeNode) -> bool {
        is_negated_binary(node, BinaryOp::Biconditional)
    }

    fn would_branch_the_tree(&self) -> bool {
        true
    }

    fn apply(&self, factory: &mut RuleApplyFactory<'_>) -> Result<ProofSubtree> {
        factory.check_applicable(self)?;
        let formula = factory.current_formula();
        let inner = negated(&formula)
            .cloned()
            .ok_or(Error::RuleMisapplied { rule: self.name() })?;
        let (left, _, right) = binary_parts(&inner)?;
        let not_right = factory.negate(&right);
        let left_tail = factory.new_node(not_right);
        let left_head = factory.new_node_with_child(left.clone(), left_tail);
        let right_tail = factory.new_node(right);
        let not_left = factory.negate(&left);
        let right_head = factory.new_node_with_child(not_left, right_tail);
        Ok(ProofSubtree::branching(left_head, right_head))
    }
}

/// `A ^ B`: exactly one side holds, so (`A` then `~B`) | (`~A` then `B`).
#[derive(Debug)]
pub struct ExclusiveOrRule;

impl Rule for ExclusiveOrRule {
    fn name(&self) -> &'static str {
        "exclusive-or"
    }

    fn is_applicable(&self, _logic: Logic, node: &ProofTreeNode) -> bool {
        is_binary(node, BinaryOp::ExclusiveOr)
    }

    fn would_branch_the_tree(&self) -> bool {
        true
    }

    fn apply(&self, factory: &mut RuleApplyFactory<'_>) -> Result<ProofSubtree> {
        factory.check_applicable(self)?;
        let (left, _, right) = binary_parts(&factory.current_formula())?;
        let not_right = factory.negate(&right);
        let left_tail = factory.new_node(not_right);
        let left_head = factory.new_node_with_child(left.clone(), left_tail);
        let right_tail = factory.new_node(right);
        let not_left = factory.negate(&left);
        let right_head = factory.new_node_with_child(not_left, right_tail);
        Ok(ProofSubtree::branching(left_head, right_head))
    }
}

/// `~(A ^ B)`: both or neither, so (`A` then `B`) | (`~A` then `~B`).
#[derive(Debug)]
pub struct NegatedExclusiveOrRule;

impl Rule for NegatedExclusiveOrRule {
    fn name(&self) -> &'static str {
        "negated-exclusive-or"
    }

    fn is_applicable(&self, _logic: Logic, node: &ProofTreeNode) -> bool {
        is_negated_binary(node, BinaryOp::ExclusiveOr)
    }

    fn would_branch_the_tree(&self) -> bool {
        true
    }

    fn apply(&self, factory: &mut RuleApplyFactory<'_>) -> Result<ProofSubtree> {
        factory.check_applicable(self)?;
        let formula = factory.current_formula();
        let inner = negated(&formula)
            .cloned()
            .ok_or(Error::RuleMisapplied { rule: self.name() })?;
        let (left, _, right) = binary_parts(&inner)?;
        let left_tail = factory.new_node(right.clone());
        let left_head = factory.new_node_with_child(left.clone(), left_tail);
        let not_right = factory.negate(&right);
        let right_tail = factory.new_node(not_right);
        let not_left = factory.negate(&left);
        let right_head = factory.new_node_with_child(not_left, right_tail);
        Ok(ProofSubtree::branching(left_head, right_head))
    }
}

/// `A !& B` splits into `~A` | `~B`.
#[derive(Debug)]
pub struct NandRule;

impl Rule for NandRule {
    fn name(&self) -> &'static str {
        "nand"
    }

    fn is_applicable(&self, _logic: Logic, node: &ProofTreeNode) -> bool {
        is_binary(node, BinaryOp::Nand)
    }

    fn would_branch_the_tree(&self) -> bool {
        true
    }

    fn apply(&self, factory: &mut RuleApplyFactory<'_>) -> Result<ProofSubtree> {
        factory.check_applicable(self)?;
        let (left, _, right) = binary_parts(&factory.current_formula())?;
        let not_left = factory.negate(&left);
        let not_right = factory.negate(&right);
        let left_node = factory.new_node(not_left);
        let right_node = factory.new_node(not_right);
        Ok(ProofSubtree::branching(left_node, right_node))
    }
}

/// `~(A !& B)` chains `A` then `B`.
#[derive(Debug)]
pub struct NegatedNandRule;

impl Rule for NegatedNandRule {
    fn name(&self) -> &'static str {
        "negated-nand"
    }

    fn is_applicable(&self, _logic: Logic, node: &ProofTreeNode) -> bool {
        is_negated_binary(node, BinaryOp::Nand)
    }

    fn would_branch_the_tree(&self) -> bool {
        false
    }

    fn apply(&self, factory: &mut RuleApplyFactory<'_>) -> Result<ProofSubtree> {
        factory.check_applicable(self)?;
        let formula = factory.current_formula();
        let inner = negated(&formula)
            .cloned()
            .ok_or(Error::RuleMisapplied { rule: self.name() })?;
        let (left, _, right) = binary_parts(&inner)?;
        let tail = factory.new_node(right);
        let head = factory.new_node_with_child(left, tail);
        Ok(ProofSubtree::single(head))
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        error::Error,
        formula::{AFormula, FormulaFactory},
        proof::ProofTree,
    };

    use super::super::test_support::{apply_at_root, tree_with};
    use super::*;

    fn atom(tree: &ProofTree, name: &str) -> AFormula {
        tree.factory().atom(name)
    }

    fn conj(f: &FormulaFactory) -> AFormula {
        f.new_binary(f.atom("A"), BinaryOp::Conjunction, f.atom("B"))
    }

    #[test]
    fn double_negation_unwraps_twice() {
        let mut tree = tree_with(Logic::Propositional, |f| {
            f.negate(&f.negate(&f.atom("A")))
        });
        let subtree = apply_at_root(&DoubleNegationRule, &mut tree).unwrap();
        let child = subtree.left().unwrap();
        assert!(subtree.right().is_none());
        assert_eq!(tree.node(child).formula(), &atom(&tree, "A"));
        assert!(!DoubleNegationRule.would_branch_the_tree());
    }

    #[test]
    fn disjunction_branches_into_both_disjuncts() {
        let mut tree = tree_with(Logic::Propositional, |f| {
            f.new_binary(f.atom("A"), BinaryOp::Disjunction, f.atom("B"))
        });
        let subtree = apply_at_root(&DisjunctionRule, &mut tree).unwrap();
        let left = subtree.left().unwrap();
        let right = subtree.right().unwrap();
        assert_eq!(tree.node(left).formula(), &atom(&tree, "A"));
        assert_eq!(tree.node(right).formula(), &atom(&tree, "B"));
        assert!(DisjunctionRule.would_branch_the_tree());
    }

    #[test]
    fn conjunction_chains_both_conjuncts() {
        let mut tree = tree_with(Logic::Propositional, conj);
        let subtree = apply_at_root(&ConjunctionRule, &mut tree).unwrap();
        let head = subtree.left().unwrap();
        assert!(subtree.right().is_none());
        assert_eq!(tree.node(head).formula(), &atom(&tree, "A"));
        let tail = tree.node(head).left().unwrap();
        assert_eq!(tree.node(tail).formula(), &atom(&tree, "B"));
        assert!(tree.node(tail).is_leaf());
        assert!(!ConjunctionRule.would_branch_the_tree());
    }

    #[test]
    fn negated_conjunction_branches_into_negations() {
        let mut tree = tree_with(Logic::Propositional, |f| f.negate(&conj(f)));
        let subtree = apply_at_root(&NegatedConjunctionRule, &mut tree).unwrap();
        let not_a = tree.factory().negate(&atom(&tree, "A"));
        let not_b = tree.factory().negate(&atom(&tree, "B"));
        assert_eq!(tree.node(subtree.left().unwrap()).formula(), &not_a);
        assert_eq!(tree.node(subtree.right().unwrap()).formula(), &not_b);
    }

    #[test]
    fn negated_implication_chains_antecedent_and_negated_consequent() {
        let mut tree = tree_with(Logic::Propositional, |f| {
            f.negate(&f.new_binary(f.atom("A"), BinaryOp::Implication, f.atom("A")))
        });
        let subtree = apply_at_root(&NegatedImplicationRule, &mut tree).unwrap();
        let head = subtree.left().unwrap();
        assert_eq!(tree.node(head).formula(), &atom(&tree, "A"));
        let tail = tree.node(head).left().unwrap();
        let not_a = tree.factory().negate(&atom(&tree, "A"));
        assert_eq!(tree.node(tail).formula(), &not_a);
    }

    #[test]
    fn biconditional_splits_into_agreeing_chains() {
        let mut tree = tree_with(Logic::Propositional, |f| {
            f.new_binary(f.atom("A"), BinaryOp::Biconditional, f.atom("B"))
        });
        let subtree = apply_at_root(&BiconditionalRule, &mut tree).unwrap();
        let left_head = subtree.left().unwrap();
        let right_head = subtree.right().unwrap();
        assert_eq!(tree.node(left_head).formula(), &atom(&tree, "A"));
        let left_tail = tree.node(left_head).left().unwrap();
        assert_eq!(tree.node(left_tail).formula(), &atom(&tree, "B"));
        let not_a = tree.factory().negate(&atom(&tree, "A"));
        assert_eq!(tree.node(right_head).formula(), &not_a);
    }

    #[test]
    fn misapplication_is_an_error() {
        let mut tree = tree_with(Logic::Propositional, conj);
        let err = apply_at_root(&DoubleNegationRule, &mut tree).unwrap_err();
        assert!(matches!(
            err,
            Error::RuleMisapplied { rule: "double-negation" }
        ));
    }
}
