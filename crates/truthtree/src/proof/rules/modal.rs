//! Modal and tense decomposition: strict implication, witnessing of
//! possibilities in fresh worlds, and necessity instantiation over the
//! accessibility edges a branch has accumulated.

use if_chain::if_chain;

use crate::{
    error::{Error, Result},
    formula::{AFormula, BinaryOp, Formula, UnaryOp},
    logic::Logic,
    proof::{NodeId, ProofSubtree, ProofTreeNode},
};

use super::{binary_parts, negated, Rule, RuleApplyFactory};

fn possibility_like(formula: &Formula) -> Option<(UnaryOp, &AFormula)> {
    match formula {
        Formula::Unary { op, operand } if op.is_possibility_like() => Some((*op, operand)),
        _ => None,
    }
}

fn necessity_like(formula: &Formula) -> Option<(UnaryOp, &AFormula)> {
    match formula {
        Formula::Unary { op, operand } if op.is_necessity_like() => Some((*op, operand)),
        _ => None,
    }
}

/// `A => B` asserts the implication at every accessible world: seq
/// `[](A -> B)`.
#[derive(Debug)]
pub struct StrictImplicationRule;

impl Rule for StrictImplicationRule {
    fn name(&self) -> &'static str {
        "strict-implication"
    }

    fn is_applicable(&self, _logic: Logic, node: &ProofTreeNode) -> bool {
        matches!(
            node.formula().as_ref(),
            Formula::Binary { op: BinaryOp::StrictImplication, .. }
        )
    }

    fn would_branch_the_tree(&self) -> bool {
        false
    }

    fn apply(&self, factory: &mut RuleApplyFactory<'_>) -> Result<ProofSubtree> {
        factory.check_applicable(self)?;
        let (left, _, right) = binary_parts(&factory.current_formula())?;
        let implication = factory.new_binary(left, BinaryOp::Implication, right);
        let necessitated = factory.new_unary(UnaryOp::Necessity, implication);
        let node = factory.new_node(necessitated);
        Ok(ProofSubtree::single(node))
    }
}

/// `~(A => B)` becomes seq `~[](A -> B)`.
#[derive(Debug)]
pub struct NegatedStrictImplicationRule;

impl Rule for NegatedStrictImplicationRule {
    fn name(&self) -> &'static str {
        "negated-strict-implication"
    }

    fn is_applicable(&self, _logic: Logic, node: &ProofTreeNode) -> bool {
        if_chain! {
            if let Formula::Unary { op: UnaryOp::Negation, operand } = node.formula().as_ref();
            if let Formula::Binary { op: BinaryOp::StrictImplication, .. } = operand.as_ref();
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
            .cloned()
            .ok_or(Error::RuleMisapplied { rule: self.name() })?;
        let (left, _, right) = binary_parts(&inner)?;
        let implication = factory.new_binary(left, BinaryOp::Implication, right);
        let necessitated = factory.new_unary(UnaryOp::Necessity, implication);
        let node_formula = factory.negate(&necessitated);
        let node = factory.new_node(node_formula);
        Ok(ProofSubtree::single(node))
    }
}

/// `<>A` at `w`: mint a fresh world `v`, record the accessibility edge,
/// then assert `A` in `v`. Past possibility orients the edge towards `w`.
#[derive(Debug)]
pub struct PossibilityRule;

impl Rule for PossibilityRule {
    fn name(&self) -> &'static str {
        "possibility"
    }

    fn is_applicable(&self, logic: Logic, node: &ProofTreeNode) -> bool {
        matches!(
            possibility_like(node.formula().as_ref()),
            Some((op, _)) if op.available_in(logic)
        )
    }

    fn would_branch_the_tree(&self) -> bool {
        false
    }

    fn apply(&self, factory: &mut RuleApplyFactory<'_>) -> Result<ProofSubtree> {
        factory.check_applicable(self)?;
        let formula = factory.current_formula();
        let (op, operand) = possibility_like(formula.as_ref())
            .map(|(op, operand)| (op, operand.clone()))
            .ok_or(Error::RuleMisapplied { rule: self.name() })?;
        let here = factory.current_world();
        let fresh = factory.new_world();
        let (from, to) = if op.looks_backwards() {
            (fresh, here)
        } else {
            (here, fresh)
        };
        let descriptor = factory.new_modal_relation_descriptor(from, to);
        let witness = factory.new_node_in_world(operand, fresh);
        let head = factory.new_node_with_child(descriptor, witness);
        Ok(ProofSubtree::single(head))
    }
}

/// `~<>A` becomes seq `[]~A`, preserving the temporal direction.
#[derive(Debug)]
pub struct NegatedPossibilityRule;

impl Rule for NegatedPossibilityRule {
    fn name(&self) -> &'static str {
        "negated-possibility"
    }

    fn is_applicable(&self, logic: Logic, node: &ProofTreeNode) -> bool {
        if_chain! {
            if let Formula::Unary { op: UnaryOp::Negation, operand } = node.formula().as_ref();
            if let Some((op, _)) = possibility_like(operand.as_ref());
            then { op.available_in(logic) } else { false }
        }
    }

    fn would_branch_the_tree(&self) -> bool {
        false
    }

    fn apply(&self, factory: &mut RuleApplyFactory<'_>) -> Result<ProofSubtree> {
        factory.check_applicable(self)?;
        let formula = factory.current_formula();
        let (op, operand) = negated(&formula)
            .and_then(|inner| possibility_like(inner.as_ref()))
            .map(|(op, operand)| (op, operand.clone()))
            .ok_or(Error::RuleMisapplied { rule: self.name() })?;
        let negated_operand = factory.negate(&operand);
        let dual = factory.new_unary(op.dual(), negated_operand);
        let node = factory.new_node(dual);
        Ok(ProofSubtree::single(node))
    }
}

/// `[]A` at `w`: assert `A` in every world reachable from `w` on this
/// branch (towards `w` for past necessity), skipping worlds that already
/// hold it. Produces nothing while no world is reachable; the driver
/// revisits the node once new accessibility descriptors appear.
#[derive(Debug)]
pub struct NecessityRule;

impl Rule for NecessityRule {
    fn name(&self) -> &'static str {
        "necessity"
    }

    fn is_applicable(&self, logic: Logic, node: &ProofTreeNode) -> bool {
        matches!(
            necessity_like(node.formula().as_ref()),
            Some((op, _)) if op.available_in(logic)
        )
    }

    fn would_branch_the_tree(&self) -> bool {
        false
    }

    fn apply(&self, factory: &mut RuleApplyFactory<'_>) -> Result<ProofSubtree> {
        factory.check_applicable(self)?;
        let formula = factory.current_formula();
        let (op, operand) = necessity_like(formula.as_ref())
            .map(|(op, operand)| (op, operand.clone()))
            .ok_or(Error::RuleMisapplied { rule: self.name() })?;
        let here = factory.current_world();
        let mut head: Option<NodeId> = None;
        for world in factory
            .reachable_worlds(here, op.looks_backwards())
            .into_iter()
            .rev()
        {
            if factory.branch_contains(world, &operand) {
                continue;
            }
            head = Some(match head {
                Some(child) => factory.new_node_in_world_with_child(operand.clone(), world, child),
                None => factory.new_node_in_world(operand.clone(), world),
            });
        }
        Ok(head.map(ProofSubtree::single).unwrap_or_else(ProofSubtree::empty))
    }
}

/// `~[]A` becomes seq `<>~A`, preserving the temporal direction.
#[derive(Debug)]
pub struct NegatedNecessityRule;

impl Rule for NegatedNecessityRule {
    fn name(&self) -> &'static str {
        "negated-necessity"
    }

    fn is_applicable(&self, logic: Logic, node: &ProofTreeNode) -> bool {
        if_chain! {
            if let Formula::Unary { op: UnaryOp::Negation, operand } = node.formula().as_ref();
            if let Some((op, _)) = necessity_like(operand.as_ref());
            then { op.available_in(logic) } else { false }
        }
    }

    fn would_branch_the_tree(&self) -> bool {
        false
    }

    fn apply(&self, factory: &mut RuleApplyFactory<'_>) -> Result<ProofSubtree> {
        factory.check_applicable(self)?;
        let formula = factory.current_formula();
        let (op, operand) = negated(&formula)
            .and_then(|inner| necessity_like(inner.as_ref()))
            .map(|(op, operand)| (op, operand.clone()))
            .ok_or(Error::RuleMisapplied { rule: self.name() })?;
        let negated_operand = factory.negate(&operand);
        let dual = factory.new_unary(op.dual(), negated_operand);
        let node = factory.new_node(dual);
        Ok(ProofSubtree::single(node))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{apply_at_root, tree_with};
    use super::*;

    #[test]
    fn possibility_witnesses_a_fresh_world() {
        let mut tree = tree_with(Logic::Modal, |f| {
            f.new_unary(UnaryOp::Possibility, f.atom("A"))
        });
        let subtree = apply_at_root(&PossibilityRule, &mut tree).unwrap();
        let head = subtree.left().unwrap();
        let head_node = tree.node(head);
        let Formula::WorldRelation { from, to } = head_node.formula().as_ref() else {
            panic!("expected an accessibility descriptor");
        };
        assert_eq!(*from, tree.factory().initial_world());
        assert_ne!(*to, tree.factory().initial_world());

        let witness = tree.node(head_node.left().unwrap());
        assert_eq!(witness.formula(), &tree.factory().atom("A"));
        assert_eq!(witness.world(), *to);
    }

    #[test]
    fn past_possibility_orients_the_edge_backwards() {
        let mut tree = tree_with(Logic::Tense, |f| {
            f.new_unary(UnaryOp::PastPossibility, f.atom("A"))
        });
        let subtree = apply_at_root(&PossibilityRule, &mut tree).unwrap();
        let head_node = tree.node(subtree.left().unwrap());
        let Formula::WorldRelation { from, to } = head_node.formula().as_ref() else {
            panic!("expected an accessibility descriptor");
        };
        assert_eq!(*to, tree.factory().initial_world());
        assert_ne!(*from, tree.factory().initial_world());
    }

    #[test]
    fn necessity_with_no_reachable_world_produces_nothing() {
        let mut tree = tree_with(Logic::Modal, |f| {
            f.new_unary(UnaryOp::Necessity, f.atom("A"))
        });
        let subtree = apply_at_root(&NecessityRule, &mut tree).unwrap();
        assert!(subtree.is_empty());
    }

    #[test]
    fn necessity_instantiates_reachable_worlds() {
        let mut tree = tree_with(Logic::Modal, |f| {
            f.new_unary(UnaryOp::Necessity, f.atom("A"))
        });
        let root = tree.root();
        let w0 = tree.factory().initial_world();
        let w1 = tree.factory().new_world();
        let descriptor = tree.factory().new_modal_relation_descriptor(w0, w1);
        let relation = {
            let branch = vec![root];
            let mut factory = RuleApplyFactory::new(&mut tree, root, &branch);
            factory.new_node(descriptor)
        };
        tree.graft(root, &ProofSubtree::single(relation));

        let branch = vec![root, relation];
        let subtree = {
            let mut factory = RuleApplyFactory::new(&mut tree, root, &branch);
            NecessityRule.apply(&mut factory).unwrap()
        };
        let instance = tree.node(subtree.left().unwrap());
        assert_eq!(instance.formula(), &tree.factory().atom("A"));
        assert_eq!(instance.world(), w1);
    }

    #[test]
    fn negated_possibility_turns_into_necessity_of_negation() {
        let mut tree = tree_with(Logic::Tense, |f| {
            f.negate(&f.new_unary(UnaryOp::FuturePossibility, f.atom("A")))
        });
        let subtree = apply_at_root(&NegatedPossibilityRule, &mut tree).unwrap();
        let node = tree.node(subtree.left().unwrap());
        let expected = tree.factory().new_unary(
            UnaryOp::FutureNecessity,
            tree.factory().negate(&tree.factory().atom("A")),
        );
        assert_eq!(node.formula(), &expected);
    }

    #[test]
    fn strict_implication_necessitates_the_material_form() {
        let mut tree = tree_with(Logic::Modal, |f| {
            f.new_binary(f.atom("A"), BinaryOp::StrictImplication, f.atom("B"))
        });
        let subtree = apply_at_root(&StrictImplicationRule, &mut tree).unwrap();
        let node = tree.node(subtree.left().unwrap());
        let expected = tree.factory().new_unary(
            UnaryOp::Necessity,
            tree.factory()
                .new_binary(tree.factory().atom("A"), BinaryOp::Implication, tree.factory().atom("B")),
        );
        assert_eq!(node.formula(), &expected);
        assert!(node.is_leaf());
    }

    #[test]
    fn modal_rules_are_gated_on_the_logic() {
        let tree = tree_with(Logic::Propositional, |f| {
            f.new_unary(UnaryOp::Possibility, f.atom("A"))
        });
        let node = tree.node(tree.root());
        assert!(!PossibilityRule.is_applicable(Logic::Propositional, node));
        assert!(PossibilityRule.is_applicable(Logic::Modal, node));

        let tense = tree_with(Logic::Modal, |f| {
            f.new_unary(UnaryOp::FutureNecessity, f.atom("A"))
        });
        let tense_node = tense.node(tense.root());
        assert!(!NecessityRule.is_applicable(Logic::Modal, tense_node));
        assert!(NecessityRule.is_applicable(Logic::Tense, tense_node));
    }
}
