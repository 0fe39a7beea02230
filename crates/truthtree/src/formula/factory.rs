use std::sync::{
    atomic::{AtomicU32, AtomicU64, Ordering},
    Arc,
};

use log::trace;

use crate::logic::Logic;

use super::{AFormula, BinaryOp, Formula, PossibleWorld, UnaryOp};

/// Builds every formula of one proof attempt and hands out the fresh names
/// and possible worlds the modal rules witness possibilities with.
///
/// The counters are the only mutable state shared across a tree, so
/// independent branches may be expanded in parallel against one factory.
#[derive(Debug)]
pub struct FormulaFactory {
    logic: Logic,
    instance_names: AtomicU64,
    worlds: AtomicU32,
}

impl FormulaFactory {
    pub fn new(logic: Logic) -> Self {
        Self {
            logic,
            instance_names: AtomicU64::new(0),
            // w0 is the initial world
            worlds: AtomicU32::new(1),
        }
    }

    pub fn logic(&self) -> Logic {
        self.logic
    }

    pub fn atom(&self, token: impl Into<String>) -> AFormula {
        Arc::new(Formula::Atom(token.into()))
    }

    pub fn new_unary(&self, op: UnaryOp, operand: AFormula) -> AFormula {
        Arc::new(Formula::Unary { op, operand })
    }

    pub fn new_binary(&self, left: AFormula, op: BinaryOp, right: AFormula) -> AFormula {
        Arc::new(Formula::Binary { left, op, right })
    }

    pub fn negate(&self, operand: &AFormula) -> AFormula {
        self.new_unary(UnaryOp::Negation, operand.clone())
    }

    /// Records that `to` is accessible from `from`.
    pub fn new_modal_relation_descriptor(
        &self,
        from: PossibleWorld,
        to: PossibleWorld,
    ) -> AFormula {
        Arc::new(Formula::WorldRelation { from, to })
    }

    /// Fresh predicate-argument instance name; never returned twice by one
    /// factory.
    pub fn next_fresh_name(&self) -> String {
        let n = self.instance_names.fetch_add(1, Ordering::Relaxed);
        format!("c{n}")
    }

    pub fn initial_world(&self) -> PossibleWorld {
        PossibleWorld(0)
    }

    pub fn new_world(&self) -> PossibleWorld {
        let id = self.worlds.fetch_add(1, Ordering::Relaxed);
        trace!("minting possible world w{id}");
        PossibleWorld(id)
    }
}

#[cfg(test)]
mod tests {
    use hashbrown::HashSet;

    use super::*;

    #[test]
    fn fresh_names_never_repeat() {
        let factory = FormulaFactory::new(Logic::Propositional);
        let names: HashSet<_> = (0..10_000).map(|_| factory.next_fresh_name()).collect();
        assert_eq!(names.len(), 10_000);
    }

    #[test]
    fn worlds_are_distinct() {
        let factory = FormulaFactory::new(Logic::Modal);
        let w1 = factory.new_world();
        let w2 = factory.new_world();
        assert_ne!(factory.initial_world(), w1);
        assert_ne!(w1, w2);
        assert!(w1 < w2);
    }

    #[test]
    fn constructors_are_pure() {
        let factory = FormulaFactory::new(Logic::Modal);
        let a = factory.atom("A");
        let negated = factory.negate(&a);
        assert_eq!(*a, Formula::Atom("A".into()));
        assert_eq!(
            *negated,
            Formula::Unary {
                op: UnaryOp::Negation,
                operand: a,
            }
        );
    }
}
