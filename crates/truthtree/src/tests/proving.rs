//! End-to-end proof attempts, from source text to verdict.

use crate::{
    formula::FormulaFactory,
    parser::parse_formula,
    prover::{Prover, Verdict},
    Logic,
};

fn verdict_of(logic: Logic, input: &str) -> Verdict {
    let factory = FormulaFactory::new(logic);
    let formula = parse_formula(&factory, input).unwrap();
    Prover::new(logic).prove(&formula).unwrap().verdict()
}

#[test]
fn propositional_tautologies_are_valid() {
    for input in [
        "A -> A",
        "A | ~A",
        "((A -> B) -> A) -> A",
        "~(A & B) <-> (~A | ~B)",
        "~(A | B) <-> (~A & ~B)",
        "(A -> B) <-> (~B -> ~A)",
        "(A ^ B) <-> ~(A <-> B)",
        "(A !& B) <-> ~(A & B)",
    ] {
        assert_eq!(verdict_of(Logic::Propositional, input), Verdict::Valid, "{input}");
    }
}

#[test]
fn propositional_non_theorems_are_invalid() {
    for input in ["A & B", "A -> B", "(A | B) -> A", "A <-> ~A"] {
        assert_eq!(
            verdict_of(Logic::Propositional, input),
            Verdict::Invalid,
            "{input}"
        );
    }
}

#[test]
fn a_counter_model_falsifies_the_claim() {
    let factory = FormulaFactory::new(Logic::Propositional);
    let formula = parse_formula(&factory, "(A | B) -> (A & B)").unwrap();
    let proof = Prover::new(Logic::Propositional).prove(&formula).unwrap();
    assert_eq!(proof.verdict(), Verdict::Invalid);

    let mut assignment = proof.counter_assignment().unwrap();
    for name in ["A", "B"] {
        if assignment.value(name).is_none() {
            assignment.bind(name, false);
        }
    }
    assert!(!formula.visit(&assignment).unwrap());
}

#[test]
fn modal_k_theorems_are_valid() {
    for input in [
        "[](A -> B) -> ([]A -> []B)",
        "[]A <-> ~<>~A",
        "<>A <-> ~[]~A",
        "(A => B) -> [](A -> B)",
        "[](A & B) -> []A",
    ] {
        assert_eq!(verdict_of(Logic::Modal, input), Verdict::Valid, "{input}");
    }
}

#[test]
fn modal_non_theorems_are_invalid() {
    // reflexivity and its kin need frame conditions K does not have
    for input in ["A -> []A", "[]A -> A", "<>A -> []A"] {
        assert_eq!(verdict_of(Logic::Modal, input), Verdict::Invalid, "{input}");
    }
}

#[test]
fn tense_dualities_are_valid() {
    for input in [
        "[F]A <-> ~<F>~A",
        "[P]A <-> ~<P>~A",
        "[F](A -> B) -> ([F]A -> [F]B)",
    ] {
        assert_eq!(verdict_of(Logic::Tense, input), Verdict::Valid, "{input}");
    }
}

#[test]
fn past_and_future_do_not_collapse() {
    assert_eq!(verdict_of(Logic::Tense, "<F>A -> <P>A"), Verdict::Invalid);
    assert_eq!(verdict_of(Logic::Tense, "[F]A -> [P]A"), Verdict::Invalid);
}

#[test]
fn a_tiny_budget_gives_up_gracefully() {
    let factory = FormulaFactory::new(Logic::Propositional);
    let formula = parse_formula(&factory, "(A <-> B) <-> (B <-> A)").unwrap();
    let proof = Prover::new(Logic::Propositional)
        .with_max_steps(2)
        .prove(&formula)
        .unwrap();
    assert_eq!(proof.verdict(), Verdict::Undetermined);
    assert!(proof.open_branch().is_none());
}

#[test]
fn the_tableau_is_printable() {
    let factory = FormulaFactory::new(Logic::Modal);
    let formula = parse_formula(&factory, "<>A -> <>A").unwrap();
    let proof = Prover::new(Logic::Modal).prove(&formula).unwrap();
    assert_eq!(proof.verdict(), Verdict::Valid);
    let rendered = proof.tree().to_string();
    assert!(rendered.contains("w0"));
}
