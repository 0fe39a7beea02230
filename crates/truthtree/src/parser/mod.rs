//! Surface-syntax parser, turning source text into [`AFormula`] values
//! through a [`FormulaFactory`] so parsed formulas carry the attempt's
//! logic variant.

use log::trace;
use once_cell::sync::Lazy;
use pest::{
    iterators::Pairs,
    pratt_parser::{Assoc, Op, PrattParser},
    Parser,
};
use pest_derive::Parser;

use crate::{
    error::{Error, Result},
    formula::{AFormula, BinaryOp, Formula, FormulaFactory, UnaryOp},
};

#[derive(Parser)]
#[grammar = "parser/grammar.pest"]
struct FormulaParser;

static PRATT: Lazy<PrattParser<Rule>> = Lazy::new(|| {
    // loosest binding first
    PrattParser::new()
        .op(Op::infix(Rule::iff, Assoc::Right))
        .op(Op::infix(Rule::imply, Assoc::Right) | Op::infix(Rule::strict_imply, Assoc::Right))
        .op(Op::infix(Rule::or, Assoc::Left)
            | Op::infix(Rule::xor, Assoc::Left)
            | Op::infix(Rule::nand, Assoc::Left))
        .op(Op::infix(Rule::and, Assoc::Left))
        .op(Op::prefix(Rule::not)
            | Op::prefix(Rule::possible)
            | Op::prefix(Rule::necessary)
            | Op::prefix(Rule::future_possible)
            | Op::prefix(Rule::future_necessary)
            | Op::prefix(Rule::past_possible)
            | Op::prefix(Rule::past_necessary))
});

/// Parses `input` into a formula built by `factory`, rejecting operators
/// the factory's logic does not have.
pub fn parse_formula(factory: &FormulaFactory, input: &str) -> Result<AFormula> {
    trace!("parsing {input:?}");
    let mut pairs = FormulaParser::parse(Rule::file, input)?;
    let expr = pairs
        .next()
        .unwrap()
        .into_inner()
        .find(|pair| pair.as_rule() == Rule::expr)
        .unwrap();
    let formula = build(factory, expr.into_inner());
    check_available(factory, &formula)?;
    Ok(formula)
}

fn build(factory: &FormulaFactory, pairs: Pairs<'_, Rule>) -> AFormula {
    PRATT
        .map_primary(|primary| match primary.as_rule() {
            Rule::atom => factory.atom(primary.as_str()),
            Rule::expr => build(factory, primary.into_inner()),
            rule => unreachable!("primary {rule:?}"),
        })
        .map_prefix(|op, operand| {
            let op = match op.as_rule() {
                Rule::not => UnaryOp::Negation,
                Rule::possible => UnaryOp::Possibility,
                Rule::necessary => UnaryOp::Necessity,
                Rule::future_possible => UnaryOp::FuturePossibility,
                Rule::future_necessary => UnaryOp::FutureNecessity,
                Rule::past_possible => UnaryOp::PastPossibility,
                Rule::past_necessary => UnaryOp::PastNecessity,
                rule => unreachable!("prefix {rule:?}"),
            };
            factory.new_unary(op, operand)
        })
        .map_infix(|left, op, right| {
            let op = match op.as_rule() {
                Rule::iff => BinaryOp::Biconditional,
                Rule::imply => BinaryOp::Implication,
                Rule::strict_imply => BinaryOp::StrictImplication,
                Rule::nand => BinaryOp::Nand,
                Rule::and => BinaryOp::Conjunction,
                Rule::or => BinaryOp::Disjunction,
                Rule::xor => BinaryOp::ExclusiveOr,
                rule => unreachable!("infix {rule:?}"),
            };
            factory.new_binary(left, op, right)
        })
        .parse(pairs)
}

/// Modal vocabulary is only accepted under a logic that gives it rules.
fn check_available(factory: &FormulaFactory, formula: &AFormula) -> Result<()> {
    let logic = factory.logic();
    match formula.as_ref() {
        Formula::Atom(_) | Formula::WorldRelation { .. } => Ok(()),
        Formula::Unary { op, operand } => {
            if !op.available_in(logic) {
                return Err(Error::OperatorNotInLogic {
                    op: op.symbol(),
                    logic,
                });
            }
            check_available(factory, operand)
        }
        Formula::Binary { left, op, right } => {
            if *op == BinaryOp::StrictImplication && !logic.has_modal_operators() {
                return Err(Error::OperatorNotInLogic {
                    op: op.symbol(),
                    logic,
                });
            }
            check_available(factory, left)?;
            check_available(factory, right)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::logic::Logic;

    use super::*;

    fn parse(logic: Logic, input: &str) -> Result<AFormula> {
        let factory = FormulaFactory::new(logic);
        parse_formula(&factory, input)
    }

    #[test]
    fn parses_a_simple_implication() {
        let factory = FormulaFactory::new(Logic::Propositional);
        let parsed = parse_formula(&factory, "A -> A").unwrap();
        let expected = factory.new_binary(factory.atom("A"), BinaryOp::Implication, factory.atom("A"));
        assert_eq!(parsed, expected);
    }

    #[test]
    fn conjunction_binds_tighter_than_disjunction() {
        let parsed = parse(Logic::Propositional, "A | B & C").unwrap();
        assert_eq!(parsed.to_typeset(), "(A | (B & C))");
    }

    #[test]
    fn implication_is_right_associative() {
        let parsed = parse(Logic::Propositional, "A -> B -> C").unwrap();
        assert_eq!(parsed.to_typeset(), "(A -> (B -> C))");
    }

    #[test]
    fn prefixes_stack() {
        let parsed = parse(Logic::Modal, "~<>~A").unwrap();
        assert_eq!(parsed.to_typeset(), "~<>~A");
    }

    #[test]
    fn unicode_spellings_are_accepted() {
        let ascii = parse(Logic::Modal, "~A & <>B").unwrap();
        let unicode = parse(Logic::Modal, "¬A ∧ ◇B").unwrap();
        assert_eq!(ascii, unicode);
    }

    #[test]
    fn typeset_output_round_trips() {
        let factory = FormulaFactory::new(Logic::Tense);
        let inputs = [
            "((A & B) -> ~C)",
            "A <-> B <-> C",
            "[](A => B) | <P>C",
            "[F]~(A ^ B) !& <F>D",
            "~~~A",
        ];
        for input in inputs {
            let parsed = parse_formula(&factory, input).unwrap();
            let reparsed = parse_formula(&factory, &parsed.to_typeset()).unwrap();
            assert_eq!(parsed, reparsed, "{input}");
        }
    }

    #[test]
    fn modal_vocabulary_needs_a_modal_logic() {
        assert!(matches!(
            parse(Logic::Propositional, "<>A"),
            Err(Error::OperatorNotInLogic { op: "<>", .. })
        ));
        assert!(matches!(
            parse(Logic::Propositional, "A => B"),
            Err(Error::OperatorNotInLogic { op: "=>", .. })
        ));
        assert!(matches!(
            parse(Logic::Modal, "<F>A"),
            Err(Error::OperatorNotInLogic { op: "<F>", .. })
        ));
        assert!(parse(Logic::Tense, "<F>A & []B").is_ok());
    }

    #[test]
    fn garbage_is_a_parse_error() {
        assert!(matches!(parse(Logic::Propositional, "A & & B"), Err(Error::Parse(_))));
        assert!(matches!(parse(Logic::Propositional, "(A"), Err(Error::Parse(_))));
        assert!(matches!(parse(Logic::Propositional, ""), Err(Error::Parse(_))));
    }
}
