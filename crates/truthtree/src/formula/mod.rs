//! The formula data model: immutable, structurally compared AST nodes
//! shared through [`AFormula`] handles.

use std::{fmt, sync::Arc};

use hashbrown::HashMap;

use crate::{
    error::{Error, Result},
    logic::Logic,
};

mod factory;
pub use factory::FormulaFactory;

/// Shared handle to an immutable formula.
pub type AFormula = Arc<Formula>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UnaryOp {
    Negation,
    Possibility,
    Necessity,
    FuturePossibility,
    FutureNecessity,
    PastPossibility,
    PastNecessity,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Negation => "~",
            UnaryOp::Possibility => "<>",
            UnaryOp::Necessity => "[]",
            UnaryOp::FuturePossibility => "<F>",
            UnaryOp::FutureNecessity => "[F]",
            UnaryOp::PastPossibility => "<P>",
            UnaryOp::PastNecessity => "[P]",
        }
    }

    /// Everything but plain negation quantifies over accessible worlds.
    pub fn is_modal(self) -> bool {
        !matches!(self, UnaryOp::Negation)
    }

    pub fn is_possibility_like(self) -> bool {
        matches!(
            self,
            UnaryOp::Possibility | UnaryOp::FuturePossibility | UnaryOp::PastPossibility
        )
    }

    pub fn is_necessity_like(self) -> bool {
        matches!(
            self,
            UnaryOp::Necessity | UnaryOp::FutureNecessity | UnaryOp::PastNecessity
        )
    }

    /// Past operators walk the accessibility relation backwards.
    pub fn looks_backwards(self) -> bool {
        matches!(self, UnaryOp::PastPossibility | UnaryOp::PastNecessity)
    }

    /// Swaps possibility and necessity, keeping the temporal direction.
    /// Negation is its own dual.
    pub fn dual(self) -> UnaryOp {
        match self {
            UnaryOp::Negation => UnaryOp::Negation,
            UnaryOp::Possibility => UnaryOp::Necessity,
            UnaryOp::Necessity => UnaryOp::Possibility,
            UnaryOp::FuturePossibility => UnaryOp::FutureNecessity,
            UnaryOp::FutureNecessity => UnaryOp::FuturePossibility,
            UnaryOp::PastPossibility => UnaryOp::PastNecessity,
            UnaryOp::PastNecessity => UnaryOp::PastPossibility,
        }
    }

    pub fn available_in(self, logic: Logic) -> bool {
        match self {
            UnaryOp::Negation => true,
            UnaryOp::Possibility | UnaryOp::Necessity => logic.has_modal_operators(),
            UnaryOp::FuturePossibility
            | UnaryOp::FutureNecessity
            | UnaryOp::PastPossibility
            | UnaryOp::PastNecessity => logic.has_tense_operators(),
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.symbol().fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BinaryOp {
    Implication,
    StrictImplication,
    Biconditional,
    ExclusiveOr,
    Disjunction,
    Conjunction,
    Nand,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Implication => "->",
            BinaryOp::StrictImplication => "=>",
            BinaryOp::Biconditional => "<->",
            BinaryOp::ExclusiveOr => "^",
            BinaryOp::Disjunction => "|",
            BinaryOp::Conjunction => "&",
            BinaryOp::Nand => "!&",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.symbol().fmt(f)
    }
}

/// Opaque evaluation context for modal operators. Worlds are minted by the
/// [`FormulaFactory`] and referenced, never owned, by descriptor formulas
/// and tree nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PossibleWorld(pub u32);

impl fmt::Display for PossibleWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

/// A formula. Equality and hashing are structural: same operator, equal
/// operands, regardless of which handle they reached us through.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Formula {
    /// Propositional variable or boolean literal token.
    Atom(String),
    Unary { op: UnaryOp, operand: AFormula },
    Binary {
        left: AFormula,
        op: BinaryOp,
        right: AFormula,
    },
    /// Accessibility edge between two possible worlds, recorded on a branch
    /// when a possibility is witnessed.
    WorldRelation {
        from: PossibleWorld,
        to: PossibleWorld,
    },
}

impl Formula {
    /// Direct truth-table evaluation under a flat assignment, used to
    /// model-check a candidate open branch.
    ///
    /// Modal and temporal operators have no truth condition at this layer;
    /// they evaluate as the bare negation of their operand, and the tableau
    /// rules alone carry the modal semantics.
    pub fn visit(&self, assignment: &Assignment) -> Result<bool> {
        match self {
            Formula::Atom(token) => match assignment.value(token) {
                Some(value) => Ok(value),
                None => match token.as_str() {
                    "true" => Ok(true),
                    "false" => Ok(false),
                    _ => Err(Error::MalformedLiteral {
                        token: token.clone(),
                    }),
                },
            },
            Formula::Unary { operand, .. } => Ok(!operand.visit(assignment)?),
            Formula::Binary { left, op, right } => {
                let l = left.visit(assignment)?;
                let r = right.visit(assignment)?;
                Ok(match op {
                    BinaryOp::Implication | BinaryOp::StrictImplication => !l || (l && r),
                    BinaryOp::Biconditional => l == r,
                    BinaryOp::ExclusiveOr => l != r,
                    BinaryOp::Disjunction => l || r,
                    BinaryOp::Conjunction => l && r,
                    BinaryOp::Nand => !(l && r),
                })
            }
            Formula::WorldRelation { .. } => Err(Error::MalformedLiteral {
                token: self.to_typeset(),
            }),
        }
    }

    /// Fully parenthesized rendering. The output is valid parser input, so
    /// a formula survives a typeset/parse round trip structurally intact.
    pub fn to_typeset(&self) -> String {
        match self {
            Formula::Atom(token) => token.clone(),
            Formula::Unary { op, operand } => format!("{}{}", op.symbol(), operand.to_typeset()),
            Formula::Binary { left, op, right } => {
                format!("({} {} {})", left.to_typeset(), op.symbol(), right.to_typeset())
            }
            Formula::WorldRelation { from, to } => format!("{from} R {to}"),
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_typeset().fmt(f)
    }
}

/// A total assignment of truth values to propositional variables.
#[derive(Debug, Default, Clone)]
pub struct Assignment {
    values: HashMap<String, bool>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, name: impl Into<String>, value: bool) {
        self.values.insert(name.into(), value);
    }

    pub fn value(&self, name: &str) -> Option<bool> {
        self.values.get(name).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> + '_ {
        self.values.iter().map(|(name, &value)| (name.as_str(), value))
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for Assignment {
    fn from_iter<T: IntoIterator<Item = (S, bool)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().map(|(name, value)| (name.into(), value)).collect(),
        }
    }
}
