use crate::logic::Logic;

pub type Result<T> = std::result::Result<T, Error>;

/// Contract violations are fatal to the single call that raised them and
/// propagate to the driver; none of them has a retry semantic.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("token {token:?} is neither a bound variable nor a boolean literal")]
    MalformedLiteral { token: String },

    #[error("rule {rule:?} was applied to a node it does not match")]
    RuleMisapplied { rule: &'static str },

    #[error("expected a binary formula, found {found}")]
    UnboundOperand { found: String },

    #[error("operator {op} is not part of {logic} logic")]
    OperatorNotInLogic { op: &'static str, logic: Logic },

    #[error(transparent)]
    Parse(#[from] Box<pest::error::Error<crate::parser::Rule>>),
}

impl From<pest::error::Error<crate::parser::Rule>> for Error {
    fn from(value: pest::error::Error<crate::parser::Rule>) -> Self {
        Self::Parse(Box::new(value))
    }
}
