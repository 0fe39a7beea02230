use std::fmt;

use clap::ValueEnum;
use serde::Serialize;

/// The logic a proof attempt runs under. It decides which unary operators
/// the parser accepts and which tableau rules may fire.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Logic {
    #[default]
    Propositional,
    Modal,
    Tense,
}

impl Logic {
    pub fn has_modal_operators(self) -> bool {
        !matches!(self, Logic::Propositional)
    }

    pub fn has_tense_operators(self) -> bool {
        matches!(self, Logic::Tense)
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Logic::Propositional => "propositional".fmt(f),
            Logic::Modal => "modal".fmt(f),
            Logic::Tense => "tense".fmt(f),
        }
    }
}
