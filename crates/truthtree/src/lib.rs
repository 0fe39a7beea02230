//! Automated theorem proving with semantic tableaux, also known as truth
//! trees. A claim is valid when every branch of the tableau grown from its
//! negation closes on a contradiction; a saturated open branch reads back
//! as a counter-model.
//!
//! Propositional, modal (K) and tense vocabularies are supported, selected
//! per proof attempt through [`Logic`].

pub mod error;
pub mod formula;
pub mod logic;
pub mod parser;
pub mod proof;
pub mod prover;

pub mod cli;

#[cfg(test)]
mod tests;

pub use error::{Error, Result};
pub use logic::Logic;
pub use prover::{Proof, Prover, Verdict};

use std::io::Write;
pub fn init_logger() {
    env_logger::Builder::new()
        .format(|buf, record| {
            let str = record.args().to_string().replace("\n", "\n\t");
            writeln!(
                buf,
                "[{}] in {}:{}\n\t{}",
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                str
            )
        })
        .parse_default_env()
        .init();
}
