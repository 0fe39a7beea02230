use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use itertools::Itertools;
use serde::Serialize;

use crate::{
    formula::AFormula,
    logic::Logic,
    prover::{Proof, Verdict, DEFAULT_MAX_STEPS},
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// the formula to prove
    ///
    /// Read from `--file` or stdin when absent
    #[arg(value_name = "FORMULA")]
    pub formula: Option<String>,

    /// read the formula from a file instead
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// logic to prove in
    #[arg(short, long, value_enum, default_value_t = Logic::Propositional)]
    pub logic: Logic,

    /// give up after this many rule applications
    ///
    /// Modal and tense tableaux can grow without bound; hitting the budget
    /// reports `undetermined` instead of looping
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_STEPS)]
    pub max_steps: usize,

    /// print the finished tableau
    #[arg(short, long)]
    pub tree: bool,

    #[arg(short, long, value_enum, default_value_t = Output::Text)]
    pub output: Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Output {
    Text,
    Json,
}

impl std::fmt::Display for Output {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Output::Text => "text".fmt(f),
            Output::Json => "json".fmt(f),
        }
    }
}

/// What the binary prints in JSON mode.
#[derive(Debug, Serialize)]
pub struct Report {
    pub formula: String,
    pub logic: Logic,
    pub verdict: Verdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counter_model: Option<Vec<(String, bool)>>,
}

impl Report {
    pub fn new(formula: &AFormula, logic: Logic, proof: &Proof) -> Self {
        let counter_model = proof.counter_assignment().map(|assignment| {
            assignment
                .iter()
                .map(|(name, value)| (name.to_string(), value))
                .sorted()
                .collect()
        });
        Report {
            formula: formula.to_typeset(),
            logic,
            verdict: proof.verdict(),
            counter_model,
        }
    }
}
