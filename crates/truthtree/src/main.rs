use std::{
    fs::read_to_string,
    io::{self, Read},
};

use clap::Parser;
use truthtree::{
    cli::{Args, Output, Report},
    formula::FormulaFactory,
    init_logger,
    parser::parse_formula,
    Prover,
};

use log::trace;

fn main() {
    let args = Args::parse();

    init_logger();

    trace!("start");
    trace!("read input...");
    let input = {
        if let Some(source) = &args.formula {
            source.clone()
        } else if let Some(file) = &args.file {
            read_to_string(file).unwrap_or_else(|_| {
                panic!(
                    "file \"{}\" not found",
                    file.to_str().unwrap_or("[non-unicode file name]")
                )
            })
        } else {
            let mut buf = String::new();
            Read::read_to_string(&mut io::stdin(), &mut buf).expect("unable to read stdin");
            buf
        }
    };
    trace!("input read");

    let factory = FormulaFactory::new(args.logic);
    let formula = match parse_formula(&factory, input.trim()) {
        Ok(formula) => formula,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    let prover = Prover::new(args.logic).with_max_steps(args.max_steps);
    let proof = match prover.prove(&formula) {
        Ok(proof) => proof,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    match args.output {
        Output::Text => {
            println!("{formula} is {}", proof.verdict());
            if let Some(assignment) = proof.counter_assignment() {
                let mut bindings: Vec<_> = assignment.iter().collect();
                bindings.sort();
                let model = bindings
                    .into_iter()
                    .map(|(name, value)| format!("{name} = {value}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("counter-model: {model}");
            }
            if args.tree {
                println!("{}", proof.tree());
            }
        }
        Output::Json => {
            let report = Report::new(&formula, args.logic, &proof);
            println!("{}", serde_json::to_string(&report).unwrap())
        }
    }

    trace!("done")
}
