use std::fmt::Display;
use std::{fs, process};

use clap::Parser;
use linearize_cli::{App, CheckArgs, Command, ModelKind};
use linearize_core::models::cas_register::CasRegister;
use linearize_core::models::register::Register;
use linearize_core::{analysis, complete_history, AnalysisReport, AnalyzerOptions, History, Model, Op};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(tracing::Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let app = App::parse();
    let exit_code = match &app.command {
        Command::Check(args) => check(args),
    };
    process::exit(exit_code);
}

fn check(args: &CheckArgs) -> i32 {
    let mut options = AnalyzerOptions::default();
    if let Some(threads) = args.threads {
        options.thread_count = threads;
    }
    if let Some(bits) = args.seen_bits {
        options.seen_capacity_bits = bits;
    }

    let raw = fs::read_to_string(&args.input).unwrap_or_else(|e| {
        eprintln!("Failed to read {}: {e}", args.input.display());
        process::exit(2);
    });

    match args.model {
        ModelKind::Register => run(Register(0), &raw, &options, args),
        ModelKind::CasRegister => run(CasRegister(0), &raw, &options, args),
    }
}

fn run<M>(initial: M, raw: &str, options: &AnalyzerOptions, args: &CheckArgs) -> i32
where
    M: Model + Send + Sync + 'static,
    M::Call: Send + Sync + Display + serde::de::DeserializeOwned,
{
    let events: Vec<Op<M::Call>> = match serde_json::from_str(raw) {
        Ok(events) => events,
        Err(e) => {
            eprintln!("Failed to parse {}: {e}", args.input.display());
            return 2;
        }
    };

    let history = complete_history(History::new(events));
    let report = analysis(initial, &history, options);
    let exit_code = match &report {
        AnalysisReport::Valid { .. } => 0,
        AnalysisReport::Invalid { .. } => 1,
        AnalysisReport::Error(_) => 2,
    };
    if args.json {
        print_json(&report, args.verbose);
    } else {
        print_human(&report, args.verbose);
    }
    exit_code
}

fn print_human<M>(report: &AnalysisReport<M>, verbose: bool)
where
    M: Model,
    M::Call: Display,
{
    match report {
        AnalysisReport::Valid { linearizable_prefix, worlds } => {
            println!(
                "VALID: {} event(s) are linearizable ({} witness order(s))",
                linearizable_prefix.len(),
                worlds.len()
            );
            if verbose {
                for world in worlds {
                    println!("  witness ends in state {:?}", world.model);
                }
            }
        }
        AnalysisReport::Invalid { linearizable_prefix, inconsistent_op, inconsistent_transitions, .. } => {
            println!(
                "INVALID: longest linearizable prefix has {} event(s)",
                linearizable_prefix.len()
            );
            println!("  culprit: {inconsistent_op}");
            if verbose {
                for (model, message) in inconsistent_transitions {
                    println!("  from state {model:?}: {message}");
                }
            }
        }
        AnalysisReport::Error(error) => println!("ERROR: {error}"),
    }
}

fn print_json<M>(report: &AnalysisReport<M>, verbose: bool)
where
    M: Model,
    M::Call: Display,
{
    let value = match report {
        AnalysisReport::Valid { linearizable_prefix, worlds } => serde_json::json!({
            "valid": true,
            "linearizable_prefix_len": linearizable_prefix.len(),
            "witness_count": worlds.len(),
        }),
        AnalysisReport::Invalid { linearizable_prefix, inconsistent_op, inconsistent_transitions, .. } => {
            let mut value = serde_json::json!({
                "valid": false,
                "linearizable_prefix_len": linearizable_prefix.len(),
                "inconsistent_op": inconsistent_op.to_string(),
            });
            if verbose {
                value["diagnostics"] = inconsistent_transitions
                    .iter()
                    .map(|(_, message)| message.clone())
                    .collect::<Vec<_>>()
                    .into();
            }
            value
        }
        AnalysisReport::Error(error) => serde_json::json!({
            "valid": false,
            "error": error.to_string(),
        }),
    };
    println!("{value}");
}
