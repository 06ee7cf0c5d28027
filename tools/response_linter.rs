/// Response Linter: runs an assembler over a saved raw model response.
///
/// Usage: response_linter <scenario|outcome|backstory> <file>
///        [--siblings <n>] [--gender <male|female>] [--strict]
///
/// Set RUST_LOG=debug to see dropped records and other diagnostics.

use lifesim_engine::core::backstory::{assemble_backstory, BackstoryPlan};
use lifesim_engine::core::extract::scan_tag_names;
use lifesim_engine::core::outcome::{assemble_outcome, RecordPolicy};
use lifesim_engine::core::scenario::assemble_scenario_staged;
use lifesim_engine::schema::backstory::Gender;
use std::process;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: response_linter <scenario|outcome|backstory> <file> \
                     [--siblings <n>] [--gender <male|female>] [--strict]";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 || args[1] == "--help" || args[1] == "-h" {
        println!("{}", USAGE);
        process::exit(0);
    }

    let kind = args[1].as_str();
    let path = &args[2];
    let mut siblings = 0usize;
    let mut gender = Gender::Female;
    let mut policy = RecordPolicy::DropMalformed;

    let mut i = 3;
    while i < args.len() {
        match args[i].as_str() {
            "--siblings" if i + 1 < args.len() => {
                i += 1;
                siblings = match args[i].parse() {
                    Ok(n) => n,
                    Err(_) => {
                        eprintln!("ERROR: --siblings expects a number, got '{}'", args[i]);
                        process::exit(2);
                    }
                };
            }
            "--gender" if i + 1 < args.len() => {
                i += 1;
                gender = match args[i].to_lowercase().as_str() {
                    "male" => Gender::Male,
                    "female" => Gender::Female,
                    other => {
                        eprintln!("ERROR: unknown gender '{}'", other);
                        process::exit(2);
                    }
                };
            }
            "--strict" => policy = RecordPolicy::RejectResponse,
            other => {
                eprintln!("ERROR: unexpected argument '{}'\n{}", other, USAGE);
                process::exit(2);
            }
        }
        i += 1;
    }

    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("ERROR: Failed to read '{}': {}", path, e);
            process::exit(2);
        }
    };

    println!("Tags found: {}", scan_tag_names(&raw).join(", "));

    let report = match kind {
        "scenario" => assemble_scenario_staged(&raw)
            .map_err(|f| format!("stopped at {}: {}", f.stage, f.error))
            .and_then(|result| to_pretty(&result)),
        "outcome" => assemble_outcome(&raw, policy)
            .map_err(|e| e.to_string())
            .and_then(|result| to_pretty(&result)),
        "backstory" => {
            let plan = BackstoryPlan {
                gender,
                sibling_count: siblings,
            };
            assemble_backstory(&raw, &plan)
                .map_err(|e| e.to_string())
                .and_then(|result| to_pretty(&result))
        }
        other => {
            eprintln!("ERROR: unknown response kind '{}'\n{}", other, USAGE);
            process::exit(2);
        }
    };

    println!("\n=== {} ===\n", kind);
    match report {
        Ok(json) => {
            println!("{}", json);
            println!("\nOK");
            process::exit(0);
        }
        Err(error) => {
            println!("ERROR: {}", error);
            process::exit(1);
        }
    }
}

fn to_pretty<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| e.to_string())
}
