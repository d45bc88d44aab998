//! agent-shellgate: gate for shell commands proposed by an autonomous agent.
//!
//! Reads `{"command": "..."}` from stdin and writes the verdict as JSON to
//! stdout. The caller spawns the command only when `allowed` is true.
//!
//! Flags:
//!   --check <command>   validate one command from argv; exit 0 if allowed, 1 if blocked
//!   --dump-config       print the merged configuration as TOML
//!   --verbose, -v       debug logging on stderr

use std::io::Read;
use std::process::ExitCode;

use agent_shellgate::config::Config;
use agent_shellgate::{PolicyEngine, Verdict, logging};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
struct Request {
    command: Option<String>,
}

#[derive(Serialize)]
struct Response<'a> {
    allowed: bool,
    reason: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

/// Exit status for usage, config and input errors. Callers must treat it as a block.
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    logging::init(verbose);

    let config = Config::load();

    if args.iter().any(|a| a == "--dump-config") {
        return match toml::to_string_pretty(&config) {
            Ok(text) => {
                print!("{text}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("agent-shellgate: {e}");
                ExitCode::from(EXIT_ERROR)
            }
        };
    }

    let engine = match PolicyEngine::from_config(&config) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("agent-shellgate: {e}");
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if let Some(pos) = args.iter().position(|a| a == "--check") {
        let Some(command) = args.get(pos + 1) else {
            eprintln!("agent-shellgate: --check requires a command");
            return ExitCode::from(EXIT_ERROR);
        };
        let verdict = decide(&engine, &config, command);
        return match verdict.block_message() {
            None => {
                println!("allowed");
                ExitCode::SUCCESS
            }
            Some(message) => {
                println!("{message}");
                ExitCode::FAILURE
            }
        };
    }

    let mut input = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut input) {
        eprintln!("agent-shellgate: failed to read stdin: {e}");
        return ExitCode::from(EXIT_ERROR);
    }
    let request: Request = match serde_json::from_str(&input) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("agent-shellgate: JSON parse error: {e}");
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let command = request.command.unwrap_or_default();
    let verdict = decide(&engine, &config, &command);
    let response = Response {
        allowed: verdict.allowed,
        reason: &verdict.reason,
        message: verdict.block_message(),
    };
    match serde_json::to_string(&response) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("agent-shellgate: {e}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn decide(engine: &PolicyEngine, config: &Config, command: &str) -> Verdict {
    let verdict = engine.validate(command);
    if config.settings.log_decisions {
        logging::log_decision(command, &verdict);
    }
    verdict
}
