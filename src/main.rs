//! emailhub-normalize — normalize a saved agent response from the command line.
//!
//! Reads the response JSON from FILE (or stdin), prints the canonical result
//! (or the reply draft with `--reply`) to stdout. Failures go to stderr with
//! exit code 1. Set `RUST_LOG=debug` to trace the candidate search.

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use emailhub_lib::config::{default_config_path, load_config};
use emailhub_lib::{Normalizer, RawTree};

/// Normalize an email-processing agent response
#[derive(Parser, Debug)]
#[command(name = "emailhub-normalize")]
#[command(about = "Normalize an email-processing agent response into canonical JSON")]
#[command(version)]
struct Args {
    /// Extract the reply draft instead of the email list
    #[arg(long)]
    reply: bool,

    /// Config file (defaults to ~/.emailhub/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Response JSON file; stdin when omitted
    input: Option<PathBuf>,
}

fn read_input(input: Option<&PathBuf>) -> Result<String, String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e)),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("Failed to read stdin: {}", e))?;
            Ok(buf)
        }
    }
}

fn run(args: &Args) -> Result<String, String> {
    let config = match args.config.clone().or_else(default_config_path) {
        Some(path) => load_config(&path).map_err(|e| e.to_string())?,
        None => Default::default(),
    };
    let normalizer = Normalizer::from_config(&config);

    let content = read_input(args.input.as_ref())?;
    let response: RawTree =
        serde_json::from_str(&content).map_err(|e| format!("Failed to parse response: {}", e))?;

    let outcome = if args.reply {
        normalizer
            .reply_draft(&response)
            .map(|draft| serde_json::json!({ "reply_draft": draft }))
    } else {
        normalizer
            .normalize(&response)
            .map(|result| serde_json::to_value(&result).unwrap_or_default())
    };

    match outcome {
        Ok(value) => serde_json::to_string_pretty(&value).map_err(|e| e.to_string()),
        Err(err) => Err(err.message().to_string()),
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(message) => {
            log::error!("Normalization failed");
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}
