use clap::Parser;
use loadsmith::config::{DEFAULT_OUTPUT_DIR, DEFAULT_SUMMARY_DIR, SCRIPT_FILE};
use loadsmith::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::process;

/// Compile a load-test flow descriptor into a k6 script
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the flow descriptor JSON file
    descriptor: PathBuf,

    /// Directory the script is written to
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    out_dir: PathBuf,

    /// Directory copied next to the script (best effort)
    #[arg(short, long)]
    assets: Option<PathBuf>,

    /// Directory the runtime writes summary.json into; empty for the working directory
    #[arg(long, default_value = DEFAULT_SUMMARY_DIR)]
    summary_dir: String,

    /// Fail on unmatched endpoint tokens and unregistered variables
    #[arg(long)]
    strict: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let json = fs::read_to_string(&cli.descriptor).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read descriptor '{}': {}",
            cli.descriptor.display(),
            e
        ))
    });
    let raw = RawFlow::from_json(&json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse descriptor JSON: {}", e)));

    let options = GenerateOptions {
        out_dir: cli.out_dir,
        script_file: SCRIPT_FILE.to_string(),
        assets: cli.assets,
        settings: CompilerSettings {
            summary_dir: Some(cli.summary_dir).filter(|d| !d.is_empty()),
            strictness: if cli.strict {
                Strictness::Strict
            } else {
                Strictness::Permissive
            },
            ..CompilerSettings::default()
        },
    };

    match generate(raw, &options) {
        Ok(path) => println!("Script generated successfully: {}", path.display()),
        Err(GenerateError::Compile(e)) => {
            let violations = e.violations();
            if violations.len() > 1 {
                eprintln!("Descriptor has {} problems:", violations.len());
                for violation in violations {
                    eprintln!("  - {}", violation);
                }
                process::exit(1);
            }
            exit_with_error(&e.to_string())
        }
        Err(e) => exit_with_error(&e.to_string()),
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}
