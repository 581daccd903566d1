use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use apierrors_gen::{GenOptions, generate_errors};

#[derive(Parser, Debug)]
#[command(
    name = "apierrors-gen",
    about = "Generate canonical apierrors values from an error catalog",
    version
)]
struct Cli {
    /// Error catalog (TOML, or JSON with a .json extension)
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    input: PathBuf,

    /// Output file path (writes to stdout when absent)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Path of the apierrors crate as seen from the generated module
    #[arg(long = "crate-path", value_name = "PATH", default_value = "apierrors")]
    crate_path: String,
}

fn run(args: Cli) -> Result<()> {
    let opts = GenOptions {
        crate_path: args.crate_path,
        source: args
            .input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned()),
    };

    let Some(output) = generate_errors(&args.input, &opts)? else {
        tracing::warn!(input = %args.input.display(), "catalog defines no errors, nothing written");
        return Ok(());
    };

    if let Some(path) = &args.output {
        fs::write(path, &output)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "output written");
    } else {
        print!("{output}");
    }
    Ok(())
}

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let args = Cli::parse();
    run(args)
}
