//! Golden-vector generator and result comparator for CIM convolution verification.
//!
//! Run with:
//!   `cim-golden generate --variant single64 --out-dir vectors`
//!   `cim-golden compare vectors/conv_results.txt sim/result.txt`

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::error;

use cim_golden::compare::{compare_files, CompareOptions};
use cim_golden::variant::{run as generate, GoldenConfig, Variant};

/// Bit-exact int8 convolution golden model for CIM hardware verification
#[derive(Parser)]
#[command(name = "cim-golden")]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, value_name = "LEVEL", global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate pixel, weight and golden result vectors
    Generate {
        /// Configuration to generate (single64, window512, split576, cim-group)
        #[arg(short, long, value_name = "VARIANT")]
        variant: Variant,

        /// Seed of the random tensor source [default: 42, 86 for cim-group]
        #[arg(short, long)]
        seed: Option<u64>,

        /// Directory receiving the vector files
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        out_dir: PathBuf,
    },
    /// Compare a software result file against a hardware simulation dump
    Compare {
        /// Golden result file
        software: PathBuf,

        /// Result file produced by the hardware simulation
        hardware: PathBuf,

        /// Do not report individual mismatching lines
        #[arg(short, long)]
        quiet: bool,
    },
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Generate {
            variant,
            seed,
            out_dir,
        } => {
            std::fs::create_dir_all(&out_dir)
                .with_context(|| format!("creating output directory {}", out_dir.display()))?;
            let mut config = GoldenConfig::new(variant).with_out_dir(out_dir);
            if let Some(seed) = seed {
                config = config.with_seed(seed);
            }
            let summary = generate(&config)
                .with_context(|| format!("generating {} vectors", variant))?;
            println!("Convolution results ({}): {:?}", summary.results, summary.results.values());
            for file in &summary.files {
                println!("  {}", file.display());
            }
        }
        Commands::Compare {
            software,
            hardware,
            quiet,
        } => {
            let options = CompareOptions {
                log_mismatches: !quiet,
            };
            let report = compare_files(&software, &hardware, options).with_context(|| {
                format!("comparing {} with {}", software.display(), hardware.display())
            })?;
            println!("{}", report);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
