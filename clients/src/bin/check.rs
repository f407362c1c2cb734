//! `headtags-check`: Checks every UI declared in the TOML files of a directory.
//!
//! For each UI, resolves all head tag chains and evaluates the attributes
//! that do not depend on a generator. Configuration errors (unknown kinds,
//! meta-declaration cycles, missing required attributes) are failures;
//! declarations that produce no tag are warnings.
//!
//! **Usage:**
//! ```
//! headtags-check [--dir <path>]
//! ```
//!
//! Exits non-zero if any check fails.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;
use headtags::{check_dir, Severity};
use headtags_clients::builtin_catalog;

/// Check head tag declarations.
#[derive(Parser)]
#[command(name = "headtags-check", about = "Check head tag declarations in TOML files")]
struct Args {
    /// Directory searched for `*.toml` files (default: current directory).
    #[arg(long, default_value = ".")]
    dir: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env().init();

    let args = Args::parse();
    let report = check_dir(&args.dir, &builtin_catalog())?;

    println!("Head Tag Declaration Report");
    println!("===========================");
    println!();

    let mut passed = 0usize;
    let mut warned = 0usize;
    let mut failed = 0usize;

    for result in &report.results {
        let status = match result.severity {
            Severity::Pass => {
                passed += 1;
                "PASS"
            }
            Severity::Warning => {
                warned += 1;
                "WARN"
            }
            Severity::Failure => {
                failed += 1;
                "FAIL"
            }
        };
        println!("[{}] {} — {}", status, result.subject, result.message);
        for detail in &result.details {
            println!("       {}", detail);
        }
    }

    println!();
    println!(
        "Summary: {} passed, {} warnings, {} failed",
        passed, warned, failed
    );

    if failed > 0 {
        eprintln!("Check FAILED: {} declaration check(s) did not pass.", failed);
        process::exit(1);
    }

    println!("Check PASSED.");
    Ok(())
}
