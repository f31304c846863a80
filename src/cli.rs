//! The sapling command line interface.

use clap::{crate_version, Parser};

pub mod check;
pub mod solve;

/// CLI arguments.
#[derive(Parser, Debug)]
#[clap(version = crate_version!(), long_about = None)]
#[clap(about = "sapling command line interface")]
pub enum Cli {
    /// Compute treedepth decompositions.
    Solve(solve::SolveArgs),
    /// Validate a decomposition against its graph.
    Check(check::CheckArgs),
}

/// Error type for the CLI.
#[derive(Debug, derive_more::Display, derive_more::From)]
pub enum CliError {
    /// Error reading or writing files.
    #[display("IO error: {_0}")]
    Io(std::io::Error),
    /// Error parsing an input graph.
    #[display("{_0}")]
    Parse(crate::parse::ParseError),
    /// A decomposition failed validation.
    #[display("invalid decomposition: {_0}")]
    #[from(skip)]
    Invalid(String),
    /// Arguments that clap cannot rule out on its own.
    #[display("{_0}")]
    #[from(skip)]
    Usage(String),
    /// Some instances of a batch run failed.
    #[display("{_0} of {_1} instances failed")]
    #[from(skip)]
    Batch(usize, usize),
}

impl Cli {
    pub fn run(self) -> Result<(), CliError> {
        match self {
            Cli::Solve(args) => args.run(),
            Cli::Check(args) => args.run(),
        }
    }
}
