//! The `solve` CLI subcommand.

use clap::{Parser, ValueEnum};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::fs;
use std::io;
use std::path::PathBuf;

use crate::anneal::TreedepthAnnealer;
use crate::construct::{self, split};
use crate::deadline::Deadline;
use crate::graph::Graph;
use crate::parse::{self, ParseError};
use crate::tree::ElimTree;

use super::CliError;

/// Largest instance the exponential exhaustive split is attempted on in
/// `auto` mode.
const EXHAUSTIVE_MAX_VERTICES: usize = 12;
/// Largest instance the O(V^3) pivot hints are computed for.
const HINTS_MAX_VERTICES: usize = 512;
/// Above this, construction goes straight to layering.
const SPLIT_MAX_VERTICES: usize = 200_000;

/// Compute treedepth decompositions of one or more graphs.
#[derive(Parser, Debug)]
pub struct SolveArgs {
    /// Graph files in `.gr` format; reads one instance from stdin when empty.
    inputs: Vec<PathBuf>,

    /// Wall-clock budget per instance, in seconds.
    #[arg(long, short, default_value_t = 30.0)]
    budget: f64,

    /// Seed for the annealer; drawn from the OS when not set.
    #[arg(long)]
    seed: Option<u64>,

    /// Write the decomposition to a file instead of stdout (single input
    /// only).
    #[arg(long, short)]
    out: Option<PathBuf>,

    /// Construction heuristic. `auto` picks by instance size.
    #[arg(long, value_enum, default_value_t = Construction::Auto)]
    construct: Construction,

    /// Skip the simulated-annealing improvement phase.
    #[arg(long)]
    no_anneal: bool,
}

/// Which constructor seeds the search.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Construction {
    Auto,
    Path,
    Split,
    Exhaustive,
    Layering,
}

impl SolveArgs {
    /// Run the `solve` command using the provided arguments.
    ///
    /// Each input is an independent instance: a failure aborts that instance
    /// only, and its output is never partially emitted.
    pub fn run(self) -> Result<(), CliError> {
        if self.inputs.len() > 1 && self.out.is_some() {
            return Err(CliError::Usage(
                "--out can only be used with a single input".into(),
            ));
        }

        let mut results: Vec<Result<String, ParseError>> = Vec::new();
        if self.inputs.is_empty() {
            results.push(parse::read_graph(io::stdin().lock()).map(|g| self.solve_one(&g)));
        } else {
            for path in &self.inputs {
                let res = Graph::from_file(path).map(|g| self.solve_one(&g));
                if let Err(e) = &res {
                    if self.inputs.len() > 1 {
                        eprintln!("{}: {}", path.display(), e);
                    }
                }
                results.push(res);
            }
        }

        let total = results.len();
        let mut failed = 0;
        let mut first_err: Option<ParseError> = None;
        for res in results {
            match res {
                Ok(text) => match &self.out {
                    Some(path) => fs::write(path, text)?,
                    None => print!("{text}"),
                },
                Err(e) => {
                    failed += 1;
                    first_err.get_or_insert(e);
                }
            }
        }

        match first_err {
            None => Ok(()),
            Some(e) if total == 1 => Err(e.into()),
            Some(_) => Err(CliError::Batch(failed, total)),
        }
    }

    fn solve_one(&self, g: &Graph) -> String {
        let deadline = Deadline::wall(self.budget);
        let n = g.num_vertices();
        let mut tree = construct::path_decomp(g);
        log::info!(
            "instance: {} vertices, {} edges; path depth {}",
            n,
            g.num_edges(),
            tree.depth()
        );

        let hints = (self.wants_split() && n > 0 && n <= HINTS_MAX_VERTICES)
            .then(|| split::SplitHints::compute(g));

        let mut candidates: Vec<(&str, ElimTree)> = Vec::new();
        match self.construct {
            Construction::Path => {}
            Construction::Split => {
                candidates.push(("split", split::fast(g, &deadline, hints.as_ref())));
            }
            Construction::Exhaustive => {
                candidates.push((
                    "exhaustive split",
                    split::exhaustive(g, &deadline, hints.as_ref()),
                ));
            }
            Construction::Layering => {
                candidates.push(("layering", construct::layering(g, &deadline)));
            }
            Construction::Auto => {
                if n <= EXHAUSTIVE_MAX_VERTICES {
                    candidates.push((
                        "exhaustive split",
                        split::exhaustive(g, &deadline, hints.as_ref()),
                    ));
                } else if n <= SPLIT_MAX_VERTICES {
                    candidates.push(("split", split::fast(g, &deadline, hints.as_ref())));
                }
                if !deadline.expired() {
                    candidates.push(("layering", construct::layering(g, &deadline)));
                }
            }
        }

        for (name, cand) in candidates {
            let d = cand.depth();
            log::info!("{} construction: depth {}", name, d);
            if d < tree.depth() {
                tree = cand;
            }
        }

        if !self.no_anneal && !deadline.expired() {
            let rng = match self.seed {
                Some(s) => SmallRng::seed_from_u64(s),
                None => SmallRng::from_os_rng(),
            };
            let mut annealer = TreedepthAnnealer::from_tree(g, tree, rng);
            tree = annealer.run(&deadline);
        }

        log::info!("final depth {}", tree.depth());
        tree.serialize()
    }

    fn wants_split(&self) -> bool {
        matches!(
            self.construct,
            Construction::Auto | Construction::Split | Construction::Exhaustive
        )
    }
}
