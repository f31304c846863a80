//! The `check` CLI subcommand.

use clap::Parser;
use std::fs;
use std::path::PathBuf;

use crate::graph::Graph;
use crate::tree::ElimTree;

use super::CliError;

/// Validate a treedepth decomposition against its graph.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Graph file in `.gr` format.
    graph: PathBuf,
    /// Decomposition file: depth, then one 1-based parent id per vertex
    /// (0 for the root).
    decomp: PathBuf,
}

impl CheckArgs {
    /// Run the `check` command using the provided arguments.
    pub fn run(self) -> Result<(), CliError> {
        let g = Graph::from_file(&self.graph)?;
        let text = fs::read_to_string(&self.decomp)?;
        let depth = verify(&g, &text).map_err(CliError::Invalid)?;
        println!("valid decomposition of depth {depth}");
        Ok(())
    }
}

/// Parse a wire-format decomposition and check it is a single rooted tree
/// over the graph's vertex set, covers every edge, and states its depth
/// correctly. Returns the depth.
fn verify(g: &Graph, text: &str) -> Result<usize, String> {
    let n = g.num_vertices();
    let mut lines = text.lines();
    let claimed: usize = lines
        .next()
        .ok_or("empty file")?
        .trim()
        .parse()
        .map_err(|_| "first line is not a depth".to_string())?;

    let mut tree = ElimTree::new(n);
    let mut root = None;
    for v in 0..n {
        let line = lines
            .next()
            .ok_or_else(|| format!("missing parent line for vertex {}", v + 1))?;
        let p: usize = line
            .trim()
            .parse()
            .map_err(|_| format!("bad parent line for vertex {}", v + 1))?;
        if p == 0 {
            if root.replace(v).is_some() {
                return Err("more than one root".into());
            }
        } else if p > n {
            return Err(format!("parent {} of vertex {} out of range", p, v + 1));
        } else if p - 1 == v {
            return Err(format!("vertex {} is its own parent", v + 1));
        } else {
            tree.add_child(p - 1, v);
        }
    }
    if lines.any(|l| !l.trim().is_empty()) {
        return Err("trailing content after the parent lines".into());
    }

    let root = root.ok_or("no root")?;
    tree.set_root(root);
    if !tree.is_valid_for(g) {
        return Err("tree is cyclic or does not cover every edge".into());
    }
    if tree.depth() != claimed {
        return Err(format!(
            "claimed depth {} but actual depth is {}",
            claimed,
            tree.depth()
        ));
    }
    Ok(claimed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p5() -> Graph {
        Graph::from_edges(5, &[(0, 1), (1, 2), (2, 3), (3, 4)])
    }

    #[test]
    fn accepts_a_valid_decomposition() {
        // root 3, children 2 and 4, then 1 under 2 and 5 under 4
        assert_eq!(verify(&p5(), "3\n2\n3\n0\n3\n4\n"), Ok(3));
    }

    #[test]
    fn rejects_wrong_depth_claim() {
        let err = verify(&p5(), "4\n2\n3\n0\n3\n4\n").unwrap_err();
        assert!(err.contains("claimed depth 4"));
    }

    #[test]
    fn rejects_uncovered_edge() {
        // a chain 1-2-3-4-5 rooted at 1 covers the path, but rooting each
        // vertex at vertex 1 does not cover edge (3, 4)
        let err = verify(&p5(), "2\n0\n1\n1\n1\n1\n").unwrap_err();
        assert!(err.contains("cover"));
    }

    #[test]
    fn rejects_multiple_roots() {
        let err = verify(&p5(), "3\n0\n0\n2\n3\n4\n").unwrap_err();
        assert!(err.contains("more than one root"));
    }

    #[test]
    fn rejects_cycle() {
        let err = verify(&p5(), "3\n2\n1\n2\n3\n0\n").unwrap_err();
        assert!(err.contains("cyclic"));
    }

    #[test]
    fn rejects_truncated_file() {
        let err = verify(&p5(), "3\n2\n3\n0\n").unwrap_err();
        assert!(err.contains("missing parent line"));
    }
}
