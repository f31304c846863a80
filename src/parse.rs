//! Reader for line-oriented `.gr` graph files.
//!
//! Lines starting with `c` are comments. A single `p <format> <vertices>
//! <edges>` line precedes exactly that many `u v` edge lines with 1-based
//! vertex ids. Duplicate edges are tolerated; self-loops are not.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use rustc_hash::FxHashSet;

use crate::graph::{Graph, V};

/// Error type for graph input. Malformed input aborts the instance being
/// read and nothing else.
#[derive(Debug, derive_more::Display, derive_more::From)]
pub enum ParseError {
    /// Error reading the input.
    #[display("IO error: {_0}")]
    Io(io::Error),
    /// The problem line is not `p <format> <vertices> <edges>`.
    #[display("line {_0}: expected 'p <format> <vertices> <edges>'")]
    #[from(skip)]
    BadProblemLine(usize),
    /// More than one problem line.
    #[display("line {_0}: second problem line")]
    #[from(skip)]
    SecondProblemLine(usize),
    /// An edge appeared before the problem line.
    #[display("line {_0}: edge before the problem line")]
    #[from(skip)]
    EdgeBeforeProblemLine(usize),
    /// An edge line is not two integers.
    #[display("line {_0}: expected an edge 'u v'")]
    #[from(skip)]
    BadEdge(usize),
    /// An edge endpoint is not a declared vertex.
    #[display("line {_0}: vertex {_1} out of range 1..={_2}")]
    #[from(skip)]
    VertexOutOfRange(usize, usize, usize),
    /// An edge joins a vertex to itself.
    #[display("line {_0}: self-loop at vertex {_1}")]
    #[from(skip)]
    SelfLoop(usize, usize),
    /// The number of edge lines does not match the problem line.
    #[display("{_0} edges declared but {_1} found")]
    #[from(skip)]
    WrongEdgeCount(usize, usize),
    /// No problem line at all.
    #[display("missing problem line")]
    MissingProblemLine,
}

/// Read a graph from `.gr`-formatted text.
pub fn read_graph(reader: impl BufRead) -> Result<Graph, ParseError> {
    let mut graph: Option<Graph> = None;
    let mut declared = 0usize;
    let mut edge_lines = 0usize;
    let mut seen: FxHashSet<(V, V)> = FxHashSet::default();

    for (i, line) in reader.lines().enumerate() {
        let lineno = i + 1;
        let line = line?;
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('c') {
            continue;
        }
        let mut tokens = trimmed.split_whitespace();
        let head = tokens.next().expect("non-empty line has a token");
        if head == "p" {
            if graph.is_some() {
                return Err(ParseError::SecondProblemLine(lineno));
            }
            let _format = tokens.next().ok_or(ParseError::BadProblemLine(lineno))?;
            let nv: usize = tokens
                .next()
                .and_then(|t| t.parse().ok())
                .ok_or(ParseError::BadProblemLine(lineno))?;
            let ne: usize = tokens
                .next()
                .and_then(|t| t.parse().ok())
                .ok_or(ParseError::BadProblemLine(lineno))?;
            if tokens.next().is_some() {
                return Err(ParseError::BadProblemLine(lineno));
            }
            declared = ne;
            graph = Some(Graph::new(nv));
        } else {
            let Some(g) = graph.as_mut() else {
                return Err(ParseError::EdgeBeforeProblemLine(lineno));
            };
            let u: usize = head.parse().map_err(|_| ParseError::BadEdge(lineno))?;
            let v: usize = tokens
                .next()
                .and_then(|t| t.parse().ok())
                .ok_or(ParseError::BadEdge(lineno))?;
            if tokens.next().is_some() {
                return Err(ParseError::BadEdge(lineno));
            }
            let n = g.num_vertices();
            for x in [u, v] {
                if x == 0 || x > n {
                    return Err(ParseError::VertexOutOfRange(lineno, x, n));
                }
            }
            if u == v {
                return Err(ParseError::SelfLoop(lineno, u));
            }
            edge_lines += 1;
            let (a, b) = (u - 1, v - 1);
            let key = if a < b { (a, b) } else { (b, a) };
            if seen.insert(key) {
                g.add_edge(a, b);
            }
        }
    }

    let graph = graph.ok_or(ParseError::MissingProblemLine)?;
    if edge_lines != declared {
        return Err(ParseError::WrongEdgeCount(declared, edge_lines));
    }
    Ok(graph)
}

impl Graph {
    /// Read a graph from a `.gr` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Graph, ParseError> {
        read_graph(BufReader::new(File::open(path)?))
    }
}
