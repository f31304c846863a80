// Sapling - Rust library for computing treedepth decompositions
//           of large sparse graphs
// Copyright (C) 2021 - Aleks Kissinger
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// A vertex id. Internal ids run from 0; the wire format is 1-based.
pub type V = usize;

/// An undirected simple graph, built once per instance and read-only during
/// construction and search.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    nhd: Vec<Vec<V>>,
    nume: usize,
}

impl Graph {
    pub fn new(num_vertices: usize) -> Graph {
        Graph {
            nhd: vec![Vec::new(); num_vertices],
            nume: 0,
        }
    }

    pub fn from_edges(num_vertices: usize, edges: &[(V, V)]) -> Graph {
        let mut g = Graph::new(num_vertices);
        for &(s, t) in edges {
            g.add_edge(s, t);
        }
        g
    }

    pub fn num_vertices(&self) -> usize {
        self.nhd.len()
    }

    pub fn num_edges(&self) -> usize {
        self.nume
    }

    pub fn add_edge(&mut self, s: V, t: V) {
        assert!(s != t, "self-loop at vertex {}", s);
        debug_assert!(!self.connected(s, t), "parallel edge {}-{}", s, t);
        self.nhd[s].push(t);
        self.nhd[t].push(s);
        self.nume += 1;
    }

    /// Get iterator over all vertices
    pub fn vertices(&self) -> impl Iterator<Item = V> {
        0..self.nhd.len()
    }

    /// Get iterator over all edges
    ///
    /// An "edge" is a pair (s, t), where s < t.
    pub fn edges(&self) -> impl Iterator<Item = (V, V)> + '_ {
        self.nhd.iter().enumerate().flat_map(|(s, nhd)| {
            nhd.iter()
                .filter_map(move |&t| if s < t { Some((s, t)) } else { None })
        })
    }

    pub fn neighbors(&self, v: V) -> &[V] {
        &self.nhd[v]
    }

    pub fn degree(&self, v: V) -> usize {
        self.nhd[v].len()
    }

    pub fn connected(&self, s: V, t: V) -> bool {
        self.nhd[s].contains(&t)
    }

    pub fn max_degree(&self) -> usize {
        self.nhd.iter().map(Vec::len).max().unwrap_or(0)
    }
}
