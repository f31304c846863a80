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

//! Constructors building an initial elimination tree from a graph.

pub mod layering;
pub mod split;

pub use layering::layering;

use crate::graph::Graph;
use crate::tree::ElimTree;

/// Chain all vertices in input order into a single branch. Valid for any
/// graph, O(V), and the upper bound the other constructors must beat.
pub fn path_decomp(g: &Graph) -> ElimTree {
    let n = g.num_vertices();
    let mut tree = ElimTree::new(n);
    if n == 0 {
        return tree;
    }
    for v in 1..n {
        tree.add_child(v - 1, v);
    }
    tree.set_root(0);
    tree
}
