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

//! Bottom-up layered construction: repeatedly eliminate a maximal
//! independent set of the reduced graph, connecting survivors that shared an
//! eliminated neighbor, until the remainder is empty or complete.
//!
//! Each eliminated vertex is later adopted as a child of the first of its
//! surviving reduced-graph neighbors to be eliminated, which is the classic
//! elimination-ordering parent rule and keeps every edge on an
//! ancestor/descendant pair.

use itertools::Itertools;
use rustc_hash::FxHashSet;

use crate::deadline::{Clock, Deadline};
use crate::graph::{Graph, V};
use crate::tree::ElimTree;

pub fn layering<C: Clock>(g: &Graph, deadline: &Deadline<C>) -> ElimTree {
    let n = g.num_vertices();
    let mut tree = ElimTree::new(n);
    if n == 0 {
        return tree;
    }

    // reduced graph; fill-in inserts edges, so rows are sets
    let mut adj: Vec<FxHashSet<V>> = g
        .vertices()
        .map(|v| g.neighbors(v).iter().copied().collect())
        .collect();
    let mut live_edges = g.num_edges();
    let mut alive: Vec<V> = g.vertices().collect();
    // per survivor, eliminated vertices waiting for it to become their parent
    let mut waiting: Vec<Vec<V>> = vec![Vec::new(); n];
    let mut eliminated = vec![false; n];
    let mut top: Option<V> = None;

    loop {
        let m = alive.len();
        if m == 0 {
            break;
        }
        if live_edges == m * (m - 1) / 2 || deadline.expired() {
            top = Some(close_with_path(&mut tree, &alive, &waiting));
            break;
        }

        // greedy maximal independent set over ascending reduced degree
        let order: Vec<V> = alive
            .iter()
            .copied()
            .sorted_by_key(|&v| (adj[v].len(), v))
            .collect();
        let mut layer: Vec<V> = Vec::new();
        for &v in &order {
            if adj[v].iter().all(|&u| !eliminated[u]) {
                eliminated[v] = true;
                layer.push(v);
            }
        }
        for &v in &order {
            if !eliminated[v] && !adj[v].is_empty() && adj[v].iter().all(|&u| !eliminated[u]) {
                panic!(
                    "vertex {} survived a maximal independent-set pass with no eliminated neighbor",
                    v
                );
            }
        }

        for &p in &layer {
            // adopt anything recorded against p in earlier layers
            for &c in &waiting[p] {
                if tree.parent(c).is_none() {
                    tree.add_child(p, c);
                }
            }
            // p's reduced neighbors all survive; the first of them to be
            // eliminated becomes p's parent
            for &u in &adj[p] {
                waiting[u].push(p);
            }
        }

        // fill-in: survivors sharing an eliminated neighbor become adjacent,
        // then the layer's rows are dropped
        for &p in &layer {
            let nbrs: Vec<V> = adj[p].iter().copied().collect();
            for (i, &a) in nbrs.iter().enumerate() {
                for &b in &nbrs[i + 1..] {
                    if adj[a].insert(b) {
                        adj[b].insert(a);
                        live_edges += 1;
                    }
                }
            }
            for &u in &nbrs {
                adj[u].remove(&p);
                live_edges -= 1;
            }
            adj[p].clear();
            top = Some(p);
        }
        alive.retain(|&v| !eliminated[v]);
        log::debug!(
            "layer eliminated {} vertices, {} remain ({} reduced edges)",
            layer.len(),
            alive.len(),
            live_edges
        );
    }

    let root = top.expect("at least one vertex was eliminated");
    // unadopted subtree tops (disconnected components) fold under the root
    for v in g.vertices() {
        if v != root && tree.parent(v).is_none() {
            tree.add_child(root, v);
        }
    }
    tree.set_root(root);
    tree
}

/// Eliminate the remaining vertices as a single chain attached above
/// everything built so far, adopting waiting children along the way. Used
/// when the reduced graph is complete and on deadline expiry.
fn close_with_path(tree: &mut ElimTree, alive: &[V], waiting: &[Vec<V>]) -> V {
    let mut prev: Option<V> = None;
    for &v in alive {
        for &c in &waiting[v] {
            if tree.parent(c).is_none() {
                tree.add_child(v, c);
            }
        }
        if let Some(p) = prev {
            tree.add_child(v, p);
        }
        prev = Some(v);
    }
    prev.expect("path closure over a non-empty remainder")
}
