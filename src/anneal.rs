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

//! Simulated annealing over elimination trees using reversible uproot moves.

use rand::Rng;

use crate::construct;
use crate::deadline::{Clock, Deadline};
use crate::graph::Graph;
use crate::tree::ElimTree;

/// Consecutive failed move draws after which the search concludes the
/// neighborhood is empty and stops early.
const MAX_STALLED_DRAWS: usize = 10_000;

pub struct TreedepthAnnealer<'a, R: Rng> {
    graph: &'a Graph,
    tree: ElimTree,
    rng: R,
    init_temp: f64,
    min_temp: f64,
    cooling_rate: f64,
    iters_per_temp: usize,
    max_iters: Option<usize>,
}

impl<'a, R: Rng> TreedepthAnnealer<'a, R> {
    /// Start from the trivial path decomposition.
    pub fn from_graph(graph: &'a Graph, rng: R) -> Self {
        let tree = construct::path_decomp(graph);
        Self::from_tree(graph, tree, rng)
    }

    pub fn from_tree(graph: &'a Graph, tree: ElimTree, rng: R) -> Self {
        Self {
            graph,
            tree,
            rng,
            init_temp: 2.0,
            min_temp: 0.05,
            cooling_rate: 0.99,
            iters_per_temp: 500,
            max_iters: None,
        }
    }

    pub fn set_init_temp(&mut self, init_temp: f64) {
        self.init_temp = init_temp;
    }

    pub fn set_min_temp(&mut self, min_temp: f64) {
        self.min_temp = min_temp;
    }

    pub fn set_cooling_rate(&mut self, cooling_rate: f64) {
        self.cooling_rate = cooling_rate;
    }

    pub fn set_iters_per_temp(&mut self, iters_per_temp: usize) {
        self.iters_per_temp = iters_per_temp;
    }

    pub fn set_max_iters(&mut self, max_iters: usize) {
        self.max_iters = Some(max_iters);
    }

    /// Anneal until the deadline (or the iteration cap, when set) and return
    /// the best tree seen. The current tree mutates in place; rejected moves
    /// are undone through their edit records, so a snapshot is only taken
    /// when the best score improves.
    pub fn run<C: Clock>(&mut self, deadline: &Deadline<C>) -> ElimTree {
        let mut score = self.tree.depth();
        let mut best = self.tree.clone();
        let mut best_score = score;
        if self.graph.num_vertices() < 2 {
            return best;
        }

        let init_score = score;
        let mut temp = self.init_temp;
        let mut iters = 0usize;
        let mut stalled = 0usize;

        while !deadline.expired() && self.max_iters.map_or(true, |m| iters < m) {
            iters += 1;
            let edits = match self.tree.random_uproot(self.graph, &mut self.rng) {
                Ok(edits) => {
                    stalled = 0;
                    edits
                }
                Err(_) => {
                    stalled += 1;
                    if stalled >= MAX_STALLED_DRAWS {
                        log::debug!("no valid moves after {} draws, stopping", stalled);
                        break;
                    }
                    continue;
                }
            };

            let new_score = self.tree.depth();
            let keep = new_score <= score
                || self
                    .rng
                    .random_bool(((score as f64 - new_score as f64) / temp).exp());

            if keep {
                score = new_score;
                if new_score < best_score {
                    best_score = new_score;
                    best = self.tree.clone();
                }
            } else {
                self.tree.undo(&edits);
            }

            if iters % self.iters_per_temp == 0 {
                temp *= self.cooling_rate;
                // sawtooth schedule: reheat instead of freezing
                if temp < self.min_temp {
                    temp = self.init_temp;
                }
            }
        }

        log::info!(
            "annealing: {} iterations, depth {} -> {}",
            iters,
            init_score,
            best_score
        );
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deadline::ManualClock;
    use rand::{rngs::SmallRng, SeedableRng};

    fn star(n_leaves: usize) -> Graph {
        let edges: Vec<_> = (1..=n_leaves).map(|v| (0, v)).collect();
        Graph::from_edges(n_leaves + 1, &edges)
    }

    #[test]
    fn improves_a_path_tree_over_a_star() {
        let g = star(9);
        let mut annealer = TreedepthAnnealer::from_graph(&g, SmallRng::seed_from_u64(1));
        annealer.set_max_iters(20_000);
        let best = annealer.run(&Deadline::unlimited());
        assert!(best.is_valid_for(&g));
        assert!(best.depth() < 10);
    }

    #[test]
    fn best_never_worse_than_initial() {
        let g = Graph::from_edges(
            7,
            &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 6), (6, 0), (1, 4)],
        );
        let init = construct::path_decomp(&g);
        let init_depth = init.depth();
        let mut annealer = TreedepthAnnealer::from_tree(&g, init, SmallRng::seed_from_u64(5));
        annealer.set_max_iters(5_000);
        let best = annealer.run(&Deadline::unlimited());
        assert!(best.depth() <= init_depth);
        assert!(best.is_valid_for(&g));
    }

    #[test]
    fn restarting_from_best_does_not_regress() {
        let g = star(6);
        let mut annealer = TreedepthAnnealer::from_graph(&g, SmallRng::seed_from_u64(11));
        annealer.set_max_iters(5_000);
        let best = annealer.run(&Deadline::unlimited());
        let d1 = best.depth();
        let mut second = TreedepthAnnealer::from_tree(&g, best, SmallRng::seed_from_u64(12));
        second.set_max_iters(5_000);
        let again = second.run(&Deadline::unlimited());
        assert!(again.depth() <= d1);
    }

    #[test]
    fn expired_deadline_returns_initial_tree() {
        let g = star(4);
        let init = construct::path_decomp(&g);
        let mut annealer = TreedepthAnnealer::from_tree(&g, init.clone(), SmallRng::seed_from_u64(3));
        let clock = ManualClock::new();
        let best = annealer.run(&Deadline::new(&clock, 0.0));
        assert_eq!(best.depth(), init.depth());
        for v in g.vertices() {
            assert_eq!(best.parent(v), init.parent(v));
        }
    }

    #[test]
    fn single_vertex_graph_is_returned_untouched() {
        let g = Graph::new(1);
        let mut tree = ElimTree::new(1);
        tree.set_root(0);
        let mut annealer = TreedepthAnnealer::from_tree(&g, tree, SmallRng::seed_from_u64(0));
        let best = annealer.run(&Deadline::unlimited());
        assert_eq!(best.depth(), 1);
    }
}
