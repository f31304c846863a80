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

//! Recursive-split construction: eliminate a pivot, partition the remainder
//! into connected components, recurse per component.
//!
//! The fast variant picks one pivot greedily per step and runs on an
//! explicit work stack. The exhaustive variant tries every pivot of a
//! component and keeps the shallowest result; it is exponential and only
//! meant for small instances under a deadline.

use rustc_hash::FxHashSet;

use crate::analysis;
use crate::deadline::{Clock, Deadline};
use crate::graph::{Graph, V};
use crate::tree::ElimTree;

/// Precomputed per-vertex pivot tie-breakers: articulation membership and
/// center resemblance. Computing them costs O(V^3), so callers only supply
/// hints for small instances.
#[derive(Debug, Clone)]
pub struct SplitHints {
    resemblance: Vec<usize>,
    cut: Vec<bool>,
}

impl SplitHints {
    pub fn compute(g: &Graph) -> Self {
        let resemblance = analysis::center_resemblance(g);
        let mut cut = vec![false; g.num_vertices()];
        let mut seen = FxHashSet::default();
        for v in g.vertices() {
            if seen.contains(&v) {
                continue;
            }
            analysis::find_all(g, v, |_| true, &mut seen);
            for a in analysis::articulation_points(g, v) {
                cut[a] = true;
            }
        }
        SplitHints { resemblance, cut }
    }

    fn key(&self, v: V) -> (bool, usize) {
        (self.cut[v], self.resemblance[v])
    }
}

fn restricted_degree(g: &Graph, v: V, eliminated: &FxHashSet<V>) -> usize {
    g.neighbors(v)
        .iter()
        .filter(|u| !eliminated.contains(u))
        .count()
}

/// The vertex of `comp` with maximum degree restricted to the non-eliminated
/// vertices; ties fall to articulation points, then to the most central
/// vertex when hints are available, then to the first seen.
fn pick_pivot(g: &Graph, comp: &[V], eliminated: &FxHashSet<V>, hints: Option<&SplitHints>) -> V {
    let key = |v: V| {
        (
            restricted_degree(g, v, eliminated),
            hints.map_or((false, 0), |h| h.key(v)),
        )
    };
    let mut best = comp[0];
    let mut best_key = key(best);
    for &v in &comp[1..] {
        let k = key(v);
        if k > best_key {
            best = v;
            best_key = k;
        }
    }
    best
}

/// The ancestor set a component hangs below: `attach` and everything above
/// it. These are exactly the eliminated vertices a component member can be
/// adjacent to.
fn ancestor_chain(tree: &ElimTree, attach: Option<V>) -> FxHashSet<V> {
    let mut chain = FxHashSet::default();
    let mut cur = attach;
    while let Some(v) = cur {
        chain.insert(v);
        cur = tree.parent(v);
    }
    chain
}

/// Attach `comp` as a chain below `attach`; the cheap closure used once the
/// deadline has fired.
fn chain(tree: &mut ElimTree, comp: &[V], attach: Option<V>, root: &mut Option<V>) {
    let mut prev = attach;
    for &v in comp {
        match prev {
            Some(p) => tree.add_child(p, v),
            None => {
                tree.set_root(v);
                *root = Some(v);
            }
        }
        prev = Some(v);
    }
}

/// Greedy recursive split over an explicit work stack. Deadline is polled
/// once per frame; expired frames close as chains.
pub fn fast<C: Clock>(g: &Graph, deadline: &Deadline<C>, hints: Option<&SplitHints>) -> ElimTree {
    let n = g.num_vertices();
    let mut tree = ElimTree::new(n);
    if n == 0 {
        return tree;
    }

    let mut seen = FxHashSet::default();
    let mut comps = Vec::new();
    for v in g.vertices() {
        if !seen.contains(&v) {
            comps.push(analysis::find_all(g, v, |_| true, &mut seen));
        }
    }

    let mut root: Option<V> = None;
    let mut stack: Vec<(Vec<V>, Option<V>)> = Vec::new();
    for comp in comps.into_iter().rev() {
        stack.push((comp, None));
    }

    while let Some((comp, parent)) = stack.pop() {
        // disconnected components fold under the first root
        let attach = parent.or(root);
        if deadline.expired() {
            chain(&mut tree, &comp, attach, &mut root);
            continue;
        }
        let eliminated = ancestor_chain(&tree, attach);
        let pivot = pick_pivot(g, &comp, &eliminated, hints);
        match attach {
            Some(p) => tree.add_child(p, pivot),
            None => {
                tree.set_root(pivot);
                root = Some(pivot);
            }
        }
        if comp.len() == 1 {
            continue;
        }
        let mut visited = eliminated;
        visited.insert(pivot);
        for &s in &comp {
            if !visited.contains(&s) {
                let sub = analysis::find_all(g, s, |_| true, &mut visited);
                stack.push((sub, Some(pivot)));
            }
        }
    }
    tree
}

/// Exhaustive recursive split: evaluate every vertex of every component as a
/// pivot and keep the shallowest subtree. Falls back to the greedy pivot as
/// soon as the deadline fires.
pub fn exhaustive<C: Clock>(
    g: &Graph,
    deadline: &Deadline<C>,
    hints: Option<&SplitHints>,
) -> ElimTree {
    let n = g.num_vertices();
    let mut tree = ElimTree::new(n);
    if n == 0 {
        return tree;
    }

    let mut seen = FxHashSet::default();
    let mut root: Option<V> = None;
    for v in g.vertices() {
        if seen.contains(&v) {
            continue;
        }
        let comp = analysis::find_all(g, v, |_| true, &mut seen);
        let mut ancestors = ancestor_chain(&tree, root);
        let (sub_root, edges, _) = best_subtree(g, &comp, &mut ancestors, deadline, hints);
        match root {
            None => {
                tree.set_root(sub_root);
                root = Some(sub_root);
            }
            Some(r) => tree.add_child(r, sub_root),
        }
        for (parent, child) in edges {
            tree.add_child(parent, child);
        }
    }
    tree
}

/// Minimum-depth subtree over `comp`: returns its root, its (parent, child)
/// edges, and its depth.
fn best_subtree<C: Clock>(
    g: &Graph,
    comp: &[V],
    ancestors: &mut FxHashSet<V>,
    deadline: &Deadline<C>,
    hints: Option<&SplitHints>,
) -> (V, Vec<(V, V)>, usize) {
    if comp.len() == 1 {
        return (comp[0], Vec::new(), 1);
    }

    let candidates: Vec<V> = if deadline.expired() {
        vec![pick_pivot(g, comp, ancestors, hints)]
    } else {
        comp.to_vec()
    };

    let mut best: Option<(V, Vec<(V, V)>, usize)> = None;
    for p in candidates {
        let (edges, depth) = subtrees_under(g, comp, p, ancestors, deadline, hints);
        if best.as_ref().map_or(true, |b| depth < b.2) {
            best = Some((p, edges, depth));
        }
        if deadline.expired() {
            break;
        }
    }
    best.expect("component is non-empty")
}

fn subtrees_under<C: Clock>(
    g: &Graph,
    comp: &[V],
    pivot: V,
    ancestors: &mut FxHashSet<V>,
    deadline: &Deadline<C>,
    hints: Option<&SplitHints>,
) -> (Vec<(V, V)>, usize) {
    ancestors.insert(pivot);
    let mut visited = ancestors.clone();
    let mut edges = Vec::new();
    let mut deepest = 0;
    for &s in comp {
        if s != pivot && !visited.contains(&s) {
            let sub = analysis::find_all(g, s, |_| true, &mut visited);
            let (r, es, d) = best_subtree(g, &sub, ancestors, deadline, hints);
            edges.push((pivot, r));
            edges.extend(es);
            deepest = deepest.max(d);
        }
    }
    ancestors.remove(&pivot);
    (edges, deepest + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deadline::ManualClock;
    use itertools::Itertools;

    fn path_graph(n: usize) -> Graph {
        Graph::from_edges(n, &(0..n).tuple_windows().collect_vec())
    }

    #[test]
    fn fast_with_hints_splits_path_at_center() {
        let g = path_graph(5);
        let hints = SplitHints::compute(&g);
        let tree = fast(&g, &Deadline::unlimited(), Some(&hints));
        assert_eq!(tree.root(), Some(2));
        let top: Vec<V> = tree.children(2).iter().copied().sorted().collect();
        assert_eq!(top, vec![1, 3]);
        assert_eq!(tree.children(1), &[0]);
        assert_eq!(tree.children(3), &[4]);
        assert_eq!(tree.depth(), 3);
        assert!(tree.is_valid_for(&g));
    }

    #[test]
    fn fast_roots_star_at_center() {
        let g = Graph::from_edges(6, &[(0, 1), (0, 2), (0, 3), (0, 4), (0, 5)]);
        let tree = fast(&g, &Deadline::unlimited(), None);
        assert_eq!(tree.root(), Some(0));
        assert_eq!(tree.depth(), 2);
        assert!(tree.is_valid_for(&g));
    }

    #[test]
    fn fast_folds_disconnected_components() {
        let g = Graph::from_edges(6, &[(0, 1), (1, 2), (3, 4), (4, 5)]);
        let tree = fast(&g, &Deadline::unlimited(), None);
        assert!(tree.is_valid_for(&g));
        // one root, both components below it
        let root = tree.root().unwrap();
        for v in g.vertices() {
            assert_eq!(tree.root_from(v), root);
        }
    }

    #[test]
    fn fast_expired_deadline_chains() {
        let g = path_graph(6);
        let clock = ManualClock::new();
        clock.set(10.0);
        let tree = fast(&g, &Deadline::new(&clock, 5.0), None);
        assert_eq!(tree.depth(), 6);
        assert!(tree.is_valid_for(&g));
    }

    #[test]
    fn exhaustive_finds_optimal_path_depth() {
        // treedepth of P7 is 3: root the middle, recurse on both halves
        let g = path_graph(7);
        let tree = exhaustive(&g, &Deadline::unlimited(), None);
        assert_eq!(tree.depth(), 3);
        assert!(tree.is_valid_for(&g));
    }

    #[test]
    fn exhaustive_on_cycle() {
        let g = Graph::from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]);
        let tree = exhaustive(&g, &Deadline::unlimited(), None);
        assert_eq!(tree.depth(), 3);
        assert!(tree.is_valid_for(&g));
    }

    #[test]
    fn exhaustive_expired_deadline_matches_greedy() {
        let g = path_graph(8);
        let clock = ManualClock::new();
        clock.set(1.0);
        let tree = exhaustive(&g, &Deadline::new(&clock, 0.5), None);
        assert!(tree.is_valid_for(&g));
    }

    #[test]
    fn hints_mark_shared_triangle_vertex() {
        let g = Graph::from_edges(5, &[(0, 1), (1, 2), (0, 2), (2, 3), (3, 4), (2, 4)]);
        let hints = SplitHints::compute(&g);
        assert!(hints.cut[2]);
        assert!(!hints.cut[0]);
    }
}
