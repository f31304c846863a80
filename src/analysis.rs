//! Graph traversal and analysis routines used by the constructors.
//!
//! Everything here is iterative; the instances this crate targets are far too
//! deep for call-stack recursion.

use rustc_hash::FxHashSet;

use crate::graph::{Graph, V};

/// A traversal or move generator could not satisfy its predicate. The only
/// retryable condition in the crate; callers redraw or fall back rather than
/// aborting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
#[display("no candidate vertex found")]
pub struct NoCandidateFound;

/// Depth-first search from `start`, returning the first reachable vertex
/// satisfying `pred`. Each vertex is visited at most once.
pub fn find_first(
    g: &Graph,
    start: V,
    mut pred: impl FnMut(V) -> bool,
) -> Result<V, NoCandidateFound> {
    let mut seen = FxHashSet::default();
    let mut stack = vec![start];
    seen.insert(start);
    while let Some(v) = stack.pop() {
        if pred(v) {
            return Ok(v);
        }
        for &n in g.neighbors(v) {
            if seen.insert(n) {
                stack.push(n);
            }
        }
    }
    Err(NoCandidateFound)
}

/// Depth-first search from `start`, collecting every reachable vertex
/// satisfying `pred`. Vertices already in `visited` are neither collected nor
/// crossed, and every vertex reached is inserted into `visited`; seeding
/// `visited` with an eliminated set partitions the remainder into connected
/// components, one call per component. Result order is not guaranteed.
pub fn find_all(
    g: &Graph,
    start: V,
    mut pred: impl FnMut(V) -> bool,
    visited: &mut FxHashSet<V>,
) -> Vec<V> {
    let mut found = Vec::new();
    if !visited.insert(start) {
        return found;
    }
    let mut stack = vec![start];
    while let Some(v) = stack.pop() {
        if pred(v) {
            found.push(v);
        }
        for &n in g.neighbors(v) {
            if !visited.contains(&n) {
                visited.insert(n);
                stack.push(n);
            }
        }
    }
    found
}

/// Articulation points of the connected component containing `start`,
/// computed with a lowpoint DFS over an explicit frame stack. `start` is a
/// cut vertex iff it has more than one DFS child; any other vertex iff some
/// child's low-link is not below its own discovery time. Call once per
/// component for disconnected graphs.
pub fn articulation_points(g: &Graph, start: V) -> Vec<V> {
    let n = g.num_vertices();
    // discovery times start at 1, so 0 doubles as "unvisited"
    let mut disc = vec![0usize; n];
    let mut low = vec![0usize; n];
    let mut is_cut = vec![false; n];
    let mut time = 1usize;
    let mut root_children = 0usize;

    disc[start] = time;
    low[start] = time;
    // frames: (vertex, DFS parent, index of next neighbor to try)
    let mut stack: Vec<(V, Option<V>, usize)> = vec![(start, None, 0)];

    while let Some(frame) = stack.last_mut() {
        let (v, parent, i) = *frame;
        if i < g.degree(v) {
            frame.2 += 1;
            let u = g.neighbors(v)[i];
            if Some(u) == parent {
                continue;
            }
            if disc[u] == 0 {
                time += 1;
                disc[u] = time;
                low[u] = time;
                if v == start {
                    root_children += 1;
                }
                stack.push((u, Some(v), 0));
            } else {
                low[v] = low[v].min(disc[u]);
            }
        } else {
            stack.pop();
            if let Some(p) = parent {
                low[p] = low[p].min(low[v]);
                if p != start && low[v] >= disc[p] {
                    is_cut[p] = true;
                }
            }
        }
    }

    if root_children > 1 {
        is_cut[start] = true;
    }
    (0..n).filter(|&v| is_cut[v]).collect()
}

/// All-pairs shortest path lengths over unit-weight edges (Floyd-Warshall).
/// Unreachable pairs get |V| + 1, which exceeds any real path length.
/// O(V^3); only worth running on small instances.
pub fn distances(g: &Graph) -> Vec<Vec<usize>> {
    let n = g.num_vertices();
    let unreachable = n + 1;
    let mut d = vec![vec![unreachable; n]; n];
    for v in 0..n {
        d[v][v] = 0;
    }
    for (s, t) in g.edges() {
        d[s][t] = 1;
        d[t][s] = 1;
    }
    for k in 0..n {
        for i in 0..n {
            if d[i][k] == unreachable {
                continue;
            }
            for j in 0..n {
                let through = d[i][k] + d[k][j];
                if through < d[i][j] {
                    d[i][j] = through;
                }
            }
        }
    }
    d
}

/// For each vertex, (maximum eccentricity over all vertices) minus (the
/// vertex's own eccentricity). Higher means closer to the graph center.
pub fn center_resemblance(g: &Graph) -> Vec<usize> {
    let d = distances(g);
    let ecc: Vec<usize> = d
        .iter()
        .map(|row| row.iter().copied().max().unwrap_or(0))
        .collect();
    let max_ecc = ecc.iter().copied().max().unwrap_or(0);
    ecc.iter().map(|&e| max_ecc - e).collect()
}

/// A vertex minimizing its maximum distance to all others.
pub fn center(g: &Graph) -> Option<V> {
    let res = center_resemblance(g);
    g.vertices().max_by_key(|&v| (res[v], std::cmp::Reverse(v)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    fn path(n: usize) -> Graph {
        Graph::from_edges(n, &(0..n).tuple_windows().collect_vec())
    }

    #[test]
    fn find_first_by_degree() {
        let g = path(5);
        assert_eq!(find_first(&g, 0, |v| g.degree(v) == 2), Ok(1));
        assert_eq!(find_first(&g, 0, |v| g.degree(v) > 2), Err(NoCandidateFound));
    }

    #[test]
    fn find_all_partitions_after_pivot() {
        let g = path(5);
        // eliminating vertex 2 splits the path in two
        let mut visited = FxHashSet::from_iter([2]);
        let mut left = find_all(&g, 0, |_| true, &mut visited);
        left.sort();
        assert_eq!(left, vec![0, 1]);
        let mut right = find_all(&g, 4, |_| true, &mut visited);
        right.sort();
        assert_eq!(right, vec![3, 4]);
        // both sides are now recorded as visited
        assert!(find_all(&g, 1, |_| true, &mut visited).is_empty());
    }

    #[test]
    fn articulation_of_shared_triangles() {
        // two triangles sharing exactly vertex 2
        let g = Graph::from_edges(5, &[(0, 1), (1, 2), (0, 2), (2, 3), (3, 4), (2, 4)]);
        assert_eq!(articulation_points(&g, 0), vec![2]);
    }

    #[test]
    fn articulation_of_path_interior() {
        let g = path(4);
        assert_eq!(articulation_points(&g, 0), vec![1, 2]);
        // root-with-two-children case: start in the middle
        assert_eq!(articulation_points(&g, 1), vec![1, 2]);
    }

    #[test]
    fn articulation_of_cycle_is_empty() {
        let g = Graph::from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]);
        assert!(articulation_points(&g, 0).is_empty());
    }

    #[test]
    fn distances_on_path() {
        let g = path(3);
        let d = distances(&g);
        assert_eq!(d[0], vec![0, 1, 2]);
        assert_eq!(d[1], vec![1, 0, 1]);
    }

    #[test]
    fn unreachable_pairs_exceed_any_path() {
        let g = Graph::from_edges(3, &[(0, 1)]);
        let d = distances(&g);
        assert_eq!(d[0][2], 4);
        assert_eq!(d[2][0], 4);
    }

    #[test]
    fn center_of_path_is_middle() {
        let g = path(5);
        let res = center_resemblance(&g);
        assert_eq!(res, vec![0, 1, 2, 1, 0]);
        assert_eq!(center(&g), Some(2));
    }
}
