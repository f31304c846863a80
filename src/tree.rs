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

use rand::Rng;
use rustc_hash::FxHashSet;

use crate::analysis::NoCandidateFound;
use crate::graph::{Graph, V};

/// How many (vertex, target) draws [`ElimTree::random_uproot`] makes before
/// reporting that no valid move was found.
const UPROOT_ATTEMPTS: usize = 64;

/// One reversible elementary edit of an [`ElimTree`].
///
/// Edits are one-sided: the child-list variants touch only a child list, and
/// `ChangeParent` touches only a parent slot. A structural move is an ordered
/// sequence of edits keeping both sides consistent; undoing replays the
/// sequence in reverse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEdit {
    ChangeParent {
        v: V,
        old: Option<V>,
        new: Option<V>,
    },
    AddChild {
        parent: V,
        child: V,
    },
    RemoveChild {
        parent: V,
        child: V,
    },
    AddChildren {
        parent: V,
        children: Vec<V>,
    },
    RemoveChildren {
        parent: V,
        children: Vec<V>,
    },
}

/// A rooted tree over the vertex set of a graph, one node per vertex.
///
/// Parents are non-owning back-references into the same table, so no
/// reference cycles are possible; children are an ordered list owned by the
/// parent slot. Nodes are allocated once and restructured in place.
#[derive(Debug, Clone)]
pub struct ElimTree {
    parent: Vec<Option<V>>,
    children: Vec<Vec<V>>,
    root: Option<V>,
}

impl ElimTree {
    /// A tree over `n` vertices with every node detached and no root.
    pub fn new(n: usize) -> Self {
        ElimTree {
            parent: vec![None; n],
            children: vec![Vec::new(); n],
            root: None,
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.parent.len()
    }

    pub fn parent(&self, v: V) -> Option<V> {
        self.parent[v]
    }

    pub fn children(&self, v: V) -> &[V] {
        &self.children[v]
    }

    pub fn root(&self) -> Option<V> {
        self.root
    }

    /// Walk the parent chain from `v` to the top.
    pub fn root_from(&self, mut v: V) -> V {
        while let Some(p) = self.parent[v] {
            v = p;
        }
        v
    }

    pub fn set_root(&mut self, v: V) {
        assert!(
            self.parent[v].is_none(),
            "root {} must not have a parent",
            v
        );
        self.root = Some(v);
    }

    pub fn add_child(&mut self, parent: V, child: V) {
        assert!(parent != child, "vertex {} cannot be its own child", child);
        assert!(
            self.parent[child].is_none(),
            "vertex {} already has a parent",
            child
        );
        self.parent[child] = Some(parent);
        self.children[parent].push(child);
    }

    pub fn add_children(&mut self, parent: V, children: &[V]) {
        for &c in children {
            self.add_child(parent, c);
        }
    }

    pub fn remove_child(&mut self, parent: V, child: V) {
        assert_eq!(
            self.parent[child],
            Some(parent),
            "vertex {} is not parented to {}",
            child,
            parent
        );
        Self::drop_child(&mut self.children[parent], parent, child);
        self.parent[child] = None;
    }

    pub fn remove_all_children(&mut self, parent: V) -> Vec<V> {
        let removed = std::mem::take(&mut self.children[parent]);
        for &c in &removed {
            self.parent[c] = None;
        }
        removed
    }

    fn drop_child(list: &mut Vec<V>, parent: V, child: V) {
        let i = list
            .iter()
            .position(|&c| c == child)
            .unwrap_or_else(|| panic!("vertex {} is not a child of {}", child, parent));
        list.swap_remove(i);
    }

    /// Number of nodes on the longest root-to-leaf path; a lone root counts
    /// 1, an empty tree 0. Recomputed on every call.
    pub fn depth(&self) -> usize {
        let Some(root) = self.root else { return 0 };
        let mut max = 0;
        let mut stack = vec![(root, 1usize)];
        while let Some((v, d)) = stack.pop() {
            if d > max {
                max = d;
            }
            for &c in &self.children[v] {
                stack.push((c, d + 1));
            }
        }
        max
    }

    /// True iff `a` is a strict ancestor of `v`.
    pub fn is_ancestor(&self, a: V, v: V) -> bool {
        let mut cur = self.parent[v];
        while let Some(p) = cur {
            if p == a {
                return true;
            }
            cur = self.parent[p];
        }
        false
    }

    fn apply(&mut self, e: &TreeEdit) {
        match e {
            TreeEdit::ChangeParent { v, old, new } => {
                assert_eq!(self.parent[*v], *old, "stale ChangeParent for {}", v);
                self.parent[*v] = *new;
                if new.is_none() {
                    self.root = Some(*v);
                }
            }
            TreeEdit::AddChild { parent, child } => self.children[*parent].push(*child),
            TreeEdit::RemoveChild { parent, child } => {
                Self::drop_child(&mut self.children[*parent], *parent, *child)
            }
            TreeEdit::AddChildren { parent, children } => {
                self.children[*parent].extend_from_slice(children)
            }
            TreeEdit::RemoveChildren { parent, children } => {
                for &c in children {
                    Self::drop_child(&mut self.children[*parent], *parent, c);
                }
            }
        }
    }

    fn revert(&mut self, e: &TreeEdit) {
        match e {
            TreeEdit::ChangeParent { v, old, .. } => {
                self.parent[*v] = *old;
                if old.is_none() {
                    self.root = Some(*v);
                }
            }
            TreeEdit::AddChild { parent, child } => {
                Self::drop_child(&mut self.children[*parent], *parent, *child)
            }
            TreeEdit::RemoveChild { parent, child } => self.children[*parent].push(*child),
            TreeEdit::AddChildren { parent, children } => {
                for &c in children {
                    Self::drop_child(&mut self.children[*parent], *parent, c);
                }
            }
            TreeEdit::RemoveChildren { parent, children } => {
                self.children[*parent].extend_from_slice(children)
            }
        }
    }

    /// Undo a sequence of edits by replaying it in reverse. Restores the
    /// exact pre-move parent slots and child sets.
    pub fn undo(&mut self, edits: &[TreeEdit]) {
        for e in edits.iter().rev() {
            self.revert(e);
        }
    }

    /// Move `v` out of its current position and reattach it under `target`
    /// (`None` makes `v` the new root, with the old root as its child). `v`'s
    /// former children are promoted to its former parent, so edges through
    /// `v`'s subtree stay covered.
    ///
    /// Returns `None` without touching the tree when the move is invalid:
    /// `v` is the root, `target` is `v` or one of its descendants, or some
    /// graph neighbor of `v` would no longer be an ancestor of `v`'s new
    /// position.
    pub fn uproot(&mut self, g: &Graph, v: V, target: Option<V>) -> Option<Vec<TreeEdit>> {
        let p = self.parent[v]?;

        if let Some(t) = target {
            if t == v {
                return None;
            }
            // ancestors of t once v is detached; walking through v means t
            // is a descendant of v, which is excluded
            let mut chain = FxHashSet::default();
            let mut cur = Some(t);
            while let Some(x) = cur {
                if x == v {
                    return None;
                }
                chain.insert(x);
                cur = self.parent[x];
            }
            if g.neighbors(v).iter().any(|u| !chain.contains(u)) {
                return None;
            }
        }

        let mut edits = Vec::new();
        let kids = self.children[v].clone();
        if !kids.is_empty() {
            edits.push(TreeEdit::RemoveChildren {
                parent: v,
                children: kids.clone(),
            });
            for &c in &kids {
                edits.push(TreeEdit::ChangeParent {
                    v: c,
                    old: Some(v),
                    new: Some(p),
                });
            }
            edits.push(TreeEdit::AddChildren {
                parent: p,
                children: kids,
            });
        }
        edits.push(TreeEdit::RemoveChild { parent: p, child: v });
        match target {
            Some(t) => {
                edits.push(TreeEdit::ChangeParent {
                    v,
                    old: Some(p),
                    new: Some(t),
                });
                edits.push(TreeEdit::AddChild {
                    parent: t,
                    child: v,
                });
            }
            None => {
                let r = self.root.expect("tree with a parented vertex has a root");
                edits.push(TreeEdit::ChangeParent {
                    v,
                    old: Some(p),
                    new: None,
                });
                edits.push(TreeEdit::ChangeParent {
                    v: r,
                    old: None,
                    new: Some(v),
                });
                edits.push(TreeEdit::AddChild {
                    parent: v,
                    child: r,
                });
            }
        }

        for e in &edits {
            self.apply(e);
        }
        Some(edits)
    }

    /// Draw and apply a random uproot move: a uniform non-root vertex and a
    /// uniform reattachment target (a vertex or "become root"). Invalid draws
    /// are redrawn a bounded number of times.
    pub fn random_uproot(
        &mut self,
        g: &Graph,
        rng: &mut impl Rng,
    ) -> Result<Vec<TreeEdit>, NoCandidateFound> {
        let n = self.num_vertices();
        if n < 2 {
            return Err(NoCandidateFound);
        }
        for _ in 0..UPROOT_ATTEMPTS {
            let v = rng.random_range(0..n);
            if Some(v) == self.root {
                continue;
            }
            // n means "no parent"
            let t = rng.random_range(0..n + 1);
            let target = if t == n { None } else { Some(t) };
            if let Some(edits) = self.uproot(g, v, target) {
                return Ok(edits);
            }
        }
        Err(NoCandidateFound)
    }

    /// Emit the wire format: depth on the first line, then the 1-based
    /// parent id of each vertex in ascending id order, 0 for the root.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.depth().to_string());
        out.push('\n');
        for v in 0..self.num_vertices() {
            match self.parent[v] {
                Some(p) => out.push_str(&(p + 1).to_string()),
                None => out.push('0'),
            }
            out.push('\n');
        }
        out
    }

    /// Check that this is a single rooted tree over exactly the graph's
    /// vertex set and that every graph edge joins an ancestor/descendant
    /// pair. Test and checker support; not called on the mutation path.
    pub fn is_valid_for(&self, g: &Graph) -> bool {
        let n = g.num_vertices();
        if self.parent.len() != n {
            return false;
        }
        let Some(root) = self.root else { return n == 0 };
        if self.parent[root].is_some() {
            return false;
        }
        for v in 0..n {
            if v != root && self.parent[v].is_none() {
                return false;
            }
            let mut cur = v;
            let mut steps = 0;
            while let Some(p) = self.parent[cur] {
                cur = p;
                steps += 1;
                if steps > n {
                    return false;
                }
            }
            if cur != root {
                return false;
            }
        }
        let mut times_child = vec![0usize; n];
        for v in 0..n {
            for &c in &self.children[v] {
                if self.parent[c] != Some(v) {
                    return false;
                }
                times_child[c] += 1;
            }
        }
        for v in 0..n {
            let expected = if v == root { 0 } else { 1 };
            if times_child[v] != expected {
                return false;
            }
        }
        g.edges()
            .all(|(s, t)| self.is_ancestor(s, t) || self.is_ancestor(t, s))
    }
}
