//! Breadth-first orderings of graphs.
//!
//! Graphs are given by symmetric sparsity patterns: vertex `i` is adjacent to the minor indices
//! of lane `i`.
use nalgebra_sparse::pattern::SparsityPattern;
use std::collections::VecDeque;

/// The subgraph of a sparsity pattern induced by a subset of its vertices.
struct Subgraph<'a> {
    pattern: &'a SparsityPattern,
    vertices: &'a [usize],
    member: Vec<bool>,
}

impl<'a> Subgraph<'a> {
    fn new(pattern: &'a SparsityPattern, vertices: &'a [usize]) -> Self {
        let mut member = vec![false; pattern.major_dim()];
        for &v in vertices {
            member[v] = true;
        }
        Self {
            pattern,
            vertices,
            member,
        }
    }

    fn neighbors(&self, vertex: usize) -> impl Iterator<Item = usize> + '_ {
        self.pattern
            .lane(vertex)
            .iter()
            .copied()
            .filter(move |&u| u != vertex && self.member[u])
    }

    fn degree(&self, vertex: usize) -> usize {
        self.neighbors(vertex).count()
    }

    /// Breadth-first levels from `start` among the vertices not yet `visited`. Returns the
    /// eccentricity of `start` and the vertices of the last level.
    ///
    /// `levels` must be `usize::MAX` for every vertex on entry, and is restored on return.
    fn last_level(&self, start: usize, visited: &[bool], levels: &mut [usize]) -> (usize, Vec<usize>) {
        levels[start] = 0;
        let mut reached = vec![start];
        let mut queue = VecDeque::from([start]);
        let mut eccentricity = 0;
        let mut last = vec![start];
        while let Some(v) = queue.pop_front() {
            for u in self.neighbors(v) {
                if !visited[u] && levels[u] == usize::MAX {
                    levels[u] = levels[v] + 1;
                    if levels[u] > eccentricity {
                        eccentricity = levels[u];
                        last.clear();
                    }
                    last.push(u);
                    reached.push(u);
                    queue.push_back(u);
                }
            }
        }
        for v in reached {
            levels[v] = usize::MAX;
        }
        (eccentricity, last)
    }

    /// Finds a vertex of (nearly) maximal eccentricity in the component of `start` by
    /// repeated breadth-first searches.
    fn pseudo_peripheral_vertex(&self, mut start: usize, visited: &[bool], levels: &mut [usize]) -> usize {
        let (mut eccentricity, mut last) = self.last_level(start, visited, levels);
        loop {
            let candidate = last
                .iter()
                .copied()
                .min_by_key(|&v| (self.degree(v), v))
                .unwrap_or(start);
            if candidate == start {
                return start;
            }
            let (candidate_eccentricity, candidate_last) = self.last_level(candidate, visited, levels);
            if candidate_eccentricity > eccentricity {
                start = candidate;
                eccentricity = candidate_eccentricity;
                last = candidate_last;
            } else {
                return start;
            }
        }
    }

    fn cuthill_mckee(&self) -> Vec<usize> {
        let mut queue = VecDeque::new();
        let mut ordering = Vec::with_capacity(self.vertices.len());
        let mut visited = vec![false; self.pattern.major_dim()];
        let mut levels = vec![usize::MAX; self.pattern.major_dim()];
        let mut adjacency_workspace = Vec::new();

        let mut candidates: Vec<usize> = self.vertices.to_vec();
        candidates.sort_unstable_by_key(|&v| (self.degree(v), v));

        // Disconnected subgraphs are handled by restarting from the least degree vertex that
        // has not been visited yet
        for &candidate in &candidates {
            if visited[candidate] {
                continue;
            }
            let start = self.pseudo_peripheral_vertex(candidate, &visited, &mut levels);
            queue.push_back(start);
            visited[start] = true;

            while let Some(vertex) = queue.pop_front() {
                adjacency_workspace.clear();
                adjacency_workspace.extend(self.neighbors(vertex).filter(|&u| !visited[u]));
                adjacency_workspace.sort_unstable_by_key(|&u| (self.degree(u), u));
                ordering.push(vertex);

                // Cuthill-McKee is essentially just a breadth-first search in which
                // the neighbors are visited in sorted order from lowest to highest
                // vertex degree
                for &adjacent_vertex in &adjacency_workspace {
                    if !visited[adjacent_vertex] {
                        visited[adjacent_vertex] = true;
                        queue.push_back(adjacent_vertex);
                    }
                }
            }
        }
        ordering
    }
}

/// Cuthill-McKee ordering of the subgraph induced by `vertices`.
///
/// Each connected component is traversed from a pseudo-peripheral vertex. The result contains
/// every vertex of `vertices` exactly once, given that `vertices` has no duplicates.
pub fn cuthill_mckee_subgraph(sparsity_pattern: &SparsityPattern, vertices: &[usize]) -> Vec<usize> {
    Subgraph::new(sparsity_pattern, vertices).cuthill_mckee()
}
