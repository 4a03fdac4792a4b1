//! Recursive bisection of weighted graphs.
use crate::partitioner::graph::CsrGraph;
use crate::reorder::cuthill_mckee_subgraph;
use eyre::eyre;
use serde::{Deserialize, Serialize};

/// A graph partitioner, assigning a part in `0 .. n_parts` to every vertex of a graph.
pub trait GraphPartitioningBackend {
    fn partition(&self, graph: &CsrGraph, n_parts: usize) -> eyre::Result<Vec<usize>>;
}

impl<B: GraphPartitioningBackend + ?Sized> GraphPartitioningBackend for Box<B> {
    fn partition(&self, graph: &CsrGraph, n_parts: usize) -> eyre::Result<Vec<usize>> {
        B::partition(self, graph, n_parts)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BisectionSettings {
    /// Allowed relative deviation of a part's weight from its target weight.
    pub imbalance: f64,
    /// Maximum number of greedy refinement sweeps after each split.
    pub refinement_passes: usize,
    /// Above this number of parts the bisection result is improved by k-way refinement.
    pub kway_threshold: usize,
}

impl Default for BisectionSettings {
    fn default() -> Self {
        Self {
            imbalance: 0.03,
            refinement_passes: 8,
            kway_threshold: 8,
        }
    }
}

/// Recursive bisection along Cuthill-McKee orderings with greedy boundary refinement.
///
/// Each split grows one half from a pseudo-peripheral vertex in breadth-first order until it
/// carries its share of the weight, then moves boundary vertices across the cut while this
/// reduces the number of cut edges and keeps the halves balanced. The result only depends on
/// the graph, so every process computes the same partition.
#[derive(Debug, Clone, Default)]
pub struct RecursiveBisection {
    settings: BisectionSettings,
}

impl RecursiveBisection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: BisectionSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &BisectionSettings {
        &self.settings
    }

    fn tolerance(&self, total_weight: usize, max_weight: usize) -> usize {
        let relative = (total_weight as f64 * self.settings.imbalance).ceil() as usize;
        relative.max(max_weight)
    }

    fn bisect(&self, graph: &CsrGraph, vertices: &[usize], first_part: usize, n_parts: usize, parts: &mut [usize]) {
        if n_parts == 1 || vertices.is_empty() {
            for &v in vertices {
                parts[v] = first_part;
            }
            return;
        }

        let weights = graph.vertex_weights();
        let n_left = n_parts / 2;
        let total_weight: usize = vertices.iter().map(|&v| weights[v]).sum();
        let target = total_weight * n_left;
        let imbalance = |acc: usize| (acc * n_parts).abs_diff(target);

        // None for vertices outside of this subgraph, otherwise whether the vertex is on the left
        let mut side: Vec<Option<bool>> = vec![None; graph.n_vertices()];
        for &v in vertices {
            side[v] = Some(false);
        }

        let order = cuthill_mckee_subgraph(graph.pattern(), vertices);
        let mut left_weight = 0;
        for &v in &order {
            if imbalance(left_weight + weights[v]) < imbalance(left_weight) {
                side[v] = Some(true);
                left_weight += weights[v];
            } else {
                break;
            }
        }

        let max_weight = vertices.iter().map(|&v| weights[v]).max().unwrap_or(0);
        let tolerance = self.tolerance(total_weight, max_weight) * n_parts;
        for pass in 0..self.settings.refinement_passes {
            let mut moved = 0;
            for &v in &order {
                let Some(is_left) = side[v] else { continue };
                let (mut internal, mut external) = (0, 0);
                for &u in graph.neighbors(v) {
                    match side[u] {
                        Some(other) if other == is_left => internal += 1,
                        Some(_) => external += 1,
                        None => {}
                    }
                }
                if external <= internal {
                    continue;
                }
                let new_left_weight = if is_left {
                    left_weight - weights[v]
                } else {
                    left_weight + weights[v]
                };
                if imbalance(new_left_weight) <= tolerance {
                    side[v] = Some(!is_left);
                    left_weight = new_left_weight;
                    moved += 1;
                }
            }
            log::trace!("Refinement pass {pass} moved {moved} vertices");
            if moved == 0 {
                break;
            }
        }

        let (left, right): (Vec<usize>, Vec<usize>) = vertices
            .iter()
            .copied()
            .partition(|&v| side[v] == Some(true));
        self.bisect(graph, &left, first_part, n_left, parts);
        self.bisect(graph, &right, first_part + n_left, n_parts - n_left, parts);
    }

    /// Greedily moves vertices to the neighboring part they are most connected to, subject to
    /// the part weights staying within the tolerance around the average.
    fn refine_kway(&self, graph: &CsrGraph, n_parts: usize, parts: &mut [usize]) {
        let weights = graph.vertex_weights();
        let total_weight: usize = weights.iter().sum();
        let max_weight = weights.iter().copied().max().unwrap_or(0);
        let tolerance = self.tolerance(total_weight, max_weight);
        let target = (total_weight + n_parts - 1) / n_parts;
        let (lower, upper) = (target.saturating_sub(tolerance), target + tolerance);

        let mut loads = vec![0; n_parts];
        for (v, &part) in parts.iter().enumerate() {
            loads[part] += weights[v];
        }

        let mut connections = vec![0usize; n_parts];
        for pass in 0..self.settings.refinement_passes {
            let mut moved = 0;
            for v in 0..graph.n_vertices() {
                let current = parts[v];
                for &u in graph.neighbors(v) {
                    connections[parts[u]] += 1;
                }
                let best = graph
                    .neighbors(v)
                    .iter()
                    .map(|&u| parts[u])
                    .filter(|&part| part != current)
                    .max_by_key(|&part| (connections[part], usize::MAX - part));
                if let Some(best) = best {
                    let gain = connections[best] > connections[current];
                    let fits = loads[best] + weights[v] <= upper && loads[current] - weights[v] >= lower;
                    if gain && fits {
                        parts[v] = best;
                        loads[current] -= weights[v];
                        loads[best] += weights[v];
                        moved += 1;
                    }
                }
                for &u in graph.neighbors(v) {
                    connections[parts[u]] = 0;
                }
                connections[current] = 0;
            }
            log::trace!("k-way refinement pass {pass} moved {moved} vertices");
            if moved == 0 {
                break;
            }
        }
    }
}

impl GraphPartitioningBackend for RecursiveBisection {
    fn partition(&self, graph: &CsrGraph, n_parts: usize) -> eyre::Result<Vec<usize>> {
        if n_parts == 0 {
            return Err(eyre!("cannot partition a graph into zero parts"));
        }
        let n = graph.n_vertices();
        let mut parts = vec![0; n];
        let vertices: Vec<usize> = (0..n).collect();
        self.bisect(graph, &vertices, 0, n_parts, &mut parts);
        if n_parts > self.settings.kway_threshold {
            self.refine_kway(graph, n_parts, &mut parts);
        }
        Ok(parts)
    }
}
