//! The dual graph of a range of elements in compressed sparse row form.
use crate::element::ElemType;
use crate::mesh::Mesh;
use crate::partitioner::sfc::hilbert_ordering;
use crate::Real;
use eyre::eyre;
use nalgebra_sparse::pattern::SparsityPattern;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

/// Adjacency array handed out for graphs without edges. Backends may not accept empty arrays,
/// and no offset range ever refers to this slot.
const SENTINEL_ADJACENCY: [usize; 1] = [0];

/// An undirected graph with weighted vertices, stored in compressed sparse row form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrGraph {
    pattern: SparsityPattern,
    vertex_weights: Vec<usize>,
}

impl CsrGraph {
    /// Builds a graph from (possibly unsorted, duplicated or one-sided) adjacency lists.
    ///
    /// Self loops are dropped and every edge is made symmetric.
    pub fn from_adjacency_lists(adjacency: &[Vec<usize>], vertex_weights: Vec<usize>) -> eyre::Result<Self> {
        let n = adjacency.len();
        if vertex_weights.len() != n {
            return Err(eyre!(
                "expected {} vertex weights, got {}",
                n,
                vertex_weights.len()
            ));
        }
        let mut symmetric: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (v, neighbors) in adjacency.iter().enumerate() {
            for &u in neighbors {
                if u >= n {
                    return Err(eyre!("vertex {v} is adjacent to nonexistent vertex {u}"));
                }
                if u != v {
                    symmetric[v].push(u);
                    symmetric[u].push(v);
                }
            }
        }
        let mut offsets = Vec::with_capacity(n + 1);
        let mut indices = Vec::new();
        offsets.push(0);
        for mut neighbors in symmetric {
            neighbors.sort_unstable();
            neighbors.dedup();
            indices.extend(neighbors);
            offsets.push(indices.len());
        }
        let pattern = SparsityPattern::try_from_offsets_and_indices(n, n, offsets, indices)
            .map_err(|err| eyre!("invalid graph structure: {err}"))?;
        Ok(Self {
            pattern,
            vertex_weights,
        })
    }

    pub fn n_vertices(&self) -> usize {
        self.pattern.major_dim()
    }

    /// Number of undirected edges.
    pub fn n_edges(&self) -> usize {
        self.pattern.nnz() / 2
    }

    pub fn pattern(&self) -> &SparsityPattern {
        &self.pattern
    }

    pub fn neighbors(&self, vertex: usize) -> &[usize] {
        self.pattern.lane(vertex)
    }

    pub fn vertex_weights(&self) -> &[usize] {
        &self.vertex_weights
    }

    /// Offsets into [`CsrGraph::adjncy`], one per vertex plus one.
    pub fn xadj(&self) -> &[usize] {
        self.pattern.major_offsets()
    }

    /// Concatenated adjacency lists. Never empty, even for graphs without edges.
    pub fn adjncy(&self) -> &[usize] {
        let indices = self.pattern.minor_indices();
        if indices.is_empty() {
            &SENTINEL_ADJACENCY
        } else {
            indices
        }
    }
}

/// The dual graph of a set of active elements together with the map from elements to graph
/// vertices.
#[derive(Debug, Clone)]
pub struct DualGraph {
    pub graph: CsrGraph,
    /// Element id of each graph vertex.
    pub elems: Vec<usize>,
    /// Graph vertex of each element id in the range.
    pub vertex_of: BTreeMap<usize, usize>,
}

/// Weight of a spline node, which couples to many more elements than an ordinary node element.
pub const SPLINE_NODE_WEIGHT: usize = 50;

/// Builds the dual graph of the active elements among `elems`.
///
/// Graph vertices are numbered along a Hilbert curve through the element vertex averages.
/// Two elements are connected when
/// - they are active face neighbors,
/// - one is an active descendant of the other's (refined) neighbor that touches it,
/// - one is a lower dimensional element and the other an active interior element touching it.
///
/// Vertex weights are taken from `weights` (indexed by element id) when given, otherwise from
/// the number of nodes of the element.
pub fn build_dual_graph<T: Real>(mesh: &Mesh<T>, elems: &[usize], weights: Option<&[usize]>) -> eyre::Result<DualGraph> {
    let mut active: Vec<usize> = elems
        .iter()
        .copied()
        .filter(|&id| mesh.elem(id).map_or(false, |elem| elem.active()))
        .collect();
    active.sort_unstable();
    active.dedup();

    let ordered = hilbert_ordering(mesh, &active);
    let vertex_of: BTreeMap<usize, usize> = ordered.iter().enumerate().map(|(v, &id)| (id, v)).collect();

    // Active interior elements touching each lower dimensional element, and the reverse map
    let mut interior_of: FxHashMap<usize, Vec<usize>> = FxHashMap::default();
    let mut boundary_of_interior: FxHashMap<usize, Vec<usize>> = FxHashMap::default();
    for &id in &ordered {
        if mesh.elem(id).map_or(true, |elem| elem.interior_parent().is_none()) {
            continue;
        }
        let interior = mesh.find_interior_neighbors(id);
        for &neighbor in &interior {
            boundary_of_interior.entry(neighbor).or_default().push(id);
        }
        interior_of.insert(id, interior);
    }

    let mut adjacency = vec![Vec::new(); ordered.len()];
    let mut vertex_weights = Vec::with_capacity(ordered.len());
    for (v, &id) in ordered.iter().enumerate() {
        let elem = mesh
            .elem(id)
            .ok_or_else(|| eyre!("element {id} disappeared while building the dual graph"))?;

        for neighbor in elem.neighbors().iter().flatten() {
            for descendant in mesh.active_family_tree_by_neighbor(*neighbor, id) {
                adjacency[v].extend(vertex_of.get(&descendant));
            }
        }
        if let Some(interior) = interior_of.get(&id) {
            adjacency[v].extend(interior.iter().filter_map(|i| vertex_of.get(i)));
        }
        if let Some(boundary) = boundary_of_interior.get(&id) {
            adjacency[v].extend(boundary.iter().filter_map(|b| vertex_of.get(b)));
        }

        let weight = match weights {
            Some(weights) => *weights
                .get(id)
                .ok_or_else(|| eyre!("no weight given for element {id}"))?,
            None if elem.elem_type() == ElemType::NodeElem && elem.is_spline_node() => SPLINE_NODE_WEIGHT,
            None => elem.elem_type().n_nodes(),
        };
        vertex_weights.push(weight);
    }

    let graph = CsrGraph::from_adjacency_lists(&adjacency, vertex_weights)?;
    log::debug!(
        "Built dual graph with {} vertices and {} edges",
        graph.n_vertices(),
        graph.n_edges()
    );
    Ok(DualGraph {
        graph,
        elems: ordered,
        vertex_of,
    })
}
