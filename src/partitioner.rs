//! Assigning processor ownership to the elements of a mesh.
//!
//! Partitioning happens in four stages. The dual graph of the elements is built on every
//! process (the mesh is replicated, so all processes build the same graph). Rank 0 then
//! partitions the graph, broadcasts the result, and finally every process stores the piece of
//! each element as its processor id.
use crate::error::Error;
use crate::mesh::Mesh;
use crate::Real;
use eyre::{eyre, WrapErr};
use serde::{Deserialize, Serialize};
use std::sync::Once;

mod bisection;
mod communicator;
mod graph;
mod sfc;

pub use bisection::{BisectionSettings, GraphPartitioningBackend, RecursiveBisection};
pub use communicator::{Communicator, SerialCommunicator};
pub use graph::{build_dual_graph, CsrGraph, DualGraph, SPLINE_NODE_WEIGHT};
pub use sfc::{hilbert_index, hilbert_keys, hilbert_ordering, sfc_partition};

#[cfg(feature = "mpi")]
pub use communicator::MpiCommunicator;

static SFC_FALLBACK_WARNING: Once = Once::new();

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PartitionerSettings {
    pub bisection: BisectionSettings,
}

/// Partitions meshes with a graph partitioning backend.
///
/// Without a backend, elements are split into contiguous chunks along a Hilbert curve instead.
pub struct Partitioner {
    backend: Option<Box<dyn GraphPartitioningBackend + Send + Sync>>,
    settings: PartitionerSettings,
    weights: Option<Vec<usize>>,
}

impl Default for Partitioner {
    fn default() -> Self {
        Self::new()
    }
}

impl Partitioner {
    /// A partitioner using [`RecursiveBisection`] with default settings.
    pub fn new() -> Self {
        Self::with_settings(PartitionerSettings::default())
    }

    pub fn with_settings(settings: PartitionerSettings) -> Self {
        Self {
            backend: Some(Box::new(RecursiveBisection::with_settings(settings.bisection))),
            settings,
            weights: None,
        }
    }

    pub fn with_backend(backend: Box<dyn GraphPartitioningBackend + Send + Sync>) -> Self {
        Self {
            backend: Some(backend),
            settings: PartitionerSettings::default(),
            weights: None,
        }
    }

    /// A partitioner that always uses the space-filling curve fallback.
    pub fn without_backend() -> Self {
        Self {
            backend: None,
            settings: PartitionerSettings::default(),
            weights: None,
        }
    }

    pub fn settings(&self) -> &PartitionerSettings {
        &self.settings
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    /// Sets vertex weights, indexed by element id, that replace the default node counts.
    pub fn set_weights(&mut self, weights: Option<Vec<usize>>) {
        self.weights = weights;
    }

    pub fn weights(&self) -> Option<&[usize]> {
        self.weights.as_deref()
    }

    /// Partitions all elements of the mesh into `n_pieces` pieces.
    pub fn partition<T: Real>(&self, mesh: &mut Mesh<T>, n_pieces: usize, comm: &impl Communicator) -> eyre::Result<()> {
        let elems: Vec<usize> = mesh.elems().filter_map(|elem| elem.id()).collect();
        self.partition_range(mesh, &elems, n_pieces, comm)
    }

    /// Partitions the elements `elems` of the mesh into `n_pieces` pieces and stores the piece
    /// of every element as its processor id.
    ///
    /// Active elements are partitioned through the dual graph. Inactive elements receive the
    /// smallest processor id among their active descendants.
    pub fn partition_range<T: Real>(
        &self,
        mesh: &mut Mesh<T>,
        elems: &[usize],
        n_pieces: usize,
        comm: &impl Communicator,
    ) -> eyre::Result<()> {
        if n_pieces == 0 {
            return Err(eyre!("cannot partition a mesh into zero pieces"));
        }
        if elems.is_empty() {
            return Ok(());
        }
        if n_pieces == 1 {
            for &id in elems {
                if let Some(elem) = mesh.elem_mut(id) {
                    elem.set_processor_id(0);
                }
            }
            return Ok(());
        }

        let dual = build_dual_graph(mesh, elems, self.weights())?;
        let n_vertices = dual.graph.n_vertices();

        let mut pieces = if comm.rank() == 0 {
            match &self.backend {
                Some(backend) => backend
                    .partition(&dual.graph, n_pieces)
                    .wrap_err("graph partitioning backend failed")?,
                None => {
                    SFC_FALLBACK_WARNING.call_once(|| {
                        log::warn!("No graph partitioning backend available, falling back to space-filling curve partitioning");
                    });
                    sfc_partition(n_vertices, n_pieces)
                }
            }
        } else {
            Vec::new()
        };
        comm.broadcast(&mut pieces, 0)?;

        if pieces.len() != n_vertices {
            return Err(Error::Partitioning(format!(
                "partition has {} entries, but the dual graph has {} vertices",
                pieces.len(),
                n_vertices
            ))
            .into());
        }
        if let Some(piece) = pieces.iter().find(|&&piece| piece >= n_pieces) {
            return Err(Error::Partitioning(format!("partition contains piece {piece}, expected fewer than {n_pieces}")).into());
        }

        for (&id, &piece) in dual.elems.iter().zip(&pieces) {
            if let Some(elem) = mesh.elem_mut(id) {
                elem.set_processor_id(piece);
            }
        }
        for &id in elems {
            if !mesh.elem(id).map_or(true, |elem| elem.active()) {
                if let Some(piece) = min_active_descendant_processor(mesh, id) {
                    if let Some(elem) = mesh.elem_mut(id) {
                        elem.set_processor_id(piece);
                    }
                }
            }
        }

        let mut loads = vec![0; n_pieces];
        for (v, &piece) in pieces.iter().enumerate() {
            loads[piece] += dual.graph.vertex_weights()[v];
        }
        log::info!(
            "Partitioned {} elements into {} pieces with weights {:?}",
            n_vertices,
            n_pieces,
            loads
        );
        Ok(())
    }
}

fn min_active_descendant_processor<T: Real>(mesh: &Mesh<T>, id: usize) -> Option<usize> {
    let elem = mesh.elem(id)?;
    if elem.active() {
        Some(elem.processor_id())
    } else {
        elem.children()
            .iter()
            .filter_map(|&child| min_active_descendant_processor(mesh, child))
            .min()
    }
}
