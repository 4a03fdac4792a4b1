//! Hilbert space-filling curve ordering of elements.
use crate::mesh::Mesh;
use crate::Real;
use rayon::prelude::*;

/// Bits per coordinate, so that a three dimensional index fits into 63 bits.
const BITS: u32 = 21;

/// Position of an integer point along the Hilbert curve through `[0, 2^BITS)^3`.
///
/// Uses Skilling's transposition of the coordinates followed by bit interleaving.
pub fn hilbert_index(mut x: [u64; 3]) -> u64 {
    let n = x.len();
    let m = 1u64 << (BITS - 1);

    // Inverse undo
    let mut q = m;
    while q > 1 {
        let p = q - 1;
        for i in 0..n {
            if x[i] & q != 0 {
                x[0] ^= p;
            } else {
                let t = (x[0] ^ x[i]) & p;
                x[0] ^= t;
                x[i] ^= t;
            }
        }
        q >>= 1;
    }

    // Gray encode
    for i in 1..n {
        x[i] ^= x[i - 1];
    }
    let mut t = 0;
    let mut q = m;
    while q > 1 {
        if x[n - 1] & q != 0 {
            t ^= q - 1;
        }
        q >>= 1;
    }
    for coordinate in x.iter_mut() {
        *coordinate ^= t;
    }

    let mut index = 0;
    for bit in (0..BITS).rev() {
        for coordinate in &x {
            index = (index << 1) | ((coordinate >> bit) & 1);
        }
    }
    index
}

/// Hilbert index of the vertex average of each element, relative to the bounding box of the
/// whole mesh. Elements that do not exist get index zero.
pub fn hilbert_keys<T: Real>(mesh: &Mesh<T>, elems: &[usize]) -> Vec<u64> {
    let Some(bounding_box) = mesh.bounding_box() else {
        return vec![0; elems.len()];
    };
    let scale = ((1u64 << BITS) - 1) as f64;
    elems
        .par_iter()
        .map(|&id| {
            let Some(view) = mesh.elem_view(id) else { return 0 };
            let normalized = bounding_box.normalized_coordinates(&view.vertex_average());
            let coordinates = [0, 1, 2].map(|d| {
                let u = nalgebra::try_convert::<T, f64>(normalized[d]).unwrap_or(0.0).clamp(0.0, 1.0);
                (u * scale) as u64
            });
            hilbert_index(coordinates)
        })
        .collect()
}

/// Sorts element ids along the Hilbert curve.
///
/// Elements sharing a Hilbert index are ordered by unique id, falling back to the element id
/// for elements without one, so the ordering is total and deterministic.
pub fn hilbert_ordering<T: Real>(mesh: &Mesh<T>, elems: &[usize]) -> Vec<usize> {
    let keys = hilbert_keys(mesh, elems);
    let mut keyed: Vec<(u64, u64, usize)> = elems
        .iter()
        .zip(keys)
        .map(|(&id, key)| {
            let unique_id = mesh
                .elem(id)
                .and_then(|elem| elem.unique_id())
                .unwrap_or(id as u64);
            (key, unique_id, id)
        })
        .collect();
    keyed.sort_unstable();
    keyed.into_iter().map(|(_, _, id)| id).collect()
}

/// Splits elements ordered along the Hilbert curve into `n_pieces` contiguous chunks of
/// (nearly) equal size.
pub fn sfc_partition(n_elems: usize, n_pieces: usize) -> Vec<usize> {
    (0..n_elems).map(|i| i * n_pieces / n_elems.max(1)).collect()
}
