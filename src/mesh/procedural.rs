//! Basic procedural mesh generation routines.
use crate::element::ElemType;
use crate::error::{Error, Result};
use crate::mesh::Mesh;
use crate::Real;
use nalgebra::{Point3, Vector3};

/// Generates an axis-aligned uniform mesh of tensor product elements.
///
/// The box spans `[0, extents]` and is subdivided into `cells[d]` elements along each of the
/// first `elem_type.dim()` axes. Supported types are `Edge2`, `Edge3`, `Quad4`, `Quad9`,
/// `Hex8` and `Hex27`. Neighbor information is computed.
pub fn create_uniform_tensor_mesh<T: Real>(
    elem_type: ElemType,
    cells: [usize; 3],
    extents: &Vector3<T>,
) -> Result<Mesh<T>> {
    use ElemType::*;
    if !matches!(elem_type, Edge2 | Edge3 | Quad4 | Quad9 | Hex8 | Hex27) {
        return Err(Error::NotImplemented {
            elem_type,
            operation: "uniform tensor mesh generation",
        });
    }
    let dim = elem_type.dim();
    let order = elem_type.default_order();
    let cells: [usize; 3] = std::array::from_fn(|d| if d < dim { cells[d] } else { 1 });
    let points_per_dim: [usize; 3] = std::array::from_fn(|d| if d < dim { order * cells[d] + 1 } else { 1 });

    let mut vertices = Vec::with_capacity(points_per_dim.iter().product());
    for k in 0..points_per_dim[2] {
        for j in 0..points_per_dim[1] {
            for i in 0..points_per_dim[0] {
                let lattice = [i, j, k];
                vertices.push(Point3::from(Vector3::from_fn(|d, _| {
                    if d < dim {
                        let fraction = T::from_usize(lattice[d]).expect("Must be able to fit usize in T")
                            / T::from_usize(points_per_dim[d] - 1).expect("Must be able to fit usize in T");
                        fraction * extents[d]
                    } else {
                        T::zero()
                    }
                })));
            }
        }
    }
    let to_global_vertex_index =
        |lattice: [usize; 3]| lattice[0] + points_per_dim[0] * (lattice[1] + points_per_dim[1] * lattice[2]);

    let mut mesh = Mesh::from_vertices(vertices);
    let master_points = elem_type.topology().master_points();
    for k in 0..cells[2] {
        for j in 0..cells[1] {
            for i in 0..cells[0] {
                let cell = [i, j, k];
                let nodes = master_points
                    .iter()
                    .map(|local| {
                        to_global_vertex_index(std::array::from_fn(|d| {
                            // Master coordinates in {-1, 0, 1} become lattice offsets in 0..=order
                            let offset = ((local[d] + 1.0) * order as f64 / 2.0).round() as usize;
                            if d < dim {
                                order * cell[d] + offset
                            } else {
                                0
                            }
                        }))
                    })
                    .collect();
                mesh.add_elem(elem_type, nodes)?;
            }
        }
    }
    mesh.find_neighbors();
    Ok(mesh)
}

pub fn create_unit_square_uniform_quad_mesh<T: Real>(cells_per_dim: usize) -> Result<Mesh<T>> {
    create_uniform_tensor_mesh(ElemType::Quad4, [cells_per_dim; 3], &Vector3::repeat(T::one()))
}

pub fn create_unit_box_uniform_hex_mesh<T: Real>(cells_per_dim: usize) -> Result<Mesh<T>> {
    create_uniform_tensor_mesh(ElemType::Hex8, [cells_per_dim; 3], &Vector3::repeat(T::one()))
}

/// Generates a unit square mesh of `Tri3` elements by splitting every cell of a uniform
/// quadrilateral mesh along its diagonal from vertex 0 to vertex 2.
pub fn create_unit_square_uniform_tri_mesh<T: Real>(cells_per_dim: usize) -> Result<Mesh<T>> {
    let quads = create_unit_square_uniform_quad_mesh::<T>(cells_per_dim)?;
    let mut mesh = Mesh::from_vertices(quads.vertices().to_vec());
    for quad in quads.elems() {
        let [a, b, c, d] = [quad.nodes()[0], quad.nodes()[1], quad.nodes()[2], quad.nodes()[3]];
        mesh.add_elem(ElemType::Tri3, vec![a, b, c])?;
        mesh.add_elem(ElemType::Tri3, vec![a, c, d])?;
    }
    mesh.find_neighbors();
    Ok(mesh)
}
