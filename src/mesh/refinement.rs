//! Isotropic refinement of individual elements.
//!
//! New vertices are labeled by the sorted set of parent vertices they average. The label is
//! global, so two neighbors refined one after the other share the vertices created on their
//! common side.
use crate::element::ElemType;
use crate::error::{Error, Result};
use crate::mesh::{Elem, Mesh};
use crate::Real;
use nalgebra::{Point3, Vector3};

impl<T: Real> Mesh<T> {
    /// Returns the vertex averaging `parents`, creating it if it does not exist yet.
    fn refinement_vertex(&mut self, mut parents: Vec<usize>) -> usize {
        parents.sort_unstable();
        parents.dedup();
        if let [single] = parents[..] {
            return single;
        }
        if let Some(&existing) = self.refinement_vertices.get(&parents) {
            return existing;
        }
        let sum = parents
            .iter()
            .fold(Vector3::zeros(), |acc, &v| acc + self.vertices[v].coords);
        let n = T::from_usize(parents.len()).expect("usize must fit in T");
        let vertex = self.add_vertex(Point3::from(sum / n));
        self.refinement_vertices.insert(parents, vertex);
        vertex
    }

    /// Children of an edge, quadrilateral or hexahedron, built on a lattice with three points
    /// per reference direction. Child `c` occupies the lattice cell with offsets given by the
    /// bits of `c`.
    fn tensor_children(&mut self, elem: &Elem) -> Vec<Vec<usize>> {
        let elem_type = elem.elem_type();
        let dim = elem_type.dim();
        let master_points = elem_type.topology().master_points();

        let mut children = Vec::with_capacity(elem_type.n_children());
        for child in 0..elem_type.n_children() {
            let mut nodes = Vec::with_capacity(master_points.len());
            for local in master_points {
                let mut lattice = [0; 3];
                for d in 0..dim {
                    let offset = if local[d] > 0.0 { 1 } else { 0 };
                    lattice[d] = ((child >> d) & 1) + offset;
                }
                // The parent vertices sharing the lattice point's coordinates in every
                // direction where it is not a midpoint
                let parents = (0..elem_type.n_vertices())
                    .filter(|&v| {
                        (0..dim).all(|d| lattice[d] == 1 || master_points[v][d] == lattice[d] as f64 - 1.0)
                    })
                    .map(|v| elem.nodes[v])
                    .collect();
                nodes.push(self.refinement_vertex(parents));
            }
            children.push(nodes);
        }
        children
    }

    fn triangle_children(&mut self, elem: &Elem) -> Vec<Vec<usize>> {
        let [a, b, c] = [elem.nodes[0], elem.nodes[1], elem.nodes[2]];
        let ab = self.refinement_vertex(vec![a, b]);
        let bc = self.refinement_vertex(vec![b, c]);
        let ca = self.refinement_vertex(vec![c, a]);
        vec![vec![a, ab, ca], vec![ab, b, bc], vec![ca, bc, c], vec![ab, bc, ca]]
    }

    /// Refines an active element isotropically and returns the ids of its children.
    ///
    /// Neighbor information is not updated, call [`Mesh::find_neighbors`] when done refining.
    pub fn refine_elem(&mut self, id: usize) -> Result<Vec<usize>> {
        let elem = self.elem(id).cloned().ok_or(Error::InvalidElemId(id))?;
        if !elem.active {
            return Ok(elem.children);
        }
        let child_nodes = match elem.elem_type {
            ElemType::Edge2 | ElemType::Quad4 | ElemType::Hex8 => self.tensor_children(&elem),
            ElemType::Tri3 => self.triangle_children(&elem),
            elem_type => {
                return Err(Error::NotImplemented {
                    elem_type,
                    operation: "refinement",
                })
            }
        };

        let mut children = Vec::with_capacity(child_nodes.len());
        for nodes in child_nodes {
            let child_id = self.add_elem(elem.elem_type, nodes)?;
            if let Some(child) = self.elem_mut(child_id) {
                child.parent = Some(id);
                child.level = elem.level + 1;
                child.subdomain_id = elem.subdomain_id;
                child.processor_id = elem.processor_id;
            }
            children.push(child_id);
        }
        if let Some(parent) = self.elem_mut(id) {
            parent.active = false;
            parent.children = children.clone();
        }
        log::debug!("Refined element {id} ({:?}) into {} children", elem.elem_type, children.len());
        Ok(children)
    }

    /// Refines every active element once and updates neighbor information.
    pub fn refine_uniformly(&mut self) -> Result<()> {
        let active: Vec<usize> = self.active_elems().filter_map(Elem::id).collect();
        for id in active {
            self.refine_elem(id)?;
        }
        self.find_neighbors();
        Ok(())
    }
}
