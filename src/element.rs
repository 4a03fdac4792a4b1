//! Reference element types and their static topology.
//!
//! Every element shape is described by a [`Topology`] table: node counts, the local nodes
//! forming each side and edge, master point coordinates and so on. These tables are constant
//! and never mutated. Queries that need actual node coordinates or global node ids (keys,
//! orientation, quality, containment) live on [`crate::mesh::ElemView`] and are implemented
//! in terms of the free functions of this module.
use crate::error::{Error, Result};
use crate::Real;
use nalgebra::{Point3, Vector3};
use numeric_literals::replace_float_literals;
use serde::{Deserialize, Serialize};

mod hexahedron;
mod infinite;
mod map;
mod prism;
mod quadrilateral;
mod quality;
mod segment;
mod tetrahedron;
mod triangle;

pub use infinite::{infinite_envelope_origin, infinite_hex_contains_point};
pub use map::{
    contains_point, inverse_map, map_reference_coords, reference_jacobian, shape_functions, InverseMapSettings,
};
pub use quality::{qual_bounds, quality, ElemQuality};

/// Default tolerance for geometric predicates.
pub const TOLERANCE: f64 = 1e-6;

/// The closed set of supported reference element types.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ElemType {
    NodeElem,
    Edge2,
    Edge3,
    Tri3,
    Tri6,
    Tri7,
    Quad4,
    Quad8,
    Quad9,
    Tet4,
    Tet10,
    Tet14,
    Hex8,
    Hex20,
    Hex27,
    Prism6,
    Prism15,
    Prism18,
    InfEdge2,
    InfQuad4,
    InfHex8,
}

/// Static topology of a reference element.
///
/// Local nodes are numbered vertices first, followed by edge nodes, face nodes and finally
/// interior nodes.
#[derive(Debug)]
pub struct Topology {
    pub dim: usize,
    pub n_nodes: usize,
    pub n_vertices: usize,
    pub n_edge_nodes: usize,
    pub n_face_nodes: usize,
    pub n_faces: usize,
    pub n_children: usize,
    pub default_order: usize,
    pub side_nodes: &'static [&'static [usize]],
    pub side_types: &'static [ElemType],
    pub edge_nodes: &'static [&'static [usize]],
    pub edge_types: &'static [ElemType],
    /// For three-dimensional elements, the two sides adjacent to every edge.
    pub edge_sides: &'static [[usize; 2]],
    pub master_points: &'static [[f64; 3]],
}

impl Topology {
    /// Reference coordinates of all nodes, in local node order.
    pub fn master_points(&self) -> &'static [[f64; 3]] {
        &self.master_points[..self.n_nodes]
    }
}

impl ElemType {
    pub const ALL: [ElemType; 21] = [
        ElemType::NodeElem,
        ElemType::Edge2,
        ElemType::Edge3,
        ElemType::Tri3,
        ElemType::Tri6,
        ElemType::Tri7,
        ElemType::Quad4,
        ElemType::Quad8,
        ElemType::Quad9,
        ElemType::Tet4,
        ElemType::Tet10,
        ElemType::Tet14,
        ElemType::Hex8,
        ElemType::Hex20,
        ElemType::Hex27,
        ElemType::Prism6,
        ElemType::Prism15,
        ElemType::Prism18,
        ElemType::InfEdge2,
        ElemType::InfQuad4,
        ElemType::InfHex8,
    ];

    pub fn topology(&self) -> &'static Topology {
        use ElemType::*;
        match self {
            NodeElem => &segment::NODE_ELEM,
            Edge2 => &segment::EDGE2,
            Edge3 => &segment::EDGE3,
            InfEdge2 => &segment::INF_EDGE2,
            Tri3 => &triangle::TRI3,
            Tri6 => &triangle::TRI6,
            Tri7 => &triangle::TRI7,
            Quad4 => &quadrilateral::QUAD4,
            Quad8 => &quadrilateral::QUAD8,
            Quad9 => &quadrilateral::QUAD9,
            InfQuad4 => &quadrilateral::INF_QUAD4,
            Tet4 => &tetrahedron::TET4,
            Tet10 => &tetrahedron::TET10,
            Tet14 => &tetrahedron::TET14,
            Hex8 => &hexahedron::HEX8,
            Hex20 => &hexahedron::HEX20,
            Hex27 => &hexahedron::HEX27,
            Prism6 => &prism::PRISM6,
            Prism15 => &prism::PRISM15,
            Prism18 => &prism::PRISM18,
            InfHex8 => &infinite::INF_HEX8,
        }
    }

    pub fn dim(&self) -> usize {
        self.topology().dim
    }

    pub fn n_nodes(&self) -> usize {
        self.topology().n_nodes
    }

    pub fn n_sides(&self) -> usize {
        self.topology().side_nodes.len()
    }

    pub fn n_edges(&self) -> usize {
        self.topology().edge_nodes.len()
    }

    pub fn n_faces(&self) -> usize {
        self.topology().n_faces
    }

    pub fn n_vertices(&self) -> usize {
        self.topology().n_vertices
    }

    /// The number of children produced by isotropic refinement.
    pub fn n_children(&self) -> usize {
        self.topology().n_children
    }

    /// Polynomial order of the geometric (Lagrange) map of the element.
    pub fn default_order(&self) -> usize {
        self.topology().default_order
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, ElemType::InfEdge2 | ElemType::InfQuad4 | ElemType::InfHex8)
    }

    /// The element type with the same shape and only vertex nodes.
    pub fn first_order_type(&self) -> ElemType {
        use ElemType::*;
        match self {
            Edge3 => Edge2,
            Tri6 | Tri7 => Tri3,
            Quad8 | Quad9 => Quad4,
            Tet10 | Tet14 => Tet4,
            Hex20 | Hex27 => Hex8,
            Prism15 | Prism18 => Prism6,
            other => *other,
        }
    }

    pub fn side_nodes(&self, side: usize) -> Result<&'static [usize]> {
        self.topology()
            .side_nodes
            .get(side)
            .copied()
            .ok_or(Error::InvalidSide { elem_type: *self, side })
    }

    pub fn edge_nodes(&self, edge: usize) -> Result<&'static [usize]> {
        self.topology()
            .edge_nodes
            .get(edge)
            .copied()
            .ok_or(Error::InvalidEdge { elem_type: *self, edge })
    }

    /// The type of the full (possibly higher order) element on side `side`.
    pub fn side_type(&self, side: usize) -> Result<ElemType> {
        self.topology()
            .side_types
            .get(side)
            .copied()
            .ok_or(Error::InvalidSide { elem_type: *self, side })
    }

    pub fn edge_type(&self, edge: usize) -> Result<ElemType> {
        self.topology()
            .edge_types
            .get(edge)
            .copied()
            .ok_or(Error::InvalidEdge { elem_type: *self, edge })
    }

    /// Reference coordinates of local node `node`.
    pub fn master_point<T: Real>(&self, node: usize) -> Result<Point3<T>> {
        let [x, y, z] = self
            .topology()
            .master_points()
            .get(node)
            .ok_or(Error::InvalidNode { elem_type: *self, node })?;
        Ok(Point3::new(
            T::from_f64(*x).expect("Literal must fit in T"),
            T::from_f64(*y).expect("Literal must fit in T"),
            T::from_f64(*z).expect("Literal must fit in T"),
        ))
    }

    pub fn is_vertex(&self, node: usize) -> bool {
        node < self.n_vertices()
    }

    pub fn is_edge(&self, node: usize) -> bool {
        let t = self.topology();
        node >= t.n_vertices && node < t.n_vertices + t.n_edge_nodes
    }

    pub fn is_face(&self, node: usize) -> bool {
        let t = self.topology();
        let begin = t.n_vertices + t.n_edge_nodes;
        node >= begin && node < begin + t.n_face_nodes
    }

    pub fn is_internal(&self, node: usize) -> bool {
        let t = self.topology();
        node >= t.n_vertices + t.n_edge_nodes + t.n_face_nodes && node < t.n_nodes
    }

    pub fn is_node_on_side(&self, node: usize, side: usize) -> Result<bool> {
        Ok(self.side_nodes(side)?.contains(&node))
    }

    /// The local node on side `side` that uniquely identifies it, if any.
    ///
    /// This is the mid-edge node for quadratic edges and the face-center node for faces that
    /// carry one. A point side is identified by its single node.
    pub fn side_key_node(&self, side: usize) -> Result<Option<usize>> {
        let nodes = self.side_nodes(side)?;
        let node = match self.side_type(side)? {
            ElemType::NodeElem => Some(nodes[0]),
            ElemType::Edge3 => Some(nodes[2]),
            ElemType::Tri7 => Some(nodes[6]),
            ElemType::Quad9 => Some(nodes[8]),
            _ => None,
        };
        Ok(node)
    }

    /// The local node that uniquely identifies the element, if any.
    pub fn center_node(&self) -> Option<usize> {
        use ElemType::*;
        match self {
            NodeElem => Some(0),
            Edge3 => Some(2),
            Tri7 => Some(6),
            Quad9 => Some(8),
            Hex27 => Some(26),
            _ => None,
        }
    }

    /// Whether child `child` of an isotropically refined element touches side `side`.
    pub fn is_child_on_side(&self, child: usize, side: usize) -> Result<bool> {
        use ElemType::*;
        if child >= self.n_children() {
            return Err(Error::InvalidChild { elem_type: *self, child });
        }
        if side >= self.n_sides() {
            return Err(Error::InvalidSide { elem_type: *self, side });
        }
        let on_side = match self.first_order_type() {
            NodeElem => false,
            Edge2 => segment::is_child_on_side(child, side),
            InfEdge2 => side == 0,
            Tri3 => triangle::is_child_on_side(child, side),
            Quad4 => quadrilateral::is_child_on_side(child, side),
            InfQuad4 => side == 0 || child + 1 == side,
            Tet4 => tetrahedron::is_child_on_side(child, side),
            Hex8 => hexahedron::is_child_on_side(child, side),
            Prism6 => prism::is_child_on_side(child, side),
            InfHex8 => infinite::is_child_on_side(child, side),
            other => unreachable!("{other:?} is not a first order type"),
        };
        Ok(on_side)
    }

    pub fn is_edge_on_side(&self, edge: usize, side: usize) -> Result<bool> {
        if edge >= self.n_edges() {
            return Err(Error::InvalidEdge { elem_type: *self, edge });
        }
        if side >= self.n_sides() {
            return Err(Error::InvalidSide { elem_type: *self, side });
        }
        Ok(self.sides_on_edge(edge)?.contains(&side))
    }

    /// The sides adjacent to edge `edge`.
    ///
    /// For faces, edges and sides coincide.
    pub fn sides_on_edge(&self, edge: usize) -> Result<Vec<usize>> {
        if edge >= self.n_edges() {
            return Err(Error::InvalidEdge { elem_type: *self, edge });
        }
        match self.dim() {
            2 => Ok(vec![edge]),
            _ => Ok(self.topology().edge_sides[edge].to_vec()),
        }
    }

    /// Reference axis normal to side `side`, for element types whose sides come in
    /// opposing pairs.
    fn side_normal_axis(&self, side: usize) -> Option<usize> {
        use ElemType::*;
        match (self.first_order_type(), side) {
            (Edge2, 0..=1) => Some(0),
            (Quad4, 0 | 2) => Some(1),
            (Quad4, 1 | 3) => Some(0),
            (InfQuad4, 1 | 2) => Some(0),
            (Hex8, 0 | 5) => Some(2),
            (Hex8, 1 | 3) => Some(1),
            (Hex8, 2 | 4) => Some(0),
            (Prism6, 0 | 4) => Some(2),
            (InfHex8, 1 | 3) => Some(1),
            (InfHex8, 2 | 4) => Some(0),
            _ => None,
        }
    }

    pub fn opposite_side(&self, side: usize) -> Result<usize> {
        use ElemType::*;
        if side >= self.n_sides() {
            return Err(Error::InvalidSide { elem_type: *self, side });
        }
        let not_implemented = Error::NotImplemented {
            elem_type: *self,
            operation: "opposite_side",
        };
        match self.first_order_type() {
            Edge2 => Ok(1 - side),
            Quad4 => Ok((side + 2) % 4),
            InfQuad4 if side > 0 => Ok(3 - side),
            Hex8 => Ok([5, 3, 4, 1, 2, 0][side]),
            Prism6 if side == 0 => Ok(4),
            Prism6 if side == 4 => Ok(0),
            InfHex8 if side > 0 => Ok((side + 1) % 4 + 1),
            _ => Err(not_implemented),
        }
    }

    /// The local node opposite to `node` with respect to the pair of sides
    /// `side` and `opposite_side(side)`.
    ///
    /// The opposite node is the mirror image of `node` across the mid-plane between the two
    /// sides. Nodes lying on that mid-plane have no opposite node.
    pub fn opposite_node(&self, node: usize, side: usize) -> Result<usize> {
        if node >= self.n_nodes() {
            return Err(Error::InvalidNode { elem_type: *self, node });
        }
        if side >= self.n_sides() {
            return Err(Error::InvalidSide { elem_type: *self, side });
        }
        let axis = self.side_normal_axis(side).ok_or(Error::NotImplemented {
            elem_type: *self,
            operation: "opposite_node",
        })?;
        // Every mirrored reference direction is symmetric about zero
        let master_points = self.topology().master_points();
        let mut mirrored = master_points[node];
        mirrored[axis] = -mirrored[axis];
        master_points
            .iter()
            .position(|p| p == &mirrored)
            .filter(|&opposite| opposite != node)
            .ok_or(Error::InvalidNode { elem_type: *self, node })
    }

    /// Whether the reference point `p` lies in the reference element, up to tolerance `eps`.
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn on_reference_element<T: Real>(&self, p: &Point3<T>, eps: T) -> bool {
        use ElemType::*;
        let (xi, eta, zeta) = (p.x, p.y, p.z);
        let in_interval = |x: T| x >= -1.0 - eps && x <= 1.0 + eps;
        match self.first_order_type() {
            NodeElem => true,
            Edge2 | InfEdge2 => in_interval(xi),
            Tri3 => xi >= -eps && eta >= -eps && xi + eta <= 1.0 + eps,
            Quad4 | InfQuad4 => in_interval(xi) && in_interval(eta),
            Tet4 => xi >= -eps && eta >= -eps && zeta >= -eps && xi + eta + zeta <= 1.0 + eps,
            Hex8 | InfHex8 => in_interval(xi) && in_interval(eta) && in_interval(zeta),
            Prism6 => xi >= -eps && eta >= -eps && xi + eta <= 1.0 + eps && in_interval(zeta),
            other => unreachable!("{other:?} is not a first order type"),
        }
    }
}

/// Number of local nodes required by `elem_type`, checked against a node slice.
pub(crate) fn check_node_count<T>(elem_type: ElemType, nodes: &[T]) -> Result<()> {
    if nodes.len() == elem_type.n_nodes() {
        Ok(())
    } else {
        Err(Error::InvalidNode {
            elem_type,
            node: nodes.len(),
        })
    }
}

/// Gradient-free helper: average of the vertex points of an element.
pub fn vertex_average<T: Real>(elem_type: ElemType, points: &[Point3<T>]) -> Point3<T> {
    let n = elem_type.n_vertices().min(points.len()).max(1);
    let sum = points
        .iter()
        .take(n)
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    Point3::from(sum / T::from_usize(n).expect("usize must fit in T"))
}
