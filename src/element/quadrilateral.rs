use super::{ElemType, Topology};

const QUAD4_SIDES: &[&[usize]] = &[&[0, 1], &[1, 2], &[2, 3], &[3, 0]];
const QUAD8_SIDES: &[&[usize]] = &[&[0, 1, 4], &[1, 2, 5], &[2, 3, 6], &[3, 0, 7]];
const LINEAR_SIDE_TYPES: &[ElemType] = &[ElemType::Edge2; 4];
const QUADRATIC_SIDE_TYPES: &[ElemType] = &[ElemType::Edge3; 4];

const QUAD4_POINTS: &[[f64; 3]] = &[
    [-1.0, -1.0, 0.0],
    [1.0, -1.0, 0.0],
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
];
const QUAD8_POINTS: &[[f64; 3]] = &[
    [-1.0, -1.0, 0.0],
    [1.0, -1.0, 0.0],
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [0.0, -1.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [-1.0, 0.0, 0.0],
];
const QUAD9_POINTS: &[[f64; 3]] = &[
    [-1.0, -1.0, 0.0],
    [1.0, -1.0, 0.0],
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [0.0, -1.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [-1.0, 0.0, 0.0],
    [0.0, 0.0, 0.0],
];

pub const QUAD4: Topology = Topology {
    dim: 2,
    n_nodes: 4,
    n_vertices: 4,
    n_edge_nodes: 0,
    n_face_nodes: 0,
    n_faces: 0,
    n_children: 4,
    default_order: 1,
    side_nodes: QUAD4_SIDES,
    side_types: LINEAR_SIDE_TYPES,
    edge_nodes: QUAD4_SIDES,
    edge_types: LINEAR_SIDE_TYPES,
    edge_sides: &[],
    master_points: QUAD4_POINTS,
};

pub const QUAD8: Topology = Topology {
    n_nodes: 8,
    n_edge_nodes: 4,
    default_order: 2,
    side_nodes: QUAD8_SIDES,
    side_types: QUADRATIC_SIDE_TYPES,
    edge_nodes: QUAD8_SIDES,
    edge_types: QUADRATIC_SIDE_TYPES,
    master_points: QUAD8_POINTS,
    ..QUAD4
};

pub const QUAD9: Topology = Topology {
    n_nodes: 9,
    n_face_nodes: 1,
    master_points: QUAD9_POINTS,
    ..QUAD8
};

const INF_QUAD4_SIDES: &[&[usize]] = &[&[0, 1], &[1, 3], &[0, 2]];
const INF_QUAD4_SIDE_TYPES: &[ElemType] = &[ElemType::Edge2, ElemType::InfEdge2, ElemType::InfEdge2];

/// A semi-infinite quadrilateral. Nodes 0 and 1 form the base, nodes 2 and 3 lie on the
/// rays through them.
pub const INF_QUAD4: Topology = Topology {
    n_children: 2,
    side_nodes: INF_QUAD4_SIDES,
    side_types: INF_QUAD4_SIDE_TYPES,
    edge_nodes: INF_QUAD4_SIDES,
    edge_types: INF_QUAD4_SIDE_TYPES,
    master_points: &[[-1.0, -1.0, 0.0], [1.0, -1.0, 0.0], [-1.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
    ..QUAD4
};

/// Children are numbered row by row: 0 and 1 along side 0, 2 and 3 along side 2.
pub fn is_child_on_side(child: usize, side: usize) -> bool {
    // The vertex each child touches
    let vertex = if child < 2 { child } else { 5 - child };
    vertex == side || vertex == (side + 1) % 4
}
