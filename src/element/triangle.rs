use super::{ElemType, Topology};

const TRI3_SIDES: &[&[usize]] = &[&[0, 1], &[1, 2], &[2, 0]];
const TRI6_SIDES: &[&[usize]] = &[&[0, 1, 3], &[1, 2, 4], &[2, 0, 5]];
const LINEAR_SIDE_TYPES: &[ElemType] = &[ElemType::Edge2; 3];
const QUADRATIC_SIDE_TYPES: &[ElemType] = &[ElemType::Edge3; 3];

const THIRD: f64 = 1.0 / 3.0;
const TRI3_POINTS: &[[f64; 3]] = &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
const TRI6_POINTS: &[[f64; 3]] = &[
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.5, 0.0, 0.0],
    [0.5, 0.5, 0.0],
    [0.0, 0.5, 0.0],
];
const TRI7_POINTS: &[[f64; 3]] = &[
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.5, 0.0, 0.0],
    [0.5, 0.5, 0.0],
    [0.0, 0.5, 0.0],
    [THIRD, THIRD, 0.0],
];

pub const TRI3: Topology = Topology {
    dim: 2,
    n_nodes: 3,
    n_vertices: 3,
    n_edge_nodes: 0,
    n_face_nodes: 0,
    n_faces: 0,
    n_children: 4,
    default_order: 1,
    side_nodes: TRI3_SIDES,
    side_types: LINEAR_SIDE_TYPES,
    edge_nodes: TRI3_SIDES,
    edge_types: LINEAR_SIDE_TYPES,
    edge_sides: &[],
    master_points: TRI3_POINTS,
};

pub const TRI6: Topology = Topology {
    n_nodes: 6,
    n_edge_nodes: 3,
    default_order: 2,
    side_nodes: TRI6_SIDES,
    side_types: QUADRATIC_SIDE_TYPES,
    edge_nodes: TRI6_SIDES,
    edge_types: QUADRATIC_SIDE_TYPES,
    master_points: TRI6_POINTS,
    ..TRI3
};

pub const TRI7: Topology = Topology {
    n_nodes: 7,
    n_face_nodes: 1,
    default_order: 3,
    master_points: TRI7_POINTS,
    ..TRI6
};

/// Children 0, 1 and 2 sit at the corresponding vertex, child 3 is the interior child.
pub fn is_child_on_side(child: usize, side: usize) -> bool {
    child == side || child == (side + 1) % 3
}
