use super::{ElemType, Topology};

const TET4_SIDES: &[&[usize]] = &[&[0, 2, 1], &[0, 1, 3], &[1, 2, 3], &[2, 0, 3]];
const TET10_SIDES: &[&[usize]] = &[
    &[0, 2, 1, 6, 5, 4],
    &[0, 1, 3, 4, 8, 7],
    &[1, 2, 3, 5, 9, 8],
    &[2, 0, 3, 6, 7, 9],
];
const TET14_SIDES: &[&[usize]] = &[
    &[0, 2, 1, 6, 5, 4, 10],
    &[0, 1, 3, 4, 8, 7, 11],
    &[1, 2, 3, 5, 9, 8, 12],
    &[2, 0, 3, 6, 7, 9, 13],
];

const TET4_EDGES: &[&[usize]] = &[&[0, 1], &[1, 2], &[0, 2], &[0, 3], &[1, 3], &[2, 3]];
const TET10_EDGES: &[&[usize]] = &[&[0, 1, 4], &[1, 2, 5], &[0, 2, 6], &[0, 3, 7], &[1, 3, 8], &[2, 3, 9]];
const EDGE_SIDES: &[[usize; 2]] = &[[0, 1], [0, 2], [0, 3], [1, 3], [1, 2], [2, 3]];

const THIRD: f64 = 1.0 / 3.0;
const TET14_POINTS: &[[f64; 3]] = &[
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [0.5, 0.0, 0.0],
    [0.5, 0.5, 0.0],
    [0.0, 0.5, 0.0],
    [0.0, 0.0, 0.5],
    [0.5, 0.0, 0.5],
    [0.0, 0.5, 0.5],
    [THIRD, THIRD, 0.0],
    [THIRD, 0.0, THIRD],
    [THIRD, THIRD, THIRD],
    [0.0, THIRD, THIRD],
];

pub const TET4: Topology = Topology {
    dim: 3,
    n_nodes: 4,
    n_vertices: 4,
    n_edge_nodes: 0,
    n_face_nodes: 0,
    n_faces: 4,
    n_children: 8,
    default_order: 1,
    side_nodes: TET4_SIDES,
    side_types: &[ElemType::Tri3; 4],
    edge_nodes: TET4_EDGES,
    edge_types: &[ElemType::Edge2; 6],
    edge_sides: EDGE_SIDES,
    master_points: &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
};

pub const TET10: Topology = Topology {
    n_nodes: 10,
    n_edge_nodes: 6,
    default_order: 2,
    side_nodes: TET10_SIDES,
    side_types: &[ElemType::Tri6; 4],
    edge_nodes: TET10_EDGES,
    edge_types: &[ElemType::Edge3; 6],
    master_points: &[
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
        [0.5, 0.0, 0.0],
        [0.5, 0.5, 0.0],
        [0.0, 0.5, 0.0],
        [0.0, 0.0, 0.5],
        [0.5, 0.0, 0.5],
        [0.0, 0.5, 0.5],
    ],
    ..TET4
};

pub const TET14: Topology = Topology {
    n_nodes: 14,
    n_face_nodes: 4,
    default_order: 3,
    side_nodes: TET14_SIDES,
    side_types: &[ElemType::Tri7; 4],
    master_points: TET14_POINTS,
    ..TET10
};

/// Children 0 to 3 sit at the corresponding vertex. The four interior children 4 to 7 are
/// numbered so that child `4 + s` is the one touching side `s`.
pub fn is_child_on_side(child: usize, side: usize) -> bool {
    if child < 4 {
        TET4_SIDES[side].contains(&child)
    } else {
        child - 4 == side
    }
}
