use super::{ElemType, Topology};
use ElemType::*;

const PRISM6_SIDES: &[&[usize]] = &[&[0, 2, 1], &[0, 1, 4, 3], &[1, 2, 5, 4], &[2, 0, 3, 5], &[3, 4, 5]];
const PRISM15_SIDES: &[&[usize]] = &[
    &[0, 2, 1, 8, 7, 6],
    &[0, 1, 4, 3, 6, 10, 12, 9],
    &[1, 2, 5, 4, 7, 11, 13, 10],
    &[2, 0, 3, 5, 8, 9, 14, 11],
    &[3, 4, 5, 12, 13, 14],
];
const PRISM18_SIDES: &[&[usize]] = &[
    &[0, 2, 1, 8, 7, 6],
    &[0, 1, 4, 3, 6, 10, 12, 9, 15],
    &[1, 2, 5, 4, 7, 11, 13, 10, 16],
    &[2, 0, 3, 5, 8, 9, 14, 11, 17],
    &[3, 4, 5, 12, 13, 14],
];

const PRISM6_EDGES: &[&[usize]] = &[
    &[0, 1],
    &[1, 2],
    &[0, 2],
    &[0, 3],
    &[1, 4],
    &[2, 5],
    &[3, 4],
    &[4, 5],
    &[3, 5],
];
const PRISM15_EDGES: &[&[usize]] = &[
    &[0, 1, 6],
    &[1, 2, 7],
    &[0, 2, 8],
    &[0, 3, 9],
    &[1, 4, 10],
    &[2, 5, 11],
    &[3, 4, 12],
    &[4, 5, 13],
    &[3, 5, 14],
];
const EDGE_SIDES: &[[usize; 2]] = &[
    [0, 1],
    [0, 2],
    [0, 3],
    [1, 3],
    [1, 2],
    [2, 3],
    [1, 4],
    [2, 4],
    [3, 4],
];

const SIDE_CHILDREN: [[usize; 4]; 5] = [[0, 1, 2, 3], [0, 1, 4, 5], [1, 2, 5, 6], [0, 2, 4, 6], [4, 5, 6, 7]];

const PRISM18_POINTS: &[[f64; 3]] = &[
    [0.0, 0.0, -1.0],
    [1.0, 0.0, -1.0],
    [0.0, 1.0, -1.0],
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 1.0],
    [0.0, 1.0, 1.0],
    [0.5, 0.0, -1.0],
    [0.5, 0.5, -1.0],
    [0.0, 0.5, -1.0],
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.5, 0.0, 1.0],
    [0.5, 0.5, 1.0],
    [0.0, 0.5, 1.0],
    [0.5, 0.0, 0.0],
    [0.5, 0.5, 0.0],
    [0.0, 0.5, 0.0],
];

pub const PRISM6: Topology = Topology {
    dim: 3,
    n_nodes: 6,
    n_vertices: 6,
    n_edge_nodes: 0,
    n_face_nodes: 0,
    n_faces: 5,
    n_children: 8,
    default_order: 1,
    side_nodes: PRISM6_SIDES,
    side_types: &[Tri3, Quad4, Quad4, Quad4, Tri3],
    edge_nodes: PRISM6_EDGES,
    edge_types: &[Edge2; 9],
    edge_sides: EDGE_SIDES,
    master_points: PRISM18_POINTS,
};

pub const PRISM15: Topology = Topology {
    n_nodes: 15,
    n_edge_nodes: 9,
    default_order: 2,
    side_nodes: PRISM15_SIDES,
    side_types: &[Tri6, Quad8, Quad8, Quad8, Tri6],
    edge_nodes: PRISM15_EDGES,
    edge_types: &[Edge3; 9],
    ..PRISM6
};

pub const PRISM18: Topology = Topology {
    n_nodes: 18,
    n_face_nodes: 3,
    side_nodes: PRISM18_SIDES,
    side_types: &[Tri6, Quad9, Quad9, Quad9, Tri6],
    ..PRISM15
};

pub fn is_child_on_side(child: usize, side: usize) -> bool {
    SIDE_CHILDREN[side].contains(&child)
}
