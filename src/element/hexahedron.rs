use super::{ElemType, Topology};

const HEX8_SIDES: &[&[usize]] = &[
    &[0, 3, 2, 1],
    &[0, 1, 5, 4],
    &[1, 2, 6, 5],
    &[2, 3, 7, 6],
    &[3, 0, 4, 7],
    &[4, 5, 6, 7],
];
const HEX20_SIDES: &[&[usize]] = &[
    &[0, 3, 2, 1, 11, 10, 9, 8],
    &[0, 1, 5, 4, 8, 13, 16, 12],
    &[1, 2, 6, 5, 9, 14, 17, 13],
    &[2, 3, 7, 6, 10, 15, 18, 14],
    &[3, 0, 4, 7, 11, 12, 19, 15],
    &[4, 5, 6, 7, 16, 17, 18, 19],
];
const HEX27_SIDES: &[&[usize]] = &[
    &[0, 3, 2, 1, 11, 10, 9, 8, 20],
    &[0, 1, 5, 4, 8, 13, 16, 12, 21],
    &[1, 2, 6, 5, 9, 14, 17, 13, 22],
    &[2, 3, 7, 6, 10, 15, 18, 14, 23],
    &[3, 0, 4, 7, 11, 12, 19, 15, 24],
    &[4, 5, 6, 7, 16, 17, 18, 19, 25],
];

const HEX8_EDGES: &[&[usize]] = &[
    &[0, 1],
    &[1, 2],
    &[2, 3],
    &[0, 3],
    &[0, 4],
    &[1, 5],
    &[2, 6],
    &[3, 7],
    &[4, 5],
    &[5, 6],
    &[6, 7],
    &[4, 7],
];
const HEX20_EDGES: &[&[usize]] = &[
    &[0, 1, 8],
    &[1, 2, 9],
    &[2, 3, 10],
    &[0, 3, 11],
    &[0, 4, 12],
    &[1, 5, 13],
    &[2, 6, 14],
    &[3, 7, 15],
    &[4, 5, 16],
    &[5, 6, 17],
    &[6, 7, 18],
    &[4, 7, 19],
];
const EDGE_SIDES: &[[usize; 2]] = &[
    [0, 1],
    [0, 2],
    [0, 3],
    [0, 4],
    [1, 4],
    [1, 2],
    [2, 3],
    [3, 4],
    [1, 5],
    [2, 5],
    [3, 5],
    [4, 5],
];

/// Children touching each side. Child `c` sits at the corner with bits `c = x + 2y + 4z`.
const SIDE_CHILDREN: [[usize; 4]; 6] = [
    [0, 1, 2, 3],
    [0, 1, 4, 5],
    [1, 3, 5, 7],
    [2, 3, 6, 7],
    [0, 2, 4, 6],
    [4, 5, 6, 7],
];

const HEX27_POINTS: &[[f64; 3]] = &[
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
    [0.0, -1.0, -1.0],
    [1.0, 0.0, -1.0],
    [0.0, 1.0, -1.0],
    [-1.0, 0.0, -1.0],
    [-1.0, -1.0, 0.0],
    [1.0, -1.0, 0.0],
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [0.0, -1.0, 1.0],
    [1.0, 0.0, 1.0],
    [0.0, 1.0, 1.0],
    [-1.0, 0.0, 1.0],
    [0.0, 0.0, -1.0],
    [0.0, -1.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [-1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0],
    [0.0, 0.0, 0.0],
];

pub const HEX8: Topology = Topology {
    dim: 3,
    n_nodes: 8,
    n_vertices: 8,
    n_edge_nodes: 0,
    n_face_nodes: 0,
    n_faces: 6,
    n_children: 8,
    default_order: 1,
    side_nodes: HEX8_SIDES,
    side_types: &[ElemType::Quad4; 6],
    edge_nodes: HEX8_EDGES,
    edge_types: &[ElemType::Edge2; 12],
    edge_sides: EDGE_SIDES,
    master_points: HEX27_POINTS,
};

pub const HEX20: Topology = Topology {
    n_nodes: 20,
    n_edge_nodes: 12,
    default_order: 2,
    side_nodes: HEX20_SIDES,
    side_types: &[ElemType::Quad8; 6],
    edge_nodes: HEX20_EDGES,
    edge_types: &[ElemType::Edge3; 12],
    ..HEX8
};

pub const HEX27: Topology = Topology {
    n_nodes: 27,
    n_face_nodes: 6,
    side_nodes: HEX27_SIDES,
    side_types: &[ElemType::Quad9; 6],
    ..HEX20
};

pub fn is_child_on_side(child: usize, side: usize) -> bool {
    SIDE_CHILDREN[side].contains(&child)
}
