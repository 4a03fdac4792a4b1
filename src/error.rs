//! Error types shared by the basis evaluators and the element topology.
use crate::element::ElemType;
use crate::fe::FEFamily;

/// Errors produced by element queries and shape function evaluation.
///
/// All of these indicate invalid input from the caller (an index out of range, an order the
/// family does not support, ...), and are not expected to be recovered from in normal use.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid shape function index {index} for {family:?} of order {order} on {elem_type:?}")]
    InvalidShapeIndex {
        family: FEFamily,
        elem_type: ElemType,
        order: usize,
        index: usize,
    },
    #[error("{family:?} does not support order {order} on {elem_type:?}")]
    UnsupportedOrder {
        family: FEFamily,
        elem_type: ElemType,
        order: usize,
    },
    #[error("{family:?} is not defined on {elem_type:?}")]
    UnsupportedElement { family: FEFamily, elem_type: ElemType },
    #[error("invalid derivative direction {direction} on {elem_type:?}")]
    InvalidDerivative { elem_type: ElemType, direction: usize },
    #[error("invalid side {side} for {elem_type:?}")]
    InvalidSide { elem_type: ElemType, side: usize },
    #[error("invalid edge {edge} for {elem_type:?}")]
    InvalidEdge { elem_type: ElemType, edge: usize },
    #[error("invalid child {child} for {elem_type:?}")]
    InvalidChild { elem_type: ElemType, child: usize },
    #[error("invalid node {node} for {elem_type:?}")]
    InvalidNode { elem_type: ElemType, node: usize },
    #[error("{0}")]
    OrientationRequired(&'static str),
    #[error("quality metric {metric:?} is not available for {elem_type:?}")]
    UnsupportedQuality {
        elem_type: ElemType,
        metric: crate::element::ElemQuality,
    },
    #[error("{operation} is not implemented for {elem_type:?}")]
    NotImplemented {
        elem_type: ElemType,
        operation: &'static str,
    },
    #[error("no element with id {0}")]
    InvalidElemId(usize),
    #[error("inverse map failed to converge after {iterations} iterations")]
    InverseMapFailed { iterations: usize },
    #[error("partitioning failed: {0}")]
    Partitioning(String),
}

pub type Result<T> = std::result::Result<T, Error>;
