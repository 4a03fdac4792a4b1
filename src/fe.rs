//! Finite element families and shape function evaluation.
//!
//! A finite element type is a pair of a family and a polynomial order. The shape functions of
//! most families can be evaluated from the reference element type alone, but families whose
//! degrees of freedom depend on the orientation of edges (Bernstein and Hierarchic in 2D) or on
//! the geometry of the element (Hermite and Clough) need the concrete element, supplied as an
//! [`ElemView`].
use crate::element::{self, ElemType};
use crate::error::{Error, Result};
use crate::mesh::ElemView;
use crate::Real;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

mod bernstein;
mod clough;
mod hermite;
mod hierarchic;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FEFamily {
    Bernstein,
    Hierarchic,
    L2Hierarchic,
    SideHierarchic,
    Hermite,
    Clough,
}

/// Continuity of a finite element space across element boundaries.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FEContinuity {
    Discontinuous,
    /// Continuous on sides, discontinuous everywhere else.
    SideDiscontinuous,
    C0,
    C1,
}

/// Which quantity of a shape function to evaluate.
///
/// The index of a second derivative enumerates the upper triangle of the Hessian, i.e.
/// `0 = xx` in 1D and `0 = xx, 1 = xy, 2 = yy` in 2D.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Derivative {
    Value,
    First(usize),
    Second(usize),
}

impl Derivative {
    fn check(&self, elem_type: ElemType) -> Result<()> {
        let dim = elem_type.dim();
        let (direction, n_directions) = match *self {
            Derivative::Value => return Ok(()),
            Derivative::First(j) => (j, dim),
            Derivative::Second(j) => (j, dim * (dim + 1) / 2),
        };
        if direction < n_directions {
            Ok(())
        } else {
            Err(Error::InvalidDerivative { elem_type, direction })
        }
    }

    /// Number of differentiations along each reference direction.
    fn orders(&self) -> [usize; 2] {
        match *self {
            Derivative::Value => [0, 0],
            Derivative::First(0) => [1, 0],
            Derivative::First(_) => [0, 1],
            Derivative::Second(0) => [2, 0],
            Derivative::Second(1) => [1, 1],
            Derivative::Second(_) => [0, 2],
        }
    }
}

/// The closed set of shape function evaluators, selected by family and reference dimension.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Basis {
    /// The single constant function on a point element, shared by every family.
    Constant,
    Bernstein1d,
    Bernstein2d,
    Hierarchic1d,
    Hierarchic2d,
    L2Hierarchic1d,
    L2Hierarchic2d,
    SideHierarchic1d,
    Hermite1d,
    Clough1d,
}

impl Basis {
    pub fn select(family: FEFamily, elem_type: ElemType) -> Result<Self> {
        use FEFamily::*;
        if elem_type.is_infinite() {
            return Err(Error::UnsupportedElement { family, elem_type });
        }
        let basis = match (family, elem_type.dim()) {
            (_, 0) => Basis::Constant,
            (Bernstein, 1) => Basis::Bernstein1d,
            (Bernstein, 2) => Basis::Bernstein2d,
            (Hierarchic, 1) => Basis::Hierarchic1d,
            (Hierarchic, 2) => Basis::Hierarchic2d,
            (L2Hierarchic, 1) => Basis::L2Hierarchic1d,
            (L2Hierarchic, 2) => Basis::L2Hierarchic2d,
            (SideHierarchic, 1) => Basis::SideHierarchic1d,
            (Hermite, 1) => Basis::Hermite1d,
            (Clough, 1) => Basis::Clough1d,
            _ => return Err(Error::UnsupportedElement { family, elem_type }),
        };
        Ok(basis)
    }

    /// Whether evaluation depends on the concrete element and not only on its type.
    pub fn requires_elem(&self) -> bool {
        matches!(
            self,
            Basis::Bernstein2d | Basis::Hierarchic2d | Basis::Hermite1d | Basis::Clough1d
        )
    }

    fn orientation_error(&self) -> Error {
        let message = match self {
            Basis::Bernstein2d => "Bernstein polynomials require the element type because edge orientation is needed",
            Basis::Hierarchic2d => "Hierarchic shape functions require an element for edge orientation",
            Basis::Hermite1d => "Hermite elements require the real element to construct gradient-based degrees of freedom",
            _ => "Clough-Tocher elements require the real element to construct gradient-based degrees of freedom",
        };
        Error::OrientationRequired(message)
    }
}

/// A finite element family together with its polynomial order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FEType {
    pub family: FEFamily,
    pub order: usize,
}

impl FEType {
    pub fn new(family: FEFamily, order: usize) -> Self {
        Self { family, order }
    }

    /// Total number of shape functions on an element of type `elem_type`.
    pub fn n_dofs(&self, elem_type: ElemType) -> Result<usize> {
        use FEFamily::*;
        match self.family {
            Bernstein => bernstein::n_dofs(elem_type, self.order),
            Hierarchic | L2Hierarchic => hierarchic::n_dofs(self.family, elem_type, self.order),
            SideHierarchic => hierarchic::side_n_dofs(elem_type),
            Hermite => hermite::n_dofs(elem_type, self.order),
            Clough => clough::n_dofs(elem_type, self.order),
        }
    }

    /// Number of shape functions associated with local node `node`.
    pub fn n_dofs_at_node(&self, elem_type: ElemType, node: usize) -> Result<usize> {
        use FEFamily::*;
        if node >= elem_type.n_nodes() {
            return Err(Error::InvalidNode { elem_type, node });
        }
        match self.family {
            Bernstein => bernstein::n_dofs_at_node(elem_type, self.order, node),
            Hierarchic => hierarchic::n_dofs_at_node(elem_type, self.order, node),
            L2Hierarchic => hierarchic::n_dofs(self.family, elem_type, self.order).map(|_| 0),
            SideHierarchic => hierarchic::side_n_dofs_at_node(elem_type, node),
            Hermite => hermite::n_dofs_at_node(elem_type, self.order, node),
            Clough => clough::n_dofs_at_node(elem_type, self.order, node),
        }
    }

    /// Number of shape functions associated with the element itself rather than a node.
    pub fn n_dofs_per_elem(&self, elem_type: ElemType) -> Result<usize> {
        use FEFamily::*;
        match self.family {
            Bernstein => bernstein::n_dofs_per_elem(elem_type, self.order),
            Hierarchic => hierarchic::n_dofs_per_elem(elem_type, self.order),
            L2Hierarchic => hierarchic::n_dofs(self.family, elem_type, self.order),
            SideHierarchic => hierarchic::side_n_dofs(elem_type).map(|_| 0),
            Hermite => hermite::n_dofs_per_elem(elem_type, self.order),
            Clough => clough::n_dofs(elem_type, self.order).map(|_| 0),
        }
    }

    pub fn continuity(&self) -> FEContinuity {
        use FEFamily::*;
        match self.family {
            Bernstein | Hierarchic => FEContinuity::C0,
            L2Hierarchic => FEContinuity::Discontinuous,
            SideHierarchic => FEContinuity::SideDiscontinuous,
            Hermite | Clough => FEContinuity::C1,
        }
    }

    /// Whether the basis of order `p` is contained in the basis of order `p + 1`.
    pub fn is_hierarchic(&self) -> bool {
        use FEFamily::*;
        match self.family {
            Hierarchic | L2Hierarchic | SideHierarchic | Hermite => true,
            Bernstein | Clough => false,
        }
    }

    /// Evaluates shape function `i` at reference point `p` without a concrete element.
    ///
    /// Fails with [`Error::OrientationRequired`] for bases whose functions depend on the
    /// orientation or the geometry of the element.
    pub fn shape_for_type<T: Real>(&self, elem_type: ElemType, i: usize, p: &Point3<T>) -> Result<T> {
        evaluate(*self, elem_type, None, i, p, Derivative::Value)
    }

    /// Derivative of shape function `i` along reference direction `j`.
    pub fn shape_deriv_for_type<T: Real>(&self, elem_type: ElemType, i: usize, j: usize, p: &Point3<T>) -> Result<T> {
        evaluate(*self, elem_type, None, i, p, Derivative::First(j))
    }

    /// Second derivative `j` (an index into the upper triangle of the Hessian).
    pub fn shape_second_deriv_for_type<T: Real>(
        &self,
        elem_type: ElemType,
        i: usize,
        j: usize,
        p: &Point3<T>,
    ) -> Result<T> {
        evaluate(*self, elem_type, None, i, p, Derivative::Second(j))
    }
}

/// Coefficients scaling reference derivative degrees of freedom to physical derivatives.
///
/// `d1xd1x` and `d2xd2x` are `dx/dxi` at the first (`xi = -1`) and second (`xi = 1`)
/// vertex of a 1D element.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScalingCoefficients<T> {
    pub d1xd1x: T,
    pub d2xd2x: T,
}

impl<T: Real> ScalingCoefficients<T> {
    pub fn from_elem(elem: &ElemView<T>) -> Result<Self> {
        let elem_type = elem.elem_type();
        let points = elem.points();
        let dxdxi = |xi: f64| -> Result<T> {
            let xi = Point3::new(T::from_f64(xi).expect("Literal must fit in T"), T::zero(), T::zero());
            let jacobian = element::reference_jacobian(elem_type, &points, &xi)?;
            Ok(jacobian[(0, 0)])
        };
        Ok(Self {
            d1xd1x: dxdxi(-1.0)?,
            d2xd2x: dxdxi(1.0)?,
        })
    }
}

/// Remembers the scaling coefficients of the most recently evaluated element.
///
/// Entries are keyed on both the element id and its unique id, so an element id that is
/// recycled after deletion never picks up the coefficients of the deleted element. Elements
/// without ids (e.g. side proxies) are never cached. The cache assumes that vertex coordinates
/// do not change while it is in use, see [`ScalingCache::clear`].
#[derive(Debug, Clone)]
pub struct ScalingCache<T> {
    last: Option<((usize, u64), ScalingCoefficients<T>)>,
}

impl<T> Default for ScalingCache<T> {
    fn default() -> Self {
        Self { last: None }
    }
}

impl<T: Real> ScalingCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.last = None;
    }

    pub fn get_or_compute(&mut self, elem: &ElemView<T>) -> Result<ScalingCoefficients<T>> {
        let key = elem.id().zip(elem.unique_id());
        if let (Some(key), Some((cached_key, coefficients))) = (key, &self.last) {
            if key == *cached_key {
                return Ok(*coefficients);
            }
        }
        let coefficients = ScalingCoefficients::from_elem(elem)?;
        if let Some(key) = key {
            log::trace!("Computed scaling coefficients for element {:?}", key);
            self.last = Some((key, coefficients));
        }
        Ok(coefficients)
    }
}

/// Evaluates shape functions of a fixed finite element type on a sequence of elements.
///
/// Keeps the geometric scaling coefficients of Hermite and Clough elements in an explicit
/// cache owned by the evaluator.
#[derive(Debug, Clone)]
pub struct ShapeEvaluator<T> {
    fe_type: FEType,
    cache: ScalingCache<T>,
}

impl<T: Real> ShapeEvaluator<T> {
    pub fn new(fe_type: FEType) -> Self {
        Self {
            fe_type,
            cache: ScalingCache::new(),
        }
    }

    pub fn fe_type(&self) -> FEType {
        self.fe_type
    }

    pub fn cache_mut(&mut self) -> &mut ScalingCache<T> {
        &mut self.cache
    }

    fn evaluate_cached(&mut self, elem: &ElemView<T>, i: usize, p: &Point3<T>, derivative: Derivative) -> Result<T> {
        let basis = Basis::select(self.fe_type.family, elem.elem_type())?;
        let scaling = match basis {
            Basis::Hermite1d | Basis::Clough1d => Some(self.cache.get_or_compute(elem)?),
            _ => None,
        };
        evaluate_basis(basis, self.fe_type, elem.elem_type(), Some((elem, scaling)), i, p, derivative)
    }

    pub fn shape(&mut self, elem: &ElemView<T>, i: usize, p: &Point3<T>) -> Result<T> {
        self.evaluate_cached(elem, i, p, Derivative::Value)
    }

    pub fn shape_deriv(&mut self, elem: &ElemView<T>, i: usize, j: usize, p: &Point3<T>) -> Result<T> {
        self.evaluate_cached(elem, i, p, Derivative::First(j))
    }

    pub fn shape_second_deriv(&mut self, elem: &ElemView<T>, i: usize, j: usize, p: &Point3<T>) -> Result<T> {
        self.evaluate_cached(elem, i, p, Derivative::Second(j))
    }

    /// Values of all shape functions at `p`.
    pub fn shapes(&mut self, elem: &ElemView<T>, p: &Point3<T>) -> Result<Vec<T>> {
        let n = self.fe_type.n_dofs(elem.elem_type())?;
        (0..n).map(|i| self.shape(elem, i, p)).collect()
    }
}

/// Value of shape function `i` of `fe_type` on `elem` at reference point `p`.
pub fn shape<T: Real>(fe_type: FEType, elem: &ElemView<T>, i: usize, p: &Point3<T>) -> Result<T> {
    evaluate(fe_type, elem.elem_type(), Some(elem), i, p, Derivative::Value)
}

/// Derivative of shape function `i` along reference direction `j`.
pub fn shape_deriv<T: Real>(fe_type: FEType, elem: &ElemView<T>, i: usize, j: usize, p: &Point3<T>) -> Result<T> {
    evaluate(fe_type, elem.elem_type(), Some(elem), i, p, Derivative::First(j))
}

/// Second derivative `j` of shape function `i`, with `j` indexing the upper triangle of the
/// reference Hessian.
pub fn shape_second_deriv<T: Real>(
    fe_type: FEType,
    elem: &ElemView<T>,
    i: usize,
    j: usize,
    p: &Point3<T>,
) -> Result<T> {
    evaluate(fe_type, elem.elem_type(), Some(elem), i, p, Derivative::Second(j))
}

fn evaluate<T: Real>(
    fe_type: FEType,
    elem_type: ElemType,
    elem: Option<&ElemView<T>>,
    i: usize,
    p: &Point3<T>,
    derivative: Derivative,
) -> Result<T> {
    let basis = Basis::select(fe_type.family, elem_type)?;
    let context = match (basis, elem) {
        (Basis::Hermite1d | Basis::Clough1d, Some(elem)) => Some((elem, Some(ScalingCoefficients::from_elem(elem)?))),
        (_, Some(elem)) => Some((elem, None)),
        (_, None) => None,
    };
    evaluate_basis(basis, fe_type, elem_type, context, i, p, derivative)
}

fn evaluate_basis<T: Real>(
    basis: Basis,
    fe_type: FEType,
    elem_type: ElemType,
    context: Option<(&ElemView<T>, Option<ScalingCoefficients<T>>)>,
    i: usize,
    p: &Point3<T>,
    derivative: Derivative,
) -> Result<T> {
    derivative.check(elem_type)?;
    let n_dofs = fe_type.n_dofs(elem_type)?;
    if i >= n_dofs {
        return Err(Error::InvalidShapeIndex {
            family: fe_type.family,
            elem_type,
            order: fe_type.order,
            index: i,
        });
    }
    let elem = context.map(|(elem, _)| elem);
    if basis.requires_elem() && elem.is_none() {
        return Err(basis.orientation_error());
    }
    let scaling = context.and_then(|(_, scaling)| scaling);
    let order = fe_type.order;
    match basis {
        Basis::Constant => Ok(T::one()),
        Basis::Bernstein1d => Ok(bernstein::shape_1d(elem_type, order, i, p, derivative)),
        Basis::Bernstein2d => match elem {
            Some(elem) => bernstein::shape_2d(elem_type, order, i, p, derivative, elem),
            None => Err(basis.orientation_error()),
        },
        Basis::Hierarchic1d | Basis::L2Hierarchic1d => Ok(hierarchic::shape_1d(i, p, derivative)),
        Basis::Hierarchic2d => Ok(hierarchic::shape_2d(order, i, p, derivative, elem)),
        Basis::L2Hierarchic2d => Ok(hierarchic::shape_2d(order, i, p, derivative, None)),
        Basis::SideHierarchic1d => Ok(hierarchic::side_shape_1d(i, p, derivative)),
        Basis::Hermite1d => match scaling {
            Some(scaling) => Ok(hermite::shape(i, p, derivative, &scaling)),
            None => Err(basis.orientation_error()),
        },
        Basis::Clough1d => match scaling {
            Some(scaling) => Ok(clough::shape(i, p, derivative, &scaling)),
            None => Err(basis.orientation_error()),
        },
    }
}

/// Decomposes the index of a quadrilateral shape function of order `order` into a pair of 1D
/// indices.
///
/// Vertex functions come first, followed by the functions of each edge in order and the
/// interior functions, which are enumerated in square shells of increasing size. 1D indices
/// follow the `Edge3` convention: `0` and `1` are the vertex functions, `k >= 2` the `k`-th
/// function of the edge interior.
pub(crate) fn quad_i0_i1(i: usize, order: usize) -> (usize, usize) {
    let p = order;
    const VERTICES: [(usize, usize); 4] = [(0, 0), (1, 0), (1, 1), (0, 1)];
    if i < 4 {
        VERTICES[i]
    } else if i < p + 3 {
        (i - 2, 0)
    } else if i < 2 * p + 2 {
        (1, i - p - 1)
    } else if i < 3 * p + 1 {
        (i - 2 * p, 1)
    } else if i < 4 * p {
        (0, i - 3 * p + 1)
    } else {
        let (column, row) = square_shell_position(i - 4 * p);
        (column + 2, row + 2)
    }
}

/// Position of index `b` in the enumeration of the non-negative lattice by square shells.
///
/// Shell `k` first runs through columns `0..=k` of row `k` and then down column `k` through
/// rows `k - 1` to `0`.
fn square_shell_position(b: usize) -> (usize, usize) {
    let k = num::integer::sqrt(b);
    let offset = b - k * k;
    if offset <= k {
        (offset, k)
    } else {
        (k, 2 * k - offset)
    }
}
