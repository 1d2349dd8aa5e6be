//! Two-dimensional spaces built as the cartesian product of two [`MetricSpace1D`] axes, and the
//! [`Vector`] algebra over them.
//!
//! Vectors do not borrow their space. They carry a [`SpaceId`] handle issued by a [`Topology`]
//! registry, and every operation takes the space explicitly and checks the handle, so mixing
//! vectors from different spaces fails fast with [`SpaceError::Mismatch`].

use crate::metric::{MetricError, MetricSpace1D};
use std::sync::atomic::{AtomicU32, Ordering};
use std::{error::Error, fmt};

static NEXT_SPACE_ID: AtomicU32 = AtomicU32::new(0);

/// Handle of a registered space. Unique across every [`Topology`] in the process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpaceId(u32);

impl fmt::Display for SpaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "space#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceError {
    Mismatch { expected: SpaceId, actual: SpaceId },
    UnknownSpace(SpaceId),
}

impl fmt::Display for SpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpaceError::Mismatch { expected, actual } => write!(
                f,
                "vector belongs to {actual} but the operation is in {expected}"
            ),
            SpaceError::UnknownSpace(id) => write!(f, "{id} is not registered"),
        }
    }
}

impl Error for SpaceError {}

/// Cartesian product of two independent axes. Stateless and immutable once registered.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MetricSpace2D {
    id: SpaceId,
    x_axis: MetricSpace1D,
    y_axis: MetricSpace1D,
}

impl MetricSpace2D {
    pub fn id(&self) -> SpaceId {
        self.id
    }

    pub fn x_axis(&self) -> &MetricSpace1D {
        &self.x_axis
    }

    pub fn y_axis(&self) -> &MetricSpace1D {
        &self.y_axis
    }

    pub fn is_periodic(&self) -> bool {
        self.x_axis.is_periodic() || self.y_axis.is_periodic()
    }

    pub fn zero(&self) -> Vector {
        Vector {
            space: self.id,
            x: 0.0,
            y: 0.0,
        }
    }

    /// A vector in this space. Coordinates are normalised through each axis.
    pub fn vector(&self, x: f64, y: f64) -> Vector {
        Vector {
            space: self.id,
            x: self.x_axis.normalise(x),
            y: self.y_axis.normalise(y),
        }
    }

    /// Re-express the components of a vector from another space in this one, e.g. a position
    /// displacement used as a velocity-space direction.
    pub fn rebase(&self, v: &Vector) -> Vector {
        self.vector(v.x, v.y)
    }

    pub fn check(&self, v: &Vector) -> Result<(), SpaceError> {
        if v.space == self.id {
            Ok(())
        } else {
            Err(SpaceError::Mismatch {
                expected: self.id,
                actual: v.space,
            })
        }
    }

    fn geodesic_components(&self, from: &Vector, to: &Vector) -> (f64, f64) {
        (
            self.x_axis.sum([self.x_axis.invert(from.x), to.x]),
            self.y_axis.sum([self.y_axis.invert(from.y), to.y]),
        )
    }

    /// Signed shortest-path displacement from `from` to `to`, axis by axis.
    pub fn geodesic_displacement(&self, from: &Vector, to: &Vector) -> Result<Vector, SpaceError> {
        self.check(from)?;
        self.check(to)?;
        let (dx, dy) = self.geodesic_components(from, to);
        Ok(Vector {
            space: self.id,
            x: dx,
            y: dy,
        })
    }

    /// Euclidean combination of the per-axis metric distances. Exactly symmetric in `a` and `b`.
    pub fn distance(&self, a: &Vector, b: &Vector) -> Result<f64, SpaceError> {
        self.check(a)?;
        self.check(b)?;
        let dx = self.x_axis.distance(a.x, b.x);
        let dy = self.y_axis.distance(a.y, b.y);
        Ok(dx.hypot(dy))
    }
}

/// Registry of the spaces one scenario works in. Ids come from a process-wide counter, so a
/// vector from another registry never passes [`MetricSpace2D::check`].
#[derive(Clone, Debug, Default)]
pub struct Topology {
    spaces: Vec<MetricSpace2D>,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, x_axis: MetricSpace1D, y_axis: MetricSpace1D) -> MetricSpace2D {
        let id = SpaceId(NEXT_SPACE_ID.fetch_add(1, Ordering::Relaxed));
        let space = MetricSpace2D { id, x_axis, y_axis };
        self.spaces.push(space);
        space
    }

    /// Euclidean geometry with no boundary: an infinite plane.
    pub fn euclidean_plane(&mut self) -> MetricSpace2D {
        self.register(MetricSpace1D::line(), MetricSpace1D::line())
    }

    /// Periodic on both axes: leaving through one edge re-enters through the opposite one.
    pub fn euclidean_toroid(&mut self, width: f64, height: f64) -> Result<MetricSpace2D, MetricError> {
        let x_axis = MetricSpace1D::circle(width)?;
        let y_axis = MetricSpace1D::circle(height)?;
        Ok(self.register(x_axis, y_axis))
    }

    pub fn get(&self, id: SpaceId) -> Result<&MetricSpace2D, SpaceError> {
        self.spaces
            .iter()
            .find(|space| space.id == id)
            .ok_or(SpaceError::UnknownSpace(id))
    }

    pub fn len(&self) -> usize {
        self.spaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spaces.is_empty()
    }
}

/// A point or displacement in one [`MetricSpace2D`].
///
/// Mutating operations (`accumulate`, `scale`, `subtract`) change the vector in place and
/// return it for chaining. `times` and `minus` leave it untouched and return a new value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vector {
    space: SpaceId,
    x: f64,
    y: f64,
}

impl Vector {
    pub fn space(&self) -> SpaceId {
        self.space
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn components(&self) -> [f64; 2] {
        [self.x, self.y]
    }

    /// Adds every term to `self` with one N-ary axis sum per coordinate.
    pub fn accumulate(
        &mut self,
        space: &MetricSpace2D,
        terms: &[Vector],
    ) -> Result<&mut Self, SpaceError> {
        space.check(self)?;
        for term in terms {
            space.check(term)?;
        }
        let x = space
            .x_axis
            .sum(std::iter::once(self.x).chain(terms.iter().map(|t| t.x)));
        let y = space
            .y_axis
            .sum(std::iter::once(self.y).chain(terms.iter().map(|t| t.y)));
        self.x = x;
        self.y = y;
        Ok(self)
    }

    pub fn scale(&mut self, space: &MetricSpace2D, factor: f64) -> Result<&mut Self, SpaceError> {
        space.check(self)?;
        self.x = space.x_axis.sum([factor * self.x]);
        self.y = space.y_axis.sum([factor * self.y]);
        Ok(self)
    }

    pub fn times(&self, space: &MetricSpace2D, factor: f64) -> Result<Vector, SpaceError> {
        let mut scaled = *self;
        scaled.scale(space, factor)?;
        Ok(scaled)
    }

    /// `self = self - other`, taken along the geodesic.
    pub fn subtract(&mut self, space: &MetricSpace2D, other: &Vector) -> Result<&mut Self, SpaceError> {
        let difference = space.geodesic_displacement(other, self)?;
        self.x = difference.x;
        self.y = difference.y;
        Ok(self)
    }

    pub fn minus(&self, space: &MetricSpace2D, other: &Vector) -> Result<Vector, SpaceError> {
        space.geodesic_displacement(other, self)
    }

    /// Additive inverse through each axis's `invert`.
    pub fn negated(&self, space: &MetricSpace2D) -> Result<Vector, SpaceError> {
        space.check(self)?;
        Ok(Vector {
            space: self.space,
            x: space.x_axis.invert(self.x),
            y: space.y_axis.invert(self.y),
        })
    }

    /// Geodesic distance from the head of the vector to the origin.
    pub fn magnitude(&self, space: &MetricSpace2D) -> Result<f64, SpaceError> {
        space.distance(self, &space.zero())
    }

    /// Scalar product on wrapped coordinates. `u.dot(u).sqrt() == u.magnitude()`.
    pub fn dot(&self, space: &MetricSpace2D, other: &Vector) -> Result<f64, SpaceError> {
        space.check(self)?;
        space.check(other)?;
        let (x, y) = (&space.x_axis, &space.y_axis);
        Ok(x.normalise(self.x) * x.normalise(other.x) + y.normalise(self.y) * y.normalise(other.y))
    }
}
