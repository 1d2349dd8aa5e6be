//! One-dimensional metric spaces: the per-axis arithmetic every vector operation goes through.
//!
//! Every realization must satisfy, up to floating tolerance:
//!  - `sum` is commutative and associative, `sum([0, a]) == a` and `sum([invert(a), a]) == 0`
//!  - `distance` is symmetric, non-negative, zero on equal inputs and obeys the triangle inequality
//!  - `invert(invert(a)) == a` and `invert(0) == 0`

use std::{error::Error, fmt};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricError {
    NonPositiveCircumference { circumference: f64 },
}

impl fmt::Display for MetricError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricError::NonPositiveCircumference { circumference } => write!(
                f,
                "circle circumference must be positive and finite (got {circumference})"
            ),
        }
    }
}

impl Error for MetricError {}

/// A circle of fixed circumference. The coordinate is an arc length, so it behaves like an
/// angle that has not been normalised by the radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    circumference: f64,
}

impl Circle {
    pub fn new(circumference: f64) -> Result<Self, MetricError> {
        if !(circumference.is_finite() && circumference > 0.0) {
            return Err(MetricError::NonPositiveCircumference { circumference });
        }
        Ok(Self { circumference })
    }

    pub fn circumference(&self) -> f64 {
        self.circumference
    }

    /// Signed remainder of `value` by the circumference, in `(-C/2, C/2]`.
    fn wrap(&self, value: f64) -> f64 {
        let c = self.circumference;
        let half = c / 2.0;
        let r = value % c;
        if r > half {
            r - c
        } else if r <= -half {
            r + c
        } else {
            r
        }
    }
}

/// The arithmetic of a single coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricSpace1D {
    /// The real line, unbounded above and below.
    Line,
    /// A periodic axis. Leaving one end re-enters at the other.
    Circle(Circle),
}

impl MetricSpace1D {
    pub fn line() -> Self {
        MetricSpace1D::Line
    }

    pub fn circle(circumference: f64) -> Result<Self, MetricError> {
        Circle::new(circumference).map(MetricSpace1D::Circle)
    }

    /// N-ary addition. Combining many terms must go through one call so a periodic axis wraps
    /// the exact total once instead of re-wrapping partial sums.
    pub fn sum<I>(&self, scalars: I) -> f64
    where
        I: IntoIterator<Item = f64>,
    {
        let total = scalars.into_iter().fold(0.0, |acc, s| acc + s);
        match self {
            MetricSpace1D::Line => total,
            MetricSpace1D::Circle(circle) => circle.wrap(total),
        }
    }

    /// Length of the shortest path between two coordinates.
    ///
    /// On a circle the line distance is reduced modulo the circumference and reflected once it
    /// passes the antipode, so the result is always in `[0, C/2]`.
    pub fn distance(&self, a: f64, b: f64) -> f64 {
        let line = (a - b).abs();
        match self {
            MetricSpace1D::Line => line,
            MetricSpace1D::Circle(circle) => {
                let c = circle.circumference;
                let reduced = line % c;
                if reduced > c / 2.0 {
                    c - reduced
                } else {
                    reduced
                }
            }
        }
    }

    /// Additive inverse. On a circle this is `C - (a mod C)`, normalised back into the
    /// canonical `(-C/2, C/2]` range so that zero stays fixed.
    pub fn invert(&self, a: f64) -> f64 {
        match self {
            MetricSpace1D::Line => -a,
            MetricSpace1D::Circle(circle) => circle.wrap(circle.circumference - circle.wrap(a)),
        }
    }

    /// Single-term sum: brings a raw value into the axis's canonical range.
    pub fn normalise(&self, a: f64) -> f64 {
        self.sum([a])
    }

    /// Render-ready coordinate: `[0, C)` on a circle, the raw value on the line.
    pub fn canonical(&self, a: f64) -> f64 {
        match self {
            MetricSpace1D::Line => a,
            MetricSpace1D::Circle(circle) => {
                let c = circle.circumference;
                let r = a.rem_euclid(c);
                // rem_euclid may round up to exactly `c` for tiny negative inputs.
                if r >= c {
                    0.0
                } else {
                    r
                }
            }
        }
    }

    pub fn is_periodic(&self) -> bool {
        matches!(self, MetricSpace1D::Circle(_))
    }
}
