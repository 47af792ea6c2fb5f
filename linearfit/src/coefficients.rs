use serde::{Deserialize, Serialize};

use crate::point_set::Point;

/// Raw coefficients of a 2-D linear transform from the reference frame into
/// the moving frame.
///
/// A reference point `(x, y)` maps to the moving-frame point `(u, v)` by:
///
/// ```text
///   u = p[2] + p[0] * x + p[1] * y;
///   v = q[2] + q[0] * x + q[1] * y;
/// ```
///
/// The linear terms sit in slots 0 and 1 and the constant offset in slot 2.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coefficients {
    /// X-axis terms: `[x factor, y factor, offset]`.
    pub p: [f64; 3],

    /// Y-axis terms: `[x factor, y factor, offset]`.
    pub q: [f64; 3],
}

impl Coefficients {
    pub fn new(p: [f64; 3], q: [f64; 3]) -> Self {
        Coefficients { p, q }
    }

    /// The transform that leaves every point where it is.
    pub fn identity() -> Self {
        Coefficients {
            p: [1.0, 0.0, 0.0],
            q: [0.0, 1.0, 0.0],
        }
    }

    /// Pure translation by `(dx, dy)`.
    pub fn from_shift(dx: f64, dy: f64) -> Self {
        Coefficients {
            p: [1.0, 0.0, dx],
            q: [0.0, 1.0, dy],
        }
    }

    /// Determinant of the 2×2 linear part. Its sign gives the handedness.
    pub fn determinant(&self) -> f64 {
        self.p[0] * self.q[1] - self.p[1] * self.q[0]
    }

    /// Transforms a single reference-frame point into the moving frame.
    ///
    /// # Examples
    /// ```
    /// # use linearfit::coefficients::Coefficients;
    /// let c = Coefficients::new([0.0, 1.0, 5.0], [-1.0, 0.0, 5.0]);
    /// assert_eq!(c.transform(10.0, 0.0), (5.0, -5.0));
    /// ```
    pub fn transform(&self, x: f64, y: f64) -> (f64, f64) {
        let u = self.p[2] + self.p[0] * x + self.p[1] * y;
        let v = self.q[2] + self.q[0] * x + self.q[1] * y;
        (u, v)
    }

    /// Applies the transform to every point of `points`, returning a new list
    /// in the same order.
    ///
    /// # Parameters
    /// - `points`: Reference-frame positions.
    ///
    /// # Returns
    /// The positions predicted in the moving frame.
    ///
    /// # Examples
    /// ```
    /// # use linearfit::coefficients::Coefficients;
    /// let shift = Coefficients::from_shift(100.0, 200.0);
    /// let moved = shift.apply(&[(0.0, 0.0), (50.0, 50.0)]);
    /// assert_eq!(moved, vec![(100.0, 200.0), (150.0, 250.0)]);
    /// ```
    pub fn apply(&self, points: &[Point]) -> Vec<Point> {
        points.iter().map(|&(x, y)| self.transform(x, y)).collect()
    }
}

impl Default for Coefficients {
    fn default() -> Self {
        Coefficients::identity()
    }
}
