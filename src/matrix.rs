use std::fmt;
use std::ops::{ Index, IndexMut, Mul };

use serde::{ Serialize, Deserialize };

use crate::feq;
use crate::tuple::Tuple4D;

/// A 4x4 row-major matrix.
///
/// Element `(r, c)` is row `r`, column `c`, and tuples are multiplied on the
/// right as column vectors. This is the layout the view and projection
/// transforms are written in, so `projection * model_view` maps a world point
/// into clip space.
///
/// # Examples
///
/// ```
/// # use ray_caster::tuple::Tuple4D;
/// # use ray_caster::matrix::Matrix4D;
/// let m = Matrix4D::translation(0.0, 0.0, -3.0);
/// assert_eq!(m * Tuple4D::point(0.0, 0.0, 0.0), Tuple4D::point(0.0, 0.0, -3.0));
/// ```
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize)]
pub struct Matrix4D {
    rows: [[f64; 4]; 4],
}

/// Approximate, element-wise equality.
impl PartialEq for Matrix4D {
    fn eq(&self, other: &Matrix4D) -> bool {
        self.rows.iter().flatten()
            .zip(other.rows.iter().flatten())
            .all(|(x, y)| feq(*x, *y))
    }
}

/// 2x2 determinants of the top and bottom row pairs.
///
/// `upper[k]` and `lower[5 - k]` cover complementary columns, so the full
/// determinant is the alternating sum of their products.
struct Minors {
    upper: [f64; 6],
    lower: [f64; 6],
}

impl Minors {
    fn of(m: &Matrix4D) -> Minors {
        let [a, b, c, d] = m.rows;
        let pair = |p: &[f64; 4], q: &[f64; 4], i: usize, j: usize| {
            p[i] * q[j] - p[j] * q[i]
        };

        Minors {
            upper: [
                pair(&a, &b, 0, 1), pair(&a, &b, 0, 2), pair(&a, &b, 0, 3),
                pair(&a, &b, 1, 2), pair(&a, &b, 1, 3), pair(&a, &b, 2, 3),
            ],
            lower: [
                pair(&c, &d, 0, 1), pair(&c, &d, 0, 2), pair(&c, &d, 0, 3),
                pair(&c, &d, 1, 2), pair(&c, &d, 1, 3), pair(&c, &d, 2, 3),
            ],
        }
    }

    fn determinant(&self) -> f64 {
        let (s, c) = (&self.upper, &self.lower);
        s[0] * c[5] - s[1] * c[4] + s[2] * c[3]
            + s[3] * c[2] - s[4] * c[1] + s[5] * c[0]
    }
}

impl Matrix4D {
    /// Creates a matrix with every element set to `0.0`.
    pub fn new() -> Matrix4D {
        Matrix4D { rows: [[0.0; 4]; 4] }
    }

    pub fn identity() -> Matrix4D {
        Matrix4D::scaling(1.0, 1.0, 1.0)
    }

    pub fn translation(x: f64, y: f64, z: f64) -> Matrix4D {
        Matrix4D {
            rows: [
                [1.0, 0.0, 0.0, x],
                [0.0, 1.0, 0.0, y],
                [0.0, 0.0, 1.0, z],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    pub fn scaling(x: f64, y: f64, z: f64) -> Matrix4D {
        Matrix4D {
            rows: [
                [x, 0.0, 0.0, 0.0],
                [0.0, y, 0.0, 0.0],
                [0.0, 0.0, z, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Rotation about the X axis by `r` radians.
    pub fn rotation_x(r: f64) -> Matrix4D {
        let (sin, cos) = r.sin_cos();

        Matrix4D {
            rows: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, cos, -sin, 0.0],
                [0.0, sin, cos, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Rotation about the Y axis by `r` radians.
    pub fn rotation_y(r: f64) -> Matrix4D {
        let (sin, cos) = r.sin_cos();

        Matrix4D {
            rows: [
                [cos, 0.0, sin, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [-sin, 0.0, cos, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// A symmetric perspective projection.
    ///
    /// `fovy` is the vertical field of view in degrees, `aspect` is width over
    /// height, and `near`/`far` are the (positive) distances to the clipping
    /// planes. Eye-space points at `z == -near` land on NDC depth `-1`, points
    /// at `z == -far` on `+1`.
    ///
    /// ```
    /// # use ray_caster::tuple::Tuple4D;
    /// # use ray_caster::matrix::Matrix4D;
    /// let p = Matrix4D::perspective(45.0, 1.0, 1.0, 5.0);
    /// let clip = p * Tuple4D::point(0.0, 0.0, -1.0);
    /// assert_eq!(clip / clip.w, Tuple4D::point(0.0, 0.0, -1.0));
    /// ```
    pub fn perspective(fovy: f64, aspect: f64, near: f64, far: f64)
        -> Matrix4D {
        let top = (fovy.to_radians() / 2.0).tan() * near;
        let right = top * aspect;
        let depth = far - near;

        let mut proj = Self::new();
        proj[(0, 0)] = near / right;
        proj[(1, 1)] = near / top;
        proj[(2, 2)] = -(far + near) / depth;
        proj[(2, 3)] = -2.0 * far * near / depth;
        proj[(3, 2)] = -1.0;

        proj
    }

    pub fn determinant(&self) -> f64 {
        Minors::of(self).determinant()
    }

    /// Calculates the inverse of a `Matrix4D`, if it exists.
    ///
    /// Returns `None` when the determinant is zero or not finite.
    pub fn inverse(&self) -> Option<Matrix4D> {
        let minors = Minors::of(self);
        let det = minors.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }

        let [a, b, c, d] = self.rows;
        let (s, k) = (&minors.upper, &minors.lower);
        let inv = 1.0 / det;

        let rows = [
            [
                 b[1] * k[5] - b[2] * k[4] + b[3] * k[3],
                -a[1] * k[5] + a[2] * k[4] - a[3] * k[3],
                 d[1] * s[5] - d[2] * s[4] + d[3] * s[3],
                -c[1] * s[5] + c[2] * s[4] - c[3] * s[3],
            ],
            [
                -b[0] * k[5] + b[2] * k[2] - b[3] * k[1],
                 a[0] * k[5] - a[2] * k[2] + a[3] * k[1],
                -d[0] * s[5] + d[2] * s[2] - d[3] * s[1],
                 c[0] * s[5] - c[2] * s[2] + c[3] * s[1],
            ],
            [
                 b[0] * k[4] - b[1] * k[2] + b[3] * k[0],
                -a[0] * k[4] + a[1] * k[2] - a[3] * k[0],
                 d[0] * s[4] - d[1] * s[2] + d[3] * s[0],
                -c[0] * s[4] + c[1] * s[2] - c[3] * s[0],
            ],
            [
                -b[0] * k[3] + b[1] * k[1] - b[2] * k[0],
                 a[0] * k[3] - a[1] * k[1] + a[2] * k[0],
                -d[0] * s[3] + d[1] * s[1] - d[2] * s[0],
                 c[0] * s[3] - c[1] * s[1] + c[2] * s[0],
            ],
        ];

        Some(Matrix4D { rows: rows.map(|row| row.map(|x| x * inv)) })
    }
}

impl From<[[f64; 4]; 4]> for Matrix4D {
    fn from(rows: [[f64; 4]; 4]) -> Matrix4D {
        Matrix4D { rows }
    }
}

impl Index<(usize, usize)> for Matrix4D {
    type Output = f64;

    fn index(&self, (r, c): (usize, usize)) -> &f64 {
        &self.rows[r][c]
    }
}

impl IndexMut<(usize, usize)> for Matrix4D {
    fn index_mut(&mut self, (r, c): (usize, usize)) -> &mut f64 {
        &mut self.rows[r][c]
    }
}

/// Matrix product. Not commutative: `a * b` applies `b` first.
impl Mul<Matrix4D> for Matrix4D {
    type Output = Matrix4D;

    fn mul(self, other: Matrix4D) -> Matrix4D {
        let rows = self.rows.map(|row| {
            let mut out = [0.0; 4];
            for (c, cell) in out.iter_mut().enumerate() {
                *cell = (0..4).map(|k| row[k] * other.rows[k][c]).sum();
            }
            out
        });

        Matrix4D { rows }
    }
}

impl Mul<Tuple4D> for Matrix4D {
    type Output = Tuple4D;

    fn mul(self, t: Tuple4D) -> Tuple4D {
        let [x, y, z, w] = self.rows
            .map(|r| r[0] * t.x + r[1] * t.y + r[2] * t.z + r[3] * t.w);

        Tuple4D::tuple(x, y, z, w)
    }
}

impl fmt::Display for Matrix4D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.rows.iter().enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            write!(f, "[{:>9.4} {:>9.4} {:>9.4} {:>9.4} ]",
                row[0], row[1], row[2], row[3])?;
        }

        Ok(())
    }
}

#[test]
fn determinant_by_minors() {
    let a: Matrix4D = [ [-2.0, -8.0,  3.0,  5.0],
                        [-3.0,  1.0,  7.0,  3.0],
                        [ 1.0,  2.0, -9.0,  6.0],
                        [-6.0,  7.0,  7.0, -9.0], ].into();

    assert_eq!(a.determinant(), -4071.0);
    assert_eq!(Matrix4D::scaling(2.0, 3.0, 4.0).determinant(), 24.0);
}

#[test]
fn inverse_undoes_product() {
    let a: Matrix4D = [ [ 3.0, -9.0,  7.0,  3.0],
                        [ 3.0,  8.0,  2.0, -9.0],
                        [-4.0,  4.0,  4.0,  1.0],
                        [-6.0,  5.0, -1.0,  1.0], ].into();

    let b: Matrix4D = [ [8.0,  2.0, 2.0, 2.0],
                        [3.0, -1.0, 7.0, 0.0],
                        [7.0,  0.0, 5.0, 4.0],
                        [6.0, -2.0, 0.0, 5.0], ].into();

    let c = a * b;
    assert_eq!(a, c * b.inverse().unwrap());
    assert_eq!(b * b.inverse().unwrap(), Matrix4D::identity());
}

#[test]
fn singular_has_no_inverse() {
    assert!(Matrix4D::new().inverse().is_none());
    assert!(Matrix4D::scaling(1.0, 0.0, 1.0).inverse().is_none());

    let nan: Matrix4D = [[f64::NAN; 4]; 4].into();
    assert!(nan.inverse().is_none());
}

#[test]
fn inverse_translation_moves_back() {
    let back = Matrix4D::translation(5.0, -3.0, 2.0).inverse().unwrap();

    assert_eq!(back * Tuple4D::point(-3.0, 4.0, 5.0), Tuple4D::point(-8.0, 7.0, 3.0));
    assert_eq!(back, Matrix4D::translation(-5.0, 3.0, -2.0));
}

#[test]
fn vectors_are_not_translated() {
    let v = Tuple4D::vector(-3.0, 4.0, 5.0);

    assert_eq!(Matrix4D::translation(5.0, -3.0, 2.0) * v, v);
}

#[test]
fn quarter_turns() {
    let quarter = std::f64::consts::FRAC_PI_2;

    assert_eq!(Matrix4D::rotation_x(quarter) * Tuple4D::point(0.0, 1.0, 0.0),
        Tuple4D::point(0.0, 0.0, 1.0));
    assert_eq!(Matrix4D::rotation_y(quarter) * Tuple4D::point(0.0, 0.0, 1.0),
        Tuple4D::point(1.0, 0.0, 0.0));
}

#[test]
fn perspective_far_plane() {
    let p = Matrix4D::perspective(45.0, 2.0, 1.0, 5.0);
    let clip = p * Tuple4D::point(0.0, 0.0, -5.0);

    assert_eq!(clip / clip.w, Tuple4D::point(0.0, 0.0, 1.0));
}

#[test]
fn perspective_frustum_edge() {
    // The top edge of the near plane maps to NDC y == 1
    let top = (22.5f64).to_radians().tan();
    let p = Matrix4D::perspective(45.0, 1.0, 1.0, 5.0);
    let clip = p * Tuple4D::point(top, top, -1.0);

    assert_eq!(clip / clip.w, Tuple4D::point(1.0, 1.0, -1.0));
}

#[test]
fn perspective_inverse_round_trip() {
    let m = Matrix4D::perspective(45.0, 1.0, 1.0, 5.0)
        * Matrix4D::translation(0.0, 0.0, -3.0);
    let inv = m.inverse().unwrap();

    assert_eq!(m * inv, Matrix4D::identity());
}
