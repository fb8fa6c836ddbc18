// SPDX-License-Identifier: MIT
//
// Copyright (c) 2025 Alexandre Severino
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use std::cmp::Ordering;

use rug::Rational;

use crate::geometry::Point2;
use crate::numeric::scalar::Scalar;

/// Precomputed inverse-matrix representation of one triangle, reused for
/// every point tested against it during an operation step.
///
/// With `M = [b - a | c - a]`, barycentric coordinates of `p` are
/// `(v, w) = M⁻¹ (p - a)` and `u = 1 - v - w`.
#[derive(Debug, Clone)]
pub struct TriBasis<T: Scalar> {
    pub corners: [Point2<T>; 3],
    inv: [T; 4],
}

impl<T: Scalar> TriBasis<T> {
    /// `None` for a degenerate (zero-area) triangle, including floating
    /// triangles too thin to invert stably.
    pub fn new(a: &Point2<T>, b: &Point2<T>, c: &Point2<T>) -> Option<Self> {
        let m00 = b.x.clone() - a.x.clone();
        let m10 = b.y.clone() - a.y.clone();
        let m01 = c.x.clone() - a.x.clone();
        let m11 = c.y.clone() - a.y.clone();

        let det = m00.clone() * m11.clone() - m01.clone() * m10.clone();
        if det.is_zero() {
            return None;
        }

        let inv = [
            m11 / det.clone(),
            -(m01 / det.clone()),
            -(m10 / det.clone()),
            m00 / det,
        ];
        Some(Self {
            corners: [a.clone(), b.clone(), c.clone()],
            inv,
        })
    }

    /// Barycentric coordinates of `p`; the components sum to one by
    /// construction (`u` is derived from `v` and `w`).
    pub fn bary(&self, p: &Point2<T>) -> [T; 3] {
        let d = p.sub(&self.corners[0]);
        let v = self.inv[0].clone() * d.x.clone() + self.inv[1].clone() * d.y.clone();
        let w = self.inv[2].clone() * d.x.clone() + self.inv[3].clone() * d.y.clone();
        let u = T::one() - v.clone() - w.clone();
        [u, v, w]
    }

    /// Exact recomputation from the raw corner coordinates.
    pub fn bary_exact(&self, p: &Point2<T>) -> Option<[Rational; 3]> {
        let ax = self.corners[0].x.to_rational();
        let ay = self.corners[0].y.to_rational();
        let m00 = self.corners[1].x.to_rational() - ax.clone();
        let m10 = self.corners[1].y.to_rational() - ay.clone();
        let m01 = self.corners[2].x.to_rational() - ax.clone();
        let m11 = self.corners[2].y.to_rational() - ay.clone();

        let det = m00.clone() * m11.clone() - m01.clone() * m10.clone();
        if det.cmp0() == Ordering::Equal {
            return None;
        }

        let dx = p.x.to_rational() - ax;
        let dy = p.y.to_rational() - ay;

        let mut v = m11 * dx.clone() - m01 * dy.clone();
        v /= &det;
        let mut w = m00 * dy - m10 * dx;
        w /= &det;
        let u = Rational::from(1) - v.clone() - w.clone();
        Some([u, v, w])
    }

    /// `Some(bary)` when `p` lies in the triangle (boundary included),
    /// `None` otherwise. On the floating path a minimum component inside
    /// the tolerance band is re-decided exactly and resolved-zero
    /// components are snapped to exact zero.
    pub fn contains(&self, p: &Point2<T>) -> Option<[T; 3]> {
        let bary = self.bary(p);

        if T::exact() {
            if bary.iter().all(|c| c.is_positive_or_zero()) {
                return Some(bary);
            }
            return None;
        }

        let tol = T::tolerance();
        let ambiguous = bary.iter().any(|c| c.abs() <= tol.clone());
        if !ambiguous {
            if bary.iter().all(|c| c.is_positive_or_zero()) {
                return Some(bary);
            }
            return None;
        }

        let exact = self.bary_exact(p)?;
        if exact.iter().any(|c| c.cmp0() == Ordering::Less) {
            return None;
        }
        let mut out = [T::zero(), T::zero(), T::zero()];
        for (i, c) in exact.iter().enumerate() {
            if c.cmp0() != Ordering::Equal {
                out[i] = T::from_rational(c);
            }
        }
        // Re-establish the sum-to-one invariant after rounding.
        let mut imax = 0;
        for i in 1..3 {
            if out[i] > out[imax] {
                imax = i;
            }
        }
        let mut rest = T::zero();
        for (i, c) in out.iter().enumerate() {
            if i != imax {
                rest = rest + c.clone();
            }
        }
        out[imax] = T::one() - rest;
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::track_f64::TrackF64;
    use crate::numeric::track_rational::TrackRational;

    fn unit_tri<T: Scalar>() -> TriBasis<T> {
        TriBasis::new(
            &Point2::new(0.0, 0.0),
            &Point2::new(1.0, 0.0),
            &Point2::new(0.0, 1.0),
        )
        .unwrap()
    }

    #[test]
    fn interior_point() {
        let tri = unit_tri::<TrackF64>();
        let b = tri.contains(&Point2::new(0.25, 0.25)).unwrap();
        assert!((b[0].0 - 0.5).abs() < 1e-12);
        assert!((b[1].0 - 0.25).abs() < 1e-12);
        assert!((b[2].0 - 0.25).abs() < 1e-12);
    }

    #[test]
    fn edge_point_snaps_to_exact_zero() {
        let tri = unit_tri::<TrackF64>();
        let b = tri.contains(&Point2::new(0.5, 0.5)).unwrap();
        assert_eq!(b[0].0, 0.0);
        assert_eq!(b[1].0, 0.5);
        assert_eq!(b[2].0, 0.5);
    }

    #[test]
    fn outside_point_rejected() {
        let tri = unit_tri::<TrackRational>();
        assert!(tri.contains(&Point2::new(0.75, 0.75)).is_none());
        assert!(tri.contains(&Point2::new(-0.1, 0.2)).is_none());
    }

    #[test]
    fn degenerate_triangle_has_no_basis() {
        let t = TriBasis::<TrackRational>::new(
            &Point2::new(0.0, 0.0),
            &Point2::new(1.0, 1.0),
            &Point2::new(2.0, 2.0),
        );
        assert!(t.is_none());
    }
}
