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

/// Interpolation parameters `(t, u)` of the crossing of segments
/// `p1p2` and `p3p4` (`t` along `p1p2`, `u` along `p3p4`), or `None` when
/// the segments are parallel or do not cross within `[0, 1] x [0, 1]`.
///
/// Total: degenerate and parallel inputs return `None`, never panic. On the
/// floating path any quantity that lands inside the tolerance band (the
/// denominator, or a parameter near 0 or 1) sends the whole query to the
/// rational kernel, so the band never decides a hit by itself.
pub fn segment_intersection<T: Scalar>(
    p1: &Point2<T>,
    p2: &Point2<T>,
    p3: &Point2<T>,
    p4: &Point2<T>,
) -> Option<(T, T)> {
    let r = p2.sub(p1);
    let s = p4.sub(p3);
    let denom = r.cross(&s);

    if T::exact() {
        if denom.is_zero() {
            return None;
        }
        let q = p3.sub(p1);
        let t = q.cross(&s) / denom.clone();
        let u = q.cross(&r) / denom;
        if in_unit(&t) && in_unit(&u) {
            return Some((t, u));
        }
        return None;
    }

    if !denom.is_zero() {
        let q = p3.sub(p1);
        let t = q.cross(&s) / denom.clone();
        let u = q.cross(&r) / denom;
        if !in_zero_one_band(&t) && !in_zero_one_band(&u) {
            if in_unit(&t) && in_unit(&u) {
                return Some((t, u));
            }
            return None;
        }
    }

    // Denominator or a parameter was ambiguous: redo exactly.
    let (t, u) = params_rational(p1, p2, p3, p4)?;
    if t.cmp0() == Ordering::Less || t > 1 || u.cmp0() == Ordering::Less || u > 1 {
        return None;
    }
    Some((T::from_rational(&t), T::from_rational(&u)))
}

fn in_unit<T: Scalar>(x: &T) -> bool {
    x.is_positive_or_zero() && (T::one() - x.clone()).is_positive_or_zero()
}

fn in_zero_one_band<T: Scalar>(x: &T) -> bool {
    let tol = T::tolerance();
    x.abs() <= tol.clone() || (x.clone() - T::one()).abs() <= tol
}

fn params_rational<T: Scalar>(
    p1: &Point2<T>,
    p2: &Point2<T>,
    p3: &Point2<T>,
    p4: &Point2<T>,
) -> Option<(Rational, Rational)> {
    let rx = p2.x.to_rational() - p1.x.to_rational();
    let ry = p2.y.to_rational() - p1.y.to_rational();
    let sx = p4.x.to_rational() - p3.x.to_rational();
    let sy = p4.y.to_rational() - p3.y.to_rational();

    let denom = rx.clone() * sy.clone() - ry.clone() * sx.clone();
    if denom.cmp0() == Ordering::Equal {
        return None;
    }

    let qx = p3.x.to_rational() - p1.x.to_rational();
    let qy = p3.y.to_rational() - p1.y.to_rational();

    let mut t = qx.clone() * sy - qy.clone() * sx;
    t /= &denom;
    let mut u = qx * ry - qy * rx;
    u /= &denom;
    Some((t, u))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::track_f64::TrackF64;
    use crate::numeric::track_rational::TrackRational;

    #[test]
    fn crossing_at_midpoints() {
        let p1 = Point2::<TrackRational>::new(0.0, 0.0);
        let p2 = Point2::new(1.0, 1.0);
        let p3 = Point2::new(0.0, 1.0);
        let p4 = Point2::new(1.0, 0.0);

        let (t, u) = segment_intersection(&p1, &p2, &p3, &p4).unwrap();
        assert_eq!(t, TrackRational::from_num_den(1, 2));
        assert_eq!(u, TrackRational::from_num_den(1, 2));
    }

    #[test]
    fn parallel_returns_none() {
        let p1 = Point2::<TrackF64>::new(0.0, 0.0);
        let p2 = Point2::new(1.0, 0.0);
        let p3 = Point2::new(0.0, 1.0);
        let p4 = Point2::new(1.0, 1.0);

        assert!(segment_intersection(&p1, &p2, &p3, &p4).is_none());
    }

    #[test]
    fn endpoint_touch_is_a_hit() {
        // p2 == p3: t = 1, u = 0; both sit in the tolerance band so the
        // decision goes through the exact kernel.
        let p1 = Point2::<TrackF64>::new(0.0, 0.0);
        let p2 = Point2::new(1.0, 1.0);
        let p3 = Point2::new(1.0, 1.0);
        let p4 = Point2::new(2.0, 0.0);

        let (t, u) = segment_intersection(&p1, &p2, &p3, &p4).unwrap();
        assert!((t.0 - 1.0).abs() < 1e-12);
        assert!(u.0.abs() < 1e-12);
    }

    #[test]
    fn disjoint_returns_none() {
        let p1 = Point2::<TrackF64>::new(0.0, 0.0);
        let p2 = Point2::new(1.0, 0.0);
        let p3 = Point2::new(2.0, -1.0);
        let p4 = Point2::new(2.0, 1.0);

        assert!(segment_intersection(&p1, &p2, &p3, &p4).is_none());
    }
}
