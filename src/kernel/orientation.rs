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

/// Returns:
/// - >0 if counter-clockwise
/// - <0 if clockwise
/// - =0 if collinear
pub fn orient2d<T: Scalar>(a: &Point2<T>, b: &Point2<T>, c: &Point2<T>) -> T {
    (b.x.clone() - a.x.clone()) * (c.y.clone() - a.y.clone())
        - (b.y.clone() - a.y.clone()) * (c.x.clone() - a.x.clone())
}

/// Sign of the oriented area, with exact resolution of ambiguous floating
/// results. A result inside the tolerance band is recomputed over rationals
/// built from the raw coordinates.
pub fn orient2d_sign<T: Scalar>(a: &Point2<T>, b: &Point2<T>, c: &Point2<T>) -> i8 {
    let det = orient2d(a, b, c);
    if T::exact() || det.abs() > T::tolerance() {
        return det.sign();
    }
    match orient2d_rational(a, b, c).cmp0() {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

pub fn orient2d_rational<T: Scalar>(a: &Point2<T>, b: &Point2<T>, c: &Point2<T>) -> Rational {
    let bax = b.x.to_rational() - a.x.to_rational();
    let bay = b.y.to_rational() - a.y.to_rational();
    let cax = c.x.to_rational() - a.x.to_rational();
    let cay = c.y.to_rational() - a.y.to_rational();
    bax * cay - bay * cax
}
