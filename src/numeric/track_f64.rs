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

use num_traits::ToPrimitive;
use rug::Rational;
use serde::{Deserialize, Serialize};

use crate::{
    numeric::{scalar::Scalar, track_rational::TrackRational},
    operations::{Abs, One, Zero},
};

use std::{
    hash::Hash,
    ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign},
};

/// Ambiguity band half-width of the floating scalar.
pub const EPS: f64 = 1e-9;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackF64(pub f64);

impl Scalar for TrackF64 {
    fn from_num_den(num: i64, den: i64) -> Self {
        TrackF64(num as f64 / den as f64)
    }

    fn tolerance() -> Self {
        TrackF64(EPS)
    }

    fn exact() -> bool {
        false
    }

    /// Returns -1, 0, or +1.
    fn sign(&self) -> i8 {
        if self.is_positive() {
            1
        } else if self.is_negative() {
            -1
        } else {
            0
        }
    }

    fn approx_eq(&self, other: &Self) -> bool {
        (self.0 - other.0).abs() < EPS
    }

    fn to_rational(&self) -> Rational {
        debug_assert!(self.0.is_finite());
        Rational::from_f64(self.0).unwrap_or_else(Rational::new)
    }

    fn from_rational(value: &Rational) -> Self {
        TrackF64(value.to_f64())
    }
}

impl<'a, 'b> Add<&'b TrackF64> for &'a TrackF64 {
    type Output = TrackF64;

    fn add(self, rhs: &'b TrackF64) -> TrackF64 {
        let mut result = self.0;
        result += rhs.0;
        TrackF64(result)
    }
}

impl Add for TrackF64 {
    type Output = TrackF64;
    fn add(self, rhs: TrackF64) -> TrackF64 {
        &self + &rhs
    }
}

impl<'a, 'b> Sub<&'b TrackF64> for &'a TrackF64 {
    type Output = TrackF64;

    fn sub(self, rhs: &'b TrackF64) -> TrackF64 {
        let mut result = self.0;
        result -= rhs.0;
        TrackF64(result)
    }
}

impl Sub for TrackF64 {
    type Output = TrackF64;
    fn sub(self, rhs: TrackF64) -> TrackF64 {
        &self - &rhs
    }
}

impl<'a, 'b> Mul<&'b TrackF64> for &'a TrackF64 {
    type Output = TrackF64;

    fn mul(self, rhs: &'b TrackF64) -> TrackF64 {
        TrackF64(self.0 * rhs.0)
    }
}

impl Mul for TrackF64 {
    type Output = TrackF64;
    fn mul(self, rhs: TrackF64) -> TrackF64 {
        &self * &rhs
    }
}

impl<'a, 'b> Div<&'b TrackF64> for &'a TrackF64 {
    type Output = TrackF64;

    fn div(self, rhs: &'b TrackF64) -> TrackF64 {
        TrackF64(self.0 / rhs.0)
    }
}

impl Div for TrackF64 {
    type Output = TrackF64;
    fn div(self, rhs: TrackF64) -> TrackF64 {
        &self / &rhs
    }
}

impl<'c> AddAssign<&'c TrackF64> for TrackF64 {
    fn add_assign(&mut self, rhs: &'c TrackF64) {
        self.0 += rhs.0;
    }
}

impl<'d> SubAssign<&'d TrackF64> for TrackF64 {
    fn sub_assign(&mut self, rhs: &'d TrackF64) {
        self.0 -= rhs.0;
    }
}

impl From<i32> for TrackF64 {
    fn from(value: i32) -> Self {
        TrackF64(value as f64)
    }
}

impl From<f64> for TrackF64 {
    fn from(value: f64) -> Self {
        TrackF64(value)
    }
}

impl From<TrackF64> for f64 {
    fn from(value: TrackF64) -> Self {
        value.0
    }
}

impl From<TrackRational> for TrackF64 {
    fn from(value: TrackRational) -> Self {
        TrackF64(value.0.to_f64())
    }
}

impl ToPrimitive for TrackF64 {
    fn to_i64(&self) -> Option<i64> {
        Some(self.0 as i64)
    }
    fn to_u64(&self) -> Option<u64> {
        Some(self.0 as u64)
    }
    fn to_f64(&self) -> Option<f64> {
        Some(self.0)
    }
}

impl PartialEq for TrackF64 {
    fn eq(&self, other: &TrackF64) -> bool {
        // Comparing with tolerance would break the hashing contract.
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for TrackF64 {}

impl PartialOrd for TrackF64 {
    fn partial_cmp(&self, other: &TrackF64) -> Option<std::cmp::Ordering> {
        let diff = self.0 - other.0;
        if diff.abs() < EPS {
            return Some(std::cmp::Ordering::Equal);
        }
        if diff > EPS {
            return Some(std::cmp::Ordering::Greater);
        }
        if diff < -EPS {
            return Some(std::cmp::Ordering::Less);
        }
        self.0.partial_cmp(&other.0)
    }
}

impl Hash for TrackF64 {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl Zero for TrackF64 {
    fn zero() -> Self {
        TrackF64(0.0)
    }

    fn is_zero(&self) -> bool {
        self.0.abs() < EPS
    }

    fn is_positive(&self) -> bool {
        self.0 > EPS
    }
    fn is_negative(&self) -> bool {
        self.0 < -EPS
    }
    fn is_positive_or_zero(&self) -> bool {
        self.0 >= -EPS
    }
    fn is_negative_or_zero(&self) -> bool {
        self.0 <= EPS
    }
}

impl One for TrackF64 {
    fn one() -> Self {
        TrackF64(1.0)
    }
}

impl Abs for TrackF64 {
    fn abs(&self) -> Self {
        TrackF64(self.0.abs())
    }
}

impl Neg for TrackF64 {
    type Output = TrackF64;

    fn neg(self) -> TrackF64 {
        TrackF64(-self.0)
    }
}

impl<'a> Neg for &'a TrackF64 {
    type Output = TrackF64;

    fn neg(self) -> TrackF64 {
        TrackF64(-self.0)
    }
}
