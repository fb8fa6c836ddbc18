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
    numeric::{scalar::Scalar, track_f64::TrackF64},
    operations::{Abs, One, Zero},
};

use std::{
    cmp::Ordering,
    hash::Hash,
    ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign},
};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackRational(pub Rational);

impl Scalar for TrackRational {
    fn from_num_den(num: i64, den: i64) -> Self {
        TrackRational(Rational::from((num, den)))
    }

    fn tolerance() -> Self {
        TrackRational(Rational::new())
    }

    fn exact() -> bool {
        true
    }

    /// Returns -1, 0, or +1.
    fn sign(&self) -> i8 {
        match self.0.cmp0() {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        }
    }

    fn approx_eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }

    fn to_rational(&self) -> Rational {
        self.0.clone()
    }

    fn from_rational(value: &Rational) -> Self {
        TrackRational(value.clone())
    }
}

impl<'a, 'b> Add<&'b TrackRational> for &'a TrackRational {
    type Output = TrackRational;

    fn add(self, rhs: &'b TrackRational) -> TrackRational {
        // in-place API on rug::Rational: result = self + rhs
        let mut result = self.0.clone();
        result += &rhs.0;
        TrackRational(result)
    }
}

impl Add for TrackRational {
    type Output = TrackRational;
    fn add(self, rhs: TrackRational) -> TrackRational {
        &self + &rhs
    }
}

impl<'a, 'b> Sub<&'b TrackRational> for &'a TrackRational {
    type Output = TrackRational;

    fn sub(self, rhs: &'b TrackRational) -> TrackRational {
        let mut result = self.0.clone();
        result -= &rhs.0;
        TrackRational(result)
    }
}

impl Sub for TrackRational {
    type Output = TrackRational;
    fn sub(self, rhs: TrackRational) -> TrackRational {
        &self - &rhs
    }
}

impl<'a, 'b> Mul<&'b TrackRational> for &'a TrackRational {
    type Output = TrackRational;

    fn mul(self, rhs: &'b TrackRational) -> TrackRational {
        let mut result = self.0.clone();
        result *= &rhs.0;
        TrackRational(result)
    }
}

impl Mul for TrackRational {
    type Output = TrackRational;
    fn mul(self, rhs: TrackRational) -> TrackRational {
        &self * &rhs
    }
}

impl<'a, 'b> Div<&'b TrackRational> for &'a TrackRational {
    type Output = TrackRational;

    fn div(self, rhs: &'b TrackRational) -> TrackRational {
        let mut result = self.0.clone();
        result /= &rhs.0;
        TrackRational(result)
    }
}

impl Div for TrackRational {
    type Output = TrackRational;
    fn div(self, rhs: TrackRational) -> TrackRational {
        &self / &rhs
    }
}

impl<'c> AddAssign<&'c TrackRational> for TrackRational {
    fn add_assign(&mut self, rhs: &'c TrackRational) {
        self.0 += &rhs.0;
    }
}

impl<'d> SubAssign<&'d TrackRational> for TrackRational {
    fn sub_assign(&mut self, rhs: &'d TrackRational) {
        self.0 -= &rhs.0;
    }
}

impl From<i32> for TrackRational {
    fn from(value: i32) -> Self {
        TrackRational(Rational::from(value))
    }
}

impl From<f64> for TrackRational {
    fn from(value: f64) -> Self {
        debug_assert!(value.is_finite());
        TrackRational(Rational::from_f64(value).unwrap_or_else(Rational::new))
    }
}

impl From<TrackF64> for TrackRational {
    fn from(value: TrackF64) -> Self {
        TrackRational::from(value.0)
    }
}

impl ToPrimitive for TrackRational {
    fn to_i64(&self) -> Option<i64> {
        Some(self.0.to_f64() as i64)
    }
    fn to_u64(&self) -> Option<u64> {
        Some(self.0.to_f64() as u64)
    }
    fn to_f64(&self) -> Option<f64> {
        Some(self.0.to_f64())
    }
}

impl PartialEq for TrackRational {
    fn eq(&self, other: &TrackRational) -> bool {
        self.0 == other.0
    }
}

impl Eq for TrackRational {}

impl PartialOrd for TrackRational {
    fn partial_cmp(&self, other: &TrackRational) -> Option<Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

impl Hash for TrackRational {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl Zero for TrackRational {
    fn zero() -> Self {
        TrackRational(Rational::new())
    }

    fn is_zero(&self) -> bool {
        self.0.cmp0() == Ordering::Equal
    }

    fn is_positive(&self) -> bool {
        self.0.cmp0() == Ordering::Greater
    }
    fn is_negative(&self) -> bool {
        self.0.cmp0() == Ordering::Less
    }
    fn is_positive_or_zero(&self) -> bool {
        self.0.cmp0() != Ordering::Less
    }
    fn is_negative_or_zero(&self) -> bool {
        self.0.cmp0() != Ordering::Greater
    }
}

impl One for TrackRational {
    fn one() -> Self {
        TrackRational(Rational::from(1))
    }
}

impl Abs for TrackRational {
    fn abs(&self) -> Self {
        TrackRational(self.0.clone().abs())
    }
}

impl Neg for TrackRational {
    type Output = TrackRational;

    fn neg(self) -> TrackRational {
        TrackRational(-self.0)
    }
}

impl<'a> Neg for &'a TrackRational {
    type Output = TrackRational;

    fn neg(self) -> TrackRational {
        TrackRational(Rational::from(-&self.0))
    }
}
