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
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::operations::{Abs, One, Zero};

use std::{
    fmt::Debug,
    hash::Hash,
    ops::{Add, Div, Mul, Neg, Sub},
};

/// Number type the locator/tracer logic is written once over.
///
/// Two implementations exist: [`TrackF64`](crate::numeric::track_f64::TrackF64)
/// (fast, tolerant comparisons) and
/// [`TrackRational`](crate::numeric::track_rational::TrackRational)
/// (arbitrary-precision, exact comparisons). The `to_rational` /
/// `from_rational` pair is the bridge the adaptive predicates use when a
/// floating evaluation lands inside the tolerance band.
pub trait Scalar:
    Sized
    + Clone
    + Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + PartialEq
    + Eq
    + PartialOrd
    + Hash
    + Zero
    + One
    + Abs
    + From<i32>
    + From<f64>
    + ToPrimitive
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    fn from_num_den(num: i64, den: i64) -> Self;

    /// Half-width of the ambiguity band. Exactly zero for the rational type.
    fn tolerance() -> Self;

    /// True when arithmetic on this type is exact and no fallback is needed.
    fn exact() -> bool;

    /// Returns -1, 0, or +1.
    fn sign(&self) -> i8;

    fn approx_eq(&self, other: &Self) -> bool;

    fn to_rational(&self) -> Rational;
    fn from_rational(value: &Rational) -> Self;

    fn min(self, other: Self) -> Self {
        if self < other { self } else { other }
    }
    fn max(self, other: Self) -> Self {
        if self > other { self } else { other }
    }
}
