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

use std::hash::{Hash, Hasher};
use std::ops::Sub;

use serde::{Deserialize, Serialize};

use crate::geometry::vector_2::Vector2;
use crate::numeric::scalar::Scalar;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = ""))]
pub struct Point2<T>
where
    T: Scalar,
{
    pub x: T,
    pub y: T,
}

impl<T> Point2<T>
where
    T: Scalar,
{
    pub fn new<X, Y>(x: X, y: Y) -> Self
    where
        X: Into<T>,
        Y: Into<T>,
    {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }

    pub fn sub(&self, other: &Self) -> Vector2<T> {
        Vector2 {
            x: self.x.clone() - other.x.clone(),
            y: self.y.clone() - other.y.clone(),
        }
    }

    pub fn as_vector(&self) -> Vector2<T> {
        Vector2 {
            x: self.x.clone(),
            y: self.y.clone(),
        }
    }

    pub fn add_vector(&self, v: &Vector2<T>) -> Self {
        Point2 {
            x: self.x.clone() + v.x.clone(),
            y: self.y.clone() + v.y.clone(),
        }
    }
}

impl<'a, 'b, T> Sub<&'b Point2<T>> for &'a Point2<T>
where
    T: Scalar,
{
    type Output = Vector2<T>;
    fn sub(self, rhs: &'b Point2<T>) -> Vector2<T> {
        Point2::sub(self, rhs)
    }
}

impl<T> Hash for Point2<T>
where
    T: Scalar,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.hash(state);
        self.y.hash(state);
    }
}

impl<T> PartialEq for Point2<T>
where
    T: Scalar,
{
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl<T> Eq for Point2<T> where T: Scalar {}
