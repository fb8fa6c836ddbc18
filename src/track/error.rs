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

use thiserror::Error;

/// Fatal relocation failures. None of these is recoverable: each one means
/// an invariant of the exact-arithmetic design was violated, so the replay
/// of the affected entity aborts rather than continuing with corrupt state.
///
/// The one locally-absorbed condition — a record whose id maps simply do
/// not mention the point's face — is not an error and is expressed as
/// `Ok(None)` by the locator.
#[derive(Debug, Error)]
pub enum TrackError {
    /// A point's cached face-vertex ids disagree with the submesh: the
    /// operation log is corrupted or mismatched.
    #[error("face {face}: cached vertex ids {cached:?} do not match submesh ids {actual:?}")]
    FaceIdMismatch {
        face: i64,
        cached: [i64; 3],
        actual: [i64; 3],
    },

    /// An id the consolidation pass should cover is missing or removed.
    #[error("id {id} is not live in the consolidation map")]
    ConsolidatedIdMissing { id: i64 },

    /// No destination face contains the relocated point.
    #[error("no destination face contains the point relocated from face {face}")]
    LocationFailure { face: i64 },

    /// The ray walk exhausted its candidate edges (or its iteration cap)
    /// without reaching the target face.
    #[error(
        "ray walk for origin segment {origin} stalled in face {face} after {steps} steps"
    )]
    TracingFailure {
        origin: i64,
        face: i64,
        steps: usize,
    },

    /// A curve failed its validity or intersection-count oracle.
    #[error("curve topology violated: {0}")]
    TopologyViolation(String),

    /// A record field is structurally unusable (bad matrix shape, index
    /// out of range, ...).
    #[error("malformed operation record: {0}")]
    MalformedRecord(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
