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

//! One logged local mesh edit plus the before/after state needed to
//! relocate entities across it. Records are read-only: the driver consumes
//! one per replay step and discards it.
//!
//! Submeshes are addressed through parallel index arrays (local index →
//! global id), never through linked structures; every access through
//! [`MeshView`] is bounds-checked.

use serde::{Deserialize, Serialize};

use crate::geometry::Point2;
use crate::numeric::scalar::Scalar;
use crate::track::error::TrackError;

/// Row-major matrix payload: row count plus flat value array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Matrix<V> {
    pub rows: usize,
    pub values: Vec<V>,
}

impl<V> Matrix<V> {
    pub fn cols(&self) -> usize {
        if self.rows == 0 {
            0
        } else {
            self.values.len() / self.rows
        }
    }

    pub fn row(&self, i: usize) -> Option<&[V]> {
        let c = self.cols();
        if i < self.rows && c > 0 && self.values.len() == self.rows * c {
            Some(&self.values[i * c..(i + 1) * c])
        } else {
            None
        }
    }
}

impl<V: Clone> Matrix<V> {
    pub fn from_rows(rows: &[Vec<V>]) -> Self {
        let values = rows.iter().flat_map(|r| r.iter().cloned()).collect();
        Matrix {
            rows: rows.len(),
            values,
        }
    }
}

/// Connectivity of one side of a collapse record. Faces index into the
/// record's joint vertex matrix; `vertex_ids[local] == -1` marks a joint
/// vertex that does not exist on this side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SideTopo {
    pub faces: Matrix<i64>,
    pub vertex_ids: Vec<i64>,
    pub face_ids: Vec<i64>,
}

/// One fully self-contained side of a non-collapse record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SideMesh {
    pub vertices: Matrix<f64>,
    pub faces: Matrix<i64>,
    pub vertex_ids: Vec<i64>,
    pub face_ids: Vec<i64>,
}

impl SideMesh {
    pub fn view(&self) -> MeshView<'_> {
        MeshView {
            vertices: &self.vertices,
            faces: &self.faces,
            vertex_ids: &self.vertex_ids,
            face_ids: &self.face_ids,
        }
    }
}

/// Periodic renumbering pass: `vertex_map[old] == new` (`-1` = removed),
/// same for faces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidateRecord {
    pub vertex_map: Vec<i64>,
    pub face_map: Vec<i64>,
}

/// Vertex collapse. Both sides share one joint vertex/attribute matrix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollapseRecord {
    pub vertices: Matrix<f64>,
    pub before: SideTopo,
    pub after: SideTopo,
}

impl CollapseRecord {
    pub fn before_view(&self) -> MeshView<'_> {
        MeshView {
            vertices: &self.vertices,
            faces: &self.before.faces,
            vertex_ids: &self.before.vertex_ids,
            face_ids: &self.before.face_ids,
        }
    }

    pub fn after_view(&self) -> MeshView<'_> {
        MeshView {
            vertices: &self.vertices,
            faces: &self.after.faces,
            vertex_ids: &self.after.vertex_ids,
            face_ids: &self.after.face_ids,
        }
    }
}

/// Split, swap or attribute update: separate before/after submeshes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditRecord {
    pub before: SideMesh,
    pub after: SideMesh,
}

/// One logged operation, tagged by kind. The serde external tag is the
/// on-disk key (`"MeshConsolidate"`, `"EdgeCollapse"`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Operation {
    MeshConsolidate(ConsolidateRecord),
    EdgeCollapse(CollapseRecord),
    EdgeSplit(EditRecord),
    TriEdgeSwap(EditRecord),
    AttributesUpdate(EditRecord),
}

impl Operation {
    /// `(before, after)` submesh views; `None` for consolidation records,
    /// which carry no geometry.
    pub fn views(&self) -> Option<(MeshView<'_>, MeshView<'_>)> {
        match self {
            Operation::MeshConsolidate(_) => None,
            Operation::EdgeCollapse(r) => Some((r.before_view(), r.after_view())),
            Operation::EdgeSplit(r)
            | Operation::TriEdgeSwap(r)
            | Operation::AttributesUpdate(r) => Some((r.before.view(), r.after.view())),
        }
    }
}

/// One log file: the operation plus the skip marker written by the
/// optimizer for steps it decided not to perform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(default)]
    pub skipped: bool,
    #[serde(flatten)]
    pub op: Option<Operation>,
}

/// Borrowed, bounds-checked view of one side of a record.
#[derive(Debug, Clone, Copy)]
pub struct MeshView<'a> {
    pub vertices: &'a Matrix<f64>,
    pub faces: &'a Matrix<i64>,
    pub vertex_ids: &'a [i64],
    pub face_ids: &'a [i64],
}

impl<'a> MeshView<'a> {
    pub fn face_count(&self) -> usize {
        self.faces.rows
    }

    /// Local vertex indices of face `f`.
    pub fn face(&self, f: usize) -> Result<[usize; 3], TrackError> {
        let row = self.faces.row(f).ok_or_else(|| {
            TrackError::MalformedRecord(format!("face {} out of range ({})", f, self.faces.rows))
        })?;
        if row.len() != 3 {
            return Err(TrackError::MalformedRecord(format!(
                "face matrix has {} columns, expected 3",
                row.len()
            )));
        }
        let mut out = [0usize; 3];
        for (k, &v) in row.iter().enumerate() {
            let local = usize::try_from(v).map_err(|_| {
                TrackError::MalformedRecord(format!("negative vertex index {} in face {}", v, f))
            })?;
            if local >= self.vertices.rows || local >= self.vertex_ids.len() {
                return Err(TrackError::MalformedRecord(format!(
                    "vertex index {} of face {} exceeds submesh size",
                    local, f
                )));
            }
            out[k] = local;
        }
        Ok(out)
    }

    /// Global vertex ids of face `f`'s corners.
    pub fn face_vertex_ids(&self, f: usize) -> Result<[i64; 3], TrackError> {
        let locals = self.face(f)?;
        let mut out = [0i64; 3];
        for (k, &local) in locals.iter().enumerate() {
            let id = self.vertex_ids[local];
            if id < 0 {
                return Err(TrackError::MalformedRecord(format!(
                    "face {} references vertex absent from this side",
                    f
                )));
            }
            out[k] = id;
        }
        Ok(out)
    }

    pub fn face_id(&self, f: usize) -> Result<i64, TrackError> {
        self.face_ids.get(f).copied().ok_or_else(|| {
            TrackError::MalformedRecord(format!(
                "face id {} out of range ({})",
                f,
                self.face_ids.len()
            ))
        })
    }

    /// Parametric-plane position of a local vertex (first two attribute
    /// columns).
    pub fn position(&self, v: usize) -> Result<[f64; 2], TrackError> {
        let row = self.vertices.row(v).ok_or_else(|| {
            TrackError::MalformedRecord(format!(
                "vertex {} out of range ({})",
                v, self.vertices.rows
            ))
        })?;
        if row.len() < 2 {
            return Err(TrackError::MalformedRecord(format!(
                "vertex matrix has {} columns, expected at least 2",
                row.len()
            )));
        }
        Ok([row[0], row[1]])
    }

    pub fn corner_points<T: Scalar>(&self, f: usize) -> Result<[Point2<T>; 3], TrackError> {
        let locals = self.face(f)?;
        let a = self.position(locals[0])?;
        let b = self.position(locals[1])?;
        let c = self.position(locals[2])?;
        Ok([
            Point2::new(a[0], a[1]),
            Point2::new(b[0], b[1]),
            Point2::new(c[0], c[1]),
        ])
    }
}
