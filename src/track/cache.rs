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

//! Per-operation precomputed state: one triangle basis per face of a
//! record side, plus global-id-keyed adjacency maps. Both are built once
//! per operation step and shared read-only by every point relocated
//! against that step.

use std::collections::HashMap;

use smallvec::SmallVec;

use crate::kernel::TriBasis;
use crate::numeric::scalar::Scalar;
use crate::record::op::MeshView;
use crate::track::error::TrackError;

/// Inverse-matrix bases of every face of one record side. `None` entries
/// are degenerate (zero-area) faces, skipped by the scan.
#[derive(Debug, Clone)]
pub struct BarycentricCache<T: Scalar> {
    bases: Vec<Option<TriBasis<T>>>,
}

impl<T: Scalar> BarycentricCache<T> {
    pub fn build(view: &MeshView) -> Result<Self, TrackError> {
        let mut bases = Vec::with_capacity(view.face_count());
        for f in 0..view.face_count() {
            let [a, b, c] = view.corner_points::<T>(f)?;
            bases.push(TriBasis::new(&a, &b, &c));
        }
        Ok(Self { bases })
    }

    pub fn basis(&self, f: usize) -> Option<&TriBasis<T>> {
        self.bases.get(f).and_then(|b| b.as_ref())
    }
}

/// Global-id-keyed lookup tables for one record side.
#[derive(Debug, Clone, Default)]
pub struct MeshIndex {
    face_of_id: HashMap<i64, usize>,
    vertex_of_id: HashMap<i64, usize>,
    vertex_faces: HashMap<i64, SmallVec<[usize; 8]>>,
    edge_faces: HashMap<(i64, i64), SmallVec<[usize; 2]>>,
}

fn edge_key(a: i64, b: i64) -> (i64, i64) {
    if a <= b { (a, b) } else { (b, a) }
}

impl MeshIndex {
    pub fn build(view: &MeshView) -> Result<Self, TrackError> {
        let mut index = MeshIndex::default();

        for (local, &id) in view.vertex_ids.iter().enumerate() {
            if id >= 0 {
                index.vertex_of_id.insert(id, local);
            }
        }
        for f in 0..view.face_count() {
            let id = view.face_id(f)?;
            index.face_of_id.insert(id, f);

            let ids = view.face_vertex_ids(f)?;
            for k in 0..3 {
                index.vertex_faces.entry(ids[k]).or_default().push(f);
                index
                    .edge_faces
                    .entry(edge_key(ids[k], ids[(k + 1) % 3]))
                    .or_default()
                    .push(f);
            }
        }
        Ok(index)
    }

    pub fn face_of_id(&self, id: i64) -> Option<usize> {
        self.face_of_id.get(&id).copied()
    }

    pub fn local_vertex(&self, id: i64) -> Option<usize> {
        self.vertex_of_id.get(&id).copied()
    }

    pub fn faces_with_vertex(&self, id: i64) -> &[usize] {
        self.vertex_faces.get(&id).map_or(&[], |v| v.as_slice())
    }

    pub fn faces_with_edge(&self, a: i64, b: i64) -> &[usize] {
        self.edge_faces
            .get(&edge_key(a, b))
            .map_or(&[], |v| v.as_slice())
    }

    /// The face on the other side of edge `(a, b)` seen from `face`.
    pub fn neighbor_across(&self, face: usize, a: i64, b: i64) -> Option<usize> {
        self.faces_with_edge(a, b)
            .iter()
            .copied()
            .find(|&f| f != face)
    }
}
