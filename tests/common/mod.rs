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

//! Shared fixtures: tiny submeshes built from (global id, position) and
//! (face id, corner ids) lists, plus the edge-split record used across
//! the relocation tests.

#![allow(dead_code)]

use meshtrack::numeric::track_f64::TrackF64;
use meshtrack::record::op::{
    CollapseRecord, EditRecord, LogEntry, Matrix, Operation, SideMesh, SideTopo,
};
use meshtrack::track::QueryPoint;

pub fn side_mesh(verts: &[(i64, f64, f64)], faces: &[(i64, [i64; 3])]) -> SideMesh {
    let vertex_ids: Vec<i64> = verts.iter().map(|v| v.0).collect();
    let vrows: Vec<Vec<f64>> = verts.iter().map(|v| vec![v.1, v.2]).collect();
    let frows: Vec<Vec<i64>> = faces
        .iter()
        .map(|(_, corners)| {
            corners
                .iter()
                .map(|id| {
                    vertex_ids
                        .iter()
                        .position(|v| v == id)
                        .expect("face corner id must be a fixture vertex")
                        as i64
                })
                .collect()
        })
        .collect();
    SideMesh {
        vertices: Matrix::from_rows(&vrows),
        faces: Matrix::from_rows(&frows),
        vertex_ids,
        face_ids: faces.iter().map(|f| f.0).collect(),
    }
}

/// Face 7 over vertices 10 (0,0), 20 (1,0), 30 (0,1); the split inserts
/// vertex 40 at the midpoint of edge (20, 30), replacing face 7 with
/// faces 12 [10,20,40] and 13 [10,40,30].
pub fn split_record() -> EditRecord {
    let before = side_mesh(
        &[(10, 0.0, 0.0), (20, 1.0, 0.0), (30, 0.0, 1.0)],
        &[(7, [10, 20, 30])],
    );
    let after = side_mesh(
        &[
            (10, 0.0, 0.0),
            (20, 1.0, 0.0),
            (30, 0.0, 1.0),
            (40, 0.5, 0.5),
        ],
        &[(12, [10, 20, 40]), (13, [10, 40, 30])],
    );
    EditRecord { before, after }
}

/// Collapse variant of the same local change, in the joint-vertex form:
/// one shared vertex matrix, before side = face 7 (vertex 40 absent),
/// after side = faces 12 and 13.
pub fn collapse_record() -> CollapseRecord {
    let vertices = Matrix::from_rows(&[
        vec![0.0, 0.0],
        vec![1.0, 0.0],
        vec![0.0, 1.0],
        vec![0.5, 0.5],
    ]);
    CollapseRecord {
        vertices,
        before: SideTopo {
            faces: Matrix::from_rows(&[vec![0, 1, 2]]),
            vertex_ids: vec![10, 20, 30, -1],
            face_ids: vec![7],
        },
        after: SideTopo {
            faces: Matrix::from_rows(&[vec![0, 1, 3], vec![0, 3, 2]]),
            vertex_ids: vec![10, 20, 30, 40],
            face_ids: vec![12, 13],
        },
    }
}

pub fn entry(op: Operation) -> LogEntry {
    LogEntry {
        skipped: false,
        op: Some(op),
    }
}

pub fn qpoint(face: i64, bary: [f64; 3], ids: [i64; 3]) -> QueryPoint<TrackF64> {
    QueryPoint::new(
        face,
        [TrackF64(bary[0]), TrackF64(bary[1]), TrackF64(bary[2])],
        ids,
    )
}

pub fn assert_bary_near(actual: &[TrackF64; 3], expected: [f64; 3], tol: f64) {
    for k in 0..3 {
        assert!(
            (actual[k].0 - expected[k]).abs() <= tol,
            "component {}: {} vs {}",
            k,
            actual[k].0,
            expected[k]
        );
    }
}
