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

mod common;

use common::{qpoint, side_mesh};
use meshtrack::numeric::scalar::Scalar;
use meshtrack::record::op::SideMesh;
use meshtrack::track::{MeshIndex, QueryCurve, TrackError, trace};

/// Four triangles in a strip: faces 3, 4, 5, 9 left to right.
fn strip() -> SideMesh {
    side_mesh(
        &[
            (1, 0.0, 0.0),
            (2, 1.0, 0.0),
            (3, 0.5, 1.0),
            (4, 1.5, 1.0),
            (5, 2.0, 0.0),
            (6, 2.5, 1.0),
        ],
        &[
            (3, [1, 2, 3]),
            (4, [2, 4, 3]),
            (5, [2, 5, 4]),
            (9, [5, 6, 4]),
        ],
    )
}

/// The strip plus a triangle (face 11) that shares no vertex with it.
fn strip_with_island() -> SideMesh {
    side_mesh(
        &[
            (1, 0.0, 0.0),
            (2, 1.0, 0.0),
            (3, 0.5, 1.0),
            (4, 1.5, 1.0),
            (5, 2.0, 0.0),
            (6, 2.5, 1.0),
            (7, 5.0, 0.0),
            (8, 6.0, 0.0),
            (9, 5.5, 1.0),
        ],
        &[
            (3, [1, 2, 3]),
            (4, [2, 4, 3]),
            (5, [2, 5, 4]),
            (9, [5, 6, 4]),
            (11, [7, 8, 9]),
        ],
    )
}

#[test]
fn strip_crossing_emits_one_chord_per_face() {
    let mesh = strip();
    let view = mesh.view();
    let index = MeshIndex::build(&view).unwrap();

    let third = 1.0 / 3.0;
    let a = qpoint(3, [third, third, third], [1, 2, 3]);
    let b = qpoint(9, [third, third, third], [5, 6, 4]);

    let pieces = trace(&a, &b, 0, &view, &index).unwrap();
    assert_eq!(pieces.len(), 4);
    let faces: Vec<i64> = pieces.iter().map(|s| s.a.face).collect();
    assert_eq!(faces, vec![3, 4, 5, 9]);

    // Each interior junction is an edge point of the shared edge.
    for piece in &pieces[..3] {
        assert_eq!(piece.b.zero_count(), 1);
    }
    assert_eq!(pieces[0].a, a);
    assert_eq!(pieces[3].b.face, 9);

    // Chained as a curve, the pieces must pass the topology oracle.
    let mut segs = pieces;
    let n = segs.len();
    for (i, seg) in segs.iter_mut().enumerate() {
        seg.next = if i + 1 < n { Some(i + 1) } else { None };
    }
    let curve = QueryCurve::from_segments(segs);
    curve.validate().unwrap();
    assert_eq!(curve.count_crossings(&curve), 0);
}

#[test]
fn shared_face_needs_no_walk() {
    let mesh = strip();
    let view = mesh.view();
    let index = MeshIndex::build(&view).unwrap();

    let a = qpoint(3, [0.6, 0.2, 0.2], [1, 2, 3]);
    let b = qpoint(3, [0.2, 0.6, 0.2], [1, 2, 3]);
    let pieces = trace(&a, &b, 5, &view, &index).unwrap();
    assert_eq!(pieces.len(), 1);
    assert_eq!(pieces[0].origin, 5);
    assert_eq!(pieces[0].a, a);
    assert_eq!(pieces[0].b, b);
}

#[test]
fn adjacent_faces_split_at_the_shared_edge() {
    let mesh = strip();
    let view = mesh.view();
    let index = MeshIndex::build(&view).unwrap();

    let third = 1.0 / 3.0;
    let a = qpoint(3, [third, third, third], [1, 2, 3]);
    let b = qpoint(4, [third, third, third], [2, 4, 3]);
    let pieces = trace(&a, &b, 0, &view, &index).unwrap();
    assert_eq!(pieces.len(), 2);
    assert_eq!(pieces[0].a.face, 3);
    assert_eq!(pieces[1].a.face, 4);

    // The junction sits on edge (2, 3) with matching weights either side.
    let junction = &pieces[0].b;
    assert_eq!(junction.zero_count(), 1);
    let support = junction.support();
    assert!(support.contains(&2) && support.contains(&3));
    let aligned = pieces[1].a.aligned_bary(&junction.face_vertices).unwrap();
    for k in 0..3 {
        assert!(junction.bary[k].approx_eq(&aligned[k]));
    }
}

#[test]
fn edge_point_start_walks_into_the_neighbor() {
    let mesh = strip();
    let view = mesh.view();
    let index = MeshIndex::build(&view).unwrap();

    // Start on the midpoint of shared edge (2, 3), end inside face 5.
    let a = qpoint(3, [0.0, 0.5, 0.5], [1, 2, 3]);
    let third = 1.0 / 3.0;
    let b = qpoint(5, [third, third, third], [2, 5, 4]);
    let pieces = trace(&a, &b, 1, &view, &index).unwrap();
    assert_eq!(pieces.len(), 2);
    assert_eq!(pieces[0].a.face, 4);
    assert_eq!(pieces[1].a.face, 5);
}

#[test]
fn unreachable_target_fails_with_a_tracing_error() {
    let mesh = strip_with_island();
    let view = mesh.view();
    let index = MeshIndex::build(&view).unwrap();

    // The ray leaves the strip through its boundary and can never reach
    // the island, so the walk runs out of candidate edges.
    let third = 1.0 / 3.0;
    let a = qpoint(3, [third, third, third], [1, 2, 3]);
    let b = qpoint(11, [third, third, third], [7, 8, 9]);
    match trace(&a, &b, 3, &view, &index) {
        Err(TrackError::TracingFailure { origin, face, .. }) => {
            assert_eq!(origin, 3);
            assert_eq!(face, 9);
        }
        other => panic!("expected TracingFailure, got {:?}", other),
    }
}

#[test]
fn vertex_start_uses_the_incident_fan() {
    let mesh = strip();
    let view = mesh.view();
    let index = MeshIndex::build(&view).unwrap();

    // Vertex 4 touches faces 4, 5 and 9; target inside face 9.
    let a = qpoint(9, [0.0, 0.0, 1.0], [5, 6, 4]);
    let third = 1.0 / 3.0;
    let b = qpoint(9, [third, third, third], [5, 6, 4]);
    let pieces = trace(&a, &b, 2, &view, &index).unwrap();
    assert_eq!(pieces.len(), 1);
    assert_eq!(pieces[0].a.face, 9);
}
