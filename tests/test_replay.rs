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

use common::{assert_bary_near, collapse_record, entry, qpoint, split_record};
use meshtrack::record::io::{
    read_log_dir, read_curve_snapshot, write_curve_snapshot,
};
use meshtrack::record::op::{ConsolidateRecord, LogEntry, Operation};
use meshtrack::track::{
    Direction, QueryCurve, QuerySegment, TrackError, relocate_curve, relocate_curves,
    relocate_point,
};
use rand::Rng;

/// Renumbers the post-split state: vertices 10/20/30/40 to 0..4, faces
/// 12/13 to 0..2.
fn consolidation() -> ConsolidateRecord {
    let mut vertex_map = vec![-1i64; 41];
    vertex_map[10] = 0;
    vertex_map[20] = 1;
    vertex_map[30] = 2;
    vertex_map[40] = 3;
    let mut face_map = vec![-1i64; 14];
    face_map[12] = 0;
    face_map[13] = 1;
    ConsolidateRecord {
        vertex_map,
        face_map,
    }
}

/// Most recent edit first: the consolidation ran after the split.
fn log() -> Vec<LogEntry> {
    vec![
        entry(Operation::MeshConsolidate(consolidation())),
        entry(Operation::EdgeSplit(split_record())),
    ]
}

#[test]
fn forward_replay_applies_split_then_consolidation() {
    let entries = log();
    let mut p = qpoint(7, [0.2, 0.3, 0.5], [10, 20, 30]);
    relocate_point(&mut p, &entries, Direction::Forward).unwrap();
    assert_eq!(p.face, 1);
    assert_eq!(p.face_vertices, [0, 3, 2]);
    assert_bary_near(&p.bary, [0.2, 0.6, 0.2], 1e-8);
}

#[test]
fn forward_then_backward_is_identity() {
    let entries = log();
    let mut p = qpoint(7, [0.2, 0.3, 0.5], [10, 20, 30]);
    relocate_point(&mut p, &entries, Direction::Forward).unwrap();
    relocate_point(&mut p, &entries, Direction::Backward).unwrap();
    assert_eq!(p.face, 7);
    assert_eq!(p.face_vertices, [10, 20, 30]);
    assert_bary_near(&p.bary, [0.2, 0.3, 0.5], 1e-8);
}

#[test]
fn random_interior_points_round_trip() {
    let entries = log();
    let mut rng = rand::rng();
    for _ in 0..50 {
        let v: f64 = rng.random_range(0.05..0.9);
        let w: f64 = rng.random_range(0.05..(0.95 - v));
        let start = [1.0 - v - w, v, w];

        let mut p = qpoint(7, start, [10, 20, 30]);
        relocate_point(&mut p, &entries, Direction::Forward).unwrap();
        relocate_point(&mut p, &entries, Direction::Backward).unwrap();
        assert_eq!(p.face, 7);
        assert_bary_near(&p.bary, start, 1e-8);
    }
}

#[test]
fn skipped_records_are_ignored() {
    let entries = vec![LogEntry {
        skipped: true,
        op: Some(Operation::EdgeSplit(split_record())),
    }];
    let mut p = qpoint(7, [0.2, 0.3, 0.5], [10, 20, 30]);
    relocate_point(&mut p, &entries, Direction::Backward).unwrap();
    assert_eq!(p.face, 7);
    assert_bary_near(&p.bary, [0.2, 0.3, 0.5], 1e-12);
}

#[test]
fn consolidated_away_face_fails_hard() {
    let mut record = consolidation();
    record.face_map[13] = -1;
    let entries = vec![entry(Operation::MeshConsolidate(record))];
    let mut p = qpoint(13, [0.2, 0.6, 0.2], [10, 40, 30]);
    match relocate_point(&mut p, &entries, Direction::Forward) {
        Err(TrackError::ConsolidatedIdMissing { id }) => assert_eq!(id, 13),
        other => panic!("expected ConsolidatedIdMissing, got {:?}", other),
    }
}

#[test]
fn unknown_id_fails_backward_too() {
    let entries = vec![entry(Operation::MeshConsolidate(consolidation()))];
    let mut p = qpoint(5, [0.2, 0.6, 0.2], [0, 3, 2]);
    assert!(matches!(
        relocate_point(&mut p, &entries, Direction::Backward),
        Err(TrackError::ConsolidatedIdMissing { id: 5 })
    ));
}

fn span_curve() -> QueryCurve<meshtrack::numeric::track_f64::TrackF64> {
    QueryCurve::from_segments(vec![QuerySegment::new(
        qpoint(7, [0.2, 0.3, 0.5], [10, 20, 30]),
        qpoint(7, [0.2, 0.5, 0.3], [10, 20, 30]),
        0,
    )])
}

#[test]
fn curve_is_split_forward_and_merged_back() {
    let entries = log();
    let mut curve = span_curve();

    // Forward the two endpoints land in different split children, so the
    // segment is re-traced into one chord per child.
    relocate_curve(&mut curve, &entries, Direction::Forward).unwrap();
    assert_eq!(curve.len(), 2);
    assert!(curve.is_valid());
    let faces: Vec<i64> = curve
        .chain_order()
        .iter()
        .map(|&i| curve.segments[i].a.face)
        .collect();
    assert_eq!(faces, vec![1, 0]);

    // Backward both chords return to face 7 and the final cleanup merges
    // the collinear run back into a single segment.
    relocate_curve(&mut curve, &entries, Direction::Backward).unwrap();
    assert_eq!(curve.len(), 1);
    assert_eq!(curve.segments[0].a.face, 7);
    assert_bary_near(&curve.segments[0].a.bary, [0.2, 0.3, 0.5], 1e-8);
    assert_bary_near(&curve.segments[0].b.bary, [0.2, 0.5, 0.3], 1e-8);
}

#[test]
fn collapse_record_relocates_backward_onto_the_old_face() {
    let entries = vec![entry(Operation::EdgeCollapse(collapse_record()))];
    let mut p = qpoint(13, [0.2, 0.6, 0.2], [10, 40, 30]);
    relocate_point(&mut p, &entries, Direction::Backward).unwrap();
    assert_eq!(p.face, 7);
    assert_eq!(p.face_vertices, [10, 20, 30]);
    assert_bary_near(&p.bary, [0.2, 0.3, 0.5], 1e-8);
}

#[test]
fn collapse_keeps_a_two_segment_junction_consistent() {
    // Two chords meeting on the edge both after-faces share; backward
    // both land in face 7 and the junction must survive the move.
    let entries = vec![entry(Operation::EdgeCollapse(collapse_record()))];
    let third = 1.0 / 3.0;
    let mut curve = QueryCurve::from_segments(vec![
        QuerySegment {
            a: qpoint(12, [third, third, third], [10, 20, 40]),
            b: qpoint(12, [0.5, 0.0, 0.5], [10, 20, 40]),
            origin: 0,
            next: Some(1),
        },
        QuerySegment {
            a: qpoint(13, [0.5, 0.5, 0.0], [10, 40, 30]),
            b: qpoint(13, [third, third, third], [10, 40, 30]),
            origin: 1,
            next: None,
        },
    ]);
    relocate_curve(&mut curve, &entries, Direction::Backward).unwrap();
    assert_eq!(curve.len(), 2);
    assert!(curve.is_valid());
    assert_eq!(curve.segments[0].a.face, 7);
    assert_eq!(curve.segments[1].a.face, 7);
    assert_bary_near(&curve.segments[0].b.bary, [0.5, 0.25, 0.25], 1e-8);
    assert_bary_near(&curve.segments[1].a.bary, [0.5, 0.25, 0.25], 1e-8);
}

#[test]
fn curve_batches_replay_in_parallel() {
    let entries = log();
    let mut curves = vec![span_curve(), span_curve(), span_curve()];
    relocate_curves(&mut curves, &entries, Direction::Forward).unwrap();
    for curve in &curves {
        assert_eq!(curve.len(), 2);
        assert!(curve.is_valid());
    }
}

#[test]
fn crossing_count_survives_a_round_trip() {
    let entries = vec![entry(Operation::EdgeSplit(split_record()))];
    let mut one = span_curve();
    let mut two = QueryCurve::from_segments(vec![QuerySegment::new(
        qpoint(7, [0.4, 0.3, 0.3], [10, 20, 30]),
        qpoint(7, [0.04, 0.48, 0.48], [10, 20, 30]),
        0,
    )]);
    assert_eq!(one.count_crossings(&two), 1);

    relocate_curve(&mut one, &entries, Direction::Forward).unwrap();
    relocate_curve(&mut two, &entries, Direction::Forward).unwrap();
    assert_eq!(one.count_crossings(&two), 1);

    relocate_curve(&mut one, &entries, Direction::Backward).unwrap();
    relocate_curve(&mut two, &entries, Direction::Backward).unwrap();
    assert_eq!(one.count_crossings(&two), 1);
}

#[test]
fn replay_preserves_a_nonzero_self_crossing_count() {
    // Three chained chords in face 7 whose last chord folds back over the
    // first; the driver recounts self-crossings at every cleanup, so the
    // fold must survive both replay directions.
    let entries = log();
    let mut curve = QueryCurve::from_segments(vec![
        QuerySegment {
            a: qpoint(7, [0.75, 0.15, 0.1], [10, 20, 30]),
            b: qpoint(7, [0.4, 0.5, 0.1], [10, 20, 30]),
            origin: 0,
            next: Some(1),
        },
        QuerySegment {
            a: qpoint(7, [0.4, 0.5, 0.1], [10, 20, 30]),
            b: qpoint(7, [0.3, 0.4, 0.3], [10, 20, 30]),
            origin: 1,
            next: Some(2),
        },
        QuerySegment {
            a: qpoint(7, [0.3, 0.4, 0.3], [10, 20, 30]),
            b: qpoint(7, [0.65, 0.3, 0.05], [10, 20, 30]),
            origin: 2,
            next: None,
        },
    ]);
    assert_eq!(curve.count_crossings(&curve), 1);

    relocate_curve(&mut curve, &entries, Direction::Forward).unwrap();
    assert_eq!(curve.count_crossings(&curve), 1);

    relocate_curve(&mut curve, &entries, Direction::Backward).unwrap();
    assert_eq!(curve.count_crossings(&curve), 1);
    assert_eq!(curve.segments[0].a.face, 7);
}

#[test]
fn log_directory_and_snapshots_round_trip() {
    let dir = std::env::temp_dir().join(format!("meshtrack_test_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    for (i, e) in log().iter().enumerate() {
        let text = serde_json::to_string(e).unwrap();
        std::fs::write(dir.join(format!("{}.json", i)), text).unwrap();
    }
    let entries = read_log_dir(&dir).unwrap();
    assert_eq!(entries.len(), 2);
    assert!(matches!(
        entries[0].op,
        Some(Operation::MeshConsolidate(_))
    ));
    assert!(matches!(entries[1].op, Some(Operation::EdgeSplit(_))));

    let mut curve = span_curve();
    relocate_curve(&mut curve, &entries, Direction::Forward).unwrap();
    let snapshot = dir.join("curves.json");
    write_curve_snapshot(&snapshot, std::slice::from_ref(&curve)).unwrap();
    let restored = read_curve_snapshot::<meshtrack::numeric::track_f64::TrackF64>(&snapshot)
        .unwrap();
    assert_eq!(restored.len(), 1);
    assert_eq!(restored[0].len(), curve.len());
    assert!(restored[0].is_valid());

    std::fs::remove_dir_all(&dir).ok();
}
