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

//! Replaying a whole operation log over points and curves. The log is
//! written in the order the edits were applied; replaying it in file order
//! undoes them (current state back to the original mesh), replaying it
//! reversed redoes them.

use rayon::prelude::*;

use crate::numeric::scalar::Scalar;
use crate::record::op::{ConsolidateRecord, LogEntry, MeshView, Operation};
use crate::track::cache::{BarycentricCache, MeshIndex};
use crate::track::curve::{QueryCurve, QueryPoint, QuerySegment};
use crate::track::error::TrackError;
use crate::track::locate::locate;
use crate::track::trace::trace;

/// Which way the log is replayed. `Backward` walks the files in order,
/// mapping each record's after-state onto its before-state; `Forward`
/// walks them reversed, mapping before onto after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Backward,
    Forward,
}

fn ordered<'a>(
    entries: &'a [LogEntry],
    direction: Direction,
) -> Box<dyn Iterator<Item = &'a LogEntry> + 'a> {
    match direction {
        Direction::Backward => Box::new(entries.iter()),
        Direction::Forward => Box::new(entries.iter().rev()),
    }
}

/// Per-step precomputed state: source and destination side of the record
/// with their id indexes and the destination triangle bases.
struct Step<'a, T: Scalar> {
    src: MeshView<'a>,
    src_index: MeshIndex,
    dst: MeshView<'a>,
    dst_index: MeshIndex,
    dst_cache: BarycentricCache<T>,
}

fn build_step<'a, T: Scalar>(
    op: &'a Operation,
    direction: Direction,
) -> Result<Option<Step<'a, T>>, TrackError> {
    let Some((before, after)) = op.views() else {
        return Ok(None);
    };
    let (src, dst) = match direction {
        Direction::Backward => (after, before),
        Direction::Forward => (before, after),
    };
    Ok(Some(Step {
        src_index: MeshIndex::build(&src)?,
        dst_index: MeshIndex::build(&dst)?,
        dst_cache: BarycentricCache::build(&dst)?,
        src,
        dst,
    }))
}

/// Renumbers an id through a consolidation map. Replayed forward the map
/// is a direct lookup; backward the old id is recovered by value search.
fn remap_id(map: &[i64], id: i64, direction: Direction) -> Result<i64, TrackError> {
    match direction {
        Direction::Forward => {
            let idx = usize::try_from(id)
                .ok()
                .filter(|&i| i < map.len())
                .ok_or(TrackError::ConsolidatedIdMissing { id })?;
            let new = map[idx];
            if new < 0 {
                return Err(TrackError::ConsolidatedIdMissing { id });
            }
            Ok(new)
        }
        Direction::Backward => map
            .iter()
            .position(|&v| v == id)
            .map(|i| i as i64)
            .ok_or(TrackError::ConsolidatedIdMissing { id }),
    }
}

fn consolidate_point<T: Scalar>(
    point: &mut QueryPoint<T>,
    record: &ConsolidateRecord,
    direction: Direction,
) -> Result<(), TrackError> {
    point.face = remap_id(&record.face_map, point.face, direction)?;
    for id in point.face_vertices.iter_mut() {
        *id = remap_id(&record.vertex_map, *id, direction)?;
    }
    Ok(())
}

/// Carries a single point through the whole log.
pub fn relocate_point<T: Scalar>(
    point: &mut QueryPoint<T>,
    entries: &[LogEntry],
    direction: Direction,
) -> Result<(), TrackError> {
    for entry in ordered(entries, direction) {
        let Some(op) = entry.op.as_ref().filter(|_| !entry.skipped) else {
            continue;
        };
        if let Operation::MeshConsolidate(r) = op {
            consolidate_point(point, r, direction)?;
            continue;
        }
        let Some(step) = build_step::<T>(op, direction)? else {
            continue;
        };
        if let Some(moved) = locate(
            point,
            &step.src,
            &step.src_index,
            &step.dst,
            &step.dst_index,
            &step.dst_cache,
        )? {
            *point = moved;
        }
    }
    Ok(())
}

/// Carries a curve through the whole log, re-tracing segments whose face
/// was rebuilt and splicing the resulting chords back into the chain.
/// Cleanup runs whenever the arena doubles since it last ran, and once at
/// the end; after every cleanup the curve is validated and its
/// self-crossing count is compared against the count it entered the
/// replay with.
pub fn relocate_curve<T: Scalar>(
    curve: &mut QueryCurve<T>,
    entries: &[LogEntry],
    direction: Direction,
) -> Result<(), TrackError> {
    let mut last_clean = curve.len().max(1);
    let self_crossings = curve.count_crossings(curve);

    for entry in ordered(entries, direction) {
        let Some(op) = entry.op.as_ref().filter(|_| !entry.skipped) else {
            continue;
        };
        if let Operation::MeshConsolidate(r) = op {
            for seg in curve.segments.iter_mut() {
                consolidate_point(&mut seg.a, r, direction)?;
                consolidate_point(&mut seg.b, r, direction)?;
            }
            continue;
        }
        let Some(step) = build_step::<T>(op, direction)? else {
            continue;
        };

        let mut splices: Vec<(usize, Vec<QuerySegment<T>>)> = Vec::new();
        for i in 0..curve.segments.len() {
            let seg = &curve.segments[i];
            let ra = locate(
                &seg.a,
                &step.src,
                &step.src_index,
                &step.dst,
                &step.dst_index,
                &step.dst_cache,
            )?;
            // Both endpoints share the segment's face, so the record
            // either touches both or neither.
            let Some(ra) = ra else {
                continue;
            };
            let rb = locate(
                &seg.b,
                &step.src,
                &step.src_index,
                &step.dst,
                &step.dst_index,
                &step.dst_cache,
            )?
            .ok_or_else(|| {
                TrackError::TopologyViolation(format!(
                    "segment {}: one endpoint of face {} is outside the record",
                    i, seg.b.face
                ))
            })?;

            if ra.face == rb.face {
                let seg = &mut curve.segments[i];
                seg.a = ra;
                seg.b = rb;
                continue;
            }

            let pieces = trace(&ra, &rb, seg.origin, &step.dst, &step.dst_index)?;
            splices.push((i, pieces));
        }
        // Splices append to the arena, so the collected slots stay valid.
        for (i, pieces) in splices {
            curve.splice(i, pieces);
        }

        if curve.len() > 2 * last_clean {
            log::debug!("curve grew to {} segments, compacting", curve.len());
            curve.clean_up();
            curve.validate()?;
            check_self_crossings(curve, self_crossings)?;
            last_clean = curve.len().max(1);
        }
    }

    curve.clean_up();
    curve.validate()?;
    check_self_crossings(curve, self_crossings)?;
    Ok(())
}

/// A relocated curve must cross itself exactly as often as it did before
/// the replay started; a delta means a record corrupted the chain.
fn check_self_crossings<T: Scalar>(
    curve: &QueryCurve<T>,
    expected: usize,
) -> Result<(), TrackError> {
    let found = curve.count_crossings(curve);
    if found != expected {
        return Err(TrackError::TopologyViolation(format!(
            "self-crossing count changed from {} to {} during replay",
            expected, found
        )));
    }
    Ok(())
}

/// [`relocate_curve`] over a batch, one worker per curve. Curves are
/// independent, so the first error aborts the batch without ordering
/// concerns.
pub fn relocate_curves<T: Scalar>(
    curves: &mut [QueryCurve<T>],
    entries: &[LogEntry],
    direction: Direction,
) -> Result<(), TrackError> {
    curves
        .par_iter_mut()
        .try_for_each(|curve| relocate_curve(curve, entries, direction))
}
