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

//! Walking a straight segment across the faces of one record side. The
//! walk advances edge hit by edge hit, ordered by the parameter along the
//! query segment, and emits one chord per face crossed.

use smallvec::SmallVec;

use crate::kernel::segment_intersection;
use crate::numeric::scalar::Scalar;
use crate::record::op::MeshView;
use crate::track::cache::MeshIndex;
use crate::track::curve::{QueryPoint, QuerySegment};
use crate::track::error::TrackError;
use crate::track::locate::world_point;

/// Splits the straight segment `a -> b` into per-face chords of `view`.
/// Both endpoints must already live in `view`; `origin` is stamped on
/// every emitted piece. The result is returned in path order with `next`
/// unset, ready for [`QueryCurve::splice`](crate::track::QueryCurve).
pub fn trace<T: Scalar>(
    a: &QueryPoint<T>,
    b: &QueryPoint<T>,
    origin: i64,
    view: &MeshView,
    index: &MeshIndex,
) -> Result<Vec<QuerySegment<T>>, TrackError> {
    let wa = endpoint_world(a, view, index)?;
    let wb = endpoint_world(b, view, index)?;
    let b_faces = candidate_faces(b, index)?;

    let mut pieces: Vec<QuerySegment<T>> = Vec::new();
    let mut cur = a.clone();
    let mut cur_t = T::zero();

    // Every edge hit strictly advances the parameter, so the walk visits
    // each face at most twice before the cap trips.
    let cap = 2 * view.face_count() + 8;
    for step in 0..cap {
        let cur_faces = candidate_faces(&cur, index)?;

        if let Some(f) = cur_faces.iter().copied().find(|f| b_faces.contains(f)) {
            let ca = rebase_into(&cur, f, view)?;
            let cb = rebase_into(b, f, view)?;
            pieces.push(QuerySegment::new(ca, cb, origin));
            log::trace!(
                "segment {} traced across {} face(s)",
                origin,
                pieces.len()
            );
            return Ok(pieces);
        }

        let support = cur.support();
        let mut best: Option<(T, T, usize, usize, usize)> = None;
        for &f in &cur_faces {
            let ids = view.face_vertex_ids(f)?;
            let corners = view.corner_points::<T>(f)?;
            for k in 0..3 {
                let (ka, kb) = (k, (k + 1) % 3);
                // Edges spanned by the current support carry the point
                // itself; crossing them would not advance the walk.
                if support
                    .iter()
                    .all(|id| *id == ids[ka] || *id == ids[kb])
                {
                    continue;
                }
                let Some((t, u)) =
                    segment_intersection(&wa, &wb, &corners[ka], &corners[kb])
                else {
                    continue;
                };
                // Tolerant ordering on the float scalar: a hit within
                // tolerance of the current parameter does not count as
                // progress, so a face sliver thinner than the tolerance
                // stalls the walk into TracingFailure rather than
                // emitting a degenerate chord.
                if t <= cur_t {
                    continue;
                }
                let better = match &best {
                    Some((bt, ..)) => t < bt.clone(),
                    None => true,
                };
                if better {
                    best = Some((t, u, f, ka, kb));
                }
            }
        }

        let Some((t, u, host, ka, kb)) = best else {
            return Err(TrackError::TracingFailure {
                origin,
                face: cur.face,
                steps: step,
            });
        };

        let ids = view.face_vertex_ids(host)?;
        let hit = QueryPoint::new(view.face_id(host)?, edge_bary(u, ka, kb), ids);
        let ca = rebase_into(&cur, host, view)?;
        pieces.push(QuerySegment::new(ca, hit.clone(), origin));
        cur = hit;
        cur_t = t;
    }

    Err(TrackError::TracingFailure {
        origin,
        face: cur.face,
        steps: cap,
    })
}

/// Barycentric coordinates of the point at parameter `u` along the face
/// edge from slot `ka` to slot `kb`, endpoint parameters snapped to exact
/// zero weights.
fn edge_bary<T: Scalar>(u: T, ka: usize, kb: usize) -> [T; 3] {
    let mut bary = [T::zero(), T::zero(), T::zero()];
    if u.is_zero() {
        bary[ka] = T::one();
    } else if (T::one() - u.clone()).is_zero() {
        bary[kb] = T::one();
    } else {
        bary[ka] = T::one() - u.clone();
        bary[kb] = u;
    }
    bary
}

/// Faces of `view` that contain the point: its own face for an interior
/// point, every face sharing the support edge or vertex otherwise.
fn candidate_faces<T: Scalar>(
    p: &QueryPoint<T>,
    index: &MeshIndex,
) -> Result<SmallVec<[usize; 8]>, TrackError> {
    let support = p.support();
    let mut out = SmallVec::new();
    match support.len() {
        1 => out.extend_from_slice(index.faces_with_vertex(support[0])),
        2 => out.extend_from_slice(index.faces_with_edge(support[0], support[1])),
        _ => {
            let f = index.face_of_id(p.face).ok_or_else(|| {
                TrackError::TopologyViolation(format!(
                    "face {} of a traced endpoint is not part of the submesh",
                    p.face
                ))
            })?;
            out.push(f);
        }
    }
    if out.is_empty() {
        return Err(TrackError::TopologyViolation(format!(
            "support of a point in face {} touches no submesh face",
            p.face
        )));
    }
    Ok(out)
}

/// Parametric-plane position of a point, evaluated in its own face.
fn endpoint_world<T: Scalar>(
    p: &QueryPoint<T>,
    view: &MeshView,
    index: &MeshIndex,
) -> Result<crate::geometry::Point2<T>, TrackError> {
    let f = index.face_of_id(p.face).ok_or_else(|| {
        TrackError::TopologyViolation(format!(
            "face {} of a traced endpoint is not part of the submesh",
            p.face
        ))
    })?;
    let ids = view.face_vertex_ids(f)?;
    let bary = p.aligned_bary(&ids).ok_or(TrackError::FaceIdMismatch {
        face: p.face,
        cached: p.face_vertices,
        actual: ids,
    })?;
    let corners = view.corner_points::<T>(f)?;
    Ok(world_point(&bary, &corners))
}

/// Re-expresses `p` inside local face `f`, either by realigning (same
/// face) or by carrying the support weights over (edge or vertex point
/// shared with `f`).
fn rebase_into<T: Scalar>(
    p: &QueryPoint<T>,
    f: usize,
    view: &MeshView,
) -> Result<QueryPoint<T>, TrackError> {
    let fid = view.face_id(f)?;
    let ids = view.face_vertex_ids(f)?;
    if p.face == fid {
        let bary = p.aligned_bary(&ids).ok_or(TrackError::FaceIdMismatch {
            face: p.face,
            cached: p.face_vertices,
            actual: ids,
        })?;
        return Ok(QueryPoint::new(fid, bary, ids));
    }
    let mut bary = [T::zero(), T::zero(), T::zero()];
    for k in 0..3 {
        if p.bary[k].is_zero() {
            continue;
        }
        let m = ids
            .iter()
            .position(|&id| id == p.face_vertices[k])
            .ok_or_else(|| {
                TrackError::TopologyViolation(format!(
                    "point in face {} cannot be carried into adjacent face {}",
                    p.face, fid
                ))
            })?;
        bary[m] = p.bary[k].clone();
    }
    Ok(QueryPoint::new(fid, bary, ids))
}
