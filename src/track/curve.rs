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

//! The query-entity model: a point pinned to a face by barycentric
//! coordinates, a straight chord of one triangle, and a curve stored as a
//! segment arena chained by `next` indices. The chain form keeps splicing
//! a ray-traced sub-chain O(1) per piece: existing entries never move,
//! only `clean_up` compacts.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::geometry::Point2;
use crate::kernel::{orient2d, segment_intersection};
use crate::numeric::scalar::Scalar;
use crate::numeric::track_rational::TrackRational;
use crate::track::error::TrackError;

/// A point expressed as barycentric coordinates of one mesh face.
/// `face_vertices` caches the face's global vertex ids at the time the
/// point was produced, so coordinates can be realigned after a reordering
/// without the mesh at hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = ""))]
pub struct QueryPoint<T: Scalar> {
    pub face: i64,
    pub bary: [T; 3],
    pub face_vertices: [i64; 3],
}

impl<T: Scalar> QueryPoint<T> {
    pub fn new(face: i64, bary: [T; 3], face_vertices: [i64; 3]) -> Self {
        Self {
            face,
            bary,
            face_vertices,
        }
    }

    /// Global ids of the vertices actually supporting the point (nonzero
    /// barycentric weight).
    pub fn support(&self) -> SmallVec<[i64; 3]> {
        let mut out = SmallVec::new();
        for k in 0..3 {
            if !self.bary[k].is_zero() {
                out.push(self.face_vertices[k]);
            }
        }
        out
    }

    pub fn zero_count(&self) -> usize {
        self.bary.iter().filter(|c| c.is_zero()).count()
    }

    /// Coordinates reordered to `target` vertex order; `None` when the two
    /// id triples are not permutations of each other.
    pub fn aligned_bary(&self, target: &[i64; 3]) -> Option<[T; 3]> {
        let mut out = [T::zero(), T::zero(), T::zero()];
        for (j, out_j) in out.iter_mut().enumerate() {
            let i = self
                .face_vertices
                .iter()
                .position(|&id| id == target[j])?;
            *out_j = self.bary[i].clone();
        }
        Some(out)
    }

    pub fn bary_sum(&self) -> T {
        self.bary[0].clone() + self.bary[1].clone() + self.bary[2].clone()
    }

    /// The point in the face's barycentric plane, using the second and
    /// third components as coordinates (the first is affinely dependent).
    pub fn plane_point(&self) -> Point2<T> {
        Point2 {
            x: self.bary[1].clone(),
            y: self.bary[2].clone(),
        }
    }
}

/// A straight chord of one triangle. Both endpoints share `face` and
/// `face_vertices`; `origin` names the original input segment this piece
/// descends from and `next` chains the owning curve's arena.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = ""))]
pub struct QuerySegment<T: Scalar> {
    pub a: QueryPoint<T>,
    pub b: QueryPoint<T>,
    pub origin: i64,
    pub next: Option<usize>,
}

impl<T: Scalar> QuerySegment<T> {
    pub fn new(a: QueryPoint<T>, b: QueryPoint<T>, origin: i64) -> Self {
        Self {
            a,
            b,
            origin,
            next: None,
        }
    }
}

/// An open or closed polyline over the mesh, stored as a segment arena
/// chained by `next` indices.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = ""))]
pub struct QueryCurve<T: Scalar> {
    pub segments: Vec<QuerySegment<T>>,
}

impl<T: Scalar> QueryCurve<T> {
    pub fn from_segments(segments: Vec<QuerySegment<T>>) -> Self {
        Self { segments }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Chain head: the segment no other segment points at. A closed loop
    /// has no such segment; an arbitrary entry is returned instead.
    pub fn head(&self) -> Option<usize> {
        if self.segments.is_empty() {
            return None;
        }
        let mut pointed = vec![false; self.segments.len()];
        for seg in &self.segments {
            if let Some(n) = seg.next
                && n < pointed.len()
            {
                pointed[n] = true;
            }
        }
        pointed.iter().position(|&p| !p).or(Some(0))
    }

    /// Arena indices in chain order, cycle-safe.
    pub fn chain_order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.segments.len());
        let Some(head) = self.head() else {
            return order;
        };
        let mut visited = vec![false; self.segments.len()];
        let mut cur = Some(head);
        while let Some(i) = cur {
            if i >= self.segments.len() || visited[i] {
                break;
            }
            visited[i] = true;
            order.push(i);
            cur = self.segments[i].next;
        }
        order
    }

    /// Replaces slot `at` with the first piece and appends the rest,
    /// rechaining so the last piece inherits the replaced segment's `next`.
    /// Existing entries never move.
    pub fn splice(&mut self, at: usize, pieces: Vec<QuerySegment<T>>) {
        debug_assert!(!pieces.is_empty());
        let old_next = self.segments[at].next;
        let base = self.segments.len();
        let count = pieces.len();
        for (k, mut piece) in pieces.into_iter().enumerate() {
            piece.next = if k + 1 < count { Some(base + k) } else { old_next };
            if k == 0 {
                self.segments[at] = piece;
            } else {
                self.segments.push(piece);
            }
        }
    }

    /// Merges every chain-adjacent pair that shares its origin segment and
    /// face and is collinear under the scalar's orientation predicate, then
    /// compacts the arena. Idempotent; bounds curve growth after repeated
    /// ray-tracing splits.
    pub fn clean_up(&mut self) {
        let mut dead = vec![false; self.segments.len()];
        loop {
            let mut merged = false;
            for i in 0..self.segments.len() {
                if dead[i] {
                    continue;
                }
                let Some(j) = self.segments[i].next else {
                    continue;
                };
                if j == i || j >= self.segments.len() || dead[j] {
                    continue;
                }
                if let Some(joined_b) = merge_candidate(&self.segments[i], &self.segments[j]) {
                    self.segments[i].b = joined_b;
                    self.segments[i].next = self.segments[j].next;
                    dead[j] = true;
                    merged = true;
                }
            }
            if !merged {
                break;
            }
        }
        self.compact(&dead);
    }

    fn compact(&mut self, dead: &[bool]) {
        if dead.iter().all(|&d| !d) {
            return;
        }
        let mut remap = vec![usize::MAX; self.segments.len()];
        let mut live = 0usize;
        for (i, &d) in dead.iter().enumerate() {
            if !d {
                remap[i] = live;
                live += 1;
            }
        }
        let old = std::mem::take(&mut self.segments);
        self.segments.reserve(live);
        for (i, mut seg) in old.into_iter().enumerate() {
            if dead[i] {
                continue;
            }
            seg.next = seg.next.and_then(|n| {
                if n < remap.len() && remap[n] != usize::MAX {
                    Some(remap[n])
                } else {
                    None
                }
            });
            self.segments.push(seg);
        }
    }

    /// Correctness oracle: chain-adjacent segments must agree on their
    /// shared endpoint — exactly in the same face, by support-vertex ids
    /// across faces. Reports the first defect, repairs nothing.
    pub fn validate(&self) -> Result<(), TrackError> {
        for (i, seg) in self.segments.iter().enumerate() {
            if !seg.a.bary_sum().approx_eq(&T::one()) || !seg.b.bary_sum().approx_eq(&T::one()) {
                return Err(TrackError::TopologyViolation(format!(
                    "segment {}: barycentric coordinates do not sum to one",
                    i
                )));
            }
            if seg.a.bary.iter().any(|c| c.is_negative())
                || seg.b.bary.iter().any(|c| c.is_negative())
            {
                return Err(TrackError::TopologyViolation(format!(
                    "segment {}: negative barycentric component",
                    i
                )));
            }

            let Some(j) = seg.next else {
                continue;
            };
            if j >= self.segments.len() {
                return Err(TrackError::TopologyViolation(format!(
                    "segment {}: next index {} out of range",
                    i, j
                )));
            }
            let succ = &self.segments[j];

            if seg.b.face == succ.a.face {
                let Some(aligned) = succ.a.aligned_bary(&seg.b.face_vertices) else {
                    return Err(TrackError::TopologyViolation(format!(
                        "segments {} and {}: same face {} but unrelated vertex ids",
                        i, j, seg.b.face
                    )));
                };
                for k in 0..3 {
                    if !seg.b.bary[k].approx_eq(&aligned[k]) {
                        log::warn!(
                            "curve defect between segments {} and {} in face {}",
                            i,
                            j,
                            seg.b.face
                        );
                        return Err(TrackError::TopologyViolation(format!(
                            "segments {} and {}: shared endpoint disagrees in face {}",
                            i, j, seg.b.face
                        )));
                    }
                }
            } else {
                // Across faces the outgoing support vertices must appear in
                // the incoming face with matching weights.
                for k in 0..3 {
                    if seg.b.bary[k].is_zero() {
                        continue;
                    }
                    let id = seg.b.face_vertices[k];
                    let Some(m) = succ.a.face_vertices.iter().position(|&v| v == id) else {
                        return Err(TrackError::TopologyViolation(format!(
                            "segments {} and {}: support vertex {} missing from successor face {}",
                            i, j, id, succ.a.face
                        )));
                    };
                    if !seg.b.bary[k].approx_eq(&succ.a.bary[m]) {
                        return Err(TrackError::TopologyViolation(format!(
                            "segments {} and {}: weight of vertex {} disagrees across faces",
                            i, j, id
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Exact count of crossings between this curve and `other` (pass the
    /// same curve for self-intersections). Pairs that are chain-adjacent
    /// in the same curve trivially touch and are excluded; everything else
    /// sharing a face is tested with the exact kernel.
    pub fn count_crossings(&self, other: &QueryCurve<T>) -> usize {
        let same = std::ptr::eq(self, other);
        let mut count = 0usize;
        for i in 0..self.segments.len() {
            let j0 = if same { i + 1 } else { 0 };
            for j in j0..other.segments.len() {
                let si = &self.segments[i];
                let sj = &other.segments[j];
                if same && (si.next == Some(j) || sj.next == Some(i)) {
                    continue;
                }
                if si.a.face != sj.a.face {
                    continue;
                }
                let (Some(a2), Some(b2)) = (
                    sj.a.aligned_bary(&si.a.face_vertices),
                    sj.b.aligned_bary(&si.a.face_vertices),
                ) else {
                    log::warn!(
                        "segments share face {} but not vertex ids; skipping pair",
                        si.a.face
                    );
                    continue;
                };
                let p1 = rational_plane_point(&si.a.bary);
                let p2 = rational_plane_point(&si.b.bary);
                let p3 = rational_plane_point(&a2);
                let p4 = rational_plane_point(&b2);
                if segment_intersection(&p1, &p2, &p3, &p4).is_some() {
                    log::debug!("crossing between segments {} and {}", i, j);
                    count += 1;
                }
            }
        }
        count
    }
}

fn rational_plane_point<T: Scalar>(bary: &[T; 3]) -> Point2<TrackRational> {
    Point2 {
        x: TrackRational(bary[1].to_rational()),
        y: TrackRational(bary[2].to_rational()),
    }
}

/// When `first` and `second` form a mergeable collinear run, the merged
/// segment's far endpoint (aligned to `first`'s vertex order).
fn merge_candidate<T: Scalar>(
    first: &QuerySegment<T>,
    second: &QuerySegment<T>,
) -> Option<QueryPoint<T>> {
    if first.origin != second.origin || first.a.face != second.a.face {
        return None;
    }
    let join = second.a.aligned_bary(&first.a.face_vertices)?;
    for k in 0..3 {
        if !first.b.bary[k].approx_eq(&join[k]) {
            return None;
        }
    }
    let far = second.b.aligned_bary(&first.a.face_vertices)?;

    // Collinearity of a, b and far in the barycentric plane, under the
    // scalar's own zero semantics.
    let pfar = Point2 {
        x: far[1].clone(),
        y: far[2].clone(),
    };
    if !orient2d(&first.a.plane_point(), &first.b.plane_point(), &pfar).is_zero() {
        return None;
    }

    Some(QueryPoint::new(
        first.a.face,
        far,
        first.a.face_vertices,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::track_f64::TrackF64;

    fn pt(face: i64, bary: [f64; 3]) -> QueryPoint<TrackF64> {
        QueryPoint::new(
            face,
            [
                TrackF64(bary[0]),
                TrackF64(bary[1]),
                TrackF64(bary[2]),
            ],
            [10, 20, 30],
        )
    }

    #[test]
    fn splice_preserves_chain() {
        let mut curve = QueryCurve::from_segments(vec![
            QuerySegment {
                a: pt(7, [1.0, 0.0, 0.0]),
                b: pt(7, [0.0, 1.0, 0.0]),
                origin: 0,
                next: Some(1),
            },
            QuerySegment {
                a: pt(7, [0.0, 1.0, 0.0]),
                b: pt(7, [0.0, 0.0, 1.0]),
                origin: 1,
                next: None,
            },
        ]);
        curve.splice(
            0,
            vec![
                QuerySegment::new(pt(7, [1.0, 0.0, 0.0]), pt(7, [0.5, 0.5, 0.0]), 0),
                QuerySegment::new(pt(7, [0.5, 0.5, 0.0]), pt(7, [0.0, 1.0, 0.0]), 0),
            ],
        );
        assert_eq!(curve.len(), 3);
        assert_eq!(curve.chain_order(), vec![0, 2, 1]);
    }

    #[test]
    fn aligned_bary_is_a_permutation() {
        let p = pt(7, [0.2, 0.3, 0.5]);
        let aligned = p.aligned_bary(&[30, 10, 20]).unwrap();
        assert_eq!(aligned[0].0, 0.5);
        assert_eq!(aligned[1].0, 0.2);
        assert_eq!(aligned[2].0, 0.3);
        assert!(p.aligned_bary(&[30, 10, 99]).is_none());
    }
}
