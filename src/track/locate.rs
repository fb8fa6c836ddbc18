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

//! Re-expressing a barycentric point of one record side inside the other
//! side. Points supported by a surviving vertex or edge keep their weights
//! bit-for-bit; everything else goes through the parametric plane and the
//! destination side's triangle bases.

use crate::geometry::Point2;
use crate::numeric::scalar::Scalar;
use crate::record::op::MeshView;
use crate::track::cache::{BarycentricCache, MeshIndex};
use crate::track::curve::QueryPoint;
use crate::track::error::TrackError;

/// Interpolated parametric-plane position of a barycentric point.
pub fn world_point<T: Scalar>(bary: &[T; 3], corners: &[Point2<T>; 3]) -> Point2<T> {
    let x = bary[0].clone() * corners[0].x.clone()
        + bary[1].clone() * corners[1].x.clone()
        + bary[2].clone() * corners[2].x.clone();
    let y = bary[0].clone() * corners[0].y.clone()
        + bary[1].clone() * corners[1].y.clone()
        + bary[2].clone() * corners[2].y.clone();
    Point2 { x, y }
}

/// Relocates `point` from the `src` side into the `dst` side of one
/// record.
///
/// `Ok(None)` means `src` does not mention the point's face at all: the
/// edit happened elsewhere and the point is untouched. A face that is
/// present but carries different vertex ids than the point cached is a
/// corrupt log and fails hard.
pub fn locate<T: Scalar>(
    point: &QueryPoint<T>,
    src: &MeshView,
    src_index: &MeshIndex,
    dst: &MeshView,
    dst_index: &MeshIndex,
    dst_cache: &BarycentricCache<T>,
) -> Result<Option<QueryPoint<T>>, TrackError> {
    let Some(src_f) = src_index.face_of_id(point.face) else {
        return Ok(None);
    };

    let actual = src.face_vertex_ids(src_f)?;
    let Some(bary) = point.aligned_bary(&actual) else {
        return Err(TrackError::FaceIdMismatch {
            face: point.face,
            cached: point.face_vertices,
            actual,
        });
    };

    // Vertex and edge points keep their weights exactly when the support
    // survives the edit: no arithmetic, so no rounding drift.
    let zeros = bary.iter().filter(|c| c.is_zero()).count();
    if zeros == 2 {
        if let Some(k) = bary.iter().position(|c| !c.is_zero())
            && let Some(found) = rebase_on_vertex(actual[k], dst, dst_index)?
        {
            return Ok(Some(found));
        }
    } else if zeros == 1 {
        if let Some(z) = bary.iter().position(|c| c.is_zero()) {
            let (ka, kb) = ((z + 1) % 3, (z + 2) % 3);
            if let Some(found) = rebase_on_edge(
                (actual[ka], bary[ka].clone()),
                (actual[kb], bary[kb].clone()),
                dst,
                dst_index,
            )? {
                return Ok(Some(found));
            }
        }
    }

    // Interior point, or the support did not survive: go through the
    // parametric plane and scan the destination faces.
    let corners = src.corner_points::<T>(src_f)?;
    let p = world_point(&bary, &corners);
    for f in 0..dst.face_count() {
        let Some(basis) = dst_cache.basis(f) else {
            continue;
        };
        if let Some(found) = basis.contains(&p) {
            return Ok(Some(QueryPoint::new(
                dst.face_id(f)?,
                found,
                dst.face_vertex_ids(f)?,
            )));
        }
    }
    Err(TrackError::LocationFailure { face: point.face })
}

/// A unit-weight point on global vertex `id` in any destination face
/// incident to it.
fn rebase_on_vertex<T: Scalar>(
    id: i64,
    dst: &MeshView,
    dst_index: &MeshIndex,
) -> Result<Option<QueryPoint<T>>, TrackError> {
    for &f in dst_index.faces_with_vertex(id) {
        let ids = dst.face_vertex_ids(f)?;
        let Some(k) = ids.iter().position(|&v| v == id) else {
            continue;
        };
        let mut bary = [T::zero(), T::zero(), T::zero()];
        bary[k] = T::one();
        return Ok(Some(QueryPoint::new(dst.face_id(f)?, bary, ids)));
    }
    Ok(None)
}

/// The same point on edge `(a, b)` in a destination face carrying that
/// edge, weights copied verbatim into the matching slots.
fn rebase_on_edge<T: Scalar>(
    (id_a, w_a): (i64, T),
    (id_b, w_b): (i64, T),
    dst: &MeshView,
    dst_index: &MeshIndex,
) -> Result<Option<QueryPoint<T>>, TrackError> {
    for &f in dst_index.faces_with_edge(id_a, id_b) {
        let ids = dst.face_vertex_ids(f)?;
        let (Some(ka), Some(kb)) = (
            ids.iter().position(|&v| v == id_a),
            ids.iter().position(|&v| v == id_b),
        ) else {
            continue;
        };
        let mut bary = [T::zero(), T::zero(), T::zero()];
        bary[ka] = w_a.clone();
        bary[kb] = w_b.clone();
        return Ok(Some(QueryPoint::new(dst.face_id(f)?, bary, ids)));
    }
    Ok(None)
}
