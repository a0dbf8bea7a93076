//! Join connectivity for line index buffers.
//!
//! Each pair of index slots `(2k, 2k + 1)` is one segment. A slot's neighbor is
//! the slot holding the far endpoint of the other segment meeting at the same
//! point, so a begin slot takes its previous position from the neighbor and an
//! end slot its next position. Points used once, three or more times, or only
//! by a repeated copy of the same segment get no neighbor and render as caps.

use crate::error::LineError;
use crate::model::NONE;

/// Per-point scratch for the explicit resolver: how many non-degenerate
/// segments reference the point and the partner slots of the first two.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointUse {
    count: u32,
    partners: [u32; 2],
}

pub fn strip_index_count(point_count: usize) -> Result<usize, LineError> {
    match point_count {
        0 => Ok(0),
        1 => Err(LineError::InvalidStripPointCount(1)),
        n => Ok(2 * (n - 1)),
    }
}

pub fn loop_index_count(point_count: usize) -> Result<usize, LineError> {
    match point_count {
        0 => Ok(0),
        1 => Ok(2),
        2 => Err(LineError::InvalidLoopPointCount(2)),
        n => Ok(2 * n),
    }
}

/// Writes `{0,1, 1,2, 2,3, ...}` for a strip of `point_count` points.
pub fn fill_strip_indices(point_count: u32, out: &mut Vec<u32>) {
    out.clear();
    for i in 1..point_count {
        out.push(i - 1);
        out.push(i);
    }
}

/// Writes the strip pattern plus the closing pair back to point 0. A single
/// point becomes the degenerate pair `{0,0}`.
pub fn fill_loop_indices(point_count: u32, out: &mut Vec<u32>) {
    out.clear();
    if point_count == 0 {
        return;
    }
    if point_count == 1 {
        out.extend_from_slice(&[0, 0]);
        return;
    }
    fill_strip_indices(point_count, out);
    out.push(point_count - 1);
    out.push(0);
}

pub fn strip_neighbors(point_count: u32, out: &mut Vec<u32>) {
    out.clear();
    if point_count < 2 {
        return;
    }
    let last_segment = point_count - 2;
    for segment in 0..=last_segment {
        let begin = 2 * segment;
        out.push(if segment > 0 { begin - 2 } else { NONE });
        out.push(if segment < last_segment { begin + 3 } else { NONE });
    }
}

pub fn loop_neighbors(point_count: u32, out: &mut Vec<u32>) {
    out.clear();
    if point_count == 0 {
        return;
    }
    if point_count == 1 {
        out.extend_from_slice(&[NONE, NONE]);
        return;
    }
    debug_assert!(point_count >= 3, "two-point loops are rejected upstream");
    let last_segment = point_count - 1;
    for segment in 0..=last_segment {
        let begin = 2 * segment;
        out.push(if segment > 0 { begin - 2 } else { 2 * last_segment });
        out.push(if segment < last_segment { begin + 3 } else { 1 });
    }
}

/// Checks an explicit index buffer against `point_count`.
pub fn validate_indices(indices: &[u32], point_count: u32) -> Result<(), LineError> {
    if indices.len() % 2 != 0 {
        return Err(LineError::OddIndexCount(indices.len()));
    }
    if let Some(&index) = indices.iter().find(|&&i| i >= point_count) {
        return Err(LineError::IndexOutOfRange { index, point_count });
    }
    Ok(())
}

/// Resolves neighbors of an arbitrary index buffer by counting point uses.
///
/// `uses` is scratch reused across calls. Fails before writing anything when
/// the buffer is odd-sized or references a point past `point_count`.
pub fn explicit_neighbors(
    indices: &[u32],
    point_count: u32,
    uses: &mut Vec<PointUse>,
    out: &mut Vec<u32>,
) -> Result<(), LineError> {
    validate_indices(indices, point_count)?;

    uses.clear();
    uses.resize(point_count as usize, PointUse::default());
    for (pair, seg) in indices.chunks_exact(2).enumerate() {
        if seg[0] == seg[1] {
            continue;
        }
        let begin = 2 * pair as u32;
        for (point, partner) in [(seg[0], begin + 1), (seg[1], begin)] {
            let u = &mut uses[point as usize];
            if u.count < 2 {
                u.partners[u.count as usize] = partner;
            }
            u.count = u.count.saturating_add(1);
        }
    }

    out.clear();
    out.reserve(indices.len());
    for (slot, &point) in indices.iter().enumerate() {
        let slot = slot as u32;
        let partner = slot ^ 1;
        let u = uses[point as usize];
        let neighbor = if indices[partner as usize] == point || u.count != 2 {
            NONE
        } else {
            let [a, b] = u.partners;
            // The same unordered pair twice is not a two-point loop.
            if indices[a as usize] == indices[b as usize] {
                NONE
            } else if a != partner {
                a
            } else {
                b
            }
        };
        out.push(neighbor);
    }
    Ok(())
}

/// Number of join quads a run emits: each join is owned by the slot whose
/// neighbor index is greater than its own.
pub fn join_count(neighbors: &[u32]) -> u32 {
    neighbors
        .iter()
        .enumerate()
        .filter(|&(slot, &n)| n != NONE && n > slot as u32)
        .count() as u32
}
