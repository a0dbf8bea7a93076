//! Expansion of run topology into a quad mesh.
//!
//! Global index slot `s` becomes vertices `2s` (up) and `2s + 1` (down), both
//! at the slot's point; the consumer displaces them along the segment normal
//! using `prev_position` / `next_position`. The vertex buffer therefore covers
//! every live run in run-table order, while the index buffer only references
//! the draw-ordered visible lines.

use crate::algorithms::runs::RunStore;
use crate::geometry::align::anchor_origin;
use crate::model::{LineData, NodeInputs, Vec2, Vertex, NONE};
use crate::style::LineStyleTable;
use bitflags::bitflags;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Annotation: u32 {
        /// First of the two copies of a slot.
        const UP = 1 << 0;
        /// The side toward `prev`/`next` continues into a join, not a cap.
        const JOIN = 1 << 1;
        /// Slot is the first of its segment pair.
        const BEGIN = 1 << 2;
    }
}

/// Final buffers handed to the backend.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    /// `draw_offsets[i]..draw_offsets[i + 1]` is the index range of the i-th
    /// drawn line.
    pub draw_offsets: Vec<u32>,
}

pub(crate) struct VertexPass<'a> {
    pub store: &'a RunStore,
    pub nodes: NodeInputs<'a>,
    pub styles: &'a LineStyleTable,
    pub disabled_transition: Option<fn(u32) -> u32>,
    pub check_indices: bool,
}

/// Rewrites every vertex. Lines must reference valid nodes and styles.
pub(crate) fn build_vertices(pass: &VertexPass<'_>, lines: &mut [Option<LineData>], out: &mut Vec<Vertex>) {
    let store = pass.store;
    out.clear();
    out.resize(2 * store.slot_len(), Vertex::default());

    for run in store.runs() {
        debug_assert!(!run.is_unused(), "unused run survived compaction");
        let line = match lines.get_mut(run.owner as usize).and_then(|l| l.as_mut()) {
            Some(l) => l,
            None => continue,
        };
        let node = line.node as usize;
        line.calculated_style = match pass.disabled_transition {
            Some(f) if !pass.nodes.enabled[node] => f(line.style),
            _ => line.style,
        };
        let style = match pass.styles.style(line.calculated_style) {
            Some(s) => *s,
            None => {
                debug_assert!(false, "calculated style {} out of range", line.calculated_style);
                continue;
            }
        };
        let alignment = line.alignment.unwrap_or(style.alignment);
        let origin = anchor_origin(
            pass.nodes.offsets[node],
            pass.nodes.sizes[node],
            style.padding + line.padding,
            alignment,
        );
        let tint = line.color.scaled(pass.nodes.opacities[node]);

        let points = store.points_of(run);
        let slots = store.slots_of(run);
        if pass.check_indices {
            for s in slots {
                assert!(
                    (s.point as usize) < points.len(),
                    "slot point {} out of range",
                    s.point
                );
                assert!(
                    s.neighbor == NONE || (s.neighbor as usize) < slots.len(),
                    "neighbor slot {} out of range",
                    s.neighbor
                );
            }
        }
        let across = |slot: u32| -> Vec2 {
            if slot == NONE {
                Vec2::ZERO
            } else {
                points[slots[slot as usize].point as usize].position + origin
            }
        };

        let base = 2 * run.index_offset as usize;
        for (i, slot) in slots.iter().enumerate() {
            let point = points[slot.point as usize];
            let begin = i % 2 == 0;
            let partner = across(i as u32 ^ 1);
            let neighbor = across(slot.neighbor);
            let (prev_position, next_position) = if begin {
                (neighbor, partner)
            } else {
                (partner, neighbor)
            };
            let mut annotation = Annotation::empty();
            if begin {
                annotation |= Annotation::BEGIN;
            }
            if slot.neighbor != NONE {
                annotation |= Annotation::JOIN;
            }
            let down = Vertex {
                position: point.position + origin,
                prev_position,
                next_position,
                color: point.color * tint,
                annotation: annotation.bits(),
                style_uniform: style.uniform,
            };
            let up = Vertex {
                annotation: (annotation | Annotation::UP).bits(),
                ..down
            };
            out[base + 2 * i] = up;
            out[base + 2 * i + 1] = down;
        }
    }
}

/// Index count a run contributes when drawn.
pub fn drawn_index_count(index_count: u32, join_count: u32) -> u32 {
    3 * index_count + 6 * join_count
}

/// Writes segment and join quads for `draw_order`, one index range per line.
///
/// Each segment emits `v, v+2, v+1, v+1, v+2, v+3`: two triangles, or read as
/// lines one real segment followed by two degenerate ones, which is what a
/// hairline fallback draws. A join quad is emitted only from the slot whose
/// neighbor index is greater, so every join appears once.
pub(crate) fn build_indices(
    store: &RunStore,
    lines: &[Option<LineData>],
    draw_order: &[u32],
    indices: &mut Vec<u32>,
    draw_offsets: &mut Vec<u32>,
) {
    indices.clear();
    draw_offsets.clear();
    draw_offsets.reserve(draw_order.len() + 1);

    let mut total = 0usize;
    for &id in draw_order {
        if let Some(Some(line)) = lines.get(id as usize) {
            let run = store.run(line.run);
            total += drawn_index_count(run.index_count, run.join_count) as usize;
        }
    }
    indices.reserve(total);

    for &id in draw_order {
        draw_offsets.push(indices.len() as u32);
        let line = match lines.get(id as usize) {
            Some(Some(l)) => l,
            _ => continue,
        };
        let run = store.run(line.run);
        debug_assert!(!run.is_unused(), "drawing unused run {}", line.run);
        let slots = store.slots_of(run);
        let vertex = |slot: u32| 2 * (run.index_offset + slot);
        for first in (0..run.index_count).step_by(2) {
            let v = vertex(first);
            indices.extend_from_slice(&[v, v + 2, v + 1, v + 1, v + 2, v + 3]);
            for s in [first, first + 1] {
                let n = slots[s as usize].neighbor;
                if n != NONE && n > s {
                    let a = vertex(s);
                    let b = vertex(n ^ 1);
                    indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
                }
            }
        }
    }
    draw_offsets.push(indices.len() as u32);
}
