use crate::algorithms::runs::RunStore;
use crate::model::LineData;
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CompactStats {
    pub runs_dropped: u32,
    pub points_reclaimed: u32,
    pub slots_reclaimed: u32,
}

/// Drops unused runs and slides live ones to the front in one forward pass.
///
/// Slot contents are run-local (point and neighbor indices are relative to the
/// run), so moving a run only rewrites its offsets and, when its table slot
/// moves, the owning line's back-reference.
pub fn compact(store: &mut RunStore, lines: &mut [Option<LineData>]) -> CompactStats {
    let mut next_point = 0u32;
    let mut next_slot = 0u32;
    let mut next_run = 0u32;
    let before_points = store.points.len() as u32;
    let before_slots = store.slots.len() as u32;
    let before_runs = store.runs.len() as u32;

    for i in 0..store.runs.len() {
        let mut run = store.runs[i];
        if run.is_unused() {
            continue;
        }
        if run.point_offset != next_point {
            let from = run.point_offset as usize;
            store
                .points
                .copy_within(from..from + run.point_count as usize, next_point as usize);
            run.point_offset = next_point;
        }
        if run.index_offset != next_slot {
            let from = run.index_offset as usize;
            store
                .slots
                .copy_within(from..from + run.index_count as usize, next_slot as usize);
            run.index_offset = next_slot;
        }
        if i as u32 != next_run {
            let owner = lines.get_mut(run.owner as usize).and_then(|l| l.as_mut());
            debug_assert!(owner.is_some(), "run {} owned by dead line {}", i, run.owner);
            if let Some(line) = owner {
                debug_assert_eq!(line.run, i as u32, "back-reference mismatch");
                line.run = next_run;
            }
        }
        store.runs[next_run as usize] = run;
        next_point += run.point_count;
        next_slot += run.index_count;
        next_run += 1;
    }

    store.points.truncate(next_point as usize);
    store.slots.truncate(next_slot as usize);
    store.runs.truncate(next_run as usize);
    store.unused = 0;

    CompactStats {
        runs_dropped: before_runs - next_run,
        points_reclaimed: before_points - next_point,
        slots_reclaimed: before_slots - next_slot,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Color, IndexSlot, Point, Vec2};

    fn fill(store: &mut RunStore, run: u32, tag: f32) {
        let (points, slots, _) = store.run_data_mut(run);
        for (i, p) in points.iter_mut().enumerate() {
            *p = Point {
                position: Vec2::new(tag, i as f32),
                color: Color::WHITE,
            };
        }
        for (i, s) in slots.iter_mut().enumerate() {
            *s = IndexSlot {
                point: (i / 2) as u32,
                neighbor: crate::model::NONE,
            };
        }
    }

    #[test]
    fn slides_live_runs_and_fixes_owners() {
        let mut store = RunStore::default();
        let mut lines: Vec<Option<LineData>> = Vec::new();
        for (id, (pc, ic)) in [(3u32, 4u32), (2, 2), (4, 6)].into_iter().enumerate() {
            let run = store.allocate(pc, ic, id as u32);
            fill(&mut store, run, id as f32);
            lines.push(Some(LineData::new(run, 0, 0)));
        }
        store.mark_unused(0);
        lines[0] = None;

        let stats = compact(&mut store, &mut lines);
        assert_eq!(
            stats,
            CompactStats {
                runs_dropped: 1,
                points_reclaimed: 3,
                slots_reclaimed: 4
            }
        );
        assert_eq!(store.runs().len(), 2);
        assert_eq!(store.point_len(), 6);
        assert_eq!(store.slot_len(), 8);

        let l1 = lines[1].unwrap();
        let l2 = lines[2].unwrap();
        assert_eq!((l1.run, l2.run), (0, 1));
        let r2 = *store.run(l2.run);
        assert_eq!((r2.point_offset, r2.index_offset), (2, 2));
        assert_eq!(store.points_of(&r2)[3].position, Vec2::new(2.0, 3.0));
        assert_eq!(store.points_of(store.run(l1.run))[0].position, Vec2::new(1.0, 0.0));
        assert_eq!(store.unused_count(), 0);
    }

    #[test]
    fn no_holes_is_a_noop() {
        let mut store = RunStore::default();
        let mut lines = vec![Some(LineData::new(0, 0, 0))];
        store.allocate(2, 2, 0);
        let stats = compact(&mut store, &mut lines);
        assert_eq!(stats, CompactStats::default());
        assert_eq!(lines[0].unwrap().run, 0);
    }
}
