use crate::model::{Color, IndexSlot, Point, Run, Vec2, INVALID, NONE};

/// Append-only arenas of points and index slots, sliced into runs.
///
/// Runs never reuse a hole; removed or resized runs are only marked unused
/// and get reclaimed by [`crate::algorithms::compact::compact`].
#[derive(Clone, Debug, Default)]
pub struct RunStore {
    pub(crate) points: Vec<Point>,
    pub(crate) slots: Vec<IndexSlot>,
    pub(crate) runs: Vec<Run>,
    pub(crate) unused: u32,
}

impl RunStore {
    pub fn with_capacity(points: usize, indices: usize) -> Self {
        RunStore {
            points: Vec::with_capacity(points),
            slots: Vec::with_capacity(indices),
            runs: Vec::new(),
            unused: 0,
        }
    }

    /// Appends a run of default-filled points and slots and returns its id.
    pub fn allocate(&mut self, point_count: u32, index_count: u32, owner: u32) -> u32 {
        let run = Run {
            point_offset: self.points.len() as u32,
            point_count,
            index_offset: self.slots.len() as u32,
            index_count,
            owner,
            join_count: 0,
        };
        self.points.resize(
            self.points.len() + point_count as usize,
            Point {
                position: Vec2::ZERO,
                color: Color::WHITE,
            },
        );
        self.slots.resize(
            self.slots.len() + index_count as usize,
            IndexSlot {
                point: 0,
                neighbor: NONE,
            },
        );
        let id = self.runs.len() as u32;
        self.runs.push(run);
        id
    }

    /// Flags a run as reclaimable. Both offsets flip together.
    pub fn mark_unused(&mut self, run: u32) {
        if let Some(r) = self.runs.get_mut(run as usize) {
            debug_assert!(!r.is_unused(), "run {} marked unused twice", run);
            r.point_offset = INVALID;
            r.index_offset = INVALID;
            self.unused += 1;
        }
    }

    pub fn run(&self, run: u32) -> &Run {
        &self.runs[run as usize]
    }

    /// True when a run matches the given sizes and can be overwritten in place.
    pub fn fits(&self, run: u32, point_count: u32, index_count: u32) -> bool {
        match self.runs.get(run as usize) {
            Some(r) => !r.is_unused() && r.point_count == point_count && r.index_count == index_count,
            None => false,
        }
    }

    /// Mutable point and slot slices of a live run plus its join counter.
    pub fn run_data_mut(&mut self, run: u32) -> (&mut [Point], &mut [IndexSlot], &mut u32) {
        let r = &mut self.runs[run as usize];
        debug_assert!(!r.is_unused(), "writing into unused run {}", run);
        let p0 = r.point_offset as usize;
        let i0 = r.index_offset as usize;
        (
            &mut self.points[p0..p0 + r.point_count as usize],
            &mut self.slots[i0..i0 + r.index_count as usize],
            &mut r.join_count,
        )
    }

    pub fn points_of(&self, run: &Run) -> &[Point] {
        let p0 = run.point_offset as usize;
        &self.points[p0..p0 + run.point_count as usize]
    }

    pub fn slots_of(&self, run: &Run) -> &[IndexSlot] {
        let i0 = run.index_offset as usize;
        &self.slots[i0..i0 + run.index_count as usize]
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn unused_count(&self) -> u32 {
        self.unused
    }

    pub fn point_len(&self) -> usize {
        self.points.len()
    }

    pub fn slot_len(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_appends_after_holes() {
        let mut s = RunStore::default();
        let a = s.allocate(3, 4, 0);
        let b = s.allocate(2, 2, 1);
        s.mark_unused(a);
        let c = s.allocate(1, 2, 2);
        assert_eq!((a, b, c), (0, 1, 2));
        assert_eq!(s.run(c).point_offset, 5);
        assert_eq!(s.run(c).index_offset, 6);
        assert_eq!(s.point_len(), 6);
        assert_eq!(s.unused_count(), 1);
        assert!(s.run(a).is_unused());
        assert_eq!(s.run(a).index_offset, INVALID);
    }

    #[test]
    fn fits_only_live_same_sized_runs() {
        let mut s = RunStore::default();
        let a = s.allocate(3, 4, 0);
        assert!(s.fits(a, 3, 4));
        assert!(!s.fits(a, 3, 6));
        s.mark_unused(a);
        assert!(!s.fits(a, 3, 4));
        assert!(!s.fits(9, 3, 4));
    }
}
