// Ingestion caps, checked at the API boundary before anything is allocated

// Per-line caps
pub const MAX_POINTS_PER_LINE: usize = 1 << 20;
pub const MAX_INDICES_PER_LINE: usize = 1 << 21;

// Layer-wide caps; ids and arena offsets are u32 with u32::MAX reserved
pub const MAX_LINES: usize = 1 << 24;
pub const MAX_ARENA_LEN: usize = (u32::MAX / 4) as usize; // two vertices per slot must stay addressable

// Numeric bounds
pub const COORD_MIN: f32 = -10_000_000.0;
pub const COORD_MAX: f32 =  10_000_000.0;

#[inline]
pub fn in_coord_bounds(x: f32) -> bool { x.is_finite() && x >= COORD_MIN && x <= COORD_MAX }
