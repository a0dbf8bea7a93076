use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Marks an index slot without a join partner, i.e. a cap.
pub const NONE: u32 = u32::MAX;
/// Marks a run whose arena ranges are reclaimable.
pub const INVALID: u32 = u32::MAX;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, Pod, Zeroable)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, o: Vec2) -> Vec2 {
        Vec2 {
            x: self.x + o.x,
            y: self.y + o.y,
        }
    }
}

/// RGBA color, linear floats. Colors coming out of the mesh are premultiplied
/// by node opacity.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Pod, Zeroable)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    #[inline]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Color { r, g, b, a }
    }

    #[inline]
    pub fn scaled(self, k: f32) -> Color {
        Color {
            r: self.r * k,
            g: self.g * k,
            b: self.b * k,
            a: self.a * k,
        }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl std::ops::Mul for Color {
    type Output = Color;
    #[inline]
    fn mul(self, o: Color) -> Color {
        Color {
            r: self.r * o.r,
            g: self.g * o.g,
            b: self.b * o.b,
            a: self.a * o.a,
        }
    }
}

/// Inner padding of a node rect, in the same units as node offsets/sizes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Padding {
    pub const ZERO: Padding = Padding {
        left: 0.0,
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
    };

    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Padding {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn is_finite(self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.right.is_finite()
            && self.bottom.is_finite()
    }
}

impl std::ops::Add for Padding {
    type Output = Padding;
    fn add(self, o: Padding) -> Padding {
        Padding {
            left: self.left + o.left,
            top: self.top + o.top,
            right: self.right + o.right,
            bottom: self.bottom + o.bottom,
        }
    }
}

/// Anchor of a line's origin inside its node rect. Y grows downwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alignment {
    TopLeft = 0,
    TopCenter = 1,
    TopRight = 2,
    MiddleLeft = 3,
    MiddleCenter = 4,
    MiddleRight = 5,
    BottomLeft = 6,
    BottomCenter = 7,
    BottomRight = 8,
}

impl Alignment {
    pub fn from_u8(v: u8) -> Option<Alignment> {
        use Alignment::*;
        Some(match v {
            0 => TopLeft,
            1 => TopCenter,
            2 => TopRight,
            3 => MiddleLeft,
            4 => MiddleCenter,
            5 => MiddleRight,
            6 => BottomLeft,
            7 => BottomCenter,
            8 => BottomRight,
            _ => return None,
        })
    }

    /// Horizontal anchor: 0 left, 1 center, 2 right.
    #[inline]
    pub fn column(self) -> u8 {
        self as u8 % 3
    }

    /// Vertical anchor: 0 top, 1 middle, 2 bottom.
    #[inline]
    pub fn row(self) -> u8 {
        self as u8 / 3
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineCapStyle {
    Butt = 0,
    Square = 1,
    Round = 2,
    Triangle = 3,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineJoinStyle {
    Miter = 0,
    Bevel = 1,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub position: Vec2,
    pub color: Color,
}

/// One entry of a line's index buffer. `neighbor` is the slot holding the far
/// endpoint of the segment joined at this slot's point, or [`NONE`] for a cap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexSlot {
    pub point: u32,
    pub neighbor: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Run {
    pub point_offset: u32,
    pub point_count: u32,
    pub index_offset: u32,
    pub index_count: u32,
    pub owner: u32,
    pub join_count: u32,
}

impl Run {
    #[inline]
    pub fn is_unused(&self) -> bool {
        self.point_offset == INVALID
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineData {
    pub run: u32,
    pub node: u32,
    pub style: u32,
    pub calculated_style: u32,
    pub alignment: Option<Alignment>,
    pub color: Color,
    pub padding: Padding,
}

impl LineData {
    pub(crate) fn new(run: u32, node: u32, style: u32) -> Self {
        LineData {
            run,
            node,
            style,
            calculated_style: style,
            alignment: None,
            color: Color::WHITE,
            padding: Padding::ZERO,
        }
    }
}

/// Draw-ready vertex. `prev_position`/`next_position` are zero on the side
/// that ends in a cap; `annotation` holds [`crate::algorithms::mesh::Annotation`] bits.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec2,
    pub prev_position: Vec2,
    pub next_position: Vec2,
    pub color: Color,
    pub annotation: u32,
    pub style_uniform: u32,
}

/// Per-node inputs from the owning UI, indexed by node id.
#[derive(Clone, Copy, Debug)]
pub struct NodeInputs<'a> {
    pub offsets: &'a [Vec2],
    pub sizes: &'a [Vec2],
    pub opacities: &'a [f32],
    pub enabled: &'a [bool],
}

impl<'a> NodeInputs<'a> {
    /// Node count. The other columns must have the same length; `update`
    /// rejects them otherwise.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
