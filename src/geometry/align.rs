use crate::model::{Alignment, Padding, Vec2};

/// Origin of a line inside a node rect, after shrinking the rect by `padding`.
///
/// Left/top anchors sit on the padded edge, center/middle halfway between the
/// padded edges, right/bottom on the far padded edge.
pub fn anchor_origin(offset: Vec2, size: Vec2, padding: Padding, alignment: Alignment) -> Vec2 {
    let x0 = offset.x + padding.left;
    let x1 = offset.x + size.x - padding.right;
    let y0 = offset.y + padding.top;
    let y1 = offset.y + size.y - padding.bottom;
    let x = match alignment.column() {
        0 => x0,
        1 => 0.5 * (x0 + x1),
        _ => x1,
    };
    let y = match alignment.row() {
        0 => y0,
        1 => 0.5 * (y0 + y1),
        _ => y1,
    };
    Vec2 { x, y }
}
