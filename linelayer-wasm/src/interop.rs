use js_sys::{Object, Reflect, Uint32Array, Uint8Array};
use linelayer::model::{Color, Vec2};
use wasm_bindgen::JsValue;

pub fn new_obj() -> Object { Object::new() }
pub fn set_kv(obj: &Object, k: &str, v: &JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(k), v);
}
pub fn arr_u32(slice: &[u32]) -> Uint32Array {
    let arr = Uint32Array::new_with_length(slice.len() as u32);
    arr.copy_from(slice); arr
}
pub fn arr_u8(slice: &[u8]) -> Uint8Array {
    let arr = Uint8Array::new_with_length(slice.len() as u32);
    arr.copy_from(slice); arr
}

/// Interleaved `x, y` floats; `None` when the length is odd.
pub fn vec2s(xy: &[f32]) -> Option<Vec<Vec2>> {
    if xy.len() % 2 != 0 { return None; }
    Some(xy.chunks_exact(2).map(|c| Vec2::new(c[0], c[1])).collect())
}

/// Interleaved `r, g, b, a` floats; `None` when the length is not a multiple of 4.
pub fn colors(rgba: &[f32]) -> Option<Vec<Color>> {
    if rgba.len() % 4 != 0 { return None; }
    Some(rgba.chunks_exact(4).map(|c| Color::rgba(c[0], c[1], c[2], c[3])).collect())
}
