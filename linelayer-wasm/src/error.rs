use crate::interop::{new_obj, set_kv};
use linelayer::error::LineError;
use wasm_bindgen::JsValue;

pub fn ok(v: JsValue) -> JsValue {
    let o = new_obj();
    set_kv(&o, "ok", &JsValue::from_bool(true));
    set_kv(&o, "value", &v);
    o.into()
}

pub fn err(code: &'static str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let root = new_obj();
    set_kv(&root, "ok", &JsValue::from_bool(false));
    let e = new_obj();
    set_kv(&e, "code", &JsValue::from_str(code));
    set_kv(&e, "message", &JsValue::from_str(&message.into()));
    if let Some(d) = data { set_kv(&e, "data", &d); }
    set_kv(&root, "error", &e.into());
    root.into()
}

fn num(v: impl Into<f64>) -> JsValue { JsValue::from_f64(v.into()) }

// `data` payload from key/value pairs.
fn data(pairs: &[(&str, JsValue)]) -> Option<JsValue> {
    let d = new_obj();
    for (k, v) in pairs { set_kv(&d, k, v); }
    Some(d.into())
}

/// Error object for an engine error; the code comes from [`LineError::code`].
pub fn line_error(e: &LineError) -> JsValue {
    let d = match e {
        LineError::IndexOutOfRange { index, point_count } => data(&[("index", num(*index)), ("point_count", num(*point_count))]),
        LineError::InvalidId { kind, id } => data(&[("kind", JsValue::from_str(kind)), ("id", num(*id))]),
        LineError::StyleOutOfRange { style, style_count } => data(&[("style", num(*style)), ("style_count", num(*style_count))]),
        LineError::NodeOutOfRange { node, node_count } => data(&[("node", num(*node)), ("node_count", num(*node_count))]),
        LineError::LengthMismatch { param, expected, got } => data(&[("param", JsValue::from_str(param)), ("expected", num(*expected as f64)), ("got", num(*got as f64))]),
        LineError::NonFinite { param } => data(&[("param", JsValue::from_str(param))]),
        _ => None,
    };
    err(e.code(), e.to_string(), d)
}

#[inline]
pub fn length_mismatch(param: &str, stride: usize, got: usize) -> JsValue {
    let d = data(&[("param", JsValue::from_str(param)), ("stride", num(stride as f64)), ("got", num(got as f64))]);
    err("length_mismatch", format!("'{}' length must be a multiple of {}", param, stride), d)
}

#[inline]
pub fn invalid_enum(param: &str, got: u8) -> JsValue {
    err("invalid_enum", format!("'{}' value out of range", param), data(&[("param", JsValue::from_str(param)), ("got", num(got))]))
}

/// Wraps a result, mapping `Ok` through `f`.
pub fn res<T>(r: Result<T, LineError>, f: impl FnOnce(T) -> JsValue) -> JsValue {
    match r {
        Ok(v) => ok(f(v)),
        Err(e) => line_error(&e),
    }
}
