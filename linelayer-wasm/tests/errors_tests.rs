use js_sys::Reflect;
use linelayer_wasm::{LineLayer, LineStyles};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn is_err(v: &JsValue, code: &str) -> bool {
    if let Ok(ok) =
        Reflect::get(v, &JsValue::from_str("ok")).and_then(|x| x.as_bool().ok_or(JsValue::NULL))
    {
        if ok {
            return false;
        }
        if let Ok(err) = Reflect::get(v, &JsValue::from_str("error")) {
            if let Ok(c) = Reflect::get(&err, &JsValue::from_str("code")) {
                return c.as_string().map_or(false, |s| s == code);
            }
        }
    }
    false
}

fn is_ok(v: &JsValue) -> bool {
    Reflect::get(v, &JsValue::from_str("ok"))
        .ok()
        .and_then(|x| x.as_bool())
        .unwrap_or(false)
}

const SQUARE: [f32; 8] = [0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0];

#[wasm_bindgen_test]
fn bad_inputs_return_typed_errors() {
    let mut l = LineLayer::new(1);
    assert!(is_err(&l.create_strip_res(0, &[0.0, 0.0], &[], 0), "invalid_point_count"));
    assert!(is_err(&l.create_loop_res(0, &SQUARE[..4], &[], 0), "invalid_point_count"));
    assert!(is_err(&l.create_line_res(0, &[0, 1, 2], &SQUARE, &[], 0), "odd_index_count"));
    assert!(is_err(&l.create_line_res(0, &[0, 9], &SQUARE, &[], 0), "out_of_range"));
    assert!(is_err(&l.create_strip_res(3, &SQUARE, &[], 0), "out_of_range"));
    assert!(is_err(&l.create_strip_res(0, &SQUARE[..3], &[], 0), "length_mismatch"));
    assert!(is_err(&l.create_strip_res(0, &SQUARE, &[1.0; 4], 0), "length_mismatch"));
    assert_eq!(l.used_count(), 0, "state mutated on error");
}

#[wasm_bindgen_test]
fn handle_api_reports_invalid_ids() {
    let mut l = LineLayer::new(1);
    let id = l.create_strip(0, &SQUARE, &[], 0).unwrap();
    assert!(is_ok(&l.remove_res(id)));
    assert!(is_err(&l.remove_res(id), "invalid_id"));
    assert!(is_err(&l.set_style_res(id, 0), "invalid_id"));
    assert!(is_err(&l.set_line_strip_res(id, &SQUARE, &[]), "invalid_id"));
    assert!(!l.set_color(id, 1.0, 1.0, 1.0, 1.0));
    let id = l.create_loop(0, &SQUARE, &[], 0).unwrap();
    assert!(is_err(&l.set_alignment_res(id, 9), "invalid_enum"));
    assert!(is_ok(&l.set_alignment_res(id, 255)));
}

#[wasm_bindgen_test]
fn update_returns_mesh_object() {
    let mut l = LineLayer::new(1);
    let styles = LineStyles::new(1, 1);
    let id = l.create_loop(0, &SQUARE, &[], 0).unwrap();
    let r = l.update_res(1, &[id], &[0.0, 0.0], &[1.0, 1.0], &[1.0], &[1], &styles);
    assert!(is_ok(&r));
    let mesh = Reflect::get(&r, &JsValue::from_str("value")).unwrap();
    let changed = Reflect::get(&mesh, &JsValue::from_str("indicesChanged")).unwrap();
    assert_eq!(changed.as_bool(), Some(true));

    // node 1 does not exist
    l.attach(id, 1);
    let r = l.update_res(0, &[id], &[0.0, 0.0], &[1.0, 1.0], &[1.0], &[1], &styles);
    assert!(is_err(&r, "out_of_range"));
    assert!(is_err(
        &l.update_res(0, &[id], &[0.0], &[1.0, 1.0], &[1.0], &[1], &styles),
        "length_mismatch"
    ));
}

#[wasm_bindgen_test]
fn style_table_validates_inputs() {
    let mut s = LineStyles::new(1, 1);
    let v = s.version();
    assert!(is_err(&s.set_uniforms_res(&[1.0; 6]), "length_mismatch"));
    assert!(is_err(
        &s.set_uniforms_res(&[1.0, 1.0, 1.0, 1.0, 2.0, 0.5, 0.5]),
        "out_of_range"
    ));
    assert!(is_err(&s.set_cap_style_res(7), "invalid_enum"));
    assert_eq!(s.version(), v);
    assert!(is_ok(&s.set_styles_res(&[0], &[4], &[0.0; 4])));
    assert!(s.version() > v);
    assert!(is_err(&s.set_styles_res(&[3], &[4], &[0.0; 4]), "out_of_range"));
}

#[wasm_bindgen_test]
fn miter_angle_limit_is_settable_per_uniform() {
    let mut s = LineStyles::new(2, 1);
    let v = s.version();
    assert!(is_err(&s.set_uniform_miter_angle_res(2, 1.0), "out_of_range"));
    assert!(is_err(&s.set_uniform_miter_angle_res(0, 0.0), "out_of_range"));
    assert!(is_err(&s.set_uniform_miter_angle_res(0, 4.0), "out_of_range"));
    assert_eq!(s.version(), v);
    assert!(is_ok(&s.set_uniform_miter_angle_res(1, std::f32::consts::FRAC_PI_2)));
    assert!(s.version() > v);
}
