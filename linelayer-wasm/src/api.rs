use crate::error;
use crate::interop::{arr_u32, arr_u8, colors, new_obj, set_kv, vec2s};
use crate::{LineLayer, LineStyles};
use linelayer::config::LayerConfig;
use linelayer::error::LineError;
use linelayer::model::{
    Alignment, Color, LineCapStyle, LineJoinStyle, NodeInputs, Padding, Vec2, Vertex,
};
use linelayer::sink::{MeshSink, MeshView};
use linelayer::style::{LineStyle, LineStyleUniform};
use linelayer::UpdateStates;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// 0 off, 1 error, 2 warn, 3 info, 4 debug, 5 trace.
#[wasm_bindgen]
pub fn set_log_level(level: u8) {
    let filter = match level {
        0 => log::LevelFilter::Off,
        1 => log::LevelFilter::Error,
        2 => log::LevelFilter::Warn,
        3 => log::LevelFilter::Info,
        4 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    crate::console_log::init(filter);
}

/// Collects one update into a JS object of typed arrays. Unchanged buffers
/// are left out so the caller keeps its previous upload.
#[derive(Default)]
pub struct JsMesh {
    obj: Option<js_sys::Object>,
}

impl MeshSink for JsMesh {
    fn upload(&mut self, mesh: MeshView<'_>) {
        let obj = new_obj();
        set_kv(&obj, "verticesChanged", &JsValue::from_bool(mesh.vertices_changed));
        set_kv(&obj, "indicesChanged", &JsValue::from_bool(mesh.indices_changed));
        set_kv(
            &obj,
            "vertexStride",
            &JsValue::from_f64(std::mem::size_of::<Vertex>() as f64),
        );
        if mesh.vertices_changed {
            set_kv(&obj, "vertices", &arr_u8(mesh.vertex_bytes()).into());
        }
        if mesh.indices_changed {
            set_kv(&obj, "indices", &arr_u32(mesh.indices).into());
            set_kv(&obj, "drawOffsets", &arr_u32(mesh.draw_offsets).into());
        }
        self.obj = Some(obj);
    }
}

fn alignment_from(v: u8) -> Result<Option<Alignment>, JsValue> {
    if v == 255 {
        return Ok(None);
    }
    Alignment::from_u8(v)
        .map(Some)
        .ok_or_else(|| error::invalid_enum("alignment", v))
}

#[wasm_bindgen]
impl LineLayer {
    #[wasm_bindgen(constructor)]
    pub fn new(style_count: u32) -> LineLayer {
        crate::LineLayer::rs_new(style_count)
    }

    /// `config` is a plain object with `LayerConfig` fields.
    pub fn with_config_res(style_count: u32, config: JsValue) -> JsValue {
        let v = match serde_wasm_bindgen::from_value::<serde_json::Value>(config) {
            Ok(v) => v,
            Err(e) => return error::err("invalid_config", e.to_string(), None),
        };
        error::res(LayerConfig::from_json_value(v), |cfg| {
            LineLayer {
                inner: linelayer::LineLayer::with_config(style_count, cfg),
            }
            .into()
        })
    }

    pub fn create_line(&mut self, style: u32, indices: &[u32], xy: &[f32], rgba: &[f32], node: u32) -> Option<u32> {
        let points = vec2s(xy)?;
        let colors = colors(rgba)?;
        self.inner.create_line(style, indices, &points, &colors, node).ok()
    }
    pub fn create_line_res(&mut self, style: u32, indices: &[u32], xy: &[f32], rgba: &[f32], node: u32) -> JsValue {
        let (points, colors) = match point_inputs(xy, rgba) {
            Ok(v) => v,
            Err(e) => return e,
        };
        error::res(
            self.inner.create_line(style, indices, &points, &colors, node),
            |id| JsValue::from_f64(id as f64),
        )
    }
    pub fn create_strip(&mut self, style: u32, xy: &[f32], rgba: &[f32], node: u32) -> Option<u32> {
        let points = vec2s(xy)?;
        let colors = colors(rgba)?;
        self.inner.create_strip(style, &points, &colors, node).ok()
    }
    pub fn create_strip_res(&mut self, style: u32, xy: &[f32], rgba: &[f32], node: u32) -> JsValue {
        let (points, colors) = match point_inputs(xy, rgba) {
            Ok(v) => v,
            Err(e) => return e,
        };
        error::res(self.inner.create_strip(style, &points, &colors, node), |id| {
            JsValue::from_f64(id as f64)
        })
    }
    pub fn create_loop(&mut self, style: u32, xy: &[f32], rgba: &[f32], node: u32) -> Option<u32> {
        let points = vec2s(xy)?;
        let colors = colors(rgba)?;
        self.inner.create_loop(style, &points, &colors, node).ok()
    }
    pub fn create_loop_res(&mut self, style: u32, xy: &[f32], rgba: &[f32], node: u32) -> JsValue {
        let (points, colors) = match point_inputs(xy, rgba) {
            Ok(v) => v,
            Err(e) => return e,
        };
        error::res(self.inner.create_loop(style, &points, &colors, node), |id| {
            JsValue::from_f64(id as f64)
        })
    }

    pub fn set_line_res(&mut self, id: u32, indices: &[u32], xy: &[f32], rgba: &[f32]) -> JsValue {
        let (points, colors) = match point_inputs(xy, rgba) {
            Ok(v) => v,
            Err(e) => return e,
        };
        error::res(self.inner.set_line(id, indices, &points, &colors), |_| JsValue::TRUE)
    }
    pub fn set_line_strip_res(&mut self, id: u32, xy: &[f32], rgba: &[f32]) -> JsValue {
        let (points, colors) = match point_inputs(xy, rgba) {
            Ok(v) => v,
            Err(e) => return e,
        };
        error::res(self.inner.set_line_strip(id, &points, &colors), |_| JsValue::TRUE)
    }
    pub fn set_line_loop_res(&mut self, id: u32, xy: &[f32], rgba: &[f32]) -> JsValue {
        let (points, colors) = match point_inputs(xy, rgba) {
            Ok(v) => v,
            Err(e) => return e,
        };
        error::res(self.inner.set_line_loop(id, &points, &colors), |_| JsValue::TRUE)
    }

    pub fn remove(&mut self, id: u32) -> bool {
        self.inner.remove(id).is_ok()
    }
    pub fn remove_res(&mut self, id: u32) -> JsValue {
        error::res(self.inner.remove(id), |_| JsValue::TRUE)
    }

    pub fn set_color(&mut self, id: u32, r: f32, g: f32, b: f32, a: f32) -> bool {
        self.inner.set_color(id, Color::rgba(r, g, b, a)).is_ok()
    }
    /// 0..=8 row-major anchors, 255 falls back to the style.
    pub fn set_alignment_res(&mut self, id: u32, alignment: u8) -> JsValue {
        let a = match alignment_from(alignment) {
            Ok(a) => a,
            Err(e) => return e,
        };
        error::res(self.inner.set_alignment(id, a), |_| JsValue::TRUE)
    }
    pub fn set_padding(&mut self, id: u32, left: f32, top: f32, right: f32, bottom: f32) -> bool {
        self.inner
            .set_padding(id, Padding::new(left, top, right, bottom))
            .is_ok()
    }
    pub fn set_style_res(&mut self, id: u32, style: u32) -> JsValue {
        error::res(self.inner.set_style(id, style), |_| JsValue::TRUE)
    }
    pub fn attach(&mut self, id: u32, node: u32) -> bool {
        self.inner.attach(id, node).is_ok()
    }

    pub fn is_valid(&self, id: u32) -> bool {
        self.inner.is_valid(id)
    }
    pub fn used_count(&self) -> u32 {
        self.inner.used_count()
    }
    pub fn index_count(&self, id: u32) -> Option<u32> {
        self.inner.index_count(id).ok()
    }
    pub fn point_count(&self, id: u32) -> Option<u32> {
        self.inner.point_count(id).ok()
    }
    pub fn stats(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.inner.stats()).unwrap_or(JsValue::NULL)
    }
    pub fn compact(&mut self) -> JsValue {
        let stats = self.inner.compact();
        serde_wasm_bindgen::to_value(&stats).unwrap_or(JsValue::NULL)
    }

    /// Node arrays are per node id: `offsets`/`sizes` interleaved x,y,
    /// `enabled` one byte per node. `states` holds `UpdateStates` bits.
    pub fn update_res(
        &mut self,
        states: u8,
        draw_order: &[u32],
        offsets: &[f32],
        sizes: &[f32],
        opacities: &[f32],
        enabled: &[u8],
        styles: &LineStyles,
    ) -> JsValue {
        let offsets = match vec2s(offsets) {
            Some(v) => v,
            None => return error::length_mismatch("offsets", 2, offsets.len()),
        };
        let sizes = match vec2s(sizes) {
            Some(v) => v,
            None => return error::length_mismatch("sizes", 2, sizes.len()),
        };
        let enabled: Vec<bool> = enabled.iter().map(|&e| e != 0).collect();
        let nodes = NodeInputs {
            offsets: &offsets,
            sizes: &sizes,
            opacities,
            enabled: &enabled,
        };
        let mut sink = JsMesh::default();
        match self.inner.update_into(
            UpdateStates::from_bits_truncate(states),
            draw_order,
            nodes,
            &styles.inner,
            &mut sink,
        ) {
            Ok(()) => error::ok(sink.obj.map(JsValue::from).unwrap_or(JsValue::NULL)),
            Err(e) => error::line_error(&e),
        }
    }
}

fn point_inputs(
    xy: &[f32],
    rgba: &[f32],
) -> Result<(Vec<Vec2>, Vec<Color>), JsValue> {
    let points = vec2s(xy).ok_or_else(|| error::length_mismatch("xy", 2, xy.len()))?;
    let colors = colors(rgba).ok_or_else(|| error::length_mismatch("rgba", 4, rgba.len()))?;
    Ok((points, colors))
}

#[wasm_bindgen]
impl LineStyles {
    #[wasm_bindgen(constructor)]
    pub fn new(uniform_count: u32, style_count: u32) -> LineStyles {
        LineStyles {
            inner: linelayer::style::LineStyleTable::new(uniform_count, style_count),
        }
    }
    pub fn version(&self) -> u64 {
        self.inner.version()
    }

    /// Seven floats per uniform: r, g, b, a, width, smoothness, miter length limit.
    pub fn set_uniforms_res(&mut self, data: &[f32]) -> JsValue {
        if data.len() % 7 != 0 {
            return error::length_mismatch("uniforms", 7, data.len());
        }
        let mut uniforms = Vec::with_capacity(data.len() / 7);
        for c in data.chunks_exact(7) {
            let mut u = LineStyleUniform::default()
                .with_color(Color::rgba(c[0], c[1], c[2], c[3]))
                .with_width(c[4])
                .with_smoothness(c[5]);
            if let Err(e) = u.set_miter_length_limit(c[6]) {
                return error::line_error(&e);
            }
            uniforms.push(u);
        }
        error::res(self.inner.set_uniforms(&uniforms), |_| JsValue::TRUE)
    }

    /// Replaces one uniform's miter limit with an angle limit in radians, (0, π].
    pub fn set_uniform_miter_angle_res(&mut self, uniform: u32, radians: f32) -> JsValue {
        let mut uniforms = self.inner.uniforms().to_vec();
        let uniform_count = uniforms.len() as u32;
        let u = match uniforms.get_mut(uniform as usize) {
            Some(u) => u,
            None => {
                return error::line_error(&LineError::UniformOutOfRange {
                    uniform,
                    uniform_count,
                })
            }
        };
        if let Err(e) = u.set_miter_angle_limit(radians) {
            return error::line_error(&e);
        }
        error::res(self.inner.set_uniforms(&uniforms), |_| JsValue::TRUE)
    }

    /// Per style: uniform index, alignment (0..=8) and four padding floats.
    pub fn set_styles_res(&mut self, uniforms: &[u32], alignments: &[u8], paddings: &[f32]) -> JsValue {
        if alignments.len() != uniforms.len() {
            return error::length_mismatch("alignments", 1, alignments.len());
        }
        if paddings.len() != 4 * uniforms.len() {
            return error::length_mismatch("paddings", 4, paddings.len());
        }
        let mut styles = Vec::with_capacity(uniforms.len());
        for (i, (&uniform, &a)) in uniforms.iter().zip(alignments).enumerate() {
            let alignment = match Alignment::from_u8(a) {
                Some(a) => a,
                None => return error::invalid_enum("alignment", a),
            };
            let p = &paddings[4 * i..4 * i + 4];
            styles.push(LineStyle {
                uniform,
                alignment,
                padding: Padding::new(p[0], p[1], p[2], p[3]),
            });
        }
        error::res(self.inner.set_styles(&styles), |_| JsValue::TRUE)
    }

    /// 0 butt, 1 square, 2 round, 3 triangle.
    pub fn set_cap_style_res(&mut self, cap: u8) -> JsValue {
        let cap = match cap {
            0 => LineCapStyle::Butt,
            1 => LineCapStyle::Square,
            2 => LineCapStyle::Round,
            3 => LineCapStyle::Triangle,
            _ => return error::invalid_enum("cap", cap),
        };
        self.inner.set_cap_style(cap);
        error::ok(JsValue::TRUE)
    }

    /// 0 miter, 1 bevel.
    pub fn set_join_style_res(&mut self, join: u8) -> JsValue {
        let join = match join {
            0 => LineJoinStyle::Miter,
            1 => LineJoinStyle::Bevel,
            _ => return error::invalid_enum("join", join),
        };
        self.inner.set_join_style(join);
        error::ok(JsValue::TRUE)
    }
}
