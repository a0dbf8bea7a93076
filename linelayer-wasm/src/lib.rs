use wasm_bindgen::prelude::*;
mod api;
mod console_log;
mod error;
mod interop;

pub use api::JsMesh;

#[wasm_bindgen]
pub struct LineLayer { pub(crate) inner: linelayer::LineLayer }

#[wasm_bindgen]
pub struct LineStyles { pub(crate) inner: linelayer::style::LineStyleTable }

impl LineLayer {
    pub fn rs_new(style_count: u32) -> LineLayer { LineLayer { inner: linelayer::LineLayer::new(style_count) } }
}
