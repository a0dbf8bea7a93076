/// Caller-contract violations reported at the API boundary.
///
/// Every variant has a stable snake_case [`code`](LineError::code), the same
/// vocabulary the wasm bindings put into their error objects.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LineError {
    #[error("index buffer length {0} is not even")]
    OddIndexCount(usize),

    #[error("index {index} out of range for {point_count} points")]
    IndexOutOfRange { index: u32, point_count: u32 },

    #[error("expected {expected} colors, got {got}")]
    ColorCountMismatch { expected: usize, got: usize },

    #[error("a strip needs 0 or at least 2 points, got {0}")]
    InvalidStripPointCount(usize),

    #[error("a loop needs 0, 1 or at least 3 points, got {0}")]
    InvalidLoopPointCount(usize),

    #[error("style {style} out of range for {style_count} styles")]
    StyleOutOfRange { style: u32, style_count: u32 },

    #[error("uniform {uniform} out of range for {uniform_count} uniforms")]
    UniformOutOfRange { uniform: u32, uniform_count: u32 },

    #[error("invalid {kind} id {id}")]
    InvalidId { kind: &'static str, id: u32 },

    #[error("node {node} out of range for {node_count} nodes")]
    NodeOutOfRange { node: u32, node_count: u32 },

    #[error("style table has {got} styles, layer expects {expected}")]
    StyleCountMismatch { expected: u32, got: u32 },

    #[error("expected {expected} {param} entries, got {got}")]
    LengthMismatch {
        param: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("miter {kind} limit {got} out of range")]
    MiterLimitOutOfRange { kind: &'static str, got: f32 },

    #[error("parameter '{param}' must be finite")]
    NonFinite { param: &'static str },

    #[error("{0} exceeds ingestion caps")]
    CapsExceeded(&'static str),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl LineError {
    pub fn code(&self) -> &'static str {
        match self {
            LineError::OddIndexCount(_) => "odd_index_count",
            LineError::IndexOutOfRange { .. } => "out_of_range",
            LineError::ColorCountMismatch { .. } => "length_mismatch",
            LineError::InvalidStripPointCount(_) => "invalid_point_count",
            LineError::InvalidLoopPointCount(_) => "invalid_point_count",
            LineError::StyleOutOfRange { .. } => "out_of_range",
            LineError::UniformOutOfRange { .. } => "out_of_range",
            LineError::InvalidId { .. } => "invalid_id",
            LineError::NodeOutOfRange { .. } => "out_of_range",
            LineError::StyleCountMismatch { .. } => "length_mismatch",
            LineError::LengthMismatch { .. } => "length_mismatch",
            LineError::MiterLimitOutOfRange { .. } => "out_of_range",
            LineError::NonFinite { .. } => "non_finite",
            LineError::CapsExceeded(_) => "caps_exceeded",
            LineError::InvalidConfig(_) => "invalid_config",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(LineError::OddIndexCount(3).code(), "odd_index_count");
        assert_eq!(
            LineError::InvalidId { kind: "line", id: 7 }.to_string(),
            "invalid line id 7"
        );
        assert_eq!(
            LineError::IndexOutOfRange {
                index: 5,
                point_count: 2
            }
            .code(),
            "out_of_range"
        );
    }
}
