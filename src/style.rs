//! Style storage shared between line layers.
//!
//! A table holds `style_count` styles, each pointing at one of
//! `uniform_count` uniforms. Layers read it during update and compare its
//! [`version`](LineStyleTable::version) against the last one they synced.

use crate::error::LineError;
use crate::model::{Alignment, Color, LineCapStyle, LineJoinStyle, Padding};
use serde::{Deserialize, Serialize};

/// Shader-side parameters of one uniform.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineStyleUniform {
    pub color: Color,
    pub width: f32,
    pub smoothness: f32,
    /// Cosine of the smallest join angle still drawn as a miter.
    miter_limit: f32,
}

impl Default for LineStyleUniform {
    fn default() -> Self {
        LineStyleUniform {
            color: Color::WHITE,
            width: 1.0,
            smoothness: 0.0,
            // length limit 4
            miter_limit: 0.875,
        }
    }
}

impl LineStyleUniform {
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    pub fn with_smoothness(mut self, smoothness: f32) -> Self {
        self.smoothness = smoothness;
        self
    }

    /// Limit as the ratio of miter length to line width; must be finite and
    /// at least 1.
    pub fn set_miter_length_limit(&mut self, limit: f32) -> Result<&mut Self, LineError> {
        if !limit.is_finite() || limit < 1.0 {
            return Err(LineError::MiterLimitOutOfRange {
                kind: "length",
                got: limit,
            });
        }
        self.miter_limit = 1.0 - 2.0 / (limit * limit);
        Ok(self)
    }

    /// Limit as the smallest join angle in radians, in `(0, π]`.
    pub fn set_miter_angle_limit(&mut self, radians: f32) -> Result<&mut Self, LineError> {
        if !radians.is_finite() || radians <= 0.0 || radians > std::f32::consts::PI {
            return Err(LineError::MiterLimitOutOfRange {
                kind: "angle",
                got: radians,
            });
        }
        self.miter_limit = radians.cos();
        Ok(self)
    }

    pub fn miter_limit(&self) -> f32 {
        self.miter_limit
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub uniform: u32,
    pub alignment: Alignment,
    pub padding: Padding,
}

impl Default for LineStyle {
    fn default() -> Self {
        LineStyle {
            uniform: 0,
            alignment: Alignment::MiddleCenter,
            padding: Padding::ZERO,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LineStyleTable {
    uniforms: Vec<LineStyleUniform>,
    styles: Vec<LineStyle>,
    cap_style: LineCapStyle,
    join_style: LineJoinStyle,
    #[serde(skip)]
    version: u64,
}

impl LineStyleTable {
    pub fn new(uniform_count: u32, style_count: u32) -> Self {
        LineStyleTable {
            uniforms: vec![LineStyleUniform::default(); uniform_count as usize],
            styles: vec![LineStyle::default(); style_count as usize],
            cap_style: LineCapStyle::Square,
            join_style: LineJoinStyle::Miter,
            version: 1,
        }
    }

    /// Monotonic; bumped by every mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    fn bump(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    pub fn style_count(&self) -> u32 {
        self.styles.len() as u32
    }

    pub fn uniform_count(&self) -> u32 {
        self.uniforms.len() as u32
    }

    pub fn style(&self, id: u32) -> Option<&LineStyle> {
        self.styles.get(id as usize)
    }

    pub fn uniform(&self, id: u32) -> Option<&LineStyleUniform> {
        self.uniforms.get(id as usize)
    }

    pub fn uniforms(&self) -> &[LineStyleUniform] {
        &self.uniforms
    }

    pub fn cap_style(&self) -> LineCapStyle {
        self.cap_style
    }

    pub fn join_style(&self) -> LineJoinStyle {
        self.join_style
    }

    pub fn set_cap_style(&mut self, cap: LineCapStyle) {
        self.cap_style = cap;
        self.bump();
    }

    pub fn set_join_style(&mut self, join: LineJoinStyle) {
        self.join_style = join;
        self.bump();
    }

    /// Replaces all uniforms. The count is fixed at construction.
    pub fn set_uniforms(&mut self, uniforms: &[LineStyleUniform]) -> Result<(), LineError> {
        if uniforms.len() != self.uniforms.len() {
            return Err(LineError::LengthMismatch {
                param: "uniform",
                expected: self.uniforms.len(),
                got: uniforms.len(),
            });
        }
        for u in uniforms {
            if !u.width.is_finite() || !u.smoothness.is_finite() {
                return Err(LineError::NonFinite { param: "uniform" });
            }
            if !u.color.is_finite() {
                return Err(LineError::NonFinite { param: "color" });
            }
        }
        self.uniforms.copy_from_slice(uniforms);
        self.bump();
        Ok(())
    }

    /// Replaces all styles; every style's uniform must be in range.
    pub fn set_styles(&mut self, styles: &[LineStyle]) -> Result<(), LineError> {
        if styles.len() != self.styles.len() {
            return Err(LineError::LengthMismatch {
                param: "style",
                expected: self.styles.len(),
                got: styles.len(),
            });
        }
        let uniform_count = self.uniform_count();
        for s in styles {
            if s.uniform >= uniform_count {
                return Err(LineError::UniformOutOfRange {
                    uniform: s.uniform,
                    uniform_count,
                });
            }
            if !s.padding.is_finite() {
                return Err(LineError::NonFinite { param: "padding" });
            }
        }
        self.styles.copy_from_slice(styles);
        self.bump();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miter_length_and_angle_agree() {
        let mut a = LineStyleUniform::default();
        let mut b = LineStyleUniform::default();
        a.set_miter_length_limit(2.0).unwrap();
        // length 2 <=> 60 degrees
        b.set_miter_angle_limit(60f32.to_radians()).unwrap();
        assert!((a.miter_limit() - b.miter_limit()).abs() < 1e-6);
        assert!((LineStyleUniform::default().miter_limit() - 0.875).abs() < 1e-6);
    }

    #[test]
    fn miter_limits_out_of_domain() {
        let mut u = LineStyleUniform::default();
        assert!(u.set_miter_length_limit(0.99).is_err());
        assert!(u.set_miter_length_limit(f32::INFINITY).is_err());
        assert!(u.set_miter_angle_limit(0.0).is_err());
        assert!(u.set_miter_angle_limit(3.2).is_err());
        assert!(u.set_miter_angle_limit(std::f32::consts::PI).is_ok());
        assert_eq!(
            u.set_miter_length_limit(0.5).unwrap_err().code(),
            "out_of_range"
        );
    }

    #[test]
    fn mutations_bump_version() {
        let mut t = LineStyleTable::new(2, 3);
        let v0 = t.version();
        t.set_cap_style(LineCapStyle::Round);
        assert!(t.version() > v0);
        let v1 = t.version();
        let bad = [LineStyle {
            uniform: 2,
            ..Default::default()
        }; 3];
        assert!(t.set_styles(&bad).is_err());
        assert_eq!(t.version(), v1, "rejected input must not bump");
        assert!(t.set_styles(&[LineStyle::default(); 3]).is_ok());
        assert!(t.version() > v1);
        assert!(t.set_uniforms(&[LineStyleUniform::default()]).is_err());
    }
}
