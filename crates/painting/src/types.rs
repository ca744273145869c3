use serde::{Deserialize, Serialize};

use crate::validation::{ValidationError, validate_color, validate_opacity, validate_radius};

/// Linear RGB color with channels in 0.0-1.0
///
/// Laid out as three packed `f32` so a slice of colors can be uploaded
/// directly as a vertex attribute buffer.
#[derive(
    Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, bytemuck::Pod, bytemuck::Zeroable,
)]
#[repr(C)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub const fn from_array(rgb: [f32; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }

    pub const fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Linear interpolation toward `target`: `self * (1 - t) + target * t`
    #[inline]
    pub fn lerp(self, target: Rgb, t: f32) -> Rgb {
        let keep = 1.0 - t;
        Rgb::new(
            self.r * keep + target.r * t,
            self.g * keep + target.g * t,
            self.b * keep + target.b * t,
        )
    }

    #[inline]
    pub fn scale(self, factor: f32) -> Rgb {
        Rgb::new(self.r * factor, self.g * factor, self.b * factor)
    }

    /// Clamp every channel to 0.0-1.0
    #[inline]
    pub fn clamped(self) -> Rgb {
        Rgb::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
        )
    }

    /// Quantize to 8 bits per channel (rounded, clamped)
    pub fn to_rgb8(self) -> Rgb8 {
        let quantize = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgb8 {
            r: quantize(self.r),
            g: quantize(self.g),
            b: quantize(self.b),
        }
    }
}

impl From<Rgb8> for Rgb {
    fn from(c: Rgb8) -> Self {
        Rgb::new(
            f32::from(c.r) / 255.0,
            f32::from(c.g) / 255.0,
            f32::from(c.b) / 255.0,
        )
    }
}

/// 8-bit RGB color, the persisted form of a palette entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS functional notation, e.g. `rgb(255,0,0)`
    pub fn to_css(self) -> String {
        format!("rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// Blend algorithm used by the brush
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum PaintAlgorithm {
    /// Linear blend toward the brush color by opacity
    #[default]
    Basic = 0,
    /// Brush color with random per-vertex brightness sparkle
    Metallic = 1,
    /// Paint pools into concave creases
    Wash = 2,
    /// Paint catches raised, flat-facing surfaces
    DryBrush = 3,
}

/// Brush settings passed to every brush invocation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrushParams {
    /// Brush color
    pub color: Rgb,
    /// Brush radius in model-local units
    pub radius: f32,
    /// Opacity in (0.0, 1.0]
    pub opacity: f32,
    /// Blend algorithm
    pub algorithm: PaintAlgorithm,
}

impl Default for BrushParams {
    fn default() -> Self {
        Self::from(&minipainter_config::BrushDefaults::default())
    }
}

impl From<&minipainter_config::BrushDefaults> for BrushParams {
    fn from(defaults: &minipainter_config::BrushDefaults) -> Self {
        Self {
            color: Rgb::from_array(defaults.color),
            radius: defaults.radius,
            opacity: defaults.opacity,
            algorithm: PaintAlgorithm::Basic,
        }
    }
}

impl BrushParams {
    /// Create validated brush parameters
    pub fn new(
        color: Rgb,
        radius: f32,
        opacity: f32,
        algorithm: PaintAlgorithm,
    ) -> Result<Self, ValidationError> {
        let params = Self {
            color,
            radius,
            opacity,
            algorithm,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check radius, opacity, and color ranges
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_radius(self.radius)?;
        validate_opacity(self.opacity)?;
        validate_color(self.color)?;
        Ok(())
    }
}

/// A single vertex color change, the unit of undo/redo
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VertexColorDiff {
    /// Vertex index into the mesh buffers
    pub index: u32,
    /// Color before the change
    pub previous: Rgb,
    /// Color after the change
    pub new: Rgb,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        let a = Rgb::new(0.2, 0.4, 0.6);
        let b = Rgb::new(1.0, 0.0, 0.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
    }

    #[test]
    fn test_rgb8_quantization() {
        assert_eq!(Rgb::new(1.0, 0.0, 0.5).to_rgb8(), Rgb8::new(255, 0, 128));
        assert_eq!(Rgb::new(2.0, -1.0, 0.0).to_rgb8(), Rgb8::new(255, 0, 0));
        assert_eq!(Rgb::from(Rgb8::new(255, 0, 0)), Rgb::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_rgb8_css() {
        assert_eq!(Rgb8::new(12, 34, 255).to_css(), "rgb(12,34,255)");
    }

    #[test]
    fn test_brush_params_validation() {
        assert!(BrushParams::new(Rgb::WHITE, 1.0, 0.5, PaintAlgorithm::Basic).is_ok());
        assert!(BrushParams::new(Rgb::WHITE, 0.0, 0.5, PaintAlgorithm::Basic).is_err());
        assert!(BrushParams::new(Rgb::WHITE, 1.0, 0.0, PaintAlgorithm::Wash).is_err());
        assert!(BrushParams::new(Rgb::WHITE, 1.0, 1.5, PaintAlgorithm::Wash).is_err());
        assert!(BrushParams::new(Rgb::new(1.2, 0.0, 0.0), 1.0, 1.0, PaintAlgorithm::Basic).is_err());
    }

    #[test]
    fn test_algorithm_serde_names() {
        let json = serde_json::to_string(&PaintAlgorithm::DryBrush).unwrap();
        assert_eq!(json, "\"dry_brush\"");
        let parsed: PaintAlgorithm = serde_json::from_str("\"metallic\"").unwrap();
        assert_eq!(parsed, PaintAlgorithm::Metallic);
    }
}
