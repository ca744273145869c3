use thiserror::Error;

use crate::types::Rgb;

/// Brush parameter rejected at the API boundary
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ValidationError {
    #[error("Invalid brush radius: {0} (must be positive)")]
    InvalidRadius(f32),
    #[error("Invalid brush opacity: {0} (must be in (0, 1])")]
    InvalidOpacity(f32),
    #[error("Invalid color channel {channel}: {value} (must be in [0, 1])")]
    InvalidColor { channel: char, value: f32 },
}

/// Radius must be finite and strictly positive
pub fn validate_radius(radius: f32) -> Result<(), ValidationError> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidRadius(radius))
    }
}

/// Opacity must be in (0, 1]
pub fn validate_opacity(opacity: f32) -> Result<(), ValidationError> {
    if opacity > 0.0 && opacity <= 1.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidOpacity(opacity))
    }
}

/// Every channel must be in [0, 1]
pub fn validate_color(color: Rgb) -> Result<(), ValidationError> {
    for (channel, value) in [('r', color.r), ('g', color.g), ('b', color.b)] {
        if !(0.0..=1.0).contains(&value) {
            return Err(ValidationError::InvalidColor { channel, value });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_radius() {
        assert!(validate_radius(0.1).is_ok());
        assert_eq!(validate_radius(0.0), Err(ValidationError::InvalidRadius(0.0)));
        assert!(validate_radius(-1.0).is_err());
        assert!(validate_radius(f32::NAN).is_err());
        assert!(validate_radius(f32::INFINITY).is_err());
    }

    #[test]
    fn test_validate_opacity() {
        assert!(validate_opacity(1.0).is_ok());
        assert!(validate_opacity(0.001).is_ok());
        assert!(validate_opacity(0.0).is_err());
        assert!(validate_opacity(1.0001).is_err());
        assert!(validate_opacity(f32::NAN).is_err());
    }

    #[test]
    fn test_validate_color_reports_channel() {
        let err = validate_color(Rgb::new(0.0, -0.5, 0.0)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidColor {
                channel: 'g',
                value: -0.5
            }
        );
    }
}
