use serde::{Deserialize, Serialize};

/// How an expression parameter combines with the value already in place.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlendMode {
    #[default]
    Add,
    Multiply,
    Overwrite,
}

impl BlendMode {
    /// Parse the blend names used in expression documents. Unknown names fall back to `Add`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Multiply" => BlendMode::Multiply,
            "Overwrite" => BlendMode::Overwrite,
            _ => BlendMode::Add,
        }
    }

    #[inline]
    pub fn apply(self, current: f32, value: f32, weight: f32) -> f32 {
        match self {
            BlendMode::Add => current + value * weight,
            BlendMode::Multiply => current * (1.0 + (value - 1.0) * weight),
            BlendMode::Overwrite => current + (value - current) * weight,
        }
    }
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Sine ease used for every fade: `0.5 - 0.5 * cos(pi * t)` over `[0, 1]`.
#[inline]
pub fn easing_sine(t: f32) -> f32 {
    if t <= 0.0 {
        0.0
    } else if t >= 1.0 {
        1.0
    } else {
        0.5 - 0.5 * (t * std::f32::consts::PI).cos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn easing_is_clamped_and_symmetric() {
        assert_eq!(easing_sine(-1.0), 0.0);
        assert_eq!(easing_sine(2.0), 1.0);
        assert_relative_eq!(easing_sine(0.5), 0.5, epsilon = 1e-6);
        assert_relative_eq!(easing_sine(0.25) + easing_sine(0.75), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn blend_modes() {
        assert_relative_eq!(BlendMode::Add.apply(1.0, 2.0, 0.5), 2.0);
        assert_relative_eq!(BlendMode::Multiply.apply(2.0, 3.0, 1.0), 6.0);
        assert_relative_eq!(BlendMode::Overwrite.apply(2.0, 4.0, 0.5), 3.0);
        assert_eq!(BlendMode::from_name("Nope"), BlendMode::Add);
    }
}
