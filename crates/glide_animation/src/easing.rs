//! Easing curves
//!
//! Maps linear progress (0.0 to 1.0) onto eased progress. The CSS keyword
//! curves and the `powerN` family cover the names both paradigms use; anything
//! else can be expressed as a cubic bezier.
//!
//! Easings round-trip through strings so they can live in config files:
//!
//! ```
//! use glide_animation::Easing;
//!
//! let ease: Easing = "power2.out".parse().unwrap();
//! assert_eq!(ease, Easing::EaseOutCubic);
//! assert_eq!(ease.to_string(), "power2.out");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An easing curve
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Easing {
    #[default]
    Linear,
    /// CSS `ease-in`
    EaseIn,
    /// CSS `ease-out`
    EaseOut,
    /// CSS `ease-in-out`
    EaseInOut,
    /// `power1.in`
    EaseInQuad,
    /// `power1.out`
    EaseOutQuad,
    /// `power1.inOut`
    EaseInOutQuad,
    /// `power2.in`
    EaseInCubic,
    /// `power2.out`
    EaseOutCubic,
    /// `power2.inOut`
    EaseInOutCubic,
    /// `power3.in`
    EaseInQuart,
    /// `power3.out`
    EaseOutQuart,
    /// `power3.inOut`
    EaseInOutQuart,
    /// `cubic-bezier(x1, y1, x2, y2)`; x values must lie in 0.0..=1.0
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    /// Apply the curve to linear progress; input is clamped to 0.0..=1.0
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, t),
            Easing::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
            Easing::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
            Easing::EaseInQuad => power_in(t, 2),
            Easing::EaseOutQuad => power_out(t, 2),
            Easing::EaseInOutQuad => power_in_out(t, 2),
            Easing::EaseInCubic => power_in(t, 3),
            Easing::EaseOutCubic => power_out(t, 3),
            Easing::EaseInOutCubic => power_in_out(t, 3),
            Easing::EaseInQuart => power_in(t, 4),
            Easing::EaseOutQuart => power_out(t, 4),
            Easing::EaseInOutQuart => power_in_out(t, 4),
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier(x1, y1, x2, y2, t),
        }
    }
}

fn power_in(t: f32, n: i32) -> f32 {
    t.powi(n)
}

fn power_out(t: f32, n: i32) -> f32 {
    1.0 - (1.0 - t).powi(n)
}

fn power_in_out(t: f32, n: i32) -> f32 {
    if t < 0.5 {
        2f32.powi(n - 1) * t.powi(n)
    } else {
        1.0 - (2.0 - 2.0 * t).powi(n) / 2.0
    }
}

/// Evaluate a CSS-style cubic bezier with fixed endpoints (0,0) and (1,1)
///
/// Solves x(s) = t with Newton iterations, falling back to bisection when the
/// slope flattens out, then returns y(s).
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, t: f32) -> f32 {
    const EPSILON: f32 = 1e-6;

    let cx = 3.0 * x1;
    let bx = 3.0 * (x2 - x1) - cx;
    let ax = 1.0 - cx - bx;
    let cy = 3.0 * y1;
    let by = 3.0 * (y2 - y1) - cy;
    let ay = 1.0 - cy - by;

    let sample_x = |s: f32| ((ax * s + bx) * s + cx) * s;
    let sample_y = |s: f32| ((ay * s + by) * s + cy) * s;
    let slope_x = |s: f32| (3.0 * ax * s + 2.0 * bx) * s + cx;

    let mut s = t;
    for _ in 0..8 {
        let err = sample_x(s) - t;
        if err.abs() < EPSILON {
            return sample_y(s);
        }
        let slope = slope_x(s);
        if slope.abs() < EPSILON {
            break;
        }
        s -= err / slope;
    }

    let (mut lo, mut hi) = (0.0f32, 1.0f32);
    s = t;
    for _ in 0..32 {
        let x = sample_x(s);
        if (x - t).abs() < EPSILON {
            break;
        }
        if t > x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }

    sample_y(s)
}

/// Error returned when an easing name cannot be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown easing '{0}'")]
pub struct ParseEasingError(pub String);

impl FromStr for Easing {
    type Err = ParseEasingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();

        let easing = match name.as_str() {
            "linear" | "none" => Easing::Linear,
            "ease" => Easing::CubicBezier(0.25, 0.1, 0.25, 1.0),
            "ease-in" => Easing::EaseIn,
            "ease-out" => Easing::EaseOut,
            "ease-in-out" => Easing::EaseInOut,
            "power1.in" => Easing::EaseInQuad,
            "power1.out" | "power1" => Easing::EaseOutQuad,
            "power1.inout" => Easing::EaseInOutQuad,
            "power2.in" => Easing::EaseInCubic,
            "power2.out" | "power2" => Easing::EaseOutCubic,
            "power2.inout" => Easing::EaseInOutCubic,
            "power3.in" => Easing::EaseInQuart,
            "power3.out" | "power3" => Easing::EaseOutQuart,
            "power3.inout" => Easing::EaseInOutQuart,
            other => return parse_cubic_bezier(other).ok_or_else(|| ParseEasingError(s.to_string())),
        };

        Ok(easing)
    }
}

fn parse_cubic_bezier(s: &str) -> Option<Easing> {
    let args = s.strip_prefix("cubic-bezier(")?.strip_suffix(')')?;
    let values = args
        .split(',')
        .map(|v| v.trim().parse::<f32>().ok())
        .collect::<Option<Vec<_>>>()?;

    match values.as_slice() {
        [x1, y1, x2, y2] if (0.0..=1.0).contains(x1) && (0.0..=1.0).contains(x2) => {
            Some(Easing::CubicBezier(*x1, *y1, *x2, *y2))
        }
        _ => None,
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Easing::Linear => "linear",
            Easing::EaseIn => "ease-in",
            Easing::EaseOut => "ease-out",
            Easing::EaseInOut => "ease-in-out",
            Easing::EaseInQuad => "power1.in",
            Easing::EaseOutQuad => "power1.out",
            Easing::EaseInOutQuad => "power1.inOut",
            Easing::EaseInCubic => "power2.in",
            Easing::EaseOutCubic => "power2.out",
            Easing::EaseInOutCubic => "power2.inOut",
            Easing::EaseInQuart => "power3.in",
            Easing::EaseOutQuart => "power3.out",
            Easing::EaseInOutQuart => "power3.inOut",
            Easing::CubicBezier(x1, y1, x2, y2) => {
                return write!(f, "cubic-bezier({x1}, {y1}, {x2}, {y2})");
            }
        };
        f.write_str(name)
    }
}

impl TryFrom<String> for Easing {
    type Error = ParseEasingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Easing> for String {
    fn from(easing: Easing) -> Self {
        easing.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 14] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::EaseInQuad,
        Easing::EaseOutQuad,
        Easing::EaseInOutQuad,
        Easing::EaseInCubic,
        Easing::EaseOutCubic,
        Easing::EaseInOutCubic,
        Easing::EaseInQuart,
        Easing::EaseOutQuart,
        Easing::EaseInOutQuart,
        Easing::CubicBezier(0.22, 1.0, 0.36, 1.0),
    ];

    #[test]
    fn test_endpoints_are_fixed() {
        for easing in ALL {
            assert!(easing.apply(0.0).abs() < 1e-3, "{easing} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-3, "{easing} at 1");
        }
    }

    #[test]
    fn test_input_is_clamped() {
        assert_eq!(Easing::Linear.apply(-1.0), 0.0);
        assert_eq!(Easing::Linear.apply(2.0), 1.0);
    }

    #[test]
    fn test_curve_shapes() {
        assert!(Easing::EaseInCubic.apply(0.5) < 0.5);
        assert!(Easing::EaseOutCubic.apply(0.5) > 0.5);
        assert!((Easing::EaseInOutCubic.apply(0.5) - 0.5).abs() < 1e-4);
        assert!(Easing::EaseOut.apply(0.25) > 0.25);
        assert!(Easing::EaseIn.apply(0.25) < 0.25);
    }

    #[test]
    fn test_linear_bezier_matches_linear() {
        let bezier = Easing::CubicBezier(0.0, 0.0, 1.0, 1.0);
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            assert!((bezier.apply(t) - t).abs() < 1e-3);
        }
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("power2.inOut".parse(), Ok(Easing::EaseInOutCubic));
        assert_eq!(" Ease-Out ".parse(), Ok(Easing::EaseOut));
        assert_eq!("power3".parse(), Ok(Easing::EaseOutQuart));
        assert_eq!(
            "cubic-bezier(0.4, 0, 0.2, 1)".parse(),
            Ok(Easing::CubicBezier(0.4, 0.0, 0.2, 1.0))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("bounce.wat".parse::<Easing>().is_err());
        assert!("cubic-bezier(1.5, 0, 0.2, 1)".parse::<Easing>().is_err());
        assert!("cubic-bezier(0.1, 0.2)".parse::<Easing>().is_err());
    }

    #[test]
    fn test_display_parses_back() {
        for easing in ALL {
            assert_eq!(easing.to_string().parse::<Easing>(), Ok(easing));
        }
    }
}
