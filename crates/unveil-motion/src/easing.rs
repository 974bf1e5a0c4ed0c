//! Easing curves for reveal timing.
//!
//! Curves follow the CSS timing-function model: progress in `[0, 1]` maps to
//! eased progress, with both endpoints pinned. Named presets cover the curves
//! the catalog's timing classes are built from.
//!
//! ```
//! use unveil_motion::easing::EasingFunction;
//!
//! let smooth = EasingFunction::SMOOTH;
//! assert!(smooth.evaluate(0.5) > 0.5);
//! ```

use serde::{Deserialize, Serialize};

/// Where a stepped curve jumps within each interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepPosition {
    /// CSS `jump-start`.
    Start,
    /// CSS `jump-end`.
    #[default]
    End,
}

/// Easing function mapping linear progress to eased progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EasingFunction {
    /// No easing.
    Linear,
    /// CSS `ease`, `cubic-bezier(0.25, 0.1, 0.25, 1.0)`.
    Ease,
    /// CSS `ease-in`, `cubic-bezier(0.42, 0, 1, 1)`.
    EaseIn,
    /// CSS `ease-out`, `cubic-bezier(0, 0, 0.58, 1)`.
    EaseOut,
    /// CSS `ease-in-out`, `cubic-bezier(0.42, 0, 0.58, 1)`.
    EaseInOut,
    /// Custom cubic bezier with control points `(x1, y1)` and `(x2, y2)`.
    /// x values must lie in `[0, 1]`; y values may overshoot.
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },
    /// Discrete jumps over `count` equal intervals (`count >= 1`).
    Steps {
        count: u32,
        #[serde(default)]
        position: StepPosition,
    },
}

impl Default for EasingFunction {
    fn default() -> Self {
        Self::SMOOTH
    }
}

impl EasingFunction {
    /// Gentle deceleration used by the standard entrance class.
    pub const SMOOTH: Self = Self::CubicBezier {
        x1: 0.25,
        y1: 0.46,
        x2: 0.45,
        y2: 0.94,
    };

    /// Long expo-out tail used by cinematic and hero entrances.
    pub const CINEMATIC: Self = Self::CubicBezier {
        x1: 0.16,
        y1: 1.0,
        x2: 0.3,
        y2: 1.0,
    };

    /// Strong ease-in-out used by dramatic entrances.
    pub const DRAMATIC: Self = Self::CubicBezier {
        x1: 0.83,
        y1: 0.0,
        x2: 0.17,
        y2: 1.0,
    };

    /// Create a custom cubic bezier easing function.
    ///
    /// Returns `None` when either x control value is outside `[0, 1]`, since
    /// the curve would no longer be a function of time.
    pub fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32) -> Option<Self> {
        if (0.0..=1.0).contains(&x1) && (0.0..=1.0).contains(&x2) {
            Some(Self::CubicBezier { x1, y1, x2, y2 })
        } else {
            None
        }
    }

    /// Evaluate the curve at `t` (clamped to `[0, 1]`).
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Self::Linear => t,
            Self::Ease => cubic_bezier(0.25, 0.1, 0.25, 1.0, t),
            Self::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, t),
            Self::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
            Self::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
            Self::CubicBezier { x1, y1, x2, y2 } => cubic_bezier(x1, y1, x2, y2, t),
            Self::Steps { count, position } => stepped(count, position, t),
        }
    }

    /// Whether the control points are usable (x values within `[0, 1]`, all finite).
    pub fn is_valid(&self) -> bool {
        match *self {
            Self::CubicBezier { x1, y1, x2, y2 } => {
                (0.0..=1.0).contains(&x1)
                    && (0.0..=1.0).contains(&x2)
                    && y1.is_finite()
                    && y2.is_finite()
            }
            Self::Steps { count, .. } => count >= 1,
            _ => true,
        }
    }
}

fn stepped(count: u32, position: StepPosition, t: f32) -> f32 {
    if count == 0 {
        return t;
    }
    let n = count as f32;
    match position {
        StepPosition::Start => (t * n).ceil() / n,
        StepPosition::End => (t * n).floor() / n,
    }
}

fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, progress: f32) -> f32 {
    if progress <= 0.0 {
        return 0.0;
    }
    if progress >= 1.0 {
        return 1.0;
    }
    let t = solve_curve_x(x1, x2, progress);
    sample_curve(y1, y2, t)
}

/// Find the curve parameter whose x equals `target_x`.
///
/// Newton-Raphson converges quickly on most curves; flat regions (steep
/// ease-in-out presets) fall back to bisection, which always converges since
/// x(t) is monotonic for x control values in `[0, 1]`.
fn solve_curve_x(x1: f32, x2: f32, target_x: f32) -> f32 {
    let mut t = target_x;
    for _ in 0..8 {
        let err = sample_curve(x1, x2, t) - target_x;
        if err.abs() < 1e-6 {
            return t;
        }
        let slope = sample_curve_derivative(x1, x2, t);
        if slope.abs() < 1e-6 {
            break;
        }
        t = (t - err / slope).clamp(0.0, 1.0);
    }

    let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
    t = target_x;
    for _ in 0..32 {
        let x = sample_curve(x1, x2, t);
        if (x - target_x).abs() < 1e-6 {
            break;
        }
        if x < target_x {
            lo = t;
        } else {
            hi = t;
        }
        t = (lo + hi) * 0.5;
    }
    t
}

/// One coordinate of the bezier at parameter `t`:
/// `3(1-t)²t·p1 + 3(1-t)t²·p2 + t³`.
#[inline]
fn sample_curve(p1: f32, p2: f32, t: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * t * p1 + 3.0 * mt * t * t * p2 + t * t * t
}

#[inline]
fn sample_curve_derivative(p1: f32, p2: f32, t: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * p1 + 6.0 * mt * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    const ALL: [EasingFunction; 8] = [
        EasingFunction::Linear,
        EasingFunction::Ease,
        EasingFunction::EaseIn,
        EasingFunction::EaseOut,
        EasingFunction::EaseInOut,
        EasingFunction::SMOOTH,
        EasingFunction::CINEMATIC,
        EasingFunction::DRAMATIC,
    ];

    #[test]
    fn endpoints_are_pinned() {
        for ease in ALL {
            assert_eq!(ease.evaluate(0.0), 0.0, "{ease:?}");
            assert_eq!(ease.evaluate(1.0), 1.0, "{ease:?}");
        }
    }

    #[test]
    fn curves_are_monotonic() {
        for ease in ALL {
            let mut prev = 0.0;
            for step in 1..=20 {
                let v = ease.evaluate(step as f32 / 20.0);
                assert!(v + EPSILON >= prev, "{ease:?} dipped at step {step}");
                prev = v;
            }
        }
    }

    #[test]
    fn ease_in_out_is_symmetric() {
        let ease = EasingFunction::EaseInOut;
        assert!(approx_eq(ease.evaluate(0.5), 0.5));
        assert!(approx_eq(ease.evaluate(0.25) + ease.evaluate(0.75), 1.0));
    }

    #[test]
    fn cinematic_front_loads_progress() {
        // expo-out: most of the distance is covered early
        assert!(EasingFunction::CINEMATIC.evaluate(0.3) > 0.7);
        assert!(EasingFunction::SMOOTH.evaluate(0.3) < EasingFunction::CINEMATIC.evaluate(0.3));
    }

    #[test]
    fn dramatic_is_slow_at_both_ends() {
        let ease = EasingFunction::DRAMATIC;
        assert!(ease.evaluate(0.1) < 0.05);
        assert!(ease.evaluate(0.9) > 0.95);
        assert!(approx_eq(ease.evaluate(0.5), 0.5));
    }

    #[test]
    fn linear_bezier_matches_linear() {
        let ease = EasingFunction::cubic_bezier(0.0, 0.0, 1.0, 1.0).unwrap();
        for t in [0.1, 0.33, 0.5, 0.9] {
            assert!(approx_eq(ease.evaluate(t), t));
        }
    }

    #[test]
    fn invalid_control_points_are_rejected() {
        assert!(EasingFunction::cubic_bezier(-0.1, 0.0, 0.5, 1.0).is_none());
        assert!(EasingFunction::cubic_bezier(0.5, 0.0, 1.5, 1.0).is_none());
        let raw = EasingFunction::CubicBezier {
            x1: 2.0,
            y1: 0.0,
            x2: 0.5,
            y2: 1.0,
        };
        assert!(!raw.is_valid());
    }

    #[test]
    fn input_is_clamped() {
        let ease = EasingFunction::Ease;
        assert!(approx_eq(ease.evaluate(-0.5), 0.0));
        assert!(approx_eq(ease.evaluate(1.5), 1.0));
    }

    #[test]
    fn steps_jump_at_interval_edges() {
        let end = EasingFunction::Steps {
            count: 4,
            position: StepPosition::End,
        };
        assert_eq!(end.evaluate(0.0), 0.0);
        assert_eq!(end.evaluate(0.2), 0.0);
        assert_eq!(end.evaluate(0.3), 0.25);
        assert_eq!(end.evaluate(1.0), 1.0);

        let start = EasingFunction::Steps {
            count: 4,
            position: StepPosition::Start,
        };
        assert_eq!(start.evaluate(0.0), 0.0);
        assert_eq!(start.evaluate(0.1), 0.25);
        assert_eq!(start.evaluate(1.0), 1.0);

        assert!(!EasingFunction::Steps {
            count: 0,
            position: StepPosition::End
        }
        .is_valid());
        let parsed: EasingFunction =
            serde_json::from_str(r#"{"type":"steps","count":3}"#).unwrap();
        assert_eq!(
            parsed,
            EasingFunction::Steps {
                count: 3,
                position: StepPosition::End
            }
        );
    }

    #[test]
    fn serde_uses_type_tag() {
        let json = serde_json::to_string(&EasingFunction::SMOOTH).unwrap();
        assert!(json.contains("\"type\":\"cubic_bezier\""));
        let parsed: EasingFunction = serde_json::from_str(r#"{"type":"ease_out"}"#).unwrap();
        assert_eq!(parsed, EasingFunction::EaseOut);
    }
}
