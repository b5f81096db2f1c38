//! Easing curves.
//! - named presets map to CSS-style cubic-bezier control points
//! - `CubicBezier` takes explicit `[x1, y1, x2, y2]` controls
//! - evaluation solves x(t) = u by bisection, then returns y(t)

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    CubicBezier([f64; 4]),
}

impl Easing {
    pub fn control_points(&self) -> [f64; 4] {
        match self {
            Easing::Linear => [0.0, 0.0, 1.0, 1.0],
            Easing::EaseIn => [0.42, 0.0, 1.0, 1.0],
            Easing::EaseOut => [0.0, 0.0, 0.58, 1.0],
            Easing::EaseInOut => [0.42, 0.0, 0.58, 1.0],
            Easing::CubicBezier(ctrl) => *ctrl,
        }
    }

    /// Map normalized progress `u` in [0, 1] to eased progress.
    pub fn apply(&self, u: f64) -> f64 {
        let [x1, y1, x2, y2] = self.control_points();
        bezier_ease(u, x1, y1, x2, y2)
    }
}

#[inline]
fn cubic_bezier(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

fn bezier_ease(u: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let u = u.clamp(0.0, 1.0);
    if x1 == 0.0 && y1 == 0.0 && x2 == 1.0 && y2 == 1.0 {
        return u;
    }
    let mut lo = 0.0f64;
    let mut hi = 1.0f64;
    let mut mid = u;
    for _ in 0..32 {
        let x = cubic_bezier(0.0, x1, x2, 1.0, mid);
        if (x - u).abs() < 1e-9 {
            break;
        }
        if x < u {
            lo = mid;
        } else {
            hi = mid;
        }
        mid = 0.5 * (lo + hi);
    }
    cubic_bezier(0.0, y1, y2, 1.0, mid)
}
