use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec3;

/// Lower bound applied to every raw contribution before normalization, so a
/// zone outside both users' thresholds still blends 50/50 instead of dividing
/// by zero.
pub const CONTRIBUTION_FLOOR: f32 = 0.001;

/// Falloff used to turn "angle between gaze and zone" into a user's weight.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum ContributionFunction {
    /// `1 - angle / var`
    Linear,
    /// `cos(angle * π / (2 var))`
    #[default]
    Cosine,
    /// Right tail of the standard normal at `angle / (var / 3)`.
    Gaussian,
}

impl ContributionFunction {
    /// Selection order used by index-based control surfaces.
    pub const ALL: [ContributionFunction; 3] = [Self::Linear, Self::Cosine, Self::Gaussian];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        match self {
            Self::Linear => 0,
            Self::Cosine => 1,
            Self::Gaussian => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Cosine => "cosine",
            Self::Gaussian => "gaussian",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Some(Self::Linear),
            "cosine" => Some(Self::Cosine),
            "gaussian" => Some(Self::Gaussian),
            _ => None,
        }
    }

    /// Unfloored contribution of one user whose gaze is `angle` radians away
    /// from the zone. Zero at or beyond `var`.
    pub fn raw(self, angle: f32, var: f32) -> f32 {
        if !(angle < var) {
            return 0.0;
        }
        match self {
            Self::Linear => 1.0 - angle / var,
            Self::Cosine => (angle * PI / (2.0 * var)).cos(),
            Self::Gaussian => gaussian_right_tail(angle / (var / 3.0)),
        }
    }

    /// Normalized weights for two users.
    ///
    /// `to_zone*` and `orientation*` are expected to be unit vectors; the dot
    /// product is clamped so slightly denormal input cannot produce NaN.
    pub fn weights(
        self,
        to_zone0: Vec3,
        orientation0: Vec3,
        to_zone1: Vec3,
        orientation1: Vec3,
        var: f32,
    ) -> ContributionWeights {
        let c0 = self.raw(angle_between(to_zone0, orientation0), var);
        let c1 = self.raw(angle_between(to_zone1, orientation1), var);
        ContributionWeights::normalized(c0, c1)
    }
}

/// Blend weights of user 0 and user 1 for one zone. Always sum to 1.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ContributionWeights {
    pub w0: f32,
    pub w1: f32,
}

impl ContributionWeights {
    /// Floors both raw values at [`CONTRIBUTION_FLOOR`] and normalizes.
    pub fn normalized(c0: f32, c1: f32) -> Self {
        let c0 = floor_contribution(c0);
        let c1 = floor_contribution(c1);
        let total = c0 + c1;
        Self { w0: c0 / total, w1: c1 / total }
    }

    /// All weight on user 0.
    pub const fn single_user() -> Self {
        Self { w0: 1.0, w1: 0.0 }
    }

    pub fn blend(self, a: Vec3, b: Vec3) -> Vec3 {
        a * self.w0 + b * self.w1
    }
}

fn floor_contribution(c: f32) -> f32 {
    // NaN compares false and falls through to the floor as well.
    if c > CONTRIBUTION_FLOOR { c } else { CONTRIBUTION_FLOOR }
}

/// Threshold angle `var` and whether it follows the users' gaze divergence.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ContributionThreshold {
    pub value: f32,
    pub auto: bool,
}

impl Default for ContributionThreshold {
    fn default() -> Self {
        Self { value: PI, auto: true }
    }
}

impl ContributionThreshold {
    /// In auto mode, recomputes `value` from the two gaze directions:
    /// never tighter than 90°, widened as the gazes diverge.
    pub fn update(&mut self, orientation0: Vec3, orientation1: Vec3) -> f32 {
        if self.auto {
            self.value = auto_threshold(orientation0, orientation1);
        }
        self.value
    }
}

pub fn auto_threshold(orientation0: Vec3, orientation1: Vec3) -> f32 {
    angle_between(orientation0, orientation1).max(FRAC_PI_2)
}

/// Angle between two unit vectors in `[0, π]`.
pub fn angle_between(a: Vec3, b: Vec3) -> f32 {
    a.dot(b).clamp(-1.0, 1.0).acos()
}

/// `P(Z > z)` for a standard normal `Z`.
pub fn gaussian_right_tail(z: f32) -> f32 {
    let z = z as f64;
    (1.0 - (1.0 + erf(z / std::f64::consts::SQRT_2)) / 2.0) as f32
}

/// Abramowitz & Stegun 7.1.26, max absolute error 1.5e-7.
fn erf(x: f64) -> f64 {
    const A1: f64 = 0.254829592;
    const A2: f64 = -0.284496736;
    const A3: f64 = 1.421413741;
    const A4: f64 = -1.453152027;
    const A5: f64 = 1.061405429;
    const P: f64 = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + P * x);
    let y = 1.0 - (((((A5 * t + A4) * t) + A3) * t + A2) * t + A1) * t * (-x * x).exp();
    sign * y
}
