use serde::{Deserialize, Serialize};

/// Logistic map `1 / (1 + exp(-scale * (raw - shift)))`.
///
/// `shift` is the raw score that maps to 0.5; `scale` sets the steepness. The map is
/// monotonic increasing for positive `scale`, so it preserves the direction of the
/// raw score (a distance stays "lower is closer").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SigmoidScale {
    pub shift: f32,
    pub scale: f32,
}

impl SigmoidScale {
    pub const fn new(shift: f32, scale: f32) -> Self {
        Self { shift, scale }
    }

    #[inline]
    pub fn apply(&self, raw: f32) -> f32 {
        1.0 / (1.0 + (-self.scale * (raw - self.shift)).exp())
    }
}
