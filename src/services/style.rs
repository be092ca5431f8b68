//! Float style — per-card idle animation jitter.
//!
//! Each card gets its own delay, duration and tilt so a wall of cards does
//! not bob in lockstep. Values are drawn once when the card mounts.

use rand::Rng;

#[cfg(test)]
#[path = "style_test.rs"]
mod style_test;

pub const MAX_DELAY_S: f64 = 2.0;
pub const MIN_DURATION_S: f64 = 6.0;
pub const MAX_DURATION_S: f64 = 9.0;
pub const MAX_TILT_DEG: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatStyle {
    pub delay_s: f64,
    pub duration_s: f64,
    pub tilt_deg: f64,
}

impl FloatStyle {
    /// Draw a style from the thread-local generator.
    #[must_use]
    pub fn random() -> Self {
        Self::from_rng(&mut rand::rng())
    }

    #[must_use]
    pub fn from_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            delay_s: rng.random_range(0.0..MAX_DELAY_S),
            duration_s: rng.random_range(MIN_DURATION_S..MAX_DURATION_S),
            tilt_deg: rng.random_range(-MAX_TILT_DEG..MAX_TILT_DEG),
        }
    }

    /// Inline CSS custom properties for the card element.
    #[must_use]
    pub fn css_vars(&self, base_rotation_deg: f64) -> String {
        format!(
            "--float-delay: {}s; --float-dur: {}s; --tilt: {:.2}deg; --base-rot: {}deg",
            self.delay_s, self.duration_s, self.tilt_deg, base_rotation_deg
        )
    }
}
