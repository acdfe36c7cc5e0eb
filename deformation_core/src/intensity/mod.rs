//! Intensity resolution: validates a raw intensity and maps it onto a band.

use character_profiles::IntensityBand;
use serde::{Deserialize, Serialize};

use crate::error::DeformationError;

/// Lowest accepted intensity.
pub const MIN_INTENSITY: u8 = 0;

/// Highest accepted intensity.
pub const MAX_INTENSITY: u8 = 10;

/// A validated intensity with its band and scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedIntensity {
    pub level: u8,
    pub band: IntensityBand,
    /// `level / 10.0`, in [0, 1].
    pub scale: f64,
}

impl ResolvedIntensity {
    /// Position of the level inside its band: 0 at the lower bound, 1 at the upper.
    pub fn band_progress(&self) -> f64 {
        let (lo, hi) = self.band.bounds();
        if hi == lo {
            return 1.0;
        }
        f64::from(self.level - lo) / f64::from(hi - lo)
    }

    /// How many descriptors of a tier with `tier_len` entries this level uses.
    ///
    /// The first descriptor is always used; the band's upper bound uses all of them.
    pub fn descriptor_count(&self, tier_len: usize) -> usize {
        if tier_len == 0 {
            return 0;
        }
        let extra = (self.band_progress() * (tier_len - 1) as f64).floor() as usize;
        (1 + extra).min(tier_len)
    }

    /// True when a dimension with the given activation threshold fires.
    pub fn activates(&self, threshold: f64) -> bool {
        self.scale >= threshold
    }
}

/// Validate `intensity` and resolve it. Out-of-range values are rejected, never clamped.
pub fn resolve(intensity: i64) -> Result<ResolvedIntensity, DeformationError> {
    let out_of_range = || DeformationError::InvalidIntensity {
        field: "intensity",
        received: intensity,
        min: MIN_INTENSITY,
        max: MAX_INTENSITY,
    };

    let level = u8::try_from(intensity)
        .ok()
        .filter(|level| (MIN_INTENSITY..=MAX_INTENSITY).contains(level))
        .ok_or_else(out_of_range)?;
    let band = IntensityBand::for_level(level).ok_or_else(out_of_range)?;

    Ok(ResolvedIntensity {
        level,
        band,
        scale: f64::from(level) / 10.0,
    })
}
