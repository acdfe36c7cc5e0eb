//! Shared vocabulary: the five deformation dimensions and the intensity bands.

use serde::{Deserialize, Serialize};

/// The five coupled axes along which a character deforms a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// Surfaces, substances, craftsmanship.
    Material,
    /// Arrangement and hierarchy of space.
    Spatial,
    /// Pace and weight of motion.
    Temporal,
    /// Palette and color composition.
    Chromatic,
    /// Emotional subtext.
    Emotional,
}

impl Dimension {
    /// All dimensions in canonical order.
    pub const ALL: [Dimension; 5] = [
        Dimension::Material,
        Dimension::Spatial,
        Dimension::Temporal,
        Dimension::Chromatic,
        Dimension::Emotional,
    ];

    /// Lowercase name used in documents and reports.
    pub fn name(&self) -> &'static str {
        match self {
            Dimension::Material => "material",
            Dimension::Spatial => "spatial",
            Dimension::Temporal => "temporal",
            Dimension::Chromatic => "chromatic",
            Dimension::Emotional => "emotional",
        }
    }

    /// Scale below which the dimension stays dormant when a profile sets no threshold.
    ///
    /// Material and spatial wake first; chromatic and emotional only from Balanced upward.
    pub fn default_activation(&self) -> f64 {
        match self {
            Dimension::Material => 0.1,
            Dimension::Spatial => 0.2,
            Dimension::Temporal => 0.3,
            Dimension::Chromatic => 0.5,
            Dimension::Emotional => 0.5,
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Named intensity ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntensityBand {
    /// 0-2.
    Whisper,
    /// 3-4.
    Subtle,
    /// 5-6.
    Balanced,
    /// 7-8.
    Strong,
    /// 9-10.
    Saturation,
}

impl IntensityBand {
    /// All bands in ascending order.
    pub const ALL: [IntensityBand; 5] = [
        IntensityBand::Whisper,
        IntensityBand::Subtle,
        IntensityBand::Balanced,
        IntensityBand::Strong,
        IntensityBand::Saturation,
    ];

    /// Inclusive intensity bounds `(lo, hi)` of the band.
    pub fn bounds(&self) -> (u8, u8) {
        match self {
            IntensityBand::Whisper => (0, 2),
            IntensityBand::Subtle => (3, 4),
            IntensityBand::Balanced => (5, 6),
            IntensityBand::Strong => (7, 8),
            IntensityBand::Saturation => (9, 10),
        }
    }

    /// The band containing `level`, or `None` above 10.
    pub fn for_level(level: u8) -> Option<IntensityBand> {
        IntensityBand::ALL.into_iter().find(|band| {
            let (lo, hi) = band.bounds();
            (lo..=hi).contains(&level)
        })
    }

    /// Level used when a single example per band is wanted.
    pub fn representative_level(&self) -> u8 {
        self.bounds().1
    }

    /// Capitalized display label.
    pub fn label(&self) -> &'static str {
        match self {
            IntensityBand::Whisper => "Whisper",
            IntensityBand::Subtle => "Subtle",
            IntensityBand::Balanced => "Balanced",
            IntensityBand::Strong => "Strong",
            IntensityBand::Saturation => "Saturation",
        }
    }

    /// Lowercase key used in profile documents.
    pub fn key(&self) -> &'static str {
        match self {
            IntensityBand::Whisper => "whisper",
            IntensityBand::Subtle => "subtle",
            IntensityBand::Balanced => "balanced",
            IntensityBand::Strong => "strong",
            IntensityBand::Saturation => "saturation",
        }
    }
}

impl std::fmt::Display for IntensityBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bands_cover_every_level_once() {
        for level in 0..=10u8 {
            let owners = IntensityBand::ALL
                .iter()
                .filter(|b| {
                    let (lo, hi) = b.bounds();
                    (lo..=hi).contains(&level)
                })
                .count();
            assert_eq!(owners, 1, "level {} owned by {} bands", level, owners);
        }
        assert_eq!(IntensityBand::for_level(11), None);
    }

    #[test]
    fn test_band_for_level() {
        assert_eq!(IntensityBand::for_level(0), Some(IntensityBand::Whisper));
        assert_eq!(IntensityBand::for_level(2), Some(IntensityBand::Whisper));
        assert_eq!(IntensityBand::for_level(3), Some(IntensityBand::Subtle));
        assert_eq!(IntensityBand::for_level(6), Some(IntensityBand::Balanced));
        assert_eq!(IntensityBand::for_level(7), Some(IntensityBand::Strong));
        assert_eq!(IntensityBand::for_level(10), Some(IntensityBand::Saturation));
    }

    #[test]
    fn test_representative_levels_ascend() {
        let levels: Vec<u8> = IntensityBand::ALL
            .iter()
            .map(|b| b.representative_level())
            .collect();
        assert_eq!(levels, vec![2, 4, 6, 8, 10]);
    }

    #[test]
    fn test_default_activation_order() {
        assert!(Dimension::Material.default_activation() <= Dimension::Spatial.default_activation());
        assert!(Dimension::Chromatic.default_activation() >= 0.5);
        assert!(Dimension::Emotional.default_activation() >= 0.5);
    }

    #[test]
    fn test_dimension_names() {
        let names: Vec<_> = Dimension::ALL.iter().map(|d| d.to_string()).collect();
        assert_eq!(
            names,
            vec!["material", "spatial", "temporal", "chromatic", "emotional"]
        );
    }
}
