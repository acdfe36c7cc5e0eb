//! Profiles compiled into the crate.

use crate::loader::ProfileError;
use crate::profile::CharacterProfile;

/// The Endora profile document.
pub const ENDORA_DOCUMENT: &str = include_str!("../../profiles/endora.toml");

/// Endora: aristocratic supernatural authority.
pub fn endora() -> Result<CharacterProfile, ProfileError> {
    CharacterProfile::from_toml_str(ENDORA_DOCUMENT)
}

/// Every built-in profile.
pub fn all() -> Result<Vec<CharacterProfile>, ProfileError> {
    Ok(vec![endora()?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::{Dimension, IntensityBand};

    #[test]
    fn test_endora_is_complete() {
        let profile = endora().unwrap();
        let issues = profile.validate();
        assert!(issues.is_empty(), "unexpected issues: {:?}", issues);
    }

    #[test]
    fn test_endora_identity() {
        let profile = endora().unwrap();
        assert_eq!(profile.key(), "endora");
        assert_eq!(profile.name(), "Endora");
        assert_eq!(profile.identity.operator, "endora");
        assert!(profile.identity.worldview.starts_with("I exist in a hierarchy"));
        assert!(!profile.identity.worldview.contains('\\'));
    }

    #[test]
    fn test_endora_saturation_palette() {
        let profile = endora().unwrap();
        let tier = profile
            .tier(Dimension::Chromatic, IntensityBand::Saturation)
            .unwrap()
            .join(" ");
        for tone in ["sapphire", "emerald", "amethyst"] {
            assert!(tier.contains(tone), "missing {}", tone);
        }
        assert_eq!(profile.palette.tone_for("blue"), "sapphire blue");
        assert_eq!(profile.palette.tone_for("pink"), "pink rendered as a precious tone");
    }

    #[test]
    fn test_endora_temporal_sleeps_through_whisper() {
        let profile = endora().unwrap();
        assert_eq!(profile.activation(Dimension::Temporal), 0.3);
        assert!(profile.tier(Dimension::Temporal, IntensityBand::Whisper).is_none());
    }
}
