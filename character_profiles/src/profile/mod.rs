//! Character profile definitions.

mod palette;

pub use palette::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::vocabulary::{Dimension, IntensityBand};

/// Placeholder replaced by the character's display name in mood phrases.
pub const CHARACTER_PLACEHOLDER: &str = "{character}";

/// Who the character is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterIdentity {
    /// Lowercase lookup key, e.g. `"endora"`.
    pub key: String,
    /// Display name, e.g. `"Endora"`.
    pub name: String,
    /// Core sensibility label, e.g. `"Aristocratic Supernatural Authority"`.
    pub sensibility: String,
    pub worldview: String,
    pub source: Option<String>,
    /// Which deformation operator variant renders this character.
    pub operator: String,
}

/// Vocabulary for one dimension of one character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionVocabulary {
    /// Authority phrase describing what this dimension does for the character.
    pub manifestation: String,
    /// Scale in [0, 1] below which the dimension stays dormant.
    pub activation: f64,
    /// Ordered descriptors per band, strongest reading last.
    pub tiers: BTreeMap<IntensityBand, Vec<String>>,
}

impl DimensionVocabulary {
    /// Create an empty vocabulary with the dimension's default activation threshold.
    pub fn new(dimension: Dimension, manifestation: impl Into<String>) -> Self {
        Self {
            manifestation: manifestation.into(),
            activation: dimension.default_activation(),
            tiers: BTreeMap::new(),
        }
    }

    /// Whether the dimension is awake anywhere inside `band`.
    ///
    /// A band consults a dimension when its top level's scale meets the threshold.
    pub fn is_reachable_in(&self, band: IntensityBand) -> bool {
        let (_, hi) = band.bounds();
        f64::from(hi) / 10.0 >= self.activation
    }
}

/// The full static description of a character's sensory logic.
///
/// Loaded once, then shared read-only by every operator invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterProfile {
    pub identity: CharacterIdentity,
    pub dimensions: BTreeMap<Dimension, DimensionVocabulary>,
    /// Band -> closing mood phrase; may contain `{character}`.
    pub mood_lexicon: BTreeMap<IntensityBand, String>,
    pub palette: Palette,
    /// Intensity level (0-10) -> what that level means for this character.
    pub intensity_progression: BTreeMap<u8, String>,
    /// Band -> sample prompt used for examples.
    pub examples: BTreeMap<IntensityBand, String>,
}

impl CharacterProfile {
    /// Create an empty profile for the given identity.
    pub fn new(identity: CharacterIdentity) -> Self {
        Self {
            identity,
            dimensions: BTreeMap::new(),
            mood_lexicon: BTreeMap::new(),
            palette: Palette::default(),
            intensity_progression: BTreeMap::new(),
            examples: BTreeMap::new(),
        }
    }

    /// Lowercase lookup key.
    pub fn key(&self) -> &str {
        &self.identity.key
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.identity.name
    }

    /// Set the vocabulary of a dimension.
    pub fn with_dimension(mut self, dimension: Dimension, vocabulary: DimensionVocabulary) -> Self {
        self.dimensions.insert(dimension, vocabulary);
        self
    }

    /// Set one band tier of a dimension, creating the vocabulary if needed.
    pub fn with_tier<I, S>(mut self, dimension: Dimension, band: IntensityBand, descriptors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dimensions
            .entry(dimension)
            .or_insert_with(|| DimensionVocabulary::new(dimension, ""))
            .tiers
            .insert(band, descriptors.into_iter().map(Into::into).collect());
        self
    }

    /// Set the mood phrase of a band.
    pub fn with_mood(mut self, band: IntensityBand, phrase: impl Into<String>) -> Self {
        self.mood_lexicon.insert(band, phrase.into());
        self
    }

    /// Set the example prompt of a band.
    pub fn with_example(mut self, band: IntensityBand, prompt: impl Into<String>) -> Self {
        self.examples.insert(band, prompt.into());
        self
    }

    /// Set the description of an intensity level.
    pub fn with_progression(mut self, level: u8, description: impl Into<String>) -> Self {
        self.intensity_progression.insert(level, description.into());
        self
    }

    /// Get the vocabulary of a dimension.
    pub fn vocabulary(&self, dimension: Dimension) -> Option<&DimensionVocabulary> {
        self.dimensions.get(&dimension)
    }

    /// Activation threshold of a dimension (profile value or the dimension default).
    pub fn activation(&self, dimension: Dimension) -> f64 {
        self.vocabulary(dimension)
            .map(|v| v.activation)
            .unwrap_or_else(|| dimension.default_activation())
    }

    /// Authority phrase of a dimension, empty if the profile has none.
    pub fn manifestation(&self, dimension: Dimension) -> &str {
        self.vocabulary(dimension)
            .map(|v| v.manifestation.as_str())
            .unwrap_or("")
    }

    /// Non-empty descriptor tier for a dimension at a band.
    pub fn tier(&self, dimension: Dimension, band: IntensityBand) -> Option<&[String]> {
        self.vocabulary(dimension)
            .and_then(|v| v.tiers.get(&band))
            .map(|d| d.as_slice())
            .filter(|d| !d.is_empty())
    }

    /// Mood phrase of a band with the character name substituted.
    pub fn mood_phrase(&self, band: IntensityBand) -> Option<String> {
        self.mood_lexicon
            .get(&band)
            .filter(|p| !p.trim().is_empty())
            .map(|p| p.replace(CHARACTER_PLACEHOLDER, &self.identity.name))
    }

    /// Description of an intensity level.
    pub fn progression(&self, level: u8) -> Option<&str> {
        self.intensity_progression.get(&level).map(|s| s.as_str())
    }

    /// Example prompt of a band.
    pub fn example_prompt(&self, band: IntensityBand) -> Option<&str> {
        self.examples.get(&band).map(|s| s.as_str())
    }

    /// Check the profile for gaps that would make some calls fail.
    ///
    /// An empty result means every band and level is fully served.
    pub fn validate(&self) -> Vec<ProfileIssue> {
        let mut issues = Vec::new();

        for dimension in Dimension::ALL {
            let fallback = DimensionVocabulary::new(dimension, "");
            let vocabulary = self.vocabulary(dimension).unwrap_or(&fallback);
            if !(0.0..=1.0).contains(&vocabulary.activation) {
                issues.push(ProfileIssue::ActivationOutOfRange {
                    dimension,
                    value: vocabulary.activation,
                });
            }

            for band in IntensityBand::ALL {
                if vocabulary.is_reachable_in(band) && self.tier(dimension, band).is_none() {
                    issues.push(ProfileIssue::MissingTier { dimension, band });
                }
            }
        }

        for band in IntensityBand::ALL {
            if self.mood_phrase(band).is_none() {
                issues.push(ProfileIssue::MissingMoodPhrase(band));
            }
        }

        for level in 0..=10u8 {
            if self.progression(level).is_none() {
                issues.push(ProfileIssue::MissingProgression(level));
            }
        }

        for band in IntensityBand::ALL {
            if self.example_prompt(band).is_none() {
                issues.push(ProfileIssue::MissingExample(band));
            }
        }

        issues
    }

    /// Whether [`validate`](Self::validate) finds nothing.
    pub fn is_complete(&self) -> bool {
        self.validate().is_empty()
    }
}

/// A gap or inconsistency found in a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProfileIssue {
    MissingTier {
        dimension: Dimension,
        band: IntensityBand,
    },
    MissingMoodPhrase(IntensityBand),
    MissingProgression(u8),
    MissingExample(IntensityBand),
    ActivationOutOfRange {
        dimension: Dimension,
        value: f64,
    },
}

impl std::fmt::Display for ProfileIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileIssue::MissingTier { dimension, band } => {
                write!(f, "{} vocabulary has no {} tier", dimension, band)
            }
            ProfileIssue::MissingMoodPhrase(band) => {
                write!(f, "mood lexicon has no {} phrase", band)
            }
            ProfileIssue::MissingProgression(level) => {
                write!(f, "intensity progression has no entry for level {}", level)
            }
            ProfileIssue::MissingExample(band) => {
                write!(f, "no example prompt for the {} band", band)
            }
            ProfileIssue::ActivationOutOfRange { dimension, value } => {
                write!(
                    f,
                    "{} activation {} is outside the range 0.0..=1.0",
                    dimension, value
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> CharacterIdentity {
        CharacterIdentity {
            key: "tester".to_string(),
            name: "Tester".to_string(),
            sensibility: "Test Sensibility".to_string(),
            worldview: String::new(),
            source: None,
            operator: "endora".to_string(),
        }
    }

    #[test]
    fn test_empty_profile_reports_everything_missing() {
        let profile = CharacterProfile::new(identity());
        let issues = profile.validate();

        assert!(!profile.is_complete());
        assert!(issues.contains(&ProfileIssue::MissingTier {
            dimension: Dimension::Material,
            band: IntensityBand::Whisper,
        }));
        assert!(issues.contains(&ProfileIssue::MissingMoodPhrase(IntensityBand::Strong)));
        assert!(issues.contains(&ProfileIssue::MissingProgression(10)));
        assert!(issues.contains(&ProfileIssue::MissingExample(IntensityBand::Balanced)));
    }

    #[test]
    fn test_dormant_bands_need_no_tier() {
        let profile = CharacterProfile::new(identity());
        let issues = profile.validate();

        // Chromatic wakes at 0.5, so Whisper and Subtle never consult it.
        assert!(!issues.contains(&ProfileIssue::MissingTier {
            dimension: Dimension::Chromatic,
            band: IntensityBand::Whisper,
        }));
        assert!(!issues.contains(&ProfileIssue::MissingTier {
            dimension: Dimension::Chromatic,
            band: IntensityBand::Subtle,
        }));
        assert!(issues.contains(&ProfileIssue::MissingTier {
            dimension: Dimension::Chromatic,
            band: IntensityBand::Balanced,
        }));
    }

    #[test]
    fn test_tier_lookup_ignores_empty_lists() {
        let profile = CharacterProfile::new(identity())
            .with_tier(Dimension::Material, IntensityBand::Whisper, ["with subtle presence"])
            .with_tier(Dimension::Material, IntensityBand::Subtle, Vec::<String>::new());

        assert_eq!(
            profile.tier(Dimension::Material, IntensityBand::Whisper),
            Some(&["with subtle presence".to_string()][..])
        );
        assert!(profile.tier(Dimension::Material, IntensityBand::Subtle).is_none());
        assert!(profile.tier(Dimension::Spatial, IntensityBand::Whisper).is_none());
    }

    #[test]
    fn test_mood_phrase_substitutes_name() {
        let profile = CharacterProfile::new(identity())
            .with_mood(IntensityBand::Saturation, "completely saturated by {character}'s presence");

        assert_eq!(
            profile.mood_phrase(IntensityBand::Saturation).as_deref(),
            Some("completely saturated by Tester's presence")
        );
        assert!(profile.mood_phrase(IntensityBand::Whisper).is_none());
    }

    #[test]
    fn test_activation_falls_back_to_default() {
        let mut vocabulary = DimensionVocabulary::new(Dimension::Temporal, "time bends");
        vocabulary.activation = 0.7;
        let profile = CharacterProfile::new(identity()).with_dimension(Dimension::Temporal, vocabulary);

        assert_eq!(profile.activation(Dimension::Temporal), 0.7);
        assert_eq!(profile.activation(Dimension::Material), 0.1);
        assert_eq!(profile.manifestation(Dimension::Temporal), "time bends");
        assert_eq!(profile.manifestation(Dimension::Material), "");
    }

    #[test]
    fn test_reachability() {
        let vocabulary = DimensionVocabulary::new(Dimension::Emotional, "");
        assert!(!vocabulary.is_reachable_in(IntensityBand::Subtle));
        assert!(vocabulary.is_reachable_in(IntensityBand::Balanced));
    }

    #[test]
    fn test_issue_messages() {
        let issue = ProfileIssue::MissingTier {
            dimension: Dimension::Chromatic,
            band: IntensityBand::Strong,
        };
        assert_eq!(issue.to_string(), "chromatic vocabulary has no Strong tier");
    }

    #[test]
    fn test_profile_serializes_to_json() {
        let profile = CharacterProfile::new(identity())
            .with_tier(Dimension::Material, IntensityBand::Whisper, ["a"])
            .with_mood(IntensityBand::Whisper, "b");

        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains("\"material\""));
        assert!(json.contains("\"whisper\""));
    }

    #[test]
    fn test_builders_complete_a_profile() {
        let mut profile = CharacterProfile::new(identity());
        for dimension in Dimension::ALL {
            for band in IntensityBand::ALL {
                profile = profile.with_tier(dimension, band, [format!("{} {}", dimension, band.key())]);
            }
        }
        for band in IntensityBand::ALL {
            profile = profile
                .with_mood(band, format!("{} by {{character}}", band.key()))
                .with_example(band, "a cup");
        }
        for level in 0..=10u8 {
            profile = profile.with_progression(level, format!("level {}", level));
        }

        assert!(profile.is_complete(), "{:?}", profile.validate());
        assert_eq!(profile.example_prompt(IntensityBand::Strong), Some("a cup"));
        assert_eq!(profile.progression(7), Some("level 7"));
    }

    #[test]
    fn test_raised_activation_excuses_low_tiers() {
        let mut vocabulary = DimensionVocabulary::new(Dimension::Material, "objects weigh");
        vocabulary.activation = 0.9;
        vocabulary
            .tiers
            .insert(IntensityBand::Saturation, vec!["heavy".to_string()]);
        let profile = CharacterProfile::new(identity()).with_dimension(Dimension::Material, vocabulary);

        let material_gaps: Vec<_> = profile
            .validate()
            .into_iter()
            .filter(|issue| matches!(issue, ProfileIssue::MissingTier { dimension: Dimension::Material, .. }))
            .collect();
        assert!(material_gaps.is_empty(), "{:?}", material_gaps);
    }
}
