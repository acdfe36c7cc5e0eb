//! Deformation Engine - the public surface over the character registry.
//!
//! Each call takes a registry snapshot, so a concurrent [`DeformationEngine::reload`]
//! never mixes two registries inside one call.

use character_profiles::{IntensityBand, ProfileError, ProfileSources};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::error::DeformationError;
use crate::intensity::{resolve, MAX_INTENSITY};
use crate::parser::parse;
use crate::registry::{CharacterRegistry, RegisteredCharacter, SharedRegistry};
use crate::result::TransformationResult;

/// An example prompt and its transformation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamplePair {
    pub intensity: u8,
    pub band: IntensityBand,
    pub original: String,
    pub enhanced: String,
}

/// Listing entry for a registered character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSummary {
    pub key: String,
    pub name: String,
    pub sensibility: String,
    pub source: Option<String>,
}

/// Applies registered characters to prompts.
#[derive(Debug, Default)]
pub struct DeformationEngine {
    registry: SharedRegistry,
}

impl DeformationEngine {
    /// Create an engine over the given registry.
    pub fn new(registry: CharacterRegistry) -> Self {
        Self {
            registry: SharedRegistry::new(registry),
        }
    }

    /// Create an engine with the built-in characters.
    pub fn with_builtin() -> Result<Self, ProfileError> {
        Ok(Self::new(CharacterRegistry::with_builtin()?))
    }

    /// Create an engine from configured profile sources.
    pub fn from_sources(sources: &ProfileSources) -> Result<Self, ProfileError> {
        Ok(Self::new(CharacterRegistry::load(sources)?))
    }

    /// Current registry snapshot.
    pub fn registry(&self) -> Arc<CharacterRegistry> {
        self.registry.snapshot()
    }

    /// Replace the registry. Calls already running keep their snapshot.
    pub fn reload(&self, registry: CharacterRegistry) {
        self.registry.replace(registry);
    }

    fn character(&self, name: &str) -> Result<RegisteredCharacter, DeformationError> {
        self.registry.snapshot().get(name)
    }

    /// Transform `prompt` through `character` at `intensity`.
    ///
    /// Checks run in order: character, prompt, intensity.
    pub fn transform(
        &self,
        character: &str,
        prompt: &str,
        intensity: i64,
    ) -> Result<TransformationResult, DeformationError> {
        let registered = self.character(character)?;
        let parsed = parse(prompt)?;
        registered
            .operator
            .apply(&registered.profile, &parsed, intensity)
    }

    /// `"{Band} ({level}/10): {description}"` for the character at `intensity`.
    pub fn describe_intensity(
        &self,
        character: &str,
        intensity: i64,
    ) -> Result<String, DeformationError> {
        let registered = self.character(character)?;
        let resolved = resolve(intensity)?;
        let profile = &registered.profile;

        let description = profile.progression(resolved.level).ok_or_else(|| {
            DeformationError::profile_incomplete(
                profile.name(),
                format!("intensity progression has no entry for level {}", resolved.level),
            )
        })?;

        Ok(format!(
            "{} ({}/{}): {}",
            resolved.band, resolved.level, MAX_INTENSITY, description
        ))
    }

    /// Example transformations.
    ///
    /// With an intensity: the example of that intensity's band. Without: one
    /// example per band, each at the band's representative level.
    pub fn list_examples(
        &self,
        character: &str,
        intensity: Option<i64>,
    ) -> Result<Vec<ExamplePair>, DeformationError> {
        let registered = self.character(character)?;

        let levels: Vec<u8> = match intensity {
            Some(intensity) => vec![resolve(intensity)?.level],
            None => IntensityBand::ALL
                .iter()
                .map(|band| band.representative_level())
                .collect(),
        };

        let examples = levels
            .into_iter()
            .map(|level| example(&registered, level))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            character = registered.profile.key(),
            count = examples.len(),
            "Listed examples"
        );
        Ok(examples)
    }

    /// Registered characters, sorted by key.
    pub fn list_characters(&self) -> Vec<CharacterSummary> {
        self.registry
            .snapshot()
            .profiles()
            .map(|profile| CharacterSummary {
                key: profile.key().to_string(),
                name: profile.name().to_string(),
                sensibility: profile.identity.sensibility.clone(),
                source: profile.identity.source.clone(),
            })
            .collect()
    }
}

fn example(registered: &RegisteredCharacter, level: u8) -> Result<ExamplePair, DeformationError> {
    let profile = &registered.profile;
    let resolved = resolve(i64::from(level))?;

    let prompt = profile.example_prompt(resolved.band).ok_or_else(|| {
        DeformationError::profile_incomplete(
            profile.name(),
            format!("no example prompt for the {} band", resolved.band),
        )
    })?;

    let parsed = parse(prompt)?;
    let result = registered
        .operator
        .apply(profile, &parsed, i64::from(level))?;

    Ok(ExamplePair {
        intensity: level,
        band: resolved.band,
        original: result.original_prompt,
        enhanced: result.enhanced_prompt,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use character_profiles::{builtin, CharacterIdentity, CharacterProfile, Dimension};
    use proptest::prelude::*;

    fn engine() -> DeformationEngine {
        DeformationEngine::with_builtin().unwrap()
    }

    #[test]
    fn test_transform_whisper() {
        let result = engine().transform("endora", "a coffee cup", 2).unwrap();
        assert!(result.enhanced_prompt.contains("subtle presence"));
        let mood = result.enhanced_prompt.split("mood:").nth(1).unwrap();
        assert!(mood.contains("neutral"));
        assert!(mood.contains("subtly observed"));
        assert!(result.contribution(Dimension::Emotional).unwrap().fragment.is_empty());
        assert!(result.contribution(Dimension::Chromatic).unwrap().fragment.is_empty());
    }

    #[test]
    fn test_transform_saturation() {
        let result = engine().transform("Endora", "a coffee cup", 10).unwrap();
        for needle in [
            "exquisitely",
            "sapphire",
            "emerald",
            "amethyst",
            "completely saturated by Endora's presence",
        ] {
            assert!(result.enhanced_prompt.contains(needle), "missing '{}'", needle);
        }
        assert!(result
            .dimension_contributions
            .iter()
            .all(|c| !c.fragment.is_empty()));
    }

    #[test]
    fn test_band_boundaries() {
        let engine = engine();
        let zero = engine.transform("endora", "a coffee cup", 0).unwrap();
        let two = engine.transform("endora", "a coffee cup", 2).unwrap();
        let three = engine.transform("endora", "a coffee cup", 3).unwrap();

        assert_eq!(zero.band, two.band);
        assert_ne!(two.band, three.band);
        assert_ne!(two.enhanced_prompt, three.enhanced_prompt);
    }

    #[test]
    fn test_activation_by_band() {
        let engine = engine();
        for intensity in 0..=2 {
            let result = engine.transform("endora", "a blue vase", intensity).unwrap();
            assert!(result.contribution(Dimension::Chromatic).unwrap().fragment.is_empty());
            assert!(result.contribution(Dimension::Emotional).unwrap().fragment.is_empty());
        }
        for intensity in 9..=10 {
            let result = engine.transform("endora", "a blue vase", intensity).unwrap();
            assert_eq!(result.active_dimensions().len(), 5);
        }
    }

    #[test]
    fn test_error_order() {
        let engine = engine();
        assert!(matches!(
            engine.transform("samantha", "", 11),
            Err(DeformationError::UnknownCharacter { .. })
        ));
        assert_eq!(
            engine.transform("endora", "  ", 11),
            Err(DeformationError::EmptyPrompt)
        );
        assert!(matches!(
            engine.transform("endora", "a cup", -1),
            Err(DeformationError::InvalidIntensity { received: -1, .. })
        ));
    }

    #[test]
    fn test_describe_intensity() {
        let engine = engine();
        assert_eq!(
            engine.describe_intensity("endora", 5).unwrap(),
            "Balanced (5/10): Endora operator and original prompt in clear conversation"
        );
        assert!(engine
            .describe_intensity("endora", 0)
            .unwrap()
            .starts_with("Whisper (0/10): "));
        assert!(matches!(
            engine.describe_intensity("endora", 11),
            Err(DeformationError::InvalidIntensity { .. })
        ));
    }

    #[test]
    fn test_list_examples_per_band() {
        let examples = engine().list_examples("endora", None).unwrap();
        let levels: Vec<u8> = examples.iter().map(|e| e.intensity).collect();
        assert_eq!(levels, vec![2, 4, 6, 8, 10]);
        assert_eq!(examples[0].original, "a coffee cup");
        assert_eq!(examples[4].original, "a rustic wooden chair");
        assert!(examples[1].enhanced.starts_with("a coffee cup with"));
        assert!(examples.iter().all(|e| e.enhanced.contains(". mood: ")));
    }

    #[test]
    fn test_list_examples_at_intensity() {
        let examples = engine().list_examples("endora", Some(7)).unwrap();
        assert_eq!(examples.len(), 1);
        assert_eq!(examples[0].band, IntensityBand::Strong);
        assert_eq!(examples[0].original, "a coffee cup on a table in a kitchen");
        assert!(examples[0].enhanced.contains("in a kitchen"));
    }

    #[test]
    fn test_list_characters() {
        let characters = engine().list_characters();
        assert_eq!(
            characters,
            vec![CharacterSummary {
                key: "endora".to_string(),
                name: "Endora".to_string(),
                sensibility: "Aristocratic Supernatural Authority".to_string(),
                source: Some("Bewitched (1960s-70s)".to_string()),
            }]
        );
    }

    #[test]
    fn test_reload_swaps_registry() {
        let engine = engine();
        let before = engine.registry();

        let mut mork = CharacterProfile::new(CharacterIdentity {
            key: "mork".to_string(),
            name: "Mork".to_string(),
            sensibility: "Alien Naivety".to_string(),
            worldview: String::new(),
            source: None,
            operator: "tiered".to_string(),
        });
        for band in IntensityBand::ALL {
            mork = mork.with_mood(band, "curiously examined");
            for dimension in Dimension::ALL {
                mork = mork.with_tier(dimension, band, ["nanu nanu"]);
            }
        }
        let mut registry = CharacterRegistry::from_profiles(builtin::all().unwrap());
        registry.register(mork).unwrap();
        engine.reload(registry);

        assert_eq!(before.len(), 1);
        assert_eq!(engine.list_characters().len(), 2);
        let result = engine.transform("mork", "an egg", 5).unwrap();
        assert!(result.enhanced_prompt.contains("curiously examined"));

        // Gaps in a registered profile surface per call.
        assert!(matches!(
            engine.describe_intensity("mork", 5),
            Err(DeformationError::ProfileIncomplete { .. })
        ));
        assert!(matches!(
            engine.list_examples("mork", None),
            Err(DeformationError::ProfileIncomplete { .. })
        ));
    }

    fn prompt_strategy() -> impl Strategy<Value = String> {
        prop::collection::vec(
            prop_oneof![
                "[a-z]{1,8}",
                "[a-z]{1,8}[?;,!.:-]",
                Just("in".to_string()),
                Just("on".to_string()),
                Just("blue".to_string()),
                Just("calm".to_string()),
                Just("tasting".to_string()),
                Just("table".to_string()),
            ],
            1..8,
        )
        .prop_map(|words| words.join(" "))
    }

    proptest! {
        /// Identical inputs give byte-identical results.
        #[test]
        fn transform_is_deterministic(prompt in prompt_strategy(), intensity in 0i64..=10) {
            let engine = engine();
            let a = engine.transform("endora", &prompt, intensity).unwrap();
            let b = engine.transform("endora", &prompt, intensity).unwrap();
            prop_assert_eq!(a.to_json().unwrap(), b.to_json().unwrap());
        }

        /// No dimension weakens as intensity rises inside a band.
        #[test]
        fn descriptor_counts_monotonic_within_band(prompt in prompt_strategy(), band_index in 0usize..5) {
            let engine = engine();
            let (lo, hi) = IntensityBand::ALL[band_index].bounds();
            let results: Vec<_> = (lo..=hi)
                .map(|level| engine.transform("endora", &prompt, i64::from(level)).unwrap())
                .collect();
            for pair in results.windows(2) {
                for (low, high) in pair[0]
                    .dimension_contributions
                    .iter()
                    .zip(&pair[1].dimension_contributions)
                {
                    prop_assert!(high.descriptor_count >= low.descriptor_count);
                }
            }
        }

        /// Every result passes its own coherence checks.
        #[test]
        fn results_are_coherent(prompt in prompt_strategy(), intensity in 0i64..=10) {
            let result = engine().transform("endora", &prompt, intensity).unwrap();
            prop_assert!(result.coherence().is_coherent);
        }

        /// Prompt punctuation never doubles up against composed separators.
        #[test]
        fn punctuation_never_dangles(prompt in prompt_strategy(), intensity in 0i64..=10) {
            let result = engine().transform("endora", &prompt, intensity).unwrap();
            for seam in ["  ", ",,", ";,", "?.", ",.", "-.", ":,", "!,"] {
                prop_assert!(
                    !result.enhanced_prompt.contains(seam),
                    "'{}' in {}",
                    seam,
                    result.enhanced_prompt
                );
            }
        }

        /// Out-of-range intensities are rejected, never clamped.
        #[test]
        fn out_of_range_rejected(intensity in prop_oneof![i64::MIN..0i64, 11i64..i64::MAX]) {
            let outcome = engine().transform("endora", "a cup", intensity);
            let rejected = matches!(outcome, Err(DeformationError::InvalidIntensity { .. }));
            prop_assert!(rejected);
        }
    }
}
