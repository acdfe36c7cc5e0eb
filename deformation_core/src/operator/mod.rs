//! Deformation Operators - apply a character's sensory logic to a parsed prompt.
//!
//! Every operator follows the same unified scaling:
//! 1. **Resolve**: the intensity is resolved once into a band and a scale
//! 2. **Contribute**: each dimension either stays dormant (scale below its
//!    activation threshold) or fires from the band's tier
//! 3. **Compose**: fragments are assembled in a fixed order and normalized
//!
//! Characters override single steps (usually [`DeformationOperator::contribute`])
//! rather than the whole pipeline.

mod endora;

pub use endora::*;

use character_profiles::{CharacterProfile, Dimension, IntensityBand};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DeformationError;
use crate::intensity::{resolve, ResolvedIntensity};
use crate::parser::{ParsedPrompt, CLAUSE_PUNCTUATION};
use crate::result::TransformationResult;

/// Operator kind for profiles that need no character-specific behavior.
pub const TIERED_OPERATOR: &str = "tiered";

/// What one dimension added to the enhanced prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionContribution {
    pub dimension: Dimension,

    /// Text fragment, empty when the dimension is dormant.
    pub fragment: String,

    /// The tier that fired, `None` when dormant.
    pub tier: Option<IntensityBand>,

    /// Number of descriptors used; the per-dimension strength.
    pub descriptor_count: usize,

    /// The rule that produced the fragment.
    pub rationale: String,
}

impl DimensionContribution {
    /// Whether this dimension contributed anything.
    pub fn is_active(&self) -> bool {
        self.tier.is_some()
    }
}

/// Maps (prompt, intensity) to an enhanced prompt for one character.
pub trait DeformationOperator: Send + Sync {
    /// Kind name a profile uses to bind this operator.
    fn kind(&self) -> &'static str;

    /// Contribution of a single dimension at an already resolved intensity.
    fn contribute(
        &self,
        profile: &CharacterProfile,
        _parsed: &ParsedPrompt,
        resolved: &ResolvedIntensity,
        dimension: Dimension,
    ) -> Result<DimensionContribution, DeformationError> {
        tiered_contribution(profile, resolved, dimension)
    }

    /// Full transformation. All dimensions share the same resolved intensity.
    fn apply(
        &self,
        profile: &CharacterProfile,
        parsed: &ParsedPrompt,
        intensity: i64,
    ) -> Result<TransformationResult, DeformationError> {
        let resolved = resolve(intensity)?;

        let contributions = Dimension::ALL
            .iter()
            .map(|dimension| self.contribute(profile, parsed, &resolved, *dimension))
            .collect::<Result<Vec<_>, _>>()?;

        let mood_phrase = profile.mood_phrase(resolved.band).ok_or_else(|| {
            DeformationError::profile_incomplete(
                profile.name(),
                format!("no mood phrase for the {} band", resolved.band),
            )
        })?;

        let enhanced_prompt = compose(parsed, &mood_phrase, &contributions);

        debug!(
            character = profile.key(),
            intensity = resolved.level,
            band = %resolved.band,
            active_dimensions = contributions.iter().filter(|c| c.is_active()).count(),
            "Applied deformation operator"
        );

        Ok(TransformationResult {
            character: profile.name().to_string(),
            original_prompt: parsed.original.clone(),
            parsed: parsed.clone(),
            intensity: resolved.level,
            band: resolved.band,
            scale: resolved.scale,
            enhanced_prompt,
            dimension_contributions: contributions,
        })
    }
}

/// Operator with no overrides: every dimension comes straight from its tiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct TieredOperator;

impl DeformationOperator for TieredOperator {
    fn kind(&self) -> &'static str {
        TIERED_OPERATOR
    }
}

/// Standard dimension rule: dormant below the activation threshold, otherwise
/// the first `descriptor_count` descriptors of the band's tier.
pub fn tiered_contribution(
    profile: &CharacterProfile,
    resolved: &ResolvedIntensity,
    dimension: Dimension,
) -> Result<DimensionContribution, DeformationError> {
    let threshold = profile.activation(dimension);
    if !resolved.activates(threshold) {
        return Ok(DimensionContribution {
            dimension,
            fragment: String::new(),
            tier: None,
            descriptor_count: 0,
            rationale: format!(
                "{} dormant: scale {:.1} below activation {:.2}",
                dimension, resolved.scale, threshold
            ),
        });
    }

    let tier = profile.tier(dimension, resolved.band).ok_or_else(|| {
        DeformationError::profile_incomplete(
            profile.name(),
            format!("{} vocabulary has no {} tier", dimension, resolved.band),
        )
    })?;

    let count = resolved.descriptor_count(tier.len());
    let fragment = tier[..count].join(", ");

    Ok(DimensionContribution {
        dimension,
        fragment,
        tier: Some(resolved.band),
        descriptor_count: count,
        rationale: format!(
            "{} tier, {} of {} descriptors at scale {:.1}: {}",
            resolved.band,
            count,
            tier.len(),
            resolved.scale,
            profile.manifestation(dimension)
        ),
    })
}

/// Assemble the enhanced prompt.
///
/// `subject material, setting, chromatic. mood: base, phrase, temporal, spatial, emotional`
/// with empty parts skipped. Each part is trimmed with [`trim_clause`] before
/// joining, so separators never land next to the prompt's own punctuation.
pub fn compose(
    parsed: &ParsedPrompt,
    mood_phrase: &str,
    contributions: &[DimensionContribution],
) -> String {
    let fragment = |dimension: Dimension| -> &str {
        contributions
            .iter()
            .find(|c| c.dimension == dimension)
            .map(|c| c.fragment.as_str())
            .unwrap_or("")
    };

    let head = join_clauses(" ", [parsed.subject.as_str(), fragment(Dimension::Material)]);
    let body = join_clauses(
        ", ",
        [
            head.as_str(),
            parsed.setting.as_deref().unwrap_or(""),
            fragment(Dimension::Chromatic),
        ],
    );

    let mood = join_clauses(
        ", ",
        [
            parsed.base_mood.as_str(),
            mood_phrase,
            fragment(Dimension::Temporal),
            fragment(Dimension::Spatial),
            fragment(Dimension::Emotional),
        ],
    );

    if body.is_empty() {
        normalize_text(&format!("mood: {}", mood))
    } else {
        normalize_text(&format!("{}. mood: {}", body, mood))
    }
}

fn join_clauses<'a>(separator: &str, parts: impl IntoIterator<Item = &'a str>) -> String {
    parts
        .into_iter()
        .map(trim_clause)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Strip whitespace, leading separators and trailing clause punctuation from
/// one slot. Punctuation inside the slot is left alone.
pub fn trim_clause(clause: &str) -> &str {
    clause
        .trim_start_matches(|c: char| matches!(c, ',' | ';') || c.is_whitespace())
        .trim_end_matches(|c: char| CLAUSE_PUNCTUATION.contains(&c) || c.is_whitespace())
}

/// Collapse runs of whitespace and trim dangling trailing punctuation.
///
/// Text inside the prompt keeps its own spacing around punctuation.
pub fn normalize_text(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    trim_clause(&collapsed).to_string()
}
