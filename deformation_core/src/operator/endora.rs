//! Endora: aristocratic supernatural authority.
//!
//! Beyond the shared tiers, Endora treats what the prompt names one by one:
//! colors are re-voiced through her palette, objects gain material weight and
//! the action slows into deliberate time.

use character_profiles::{CharacterProfile, Dimension, IntensityBand};

use super::{tiered_contribution, DeformationOperator, DimensionContribution};
use crate::error::DeformationError;
use crate::intensity::ResolvedIntensity;
use crate::parser::ParsedPrompt;

/// Operator kind bound by the Endora profile.
pub const ENDORA_OPERATOR: &str = "endora";

/// Band from which remapped colors are rendered as saturated.
const SATURATED_FROM: IntensityBand = IntensityBand::Strong;

#[derive(Debug, Clone, Copy, Default)]
pub struct EndoraOperator;

/// One prompt word and what Endora made of it.
struct Treatment {
    word: String,
    rendered: String,
    note: Option<&'static str>,
}

impl EndoraOperator {
    fn remap_colors(&self, profile: &CharacterProfile, parsed: &ParsedPrompt, band: IntensityBand) -> Vec<Treatment> {
        parsed
            .colors
            .iter()
            .map(|color| {
                let tone = profile.palette.tone_for(color);
                Treatment {
                    word: color.clone(),
                    rendered: if band >= SATURATED_FROM {
                        format!("saturated {}", tone)
                    } else {
                        tone
                    },
                    note: (!profile.palette.has_tone(color)).then_some("fallback"),
                }
            })
            .collect()
    }

    fn treat_objects(&self, parsed: &ParsedPrompt, band: IntensityBand) -> Vec<Treatment> {
        parsed
            .objects
            .iter()
            .filter_map(|object| {
                let rendered = match band {
                    IntensityBand::Whisper => return None,
                    IntensityBand::Subtle | IntensityBand::Balanced => {
                        format!("{} with clear material intention", object)
                    }
                    IntensityBand::Strong => format!("precious {} rendered with material precision", object),
                    IntensityBand::Saturation => format!("exquisitely crafted {}", object),
                };
                Some(Treatment {
                    word: object.clone(),
                    rendered,
                    note: None,
                })
            })
            .collect()
    }

    fn slow_action(&self, parsed: &ParsedPrompt, band: IntensityBand) -> Vec<Treatment> {
        let Some(action) = &parsed.action else {
            return Vec::new();
        };
        let rendered = match band {
            IntensityBand::Whisper => return Vec::new(),
            IntensityBand::Subtle => format!("{} slightly paused in time", action),
            IntensityBand::Balanced => format!("{} with deliberate weighted motion", action),
            IntensityBand::Strong => format!("{} with extreme temporal deliberation", action),
            IntensityBand::Saturation => format!("{} outside normal temporal flow", action),
        };
        vec![Treatment {
            word: action.clone(),
            rendered,
            note: None,
        }]
    }
}

/// Merge treatments into an active contribution, before or after the tier descriptors.
fn merge(contribution: &mut DimensionContribution, treatments: Vec<Treatment>, leading: bool, label: &str) {
    if treatments.is_empty() {
        return;
    }

    let rendered: Vec<&str> = treatments.iter().map(|t| t.rendered.as_str()).collect();
    let mut parts: Vec<&str> = Vec::with_capacity(rendered.len() + 1);
    if leading {
        parts.extend(&rendered);
        parts.push(&contribution.fragment);
    } else {
        parts.push(&contribution.fragment);
        parts.extend(&rendered);
    }
    let fragment = parts
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    let notes = treatments
        .iter()
        .map(|t| match t.note {
            Some(note) => format!("{} -> {} ({})", t.word, t.rendered, note),
            None => format!("{} -> {}", t.word, t.rendered),
        })
        .collect::<Vec<_>>()
        .join(", ");

    contribution.fragment = fragment;
    contribution.descriptor_count += treatments.len();
    contribution.rationale = format!("{}; {}: {}", contribution.rationale, label, notes);
}

impl DeformationOperator for EndoraOperator {
    fn kind(&self) -> &'static str {
        ENDORA_OPERATOR
    }

    fn contribute(
        &self,
        profile: &CharacterProfile,
        parsed: &ParsedPrompt,
        resolved: &ResolvedIntensity,
        dimension: Dimension,
    ) -> Result<DimensionContribution, DeformationError> {
        let mut contribution = tiered_contribution(profile, resolved, dimension)?;
        if !contribution.is_active() {
            return Ok(contribution);
        }

        let band = resolved.band;
        match dimension {
            Dimension::Chromatic => {
                merge(&mut contribution, self.remap_colors(profile, parsed, band), true, "palette remap")
            }
            Dimension::Material => {
                merge(&mut contribution, self.treat_objects(parsed, band), false, "object treatment")
            }
            Dimension::Temporal => {
                merge(&mut contribution, self.slow_action(parsed, band), true, "action timing")
            }
            Dimension::Spatial | Dimension::Emotional => {}
        }
        Ok(contribution)
    }
}
