//! Transformation results and the reports built from them.

use character_profiles::{Dimension, IntensityBand};
use serde::{Deserialize, Serialize};

use crate::intensity::MAX_INTENSITY;
use crate::operator::{normalize_text, trim_clause, DimensionContribution};
use crate::parser::ParsedPrompt;

/// Everything one transformation produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformationResult {
    /// Display name of the character.
    pub character: String,
    pub original_prompt: String,
    pub parsed: ParsedPrompt,
    pub intensity: u8,
    pub band: IntensityBand,
    pub scale: f64,
    pub enhanced_prompt: String,
    /// One entry per dimension, in canonical order.
    pub dimension_contributions: Vec<DimensionContribution>,
}

/// Outcome of [`TransformationResult::coherence`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoherenceReport {
    pub is_coherent: bool,
    pub checks_passed: Vec<String>,
    pub checks_failed: Vec<String>,
    pub warnings: Vec<String>,
}

impl TransformationResult {
    /// Contribution of a single dimension.
    pub fn contribution(&self, dimension: Dimension) -> Option<&DimensionContribution> {
        self.dimension_contributions
            .iter()
            .find(|c| c.dimension == dimension)
    }

    /// Dimensions that contributed a fragment.
    pub fn active_dimensions(&self) -> Vec<Dimension> {
        self.dimension_contributions
            .iter()
            .filter(|c| c.is_active())
            .map(|c| c.dimension)
            .collect()
    }

    /// The whole result as pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Prompt text ready for an image generator.
    pub fn format_for_generation(&self, include_metadata: bool) -> String {
        if include_metadata {
            format!(
                "{}\n[{} operator, intensity {}/{}]",
                self.enhanced_prompt, self.character, self.intensity, MAX_INTENSITY
            )
        } else {
            self.enhanced_prompt.clone()
        }
    }

    /// Human-readable report of the transformation.
    pub fn report(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!("# {} transformation\n\n", self.character));
        out.push_str(&format!(
            "**Intensity:** {}/{} ({}, scale {:.1})\n",
            self.intensity, MAX_INTENSITY, self.band, self.scale
        ));
        out.push_str(&format!("**Original:** {}\n", self.original_prompt));
        out.push_str(&format!("**Enhanced:** {}\n\n", self.enhanced_prompt));

        out.push_str("## Parsed\n");
        out.push_str(&format!("- subject: {}\n", self.parsed.subject));
        out.push_str(&format!(
            "- setting: {}\n",
            self.parsed.setting.as_deref().unwrap_or("(none)")
        ));
        out.push_str(&format!("- mood: {}\n", self.parsed.base_mood));
        if let Some(action) = &self.parsed.action {
            out.push_str(&format!("- action: {}\n", action));
        }
        if !self.parsed.objects.is_empty() {
            out.push_str(&format!("- objects: {}\n", self.parsed.objects.join(", ")));
        }
        if !self.parsed.colors.is_empty() {
            out.push_str(&format!("- colors: {}\n", self.parsed.colors.join(", ")));
        }
        out.push('\n');

        out.push_str("## Dimensions\n");
        for contribution in &self.dimension_contributions {
            let fragment = if contribution.fragment.is_empty() {
                "(dormant)"
            } else {
                contribution.fragment.as_str()
            };
            out.push_str(&format!("- **{}**: {}\n", contribution.dimension, fragment));
            out.push_str(&format!("  - {}\n", contribution.rationale));
        }

        out
    }

    /// Check the result against the unified scaling rules.
    pub fn coherence(&self) -> CoherenceReport {
        let mut passed = Vec::new();
        let mut failed = Vec::new();
        let mut warnings = Vec::new();

        let dimensions: Vec<Dimension> = self
            .dimension_contributions
            .iter()
            .map(|c| c.dimension)
            .collect();
        if dimensions == Dimension::ALL {
            passed.push("all dimensions present in canonical order".to_string());
        } else {
            failed.push(format!(
                "dimensions out of order or missing: {:?}",
                dimensions
            ));
        }

        let mismatched: Vec<String> = self
            .dimension_contributions
            .iter()
            .filter(|c| c.tier.is_some_and(|tier| tier != self.band))
            .map(|c| c.dimension.to_string())
            .collect();
        if mismatched.is_empty() {
            passed.push(format!("every active dimension fired from the {} tier", self.band));
        } else {
            failed.push(format!(
                "dimensions not scaled with the {} band: {}",
                self.band,
                mismatched.join(", ")
            ));
        }

        if self.intensity <= MAX_INTENSITY && IntensityBand::for_level(self.intensity) == Some(self.band) {
            passed.push(format!("intensity {} within range", self.intensity));
        } else {
            failed.push(format!(
                "intensity {} does not match the {} band",
                self.intensity, self.band
            ));
        }

        let subject = trim_clause(&normalize_text(&self.parsed.subject)).to_lowercase();
        if self.enhanced_prompt.to_lowercase().contains(&subject) {
            passed.push("subject recognizable".to_string());
        } else {
            warnings.push(format!("subject '{}' not found verbatim in output", self.parsed.subject));
        }

        CoherenceReport {
            is_coherent: failed.is_empty(),
            checks_passed: passed,
            checks_failed: failed,
            warnings,
        }
    }
}
