//! Character palette: how plain color words are re-voiced.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Placeholder replaced by the original color word in the fallback template.
pub const COLOR_PLACEHOLDER: &str = "{color}";

/// Maps plain color words onto a character's own tones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Palette {
    /// Lowercase color word -> character tone.
    pub tones: BTreeMap<String, String>,
    /// Template for colors without an explicit tone, e.g. `"{color} rendered as a precious tone"`.
    pub fallback: Option<String>,
}

impl Palette {
    /// Tone for `color`, falling back to the template, then to the color itself.
    pub fn tone_for(&self, color: &str) -> String {
        let key = color.to_lowercase();
        if let Some(tone) = self.tones.get(&key) {
            return tone.clone();
        }
        match &self.fallback {
            Some(template) => template.replace(COLOR_PLACEHOLDER, &key),
            None => key,
        }
    }

    /// Whether the palette has an explicit tone for `color`.
    pub fn has_tone(&self, color: &str) -> bool {
        self.tones.contains_key(&color.to_lowercase())
    }
}
