//! Profile documents: TOML on disk (or embedded) -> [`CharacterProfile`].
//!
//! The document layout is:
//!
//! ```toml
//! [character]
//! key = "endora"            # optional, defaults to the lowercased name
//! name = "Endora"
//! sensibility = "Aristocratic Supernatural Authority"
//! operator = "endora"       # optional, defaults to the key
//!
//! [dimensions.material]
//! activation = 0.1          # optional, defaults per dimension
//! manifestation = "Objects become precious"
//! [dimensions.material.tiers]
//! whisper = ["with subtle presence"]
//!
//! [mood]
//! whisper = "subtly observed"
//!
//! [palette]
//! fallback = "{color} rendered as a precious tone"
//! [palette.tones]
//! blue = "sapphire blue"
//!
//! [intensity_progression]
//! 0 = "No transformation"
//!
//! [examples]
//! whisper = "a coffee cup"
//! ```

pub mod builtin;

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::profile::{CharacterIdentity, CharacterProfile, DimensionVocabulary, Palette};
use crate::vocabulary::{Dimension, IntensityBand};

/// Errors raised while reading profile documents.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("profile document is not valid: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to read profile {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{dimension} activation must be within 0.0..=1.0, got {value}")]
    InvalidActivation { dimension: Dimension, value: f64 },

    #[error("intensity progression key '{0}' is not a level between 0 and 10")]
    InvalidProgressionLevel(String),
}

/// Which profile documents to load at startup.
#[derive(Debug, Clone)]
pub struct ProfileSources {
    /// Load the profiles compiled into this crate.
    pub include_builtin: bool,

    /// Directories scanned for `*.toml` profiles; later entries replace earlier ones with the same key.
    pub directories: Vec<PathBuf>,
}

impl Default for ProfileSources {
    fn default() -> Self {
        Self {
            include_builtin: true,
            directories: Vec::new(),
        }
    }
}

impl ProfileSources {
    /// Add a directory to scan.
    pub fn with_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.directories.push(dir.into());
        self
    }
}

/// A profile document that could not be loaded.
#[derive(Debug)]
pub struct ProfileFailure {
    /// Lowercased file stem, the key the document most likely meant.
    pub key: String,
    pub path: PathBuf,
    pub error: ProfileError,
}

/// Result of scanning every configured source.
///
/// A broken document only costs its own character; the rest still load.
#[derive(Debug, Default)]
pub struct LoadedProfiles {
    /// Successfully loaded profiles, ordered by key.
    pub profiles: Vec<CharacterProfile>,
    pub failures: Vec<ProfileFailure>,
}

/// Load every profile named by `sources`.
///
/// Unreadable directories and broken built-ins fail the whole load; a broken
/// document inside a directory is recorded in [`LoadedProfiles::failures`].
pub fn load_profiles(sources: &ProfileSources) -> Result<LoadedProfiles, ProfileError> {
    let mut by_key: BTreeMap<String, CharacterProfile> = BTreeMap::new();
    let mut failures = Vec::new();

    if sources.include_builtin {
        for profile in builtin::all()? {
            by_key.insert(profile.key().to_string(), profile);
        }
    }

    for dir in &sources.directories {
        for path in profile_paths(dir)? {
            let profile = match load_profile(&path) {
                Ok(profile) => profile,
                Err(error) => {
                    warn!(path = %path.display(), error = %error, "Skipping broken profile document");
                    failures.push(ProfileFailure {
                        key: file_key(&path),
                        path,
                        error,
                    });
                    continue;
                }
            };
            if by_key.contains_key(profile.key()) {
                info!(character = %profile.key(), dir = %dir.display(), "Profile overridden");
            }
            by_key.insert(profile.key().to_string(), profile);
        }
    }

    Ok(LoadedProfiles {
        profiles: by_key.into_values().collect(),
        failures,
    })
}

/// Load a single profile document from disk.
pub fn load_profile(path: &Path) -> Result<CharacterProfile, ProfileError> {
    let content = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let profile = CharacterProfile::from_toml_str(&content)?;
    info!(character = %profile.key(), path = %path.display(), "Loaded character profile");
    Ok(profile)
}

/// Load every `*.toml` document in `dir`, in file-name order. Any broken document fails the call.
pub fn load_profile_dir(dir: &Path) -> Result<Vec<CharacterProfile>, ProfileError> {
    profile_paths(dir)?.iter().map(|p| load_profile(p)).collect()
}

/// `*.toml` files in `dir`, sorted.
fn profile_paths(dir: &Path) -> Result<Vec<PathBuf>, ProfileError> {
    let io_error = |source| ProfileError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "toml") {
            paths.push(path);
        }
    }
    paths.sort();
    debug!(dir = %dir.display(), count = paths.len(), "Scanning profile directory");
    Ok(paths)
}

fn file_key(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().trim().to_lowercase())
        .unwrap_or_default()
}

impl CharacterProfile {
    /// Parse a profile document.
    pub fn from_toml_str(document: &str) -> Result<Self, ProfileError> {
        let document: ProfileDocument = toml::from_str(document)?;
        document.into_profile()
    }
}

// ============================================================================
// Document shape
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProfileDocument {
    character: CharacterSection,
    #[serde(default)]
    dimensions: DimensionsSection,
    #[serde(default)]
    mood: BandTable<String>,
    #[serde(default)]
    palette: PaletteSection,
    #[serde(default)]
    intensity_progression: BTreeMap<String, String>,
    #[serde(default)]
    examples: BandTable<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CharacterSection {
    key: Option<String>,
    name: String,
    sensibility: String,
    #[serde(default)]
    worldview: String,
    source: Option<String>,
    operator: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DimensionsSection {
    material: Option<DimensionSection>,
    spatial: Option<DimensionSection>,
    temporal: Option<DimensionSection>,
    chromatic: Option<DimensionSection>,
    emotional: Option<DimensionSection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DimensionSection {
    #[serde(default)]
    manifestation: String,
    activation: Option<f64>,
    #[serde(default)]
    tiers: BandTable<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PaletteSection {
    #[serde(default)]
    tones: BTreeMap<String, String>,
    fallback: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BandTable<T> {
    whisper: Option<T>,
    subtle: Option<T>,
    balanced: Option<T>,
    strong: Option<T>,
    saturation: Option<T>,
}

impl<T> Default for BandTable<T> {
    fn default() -> Self {
        Self {
            whisper: None,
            subtle: None,
            balanced: None,
            strong: None,
            saturation: None,
        }
    }
}

impl<T> BandTable<T> {
    fn into_map(self) -> BTreeMap<IntensityBand, T> {
        [
            (IntensityBand::Whisper, self.whisper),
            (IntensityBand::Subtle, self.subtle),
            (IntensityBand::Balanced, self.balanced),
            (IntensityBand::Strong, self.strong),
            (IntensityBand::Saturation, self.saturation),
        ]
        .into_iter()
        .filter_map(|(band, value)| value.map(|v| (band, v)))
        .collect()
    }
}

impl ProfileDocument {
    fn into_profile(self) -> Result<CharacterProfile, ProfileError> {
        let key = self
            .character
            .key
            .unwrap_or_else(|| self.character.name.clone())
            .trim()
            .to_lowercase();
        let operator = self.character.operator.unwrap_or_else(|| key.clone());

        let identity = CharacterIdentity {
            key,
            name: self.character.name,
            sensibility: self.character.sensibility,
            worldview: self.character.worldview.trim().to_string(),
            source: self.character.source,
            operator,
        };

        let mut profile = CharacterProfile::new(identity);

        let sections = [
            (Dimension::Material, self.dimensions.material),
            (Dimension::Spatial, self.dimensions.spatial),
            (Dimension::Temporal, self.dimensions.temporal),
            (Dimension::Chromatic, self.dimensions.chromatic),
            (Dimension::Emotional, self.dimensions.emotional),
        ];
        for (dimension, section) in sections {
            let Some(section) = section else { continue };
            let activation = section
                .activation
                .unwrap_or_else(|| dimension.default_activation());
            if !(0.0..=1.0).contains(&activation) {
                return Err(ProfileError::InvalidActivation {
                    dimension,
                    value: activation,
                });
            }
            profile.dimensions.insert(
                dimension,
                DimensionVocabulary {
                    manifestation: section.manifestation,
                    activation,
                    tiers: section.tiers.into_map(),
                },
            );
        }

        profile.mood_lexicon = self.mood.into_map();
        profile.examples = self.examples.into_map();
        profile.palette = Palette {
            tones: self
                .palette
                .tones
                .into_iter()
                .map(|(color, tone)| (color.to_lowercase(), tone))
                .collect(),
            fallback: self.palette.fallback,
        };

        for (level, description) in self.intensity_progression {
            let parsed = level
                .trim()
                .parse::<u8>()
                .ok()
                .filter(|l| *l <= 10)
                .ok_or_else(|| ProfileError::InvalidProgressionLevel(level.clone()))?;
            profile.intensity_progression.insert(parsed, description);
        }

        Ok(profile)
    }
}
