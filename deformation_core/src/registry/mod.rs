//! Character Registry - name -> (profile, operator).
//!
//! A [`CharacterRegistry`] is immutable once built. [`SharedRegistry`] holds
//! the current one and replaces it wholesale on reload.

use character_profiles::{load_profiles, CharacterProfile, ProfileError, ProfileSources};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

use crate::error::DeformationError;
use crate::operator::{
    DeformationOperator, EndoraOperator, TieredOperator, ENDORA_OPERATOR, TIERED_OPERATOR,
};

/// A profile together with the operator that renders it.
#[derive(Clone)]
pub struct RegisteredCharacter {
    pub profile: Arc<CharacterProfile>,
    pub operator: Arc<dyn DeformationOperator>,
}

impl std::fmt::Debug for RegisteredCharacter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredCharacter")
            .field("character", &self.profile.key())
            .field("operator", &self.operator.kind())
            .finish()
    }
}

/// Operator implementation for a profile's operator kind.
pub fn operator_for_kind(kind: &str) -> Option<Arc<dyn DeformationOperator>> {
    match kind {
        ENDORA_OPERATOR => Some(Arc::new(EndoraOperator)),
        TIERED_OPERATOR => Some(Arc::new(TieredOperator)),
        _ => None,
    }
}

/// Registered characters keyed by lowercase key.
///
/// Characters whose profile could not be bound are kept as unavailable, so
/// calls for them fail with `ProfileIncomplete` instead of the whole load failing.
#[derive(Debug, Default, Clone)]
pub struct CharacterRegistry {
    characters: BTreeMap<String, RegisteredCharacter>,
    unavailable: BTreeMap<String, String>,
}

impl CharacterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry of the built-in profiles.
    pub fn with_builtin() -> Result<Self, ProfileError> {
        Self::load(&ProfileSources::default())
    }

    /// Load every configured profile source and register the result.
    ///
    /// Only unreadable sources fail; broken documents and unknown operator
    /// kinds leave their character unavailable.
    pub fn load(sources: &ProfileSources) -> Result<Self, ProfileError> {
        let loaded = load_profiles(sources)?;
        let mut registry = Self::from_profiles(loaded.profiles);
        for failure in loaded.failures {
            registry.mark_unavailable(&failure.key, failure.error.to_string());
        }
        Ok(registry)
    }

    /// Register each profile in turn; profiles that cannot be bound are marked unavailable.
    pub fn from_profiles(profiles: impl IntoIterator<Item = CharacterProfile>) -> Self {
        let mut registry = Self::new();
        for profile in profiles {
            let key = profile.key().to_lowercase();
            if let Err(err) = registry.register(profile) {
                let detail = match err {
                    DeformationError::ProfileIncomplete { detail, .. } => detail,
                    other => other.to_string(),
                };
                registry.mark_unavailable(&key, detail);
            }
        }
        registry
    }

    /// Record that `key` exists but cannot be served.
    ///
    /// Ignored when a working profile is already registered under the key.
    pub fn mark_unavailable(&mut self, key: &str, detail: impl Into<String>) {
        let key = key.trim().to_lowercase();
        if key.is_empty() || self.characters.contains_key(&key) {
            return;
        }
        let detail = detail.into();
        warn!(character = %key, detail = %detail, "Character unavailable");
        self.unavailable.insert(key, detail);
    }

    /// Keys of characters that failed to load, sorted.
    pub fn unavailable(&self) -> Vec<String> {
        self.unavailable.keys().cloned().collect()
    }

    /// Bind a profile to its operator.
    ///
    /// Validation issues are logged, not rejected; calls that need the
    /// missing data fail later with `ProfileIncomplete`.
    pub fn register(&mut self, profile: CharacterProfile) -> Result<(), DeformationError> {
        let operator = operator_for_kind(&profile.identity.operator).ok_or_else(|| {
            DeformationError::profile_incomplete(
                profile.name(),
                format!("unknown operator kind '{}'", profile.identity.operator),
            )
        })?;

        for issue in profile.validate() {
            warn!(character = profile.key(), issue = %issue, "Character profile incomplete");
        }

        let key = profile.key().to_lowercase();
        self.unavailable.remove(&key);
        self.characters.insert(
            key,
            RegisteredCharacter {
                profile: Arc::new(profile),
                operator,
            },
        );
        Ok(())
    }

    /// Look a character up by key or display name, ignoring case.
    pub fn get(&self, name: &str) -> Result<RegisteredCharacter, DeformationError> {
        let wanted = name.trim().to_lowercase();
        self.characters
            .get(&wanted)
            .or_else(|| {
                self.characters
                    .values()
                    .find(|c| c.profile.name().to_lowercase() == wanted)
            })
            .cloned()
            .ok_or_else(|| match self.unavailable.get(&wanted) {
                Some(detail) => DeformationError::ProfileIncomplete {
                    character: name.trim().to_string(),
                    detail: detail.clone(),
                },
                None => DeformationError::UnknownCharacter {
                    name: name.to_string(),
                    available: self.keys(),
                },
            })
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        self.characters.keys().cloned().collect()
    }

    /// Registered profiles in key order.
    pub fn profiles(&self) -> impl Iterator<Item = &CharacterProfile> {
        self.characters.values().map(|c| c.profile.as_ref())
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}

/// The current registry, replaceable while callers keep their snapshots.
#[derive(Debug)]
pub struct SharedRegistry {
    current: RwLock<Arc<CharacterRegistry>>,
}

impl SharedRegistry {
    pub fn new(registry: CharacterRegistry) -> Self {
        Self {
            current: RwLock::new(Arc::new(registry)),
        }
    }

    /// The registry as of now. Later swaps do not affect it.
    pub fn snapshot(&self) -> Arc<CharacterRegistry> {
        // The slot only ever holds a complete registry, so a poisoned lock is still usable.
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&*guard)
    }

    /// Swap in a new registry.
    pub fn replace(&self, registry: CharacterRegistry) {
        let characters = registry.len();
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::new(registry);
        info!(characters, "Character registry replaced");
    }
}

impl Default for SharedRegistry {
    fn default() -> Self {
        Self::new(CharacterRegistry::new())
    }
}
