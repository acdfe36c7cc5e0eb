//! # Character Profiles
//!
//! The "Character Bible" crate - static sensory vocabularies, palettes and
//! scaling rules for every character the deformation engine can apply.
//! This crate owns the profile document format and loader; it contains no
//! transformation logic.

pub mod loader;
pub mod profile;
pub mod vocabulary;

pub use loader::*;
pub use profile::*;
pub use vocabulary::*;
