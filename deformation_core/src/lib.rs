//! # Deformation Core
//!
//! Applies a character's sensory logic to free-text image prompts at an
//! intensity from 0 (a whisper) to 10 (full saturation).
//!
//! A transformation is a single synchronous pass:
//! 1. **Lookup**: the character is found in the registry
//! 2. **Parse**: the prompt is split into subject, setting, mood and colors
//! 3. **Resolve**: the intensity is mapped to a band and a scale
//! 4. **Deform**: the character's operator fills all five dimensions from
//!    the same band and composes the enhanced prompt
//!
//! ```no_run
//! use deformation_core::DeformationEngine;
//!
//! let engine = DeformationEngine::with_builtin()?;
//! let result = engine.transform("endora", "a coffee cup", 7)?;
//! println!("{}", result.enhanced_prompt);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod engine;
pub mod error;
pub mod intensity;
pub mod operator;
pub mod parser;
pub mod registry;
pub mod result;

pub use engine::*;
pub use error::*;
pub use intensity::*;
pub use operator::*;
pub use parser::*;
pub use registry::*;
pub use result::*;
