//! Core types for natural-language code generation.
//!
//! Provides the target-language registry ([`languages::Language`]), pure
//! system-prompt assembly ([`prompt`]), structural code validation
//! ([`validate`]), and output artifact writing ([`artifact`]). Nothing in
//! this crate touches the network; the LLM boundary lives in `nlc-gen`.

pub mod artifact;
pub mod languages;
pub mod prompt;
pub mod validate;

pub use artifact::write_artifact;
pub use languages::{Language, LanguageSpec, TargetKind, UnsupportedLanguageError};
pub use prompt::{PromptInputs, build_system_prompt, feedback_block};
pub use validate::{CompileContext, ValidationResult, validate};
