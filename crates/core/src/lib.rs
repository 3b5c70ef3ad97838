//! Quizsmith Core
//!
//! Error types and credential configuration shared by the quizsmith
//! workspace.
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `config` - Validated credential configuration (`GeneratorConfig`, `OcrConfig`)

pub mod config;
pub mod error;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Configuration ──────────────────────────────────────────────────────
pub use config::{
    ApiKey, GenerationParams, GeneratorConfig, GeneratorConfigBuilder, OcrConfig,
    OcrConfigBuilder,
};
