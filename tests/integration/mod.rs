//! Integration Tests Module
//!
//! End-to-end tests for quizsmith: quiz extraction from realistic model
//! output, CASE generation from schedules, and schedule files on disk.

// Quiz extraction from model completions
mod extraction_test;

// CASE WHEN generation
mod sql_generation_test;

// Schedule file loading (YAML/TOML/JSON)
mod schedule_test;
