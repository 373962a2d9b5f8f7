/*
 * Bombsight Core - Trigger-Condition (Logic Bomb) Detection Engine
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Program models (points, values, branches, predicates) and
 *                  collaborator ports with in-memory reference adapters
 * - features/    : trigger_analysis (domain → infrastructure → application)
 * - config/      : Presets, validation, YAML I/O
 * - errors       : Engine error types
 *
 * A branch is reported when it
 * 1. compares environment-derived values (time, location, SMS, tainted input),
 * 2. gates a sensitive operation, directly or through other branches, and
 * 3. is not a sentinel / null check or library code.
 */

#![allow(clippy::new_without_default)] // Builders expose both new() and Default
#![allow(clippy::unnecessary_map_or)] // map_or style preference
#![allow(clippy::module_inception)] // Module naming intentional

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models and collaborator ports
pub mod shared;

/// Feature modules
pub mod features;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{ConfigError, Preset, TriggerConfig};
pub use errors::{TriggerError, TriggerResult};
pub use features::trigger_analysis::{
    TriggerDTO, TriggerDetector, TriggerDetectorBuilder, TriggerRecord, TriggerReport,
    TriggerReportDTO,
};
pub use shared::ports::{InMemoryProgram, PrefixLibraryFilter, ProgramBuilder, SignatureCatalog};
