//! Integration test modules for UMPA
//!
//! - engine: builder, configuration, estimator selection
//! - analysis: track analysis end to end
//! - compare: comparison scenarios
//! - export: export formats through the engine
//! - history: persisted analysis history
//! - live: live sampling sessions

pub mod analysis;
pub mod compare;
pub mod engine;
pub mod export;
pub mod live;
