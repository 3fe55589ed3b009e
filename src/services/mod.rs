//! Application services layer.
//!
//! Services encapsulate work that happens off the UI loop. The UI layer
//! starts them and polls their handles; they never touch UI state directly.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                   UI Layer                      │
//! │  (App, Screens, ModeController)                 │
//! └─────────────────────┬───────────────────────────┘
//!                       │ JobHandle (oneshot)
//!                       ▼
//! ┌─────────────────────────────────────────────────┐
//! │               Services Layer                    │
//! │  ┌───────────────────┐                          │
//! │  │ GenerationService │                          │
//! │  └───────────────────┘                          │
//! └─────────────────────┬───────────────────────────┘
//!                       │
//!                       ▼
//! ┌─────────────────────────────────────────────────┐
//! │             Infrastructure Layer                │
//! │  (ImageStore, external generator process)       │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod generation_service;

pub use generation_service::{
    EmptyPromptError, GenerationFailure, GenerationJob, GenerationOutcome, GenerationRequest,
    GenerationService, GeneratorSettings, JobHandle,
};
