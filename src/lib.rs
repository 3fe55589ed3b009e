//! genframe - a kiosk picture frame for AI generated pictures
//!
//! The frame shows the most recent picture, lets a visitor type a prompt to
//! create a new one with an external image generator, and blanks itself
//! after a period of inactivity.

// Core modules
pub mod app;
pub mod cli;
pub mod config;
pub mod image_store;
pub mod screens;
pub mod services;
pub mod state;
pub mod styles;
pub mod tui;
pub mod utils;
pub mod widgets;

// Re-exports for convenience
pub use config::Config;
pub use image_store::ImageStore;
pub use services::{GenerationJob, GenerationOutcome, GenerationRequest, GeneratorSettings};
pub use state::{Mode, ModeController};
