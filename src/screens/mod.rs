//! Screens for the three display modes.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                      App                               │
//! │  ┌────────────────────────────────────────────────┐    │
//! │  │               Screen Router                    │    │
//! │  │  match controller.mode() {                     │    │
//! │  │    Picture     => picture.handle_event(...)    │    │
//! │  │    Generate    => generate.handle_event(...)   │    │
//! │  │    Screensaver => screensaver.render(...)      │    │
//! │  │  }                                             │    │
//! │  └────────────────────────────────────────────────┘    │
//! │                                                        │
//! │  ┌────────────────────────────────────────────────┐    │
//! │  │               Screen Trait                     │    │
//! │  │  - render(frame, area, context)                │    │
//! │  │  - handle_event(event, context) -> Action      │    │
//! │  └────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────┘
//! ```

pub mod generate;
pub mod picture;
pub mod screen_trait;
pub mod screensaver;

pub use generate::GenerateScreen;
pub use picture::PictureScreen;
pub use screen_trait::{Screen, ScreenAction, ScreenContext};
pub use screensaver::ScreensaverScreen;
