//! Presentation state for the frame.
//!
//! The frame is always in exactly one [`Mode`]. All mode changes go through
//! the [`ModeController`], which owns the single [`ControllerState`] value and
//! answers every event with a list of [`Effect`]s for the UI loop to carry out.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  activity, clicks, outcomes ┌──────────────────┐
//! │   App loop   │ ──────────────────────────▶ │  ModeController  │
//! │ (UI context) │ ◀────────── Effects ─────── │ (ControllerState)│
//! └──┬────────▲──┘                             └────────▲─────────┘
//!    │        │ oneshot outcome                         │ check_idle
//!    ▼        │ (try_recv each loop)                    │
//! ┌───────────┴──┐                             ┌────────┴─────────┐
//! │GenerationJob │                             │   IdleMonitor    │
//! │ (tokio task) │                             │  (30 s cadence)  │
//! └──────────────┘                             └──────────────────┘
//! ```

pub mod controller;
pub mod idle;

pub use controller::{ActivityResponse, ModeController};
pub use idle::IdleMonitor;

use crate::services::GenerationRequest;
use std::time::{Duration, Instant};

/// The three mutually exclusive presentation modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// The current image is shown full-screen.
    Picture,
    /// Prompt entry is active.
    Generate {
        /// Whether the "back to picture" button is offered.
        show_back: bool,
    },
    /// Display blanked after inactivity.
    Screensaver,
}

impl Mode {
    pub fn is_picture(&self) -> bool {
        matches!(self, Mode::Picture)
    }

    pub fn is_generate(&self) -> bool {
        matches!(self, Mode::Generate { .. })
    }

    pub fn is_screensaver(&self) -> bool {
        matches!(self, Mode::Screensaver)
    }

    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Picture => "picture",
            Mode::Generate { .. } => "generate",
            Mode::Screensaver => "screensaver",
        }
    }
}

/// Styling category of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusVariant {
    Info,
    Success,
    Error,
}

/// The transient status line on the prompt screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub variant: StatusVariant,
    /// When the message disappears on its own. `None` keeps it until replaced.
    pub expires_at: Option<Instant>,
}

impl StatusMessage {
    /// A message that stays until replaced.
    pub fn persistent(text: impl Into<String>, variant: StatusVariant) -> Self {
        Self {
            text: text.into(),
            variant,
            expires_at: None,
        }
    }

    /// A message that hides itself after `duration`.
    pub fn expiring(
        text: impl Into<String>,
        variant: StatusVariant,
        now: Instant,
        duration: Duration,
    ) -> Self {
        Self {
            text: text.into(),
            variant,
            expires_at: Some(now + duration),
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// Work the UI loop must carry out after a controller call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// The mode changed; redraw the matching screen.
    ModeChanged { from: Mode, to: Mode },
    /// Dispatch a generation job for this request.
    StartGeneration(GenerationRequest),
    /// A new status message is showing.
    StatusShown(StatusMessage),
    /// The status line was hidden.
    StatusCleared,
    /// The prompt input should be emptied.
    PromptCleared,
}

/// Timing constants for the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    /// Inactivity after which the screensaver may start.
    pub idle_threshold: Duration,
    /// How long transient status messages stay visible.
    pub status_timeout: Duration,
    /// Pause on the success message before switching to the new picture.
    pub success_delay: Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            idle_threshold: Duration::from_secs(300),
            status_timeout: Duration::from_secs(3),
            success_delay: Duration::from_secs(1),
        }
    }
}

/// State owned exclusively by the [`ModeController`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerState {
    pub mode: Mode,
    /// True only in [`Mode::Generate`]; at most one job runs while set.
    pub generation_in_progress: bool,
    pub last_activity: Instant,
    /// Mirror of `mode == Screensaver`.
    pub screensaver_armed: bool,
    pub status: Option<StatusMessage>,
    /// Scheduled switch to the picture after a successful generation.
    pub pending_picture_at: Option<Instant>,
}

impl ControllerState {
    /// Initial state: picture if one exists, otherwise prompt entry.
    pub fn initial(has_image: bool, now: Instant) -> Self {
        Self {
            mode: if has_image {
                Mode::Picture
            } else {
                Mode::Generate { show_back: false }
            },
            generation_in_progress: false,
            last_activity: now,
            screensaver_armed: false,
            status: None,
            pending_picture_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_mode_follows_image_presence() {
        let now = Instant::now();
        assert_eq!(ControllerState::initial(true, now).mode, Mode::Picture);
        assert_eq!(
            ControllerState::initial(false, now).mode,
            Mode::Generate { show_back: false }
        );
    }

    #[test]
    fn test_status_expiry() {
        let now = Instant::now();
        let msg = StatusMessage::expiring("hi", StatusVariant::Info, now, Duration::from_secs(3));
        assert!(!msg.is_expired(now));
        assert!(!msg.is_expired(now + Duration::from_secs(2)));
        assert!(msg.is_expired(now + Duration::from_secs(3)));

        let sticky = StatusMessage::persistent("working", StatusVariant::Info);
        assert!(!sticky.is_expired(now + Duration::from_secs(3600)));
    }
}
