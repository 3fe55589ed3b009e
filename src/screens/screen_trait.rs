//! Screen trait and associated types.
//!
//! Every [`Mode`](crate::state::Mode) has one screen. Screens own their
//! widget state (prompt text, decoded picture, click areas) and translate
//! input into a [`ScreenAction`]; the app turns actions into controller calls.
//! All mode decisions stay in the controller.

use crate::state::ModeController;
use anyhow::Result;
use crossterm::event::Event;
use ratatui::layout::{Position, Rect};
use ratatui::Frame;

/// Read-only view of the controller handed to screens.
pub struct ScreenContext<'a> {
    /// The controller whose state is being drawn.
    pub controller: &'a ModeController,
}

impl<'a> ScreenContext<'a> {
    pub fn new(controller: &'a ModeController) -> Self {
        Self { controller }
    }

    /// Whether the back button should be offered.
    pub fn show_back(&self) -> bool {
        matches!(
            self.controller.mode(),
            crate::state::Mode::Generate { show_back: true }
        )
    }
}

/// Actions that a screen can return after handling an event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScreenAction {
    /// Nothing to do.
    #[default]
    None,
    /// Open the prompt screen.
    CreateNew,
    /// Submit the typed prompt.
    Submit(String),
    /// Return to the current picture.
    Back,
}

/// Trait for the per-mode screens.
pub trait Screen {
    /// Draw the screen into `area`.
    fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &ScreenContext) -> Result<()>;

    /// Handle an input event that the controller did not consume.
    fn handle_event(&mut self, event: &Event, ctx: &ScreenContext) -> Result<ScreenAction>;
}

/// Hit test for a click area recorded during the last render.
pub fn hit(area: Option<Rect>, column: u16, row: u16) -> bool {
    area.is_some_and(|rect| rect.contains(Position::new(column, row)))
}
