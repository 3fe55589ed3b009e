//! Screensaver: a blank screen with a dim wake hint.
//!
//! Waking is handled by the controller before events reach any screen.

use crate::screens::screen_trait::{Screen, ScreenAction, ScreenContext};
use crate::styles::theme;
use anyhow::Result;
use crossterm::event::Event;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph};

const WAKE_HINT: &str = "Touch anywhere to wake";

#[derive(Debug, Default)]
pub struct ScreensaverScreen;

impl Screen for ScreensaverScreen {
    fn render(&mut self, frame: &mut Frame, area: Rect, _ctx: &ScreenContext) -> Result<()> {
        let t = theme();
        frame.render_widget(Block::default().style(t.background_style()), area);

        let [_, hint, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(area);
        frame.render_widget(
            Paragraph::new(WAKE_HINT)
                .style(t.muted_style())
                .alignment(Alignment::Center),
            hint,
        );
        Ok(())
    }

    fn handle_event(&mut self, _event: &Event, _ctx: &ScreenContext) -> Result<ScreenAction> {
        Ok(ScreenAction::None)
    }
}
