//! Picture screen: the current image filling the terminal.

use crate::image_store::ImageStore;
use crate::screens::screen_trait::{hit, Screen, ScreenAction, ScreenContext};
use crate::styles::theme;
use crate::widgets::{HalfBlockImage, PictureView, ToastWidget};
use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph};

const HINT: &str = "Click image to create new";

/// Shows the decoded image with a hint line underneath.
#[derive(Debug, Default)]
pub struct PictureScreen {
    view: PictureView,
    image_area: Option<Rect>,
}

impl PictureScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the image again, typically after a new one was published.
    pub fn reload(&mut self, store: &ImageStore) -> Result<()> {
        self.view.load(store)
    }

    pub fn is_loaded(&self) -> bool {
        self.view.is_loaded()
    }
}

impl Screen for PictureScreen {
    fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &ScreenContext) -> Result<()> {
        let t = theme();
        frame.render_widget(Block::default().style(t.background_style()), area);

        let status_height = u16::from(ctx.controller.status().is_some());
        let [image_area, status_area, hint_area] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(status_height),
            Constraint::Length(1),
        ])
        .areas(area);

        match self.view.pixels_for(image_area) {
            Some(pixels) => {
                frame.render_widget(
                    HalfBlockImage::new(pixels).background(t.background),
                    image_area,
                );
            }
            None => {
                let placeholder = Paragraph::new("No picture loaded")
                    .style(t.muted_style())
                    .alignment(Alignment::Center);
                frame.render_widget(placeholder, image_area);
            }
        }
        self.image_area = Some(image_area);

        if let Some(status) = ctx.controller.status() {
            frame.render_widget(ToastWidget::new(status), status_area);
        }

        let hint = Paragraph::new(HINT)
            .style(t.muted_style())
            .alignment(Alignment::Center);
        frame.render_widget(hint, hint_area);
        Ok(())
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ScreenContext) -> Result<ScreenAction> {
        let action = match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => ScreenAction::CreateNew,
                _ => ScreenAction::None,
            },
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Down(MouseButton::Left)
                    if hit(self.image_area, mouse.column, mouse.row) =>
                {
                    ScreenAction::CreateNew
                }
                _ => ScreenAction::None,
            },
            _ => ScreenAction::None,
        };
        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ControllerSettings, ModeController};
    use crossterm::event::{KeyEvent, KeyModifiers, MouseEvent};
    use std::time::Instant;
    use tempfile::TempDir;

    fn click(column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_enter_creates_new() {
        let temp_dir = TempDir::new().unwrap();
        let store = ImageStore::new(temp_dir.path().join("current_image.png"));
        let controller = ModeController::new(store, ControllerSettings::default(), Instant::now());
        let ctx = ScreenContext::new(&controller);

        let mut screen = PictureScreen::new();
        let enter = Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(
            screen.handle_event(&enter, &ctx).unwrap(),
            ScreenAction::CreateNew
        );
        let other = Event::Key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE));
        assert_eq!(screen.handle_event(&other, &ctx).unwrap(), ScreenAction::None);
    }

    #[test]
    fn test_click_only_inside_image_area() {
        let temp_dir = TempDir::new().unwrap();
        let store = ImageStore::new(temp_dir.path().join("current_image.png"));
        let controller = ModeController::new(store, ControllerSettings::default(), Instant::now());
        let ctx = ScreenContext::new(&controller);

        let mut screen = PictureScreen::new();
        // Nothing rendered yet, so there is nothing to click.
        assert_eq!(screen.handle_event(&click(1, 1), &ctx).unwrap(), ScreenAction::None);

        screen.image_area = Some(Rect::new(0, 0, 20, 10));
        assert_eq!(
            screen.handle_event(&click(1, 1), &ctx).unwrap(),
            ScreenAction::CreateNew
        );
        assert_eq!(screen.handle_event(&click(1, 11), &ctx).unwrap(), ScreenAction::None);
    }

    #[test]
    fn test_reload_missing_image_fails() {
        let temp_dir = TempDir::new().unwrap();
        let store = ImageStore::new(temp_dir.path().join("missing.png"));
        let mut screen = PictureScreen::new();
        assert!(screen.reload(&store).is_err());
        assert!(!screen.is_loaded());
    }
}
