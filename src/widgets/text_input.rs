//! Text input widget for rendering the prompt field.
//!
//! - Placeholder text when empty
//! - Disabled state while a generation runs
//! - Cursor positioning through [`TextInputWidgetExt`]

use crate::styles::theme;
use crate::utils::text_input::TextInput;
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

/// A widget for rendering a [`TextInput`].
pub struct TextInputWidget<'a> {
    input: &'a TextInput,
    placeholder: Option<&'a str>,
    focused: bool,
    disabled: bool,
}

impl<'a> TextInputWidget<'a> {
    pub fn new(input: &'a TextInput) -> Self {
        Self {
            input,
            placeholder: None,
            focused: false,
            disabled: false,
        }
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Get the display text (actual text or placeholder).
    fn display_text(&self) -> &str {
        let text = self.input.text();
        if text.is_empty() {
            self.placeholder.unwrap_or("")
        } else {
            text
        }
    }

    fn text_style(&self) -> Style {
        let t = theme();
        if self.disabled || self.input.text().is_empty() {
            t.muted_style()
        } else {
            t.text_style()
        }
    }

    fn border_style(&self) -> Style {
        let t = theme();
        if self.focused && !self.disabled {
            t.border_focused_style()
        } else {
            t.border_style()
        }
    }

    fn create_block(&self) -> Block<'a> {
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Thick)
            .border_style(self.border_style())
    }
}

impl Widget for TextInputWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = self.create_block();
        let paragraph = Paragraph::new(self.display_text())
            .block(block)
            .alignment(Alignment::Center)
            .style(self.text_style());

        paragraph.render(area, buf);
    }
}

/// Render a [`TextInputWidget`] and place the terminal cursor when focused.
pub trait TextInputWidgetExt {
    fn render_text_input_widget(&mut self, widget: TextInputWidget, area: Rect);
}

impl TextInputWidgetExt for Frame<'_> {
    fn render_text_input_widget(&mut self, widget: TextInputWidget, area: Rect) {
        let show_cursor = widget.focused && !widget.disabled;
        let text = widget.input.text();
        let cursor_pos = widget.input.cursor().min(text.chars().count());
        let text_width = text.chars().count() as u16;

        let inner = widget.create_block().inner(area);
        self.render_widget(widget, area);

        if show_cursor {
            // Text is centered, so the cursor is offset by the left padding.
            let left = inner.x + inner.width.saturating_sub(text_width) / 2;
            let x = (left + cursor_pos as u16).min(inner.x + inner.width.saturating_sub(1));
            self.set_cursor_position((x, inner.y));
        }
    }
}
