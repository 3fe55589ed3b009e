//! Status toast widget.
//!
//! Renders the controller's status line as a single centered row. Expiry is
//! handled by the controller; this widget only draws what is current.

use crate::state::{StatusMessage, StatusVariant};
use crate::styles::theme;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Paragraph, Widget, Wrap};

/// Icon shown in front of the message.
pub fn variant_icon(variant: StatusVariant) -> &'static str {
    match variant {
        StatusVariant::Success => "\u{2714}", // ✔
        StatusVariant::Info => "\u{2139}",    // ℹ
        StatusVariant::Error => "\u{2718}",   // ✘
    }
}

fn variant_style(variant: StatusVariant) -> Style {
    let t = theme();
    match variant {
        StatusVariant::Success => t.success_style(),
        StatusVariant::Info => t.warning_style(),
        StatusVariant::Error => t.error_style(),
    }
}

/// Widget for the status line.
pub struct ToastWidget<'a> {
    status: &'a StatusMessage,
}

impl<'a> ToastWidget<'a> {
    pub fn new(status: &'a StatusMessage) -> Self {
        Self { status }
    }

    /// The text as drawn, icon included.
    pub fn line(&self) -> String {
        format!("{} {}", variant_icon(self.status.variant), self.status.text)
    }
}

impl Widget for ToastWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let paragraph = Paragraph::new(self.line())
            .style(variant_style(self.status.variant).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        paragraph.render(area, buf);
    }
}
