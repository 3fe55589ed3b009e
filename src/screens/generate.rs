//! Generate screen: prompt entry, submit button and progress.

use crate::screens::screen_trait::{hit, Screen, ScreenAction, ScreenContext};
use crate::styles::theme;
use crate::utils::TextInput;
use crate::widgets::{TextInputWidget, TextInputWidgetExt, ToastWidget};
use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind};
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

const TITLE: &str = "AI Picture Frame";
const INSTRUCTION: &str = "Type what you'd like to create:";
const PLACEHOLDER: &str = "e.g. a lighthouse at dusk, oil painting";
const SUBMIT_LABEL: &str = "Generate Image!";
const BUSY_LABEL: &str = "Generating...";
const BACK_LABEL: &str = "\u{2190} Back to Image";
const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

const CONTENT_WIDTH: u16 = 64;
const BUTTON_WIDTH: u16 = 24;

/// Prompt entry screen.
#[derive(Debug, Default)]
pub struct GenerateScreen {
    input: TextInput,
    spinner_frame: usize,
    submit_area: Option<Rect>,
    back_area: Option<Rect>,
}

impl GenerateScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prompt(&self) -> &str {
        self.input.text()
    }

    pub fn clear_prompt(&mut self) {
        self.input.clear();
    }

    fn submit(&self) -> ScreenAction {
        ScreenAction::Submit(self.input.text().to_string())
    }
}

fn centered(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

fn button(label: &str, style: Style) -> Paragraph<'_> {
    Paragraph::new(label)
        .style(style)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(style),
        )
}

impl Screen for GenerateScreen {
    fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &ScreenContext) -> Result<()> {
        let t = theme();
        let generating = ctx.controller.is_generating();
        let show_back = ctx.show_back();

        frame.render_widget(Block::default().style(t.background_style()), area);

        let [_, title, _, instruction, input, _, submit, progress, status, _, back, _] =
            Layout::vertical([
                Constraint::Fill(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Length(if show_back { 3 } else { 0 }),
                Constraint::Fill(1),
            ])
            .areas(area);

        frame.render_widget(
            Paragraph::new(TITLE)
                .style(t.title_style())
                .alignment(Alignment::Center),
            title,
        );
        frame.render_widget(
            Paragraph::new(INSTRUCTION)
                .style(t.text_style())
                .alignment(Alignment::Center),
            instruction,
        );

        let input_widget = TextInputWidget::new(&self.input)
            .placeholder(PLACEHOLDER)
            .focused(!generating)
            .disabled(generating);
        frame.render_text_input_widget(input_widget, centered(input, CONTENT_WIDTH));

        let submit_area = centered(submit, BUTTON_WIDTH);
        let label = if generating { BUSY_LABEL } else { SUBMIT_LABEL };
        frame.render_widget(button(label, t.button_style(!generating)), submit_area);
        self.submit_area = Some(submit_area);

        if generating {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER.len();
            frame.render_widget(
                Paragraph::new(SPINNER[self.spinner_frame])
                    .style(t.warning_style())
                    .alignment(Alignment::Center),
                progress,
            );
        }

        if let Some(message) = ctx.controller.status() {
            frame.render_widget(ToastWidget::new(message), centered(status, CONTENT_WIDTH));
        }

        self.back_area = if show_back {
            let back_area = centered(back, BUTTON_WIDTH);
            frame.render_widget(button(BACK_LABEL, t.secondary_button_style()), back_area);
            Some(back_area)
        } else {
            None
        };
        Ok(())
    }

    fn handle_event(&mut self, event: &Event, ctx: &ScreenContext) -> Result<ScreenAction> {
        let generating = ctx.controller.is_generating();
        let action = match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Enter => self.submit(),
                KeyCode::Esc if ctx.show_back() => ScreenAction::Back,
                code if !generating => {
                    self.input.handle_key(code);
                    ScreenAction::None
                }
                _ => ScreenAction::None,
            },
            Event::Paste(text) if !generating => {
                text.chars().for_each(|c| self.input.insert_char(c));
                ScreenAction::None
            }
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) => {
                    if hit(self.submit_area, mouse.column, mouse.row) {
                        self.submit()
                    } else if hit(self.back_area, mouse.column, mouse.row) {
                        ScreenAction::Back
                    } else {
                        ScreenAction::None
                    }
                }
                _ => ScreenAction::None,
            },
            _ => ScreenAction::None,
        };
        Ok(action)
    }
}
