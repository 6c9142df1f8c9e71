//! Full-screen error view shown when a file cannot be opened in the viewer.

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Paragraph, Wrap},
};
use std::io::{self, Stdout};
use std::time::Duration;

const ERROR_BG: Color = Color::Rgb(160, 0, 0);
const ERROR_FG: Color = Color::Rgb(255, 255, 255);
const HINT_FG: Color = Color::Rgb(230, 180, 180);

/// Red error screen with a heading, the message, and a dismiss hint.
pub struct ErrorScreen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    active: bool,
}

impl ErrorScreen {
    /// Creates a new error screen and enters alternate screen mode.
    ///
    /// # Errors
    /// - If raw mode or the alternate screen cannot be entered
    pub fn new() -> anyhow::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(ErrorScreen {
            terminal,
            active: true,
        })
    }

    /// Shows `message` under `heading` until any key is pressed.
    ///
    /// # Errors
    /// - If terminal rendering or event polling fails
    pub fn show_error(&mut self, heading: &str, message: &str) -> anyhow::Result<()> {
        loop {
            self.terminal.draw(|frame| {
                let area = frame.area();
                frame.render_widget(Block::default().style(Style::default().bg(ERROR_BG)), area);

                let text_width = area.width * 8 / 10;
                let [_, body, _] = Layout::vertical([
                    Constraint::Fill(1),
                    Constraint::Length(6),
                    Constraint::Fill(1),
                ])
                .areas(area);
                let body = Rect {
                    x: area.x + (area.width - text_width) / 2,
                    width: text_width,
                    ..body
                };

                let lines = vec![
                    Line::styled(heading, Style::default().fg(ERROR_FG).bold()),
                    Line::default(),
                    Line::styled(message, Style::default().fg(ERROR_FG)),
                    Line::default(),
                    Line::styled("press any key to exit", Style::default().fg(HINT_FG)),
                ];
                let paragraph = Paragraph::new(lines)
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true })
                    .style(Style::default().bg(ERROR_BG));
                frame.render_widget(paragraph, body);
            })?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        break;
                    }
                }
            }
        }

        Ok(())
    }

    /// Restores the terminal. Safe to call more than once.
    ///
    /// # Errors
    /// - If terminal mode cannot be restored
    pub fn cleanup(&mut self) -> anyhow::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for ErrorScreen {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
