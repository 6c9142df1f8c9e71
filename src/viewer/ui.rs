//! Terminal waveform viewer.
//!
//! Draws the rasterized trace on a ratatui canvas, with the file's sample
//! count and value range underneath. The trace is re-rasterized when the
//! terminal is resized or the fade type changes.

use crate::config::DisplayConfig;
use crate::viewer::ViewerState;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{
    prelude::*,
    widgets::{
        canvas::{Canvas, Line as CanvasLine},
        Block, Borders, Paragraph,
    },
};
use std::io::{self, Stdout};
use std::time::Duration;

const FG: Color = Color::Rgb(220, 220, 220);
const HELP_FG: Color = Color::Rgb(110, 110, 110);

/// What a key press asks the viewer to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerAction {
    /// Show the next fade type
    NextFade,
    /// Leave the viewer
    Quit,
}

/// Maps a key press to a viewer action.
///
/// `n`, Space, Enter, Tab and → advance the fade; `q`, Escape and Ctrl+C quit.
pub fn action_for(key: KeyEvent) -> Option<ViewerAction> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(ViewerAction::Quit)
        }
        KeyCode::Char('q') | KeyCode::Esc => Some(ViewerAction::Quit),
        KeyCode::Char('n')
        | KeyCode::Char(' ')
        | KeyCode::Enter
        | KeyCode::Tab
        | KeyCode::Right => Some(ViewerAction::NextFade),
        _ => None,
    }
}

/// Interactive waveform viewer.
pub struct WaveformViewer {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    state: ViewerState,
    display: DisplayConfig,
    active: bool,
}

impl WaveformViewer {
    /// Creates the viewer and enters alternate screen mode.
    ///
    /// # Errors
    /// - If raw mode or the alternate screen cannot be entered
    pub fn new(state: ViewerState, display: DisplayConfig) -> anyhow::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, SetTitle(state.title()))?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            state,
            display,
            active: true,
        })
    }

    /// Runs the event loop until the user quits.
    ///
    /// # Errors
    /// - If drawing or event polling fails
    pub fn run(&mut self) -> anyhow::Result<()> {
        tracing::debug!("Viewer started: {}", self.state.title());
        let mut dirty = true;

        loop {
            if dirty {
                self.draw()?;
                dirty = false;
            }

            if !event::poll(Duration::from_millis(50))? {
                continue;
            }

            match event::read()? {
                Event::Key(key) => match action_for(key) {
                    Some(ViewerAction::Quit) => {
                        tracing::debug!("Viewer closed");
                        break;
                    }
                    Some(ViewerAction::NextFade) => {
                        self.state.next_variant();
                        let title = self.state.title();
                        execute!(self.terminal.backend_mut(), SetTitle(title))?;
                        dirty = true;
                    }
                    None => {}
                },
                Event::Resize(width, height) => {
                    tracing::debug!("Terminal resized to {}x{}", width, height);
                    dirty = true;
                }
                _ => {}
            }
        }

        self.cleanup()
    }

    /// Renders title, canvas, labels and help line.
    fn draw(&mut self) -> anyhow::Result<()> {
        let Self {
            terminal,
            state,
            display,
            ..
        } = self;

        let title = state.title();
        let labels = state.info_lines();
        let line_color = display.line_color();
        let background = display.background();
        let marker = display.marker;

        terminal.draw(|frame| {
            let [canvas_area, labels_area, help_area] = Layout::vertical([
                Constraint::Min(3),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .areas(frame.area());

            let block = Block::default()
                .title(format!(" {title} "))
                .borders(Borders::ALL)
                .style(Style::default().fg(FG));
            let inner = block.inner(canvas_area);
            frame.render_widget(block, canvas_area);

            let (per_col, per_row) = marker.resolution();
            let width = u32::from(inner.width) * per_col;
            let height = u32::from(inner.height) * per_row;
            let polyline = state.render(width, height);
            if polyline.is_empty() {
                tracing::trace!("Canvas collapsed to {width}x{height}, nothing to plot");
            }

            // Row 0 holds the minimum; flip so it is drawn at the top.
            let top = f64::from(height);
            let canvas = Canvas::default()
                .background_color(background)
                .marker(marker.marker())
                .x_bounds([0.0, f64::from(width)])
                .y_bounds([0.0, top])
                .paint(|ctx| {
                    for (from, to) in polyline.segments() {
                        ctx.draw(&CanvasLine {
                            x1: f64::from(from.x),
                            y1: top - f64::from(from.y),
                            x2: f64::from(to.x),
                            y2: top - f64::from(to.y),
                            color: line_color,
                        });
                    }
                });
            frame.render_widget(canvas, inner);

            let labels: Vec<Line> = labels.iter().map(|l| Line::raw(l.as_str())).collect();
            frame.render_widget(
                Paragraph::new(labels)
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(FG)),
                labels_area,
            );

            frame.render_widget(
                Paragraph::new("n/space next fade type, q/esc quit")
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(HELP_FG)),
                help_area,
            );
        })?;

        Ok(())
    }

    /// Restores the terminal. Safe to call more than once.
    fn cleanup(&mut self) -> anyhow::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        tracing::debug!("Viewer terminal cleanup complete");
        Ok(())
    }
}

impl Drop for WaveformViewer {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
