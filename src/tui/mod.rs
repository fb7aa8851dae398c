//! Ratatui-based terminal UI.
//!
//! The TUI provides a settings panel for choosing an indicator, chart style
//! and window, then renders the chart next to the key statistics. Every
//! change re-runs the pipeline; failures land in the status bar and the
//! dashboard keeps running.

use std::io;
use std::time::Duration;

use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

use crate::app::Selection;
use crate::app::pipeline::{DashboardView, run_pipeline};
use crate::catalog::IndicatorCatalog;
use crate::data::SeriesProvider;
use crate::domain::{ChartStyle, PercentChange, WindowSize};
use crate::error::AppError;
use crate::report::{DATA_SOURCE, format_change, format_raw_table, format_value};

mod plotters_chart;

use plotters_chart::DashboardChart;

const FIELD_COUNT: usize = 3;

/// Start the TUI.
pub fn run<P: SeriesProvider>(
    catalog: IndicatorCatalog,
    provider: P,
    selection: Selection,
) -> Result<(), AppError> {
    let mut app = App::new(catalog, provider, selection);
    app.refresh();

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::io(format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::io(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::io(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App<P> {
    catalog: IndicatorCatalog,
    provider: P,
    indicator_index: usize,
    style: ChartStyle,
    window: WindowSize,
    selected_field: usize,
    show_raw: bool,
    status: String,
    view: Option<DashboardView>,
}

impl<P: SeriesProvider> App<P> {
    fn new(catalog: IndicatorCatalog, provider: P, selection: Selection) -> Self {
        Self {
            catalog,
            provider,
            indicator_index: selection.indicator_index,
            style: selection.style,
            window: selection.window,
            selected_field: 0,
            show_raw: false,
            status: "Fetching FRED data...".to_string(),
            view: None,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::io(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::io(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::io(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => {
                self.selected_field = self.selected_field.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected_field + 1 < FIELD_COUNT {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(false),
            KeyCode::Right => self.adjust_field(true),
            KeyCode::Char('t') => {
                self.show_raw = !self.show_raw;
            }
            KeyCode::Char('r') => self.refresh(),
            _ => {}
        }
        false
    }

    fn adjust_field(&mut self, forward: bool) {
        match self.selected_field {
            0 => {
                if self.catalog.is_empty() {
                    return;
                }
                let n = self.catalog.len();
                self.indicator_index = if forward {
                    (self.indicator_index + 1) % n
                } else {
                    (self.indicator_index + n - 1) % n
                };
            }
            1 => {
                self.style = if forward { self.style.next() } else { self.style.prev() };
            }
            2 => {
                self.window = if forward { self.window.wider() } else { self.window.narrower() };
            }
            _ => return,
        }
        self.refresh();
    }

    /// Re-run the pipeline for the current selection. Errors become the
    /// status line; the previous chart is cleared so stale data is never shown.
    fn refresh(&mut self) {
        let Some(indicator) = self.catalog.get(self.indicator_index) else {
            self.view = None;
            self.status = "No indicator selected.".to_string();
            return;
        };

        let today = Local::now().date_naive();
        match run_pipeline(&self.provider, indicator, self.window, self.style, today) {
            Ok(view) => {
                self.status = format!(
                    "Loaded {} data points for {}",
                    view.series.len(),
                    indicator.name
                );
                self.view = Some(view);
            }
            Err(err) => {
                self.status = if err.is_no_data() {
                    format!("{err}. Please try another indicator.")
                } else {
                    err.to_string()
                };
                self.view = None;
            }
        }
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(5),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_settings(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let lines = vec![
            Line::from(Span::styled(
                "U.S. Economic Data Dashboard",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Key economic indicators from the Federal Reserve Economic Data (FRED).",
                Style::default().fg(Color::Gray),
            )),
        ];
        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(area);

        if self.show_raw {
            self.draw_raw_data(frame, chunks[0]);
        } else {
            self.draw_chart(frame, chunks[0]);
        }
        self.draw_stats(frame, chunks[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = self
            .view
            .as_ref()
            .map(|v| v.chart.title.clone())
            .unwrap_or_else(|| "Chart".to_string());
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(view) = &self.view else {
            let msg = Paragraph::new(self.status.as_str())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true });
            frame.render_widget(msg, inner);
            return;
        };

        frame.render_widget(DashboardChart { spec: &view.chart }, inner);
    }

    fn draw_raw_data(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Raw Data").borders(Borders::ALL);
        let body = self
            .view
            .as_ref()
            .map(|v| format_raw_table(&v.series))
            .unwrap_or_default();
        frame.render_widget(Paragraph::new(body).block(block), area);
    }

    fn draw_stats(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Key Statistics").borders(Borders::ALL);

        let Some(view) = &self.view else {
            frame.render_widget(Paragraph::new("-").block(block), area);
            return;
        };

        let stats = &view.stats;
        let delta_color = match stats.pct_change {
            PercentChange::Percent(v) if v > 0.0 => Color::Green,
            PercentChange::Percent(v) if v < 0.0 => Color::Red,
            _ => Color::Gray,
        };
        let label = Style::default().fg(Color::Gray);

        let lines = vec![
            Line::from(Span::styled(format!("Latest Value ({})", stats.latest_period), label)),
            Line::from(vec![
                Span::styled(
                    format!("{} {}", format_value(stats.latest_value), view.series.units),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(format_change(stats.pct_change), Style::default().fg(delta_color)),
            ]),
            Line::raw(""),
            Line::from(Span::styled("Minimum", label)),
            Line::raw(format!("{}  (Quarter: {})", format_value(stats.min_value), stats.min_period)),
            Line::from(Span::styled("Maximum", label)),
            Line::raw(format!("{}  (Quarter: {})", format_value(stats.max_value), stats.max_period)),
            Line::from(Span::styled("Average", label)),
            Line::raw(format_value(stats.mean_value)),
            Line::raw(""),
            Line::from(Span::styled(
                "About this Indicator",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::raw(view.indicator.description_or_default().to_string()),
        ];

        let p = Paragraph::new(Text::from(lines))
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(p, area);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let indicator = self
            .catalog
            .get(self.indicator_index)
            .map(|i| i.name.as_str())
            .unwrap_or("-");

        let items = vec![
            ListItem::new(format!("Economic Indicator: {indicator}")),
            ListItem::new(format!("Chart Type: {}", self.style.display_name())),
            ListItem::new(format!("Quarters: {}", self.window.quarters())),
        ];

        let list = List::new(items)
            .block(Block::default().title("Options").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  t raw data  r refresh  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
            Span::raw(" | "),
            Span::styled(DATA_SOURCE, Style::default().fg(Color::DarkGray)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}
