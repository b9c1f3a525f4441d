//! Application state, event loop, and terminal lifecycle.
//!
//! The shell owns the [`Session`] and dispatches key-bound actions against
//! it. Loading runs on a background `std::thread` and reports back over an
//! `mpsc` channel; the main loop installs the resulting table only after it
//! receives the completion message, so the table never changes hands outside
//! the channel.

use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Block, Borders, Chart, Clear, Dataset, Gauge, GraphType, Paragraph, Wrap,
};
use ratatui::{Frame, Terminal};
use tracing::warn;

use super::events::{AppAction, KeyBindings};
use super::msg::WorkerMsg;
use super::theme::Theme;
use super::TuiResult;
use crate::projector::Projection;
use crate::report::export_pdf;
use crate::session::{self, Session};

/// What the path prompt is collecting a path for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PathAction {
    LoadCsv,
    SaveReport,
}

/// Current input mode of the shell.
#[derive(Debug)]
enum Mode {
    /// Normal key-bound browsing.
    Browse,
    /// Collecting a file path in the prompt line.
    PathInput { action: PathAction, buffer: String },
    /// Blocking modal notice; any key dismisses it.
    Notice {
        title: String,
        body: String,
        error: bool,
    },
}

/// Color tone of the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Info,
    Busy,
    Ok,
    Err,
}

/// Main shell application.
pub struct App {
    session: Session,
    bindings: KeyBindings,
    theme: Theme,
    mode: Mode,
    /// Display copy of the latest projection; the projector itself never
    /// caches, the shell just keeps what it last drew.
    projection: Option<Projection>,
    /// Load progress in [0, 1] while a worker is running.
    progress: Option<f64>,
    status: (String, Tone),
    worker: Option<Receiver<WorkerMsg>>,
    should_quit: bool,
}

impl App {
    pub fn new(session: Session) -> Self {
        let theme = Theme::new(session.theme());
        Self {
            session,
            bindings: KeyBindings::default(),
            theme,
            mode: Mode::Browse,
            projection: None,
            progress: None,
            status: ("Ready to begin analysis. Press l to load a CSV.".into(), Tone::Info),
            worker: None,
            should_quit: false,
        }
    }

    fn set_status(&mut self, text: impl Into<String>, tone: Tone) {
        self.status = (text.into(), tone);
    }

    fn notice(&mut self, title: &str, body: impl Into<String>, error: bool) {
        self.mode = Mode::Notice {
            title: title.to_string(),
            body: body.into(),
            error,
        };
    }

    // ----- worker handoff -----

    fn start_load(&mut self, raw_path: String) {
        let path = PathBuf::from(raw_path.trim());
        let seed = self.session.seed();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let progress_tx = tx.clone();
            let result = session::load_labeled(&path, seed, move |fraction| {
                let _ = progress_tx.send(WorkerMsg::Progress(fraction));
            });
            let _ = tx.send(WorkerMsg::Loaded(result));
        });
        self.worker = Some(rx);
        self.progress = Some(0.0);
        self.set_status("Loading data...", Tone::Busy);
    }

    /// Apply any pending worker messages. The table is only installed here,
    /// on the main thread, after `Loaded` arrives.
    fn drain_worker(&mut self) {
        let Some(rx) = self.worker.take() else {
            return;
        };
        let mut finished = false;
        loop {
            match rx.try_recv() {
                Ok(WorkerMsg::Progress(fraction)) => self.progress = Some(fraction),
                Ok(WorkerMsg::Loaded(Ok(table))) => {
                    let total = table.n_rows();
                    self.session.install_table(table);
                    self.projection = None;
                    self.set_status(format!("Data loaded: {total} transactions."), Tone::Ok);
                    self.notice("Success", "Data processed successfully!", false);
                    finished = true;
                }
                Ok(WorkerMsg::Loaded(Err(err))) => {
                    warn!(error = %err, "load failed");
                    self.set_status("Load failed.", Tone::Err);
                    self.notice("Error", err.to_string(), true);
                    finished = true;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    finished = true;
                    break;
                }
            }
        }
        if finished {
            self.progress = None;
        } else {
            self.worker = Some(rx);
        }
    }

    // ----- actions -----

    fn do_analyze(&mut self) {
        match self.session.analyze() {
            None => self.notice("Error", "Please load transaction data first!", true),
            Some(Ok(projection)) => {
                self.set_status(
                    format!("Analysis complete: {} points projected.", projection.len()),
                    Tone::Ok,
                );
                self.projection = Some(projection);
            }
            Some(Err(err)) => {
                warn!(error = %err, "analysis failed");
                self.set_status("Analysis failed.", Tone::Err);
                self.notice("Error", err.to_string(), true);
            }
        }
    }

    fn do_report(&mut self, raw_path: String) {
        let mut path = PathBuf::from(raw_path.trim());
        if path.extension().map_or(true, |ext| ext != "pdf") {
            path.set_extension("pdf");
        }
        let projection = self.projection.clone().unwrap_or_default();
        let result = self
            .session
            .table()
            .map(|table| export_pdf(table, &projection, self.theme.mode, &path));
        match result {
            None => self.notice("Error", "No data available for report!", true),
            Some(Ok(())) => {
                self.set_status(format!("Report saved to {}.", path.display()), Tone::Ok);
                self.notice("Success", "Report generated successfully!", false);
            }
            Some(Err(err)) => {
                warn!(error = %err, "report export failed");
                self.set_status("Report failed.", Tone::Err);
                self.notice("Error", err.to_string(), true);
            }
        }
    }

    fn toggle_theme(&mut self) {
        let mode = self.session.toggle_theme();
        self.theme = Theme::new(mode);
        self.set_status(format!("Theme: {mode:?}."), Tone::Info);
    }

    // ----- input -----

    fn on_key(&mut self, key: KeyEvent) {
        match &mut self.mode {
            Mode::Notice { .. } => {
                self.mode = Mode::Browse;
            }
            Mode::PathInput { action, buffer } => match key.code {
                KeyCode::Esc => {
                    self.mode = Mode::Browse;
                    self.set_status("Cancelled.", Tone::Info);
                }
                KeyCode::Enter => {
                    let action = *action;
                    let raw = std::mem::take(buffer);
                    self.mode = Mode::Browse;
                    if raw.trim().is_empty() {
                        self.set_status("Cancelled.", Tone::Info);
                    } else {
                        match action {
                            PathAction::LoadCsv => self.start_load(raw),
                            PathAction::SaveReport => self.do_report(raw),
                        }
                    }
                }
                KeyCode::Backspace => {
                    buffer.pop();
                }
                KeyCode::Char(c) => buffer.push(c),
                _ => {}
            },
            Mode::Browse => match self.bindings.action(&key) {
                AppAction::Load => {
                    if self.worker.is_some() {
                        self.set_status("A load is already running.", Tone::Busy);
                    } else {
                        self.mode = Mode::PathInput {
                            action: PathAction::LoadCsv,
                            buffer: String::new(),
                        };
                    }
                }
                AppAction::Analyze => self.do_analyze(),
                AppAction::Report => {
                    if self.session.table().is_none() {
                        self.notice("Error", "No data available for report!", true);
                    } else {
                        self.mode = Mode::PathInput {
                            action: PathAction::SaveReport,
                            buffer: String::new(),
                        };
                    }
                }
                AppAction::ToggleTheme => self.toggle_theme(),
                AppAction::Quit => self.should_quit = true,
                AppAction::None => {}
            },
        }
    }

    // ----- rendering -----

    fn draw(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(frame.size());

        self.draw_header(frame, chunks[0]);
        self.draw_stats(frame, chunks[1]);
        self.draw_chart(frame, chunks[2]);
        self.draw_prompt(frame, chunks[3]);
        self.draw_footer(frame, chunks[4]);

        if let Mode::Notice { title, body, error } = &self.mode {
            self.draw_notice(frame, title, body, *error);
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let header = Paragraph::new("FraudGuard — Transaction Analysis Dashboard")
            .style(self.theme.title())
            .block(Block::default().borders(Borders::ALL).style(self.theme.base()));
        frame.render_widget(header, area);
    }

    fn draw_stats(&self, frame: &mut Frame, area: Rect) {
        let line = match self.session.table() {
            Some(table) => {
                let stats = table.summary();
                format!(
                    "Total: {}    Fraud: {} ({:.1}%)    Columns: {}",
                    stats.total,
                    stats.fraud,
                    stats.fraud_pct,
                    table.n_columns()
                )
            }
            None => "No data loaded.".to_string(),
        };
        let stats = Paragraph::new(line)
            .style(self.theme.base())
            .block(Block::default().borders(Borders::ALL).style(self.theme.base()));
        frame.render_widget(stats, area);
    }

    fn draw_chart(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Fraud Pattern Analysis")
            .style(self.theme.base());

        let Some(projection) = &self.projection else {
            let hint = Paragraph::new(
                "No projection yet. Load a CSV (l), then analyze (a) to see the PCA scatter.\n\
                 Risk scores are synthetic uniform noise; the scatter shows structure of the\n\
                 feature columns only.",
            )
            .style(self.theme.status())
            .wrap(Wrap { trim: true })
            .block(block);
            frame.render_widget(hint, area);
            return;
        };

        let flags = self
            .session
            .table()
            .and_then(|t| t.fraud_flags())
            .unwrap_or(&[]);
        let mut normal: Vec<(f64, f64)> = Vec::new();
        let mut fraud: Vec<(f64, f64)> = Vec::new();
        for (i, &point) in projection.points.iter().enumerate() {
            if flags.get(i).copied().unwrap_or(false) {
                fraud.push(point);
            } else {
                normal.push(point);
            }
        }

        let (x_bounds, y_bounds) = axis_bounds(&projection.points);
        let datasets = vec![
            Dataset::default()
                .name("normal")
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(ratatui::style::Style::default().fg(self.theme.normal))
                .data(&normal),
            Dataset::default()
                .name("fraud")
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Scatter)
                .style(ratatui::style::Style::default().fg(self.theme.fraud))
                .data(&fraud),
        ];
        let chart = Chart::new(datasets)
            .block(block)
            .x_axis(
                Axis::default()
                    .title("PC1")
                    .style(self.theme.status())
                    .bounds([x_bounds.0, x_bounds.1])
                    .labels(axis_labels(x_bounds)),
            )
            .y_axis(
                Axis::default()
                    .title("PC2")
                    .style(self.theme.status())
                    .bounds([y_bounds.0, y_bounds.1])
                    .labels(axis_labels(y_bounds)),
            );
        frame.render_widget(chart, area);
    }

    fn draw_prompt(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).style(self.theme.base());

        if let Mode::PathInput { action, buffer } = &self.mode {
            let prompt = match action {
                PathAction::LoadCsv => "CSV path",
                PathAction::SaveReport => "Report path (.pdf)",
            };
            let input = Paragraph::new(Line::from(vec![
                Span::styled(format!("{prompt}: "), self.theme.title()),
                Span::styled(buffer.clone(), self.theme.base()),
                Span::styled("_", self.theme.status()),
            ]))
            .block(block.title("Input (Enter to confirm, Esc to cancel)"));
            frame.render_widget(input, area);
            return;
        }

        if let Some(fraction) = self.progress {
            let gauge = Gauge::default()
                .block(block.title("Loading"))
                .gauge_style(self.theme.title())
                .ratio(fraction.clamp(0.0, 1.0));
            frame.render_widget(gauge, area);
            return;
        }

        let (text, tone) = &self.status;
        let style = match tone {
            Tone::Info => self.theme.status(),
            Tone::Busy => self.theme.status(),
            Tone::Ok => self.theme.status_ok(),
            Tone::Err => self.theme.status_err(),
        };
        let status = Paragraph::new(text.clone())
            .style(style)
            .block(block.title("Status"));
        frame.render_widget(status, area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let footer = Paragraph::new(" l load   a analyze   r report   t theme   q quit")
            .style(self.theme.status());
        frame.render_widget(footer, area);
    }

    fn draw_notice(&self, frame: &mut Frame, title: &str, body: &str, error: bool) {
        let area = centered_rect(60, 30, frame.size());
        let style = if error {
            self.theme.status_err()
        } else {
            self.theme.status_ok()
        };
        let notice = Paragraph::new(format!("{body}\n\n(press any key)"))
            .wrap(Wrap { trim: true })
            .style(self.theme.base())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title.to_string())
                    .border_style(style),
            );
        frame.render_widget(Clear, area);
        frame.render_widget(notice, area);
    }
}

// Axis bounds with padding; degenerate spans widen to a unit range.
fn axis_bounds(points: &[(f64, f64)]) -> ((f64, f64), (f64, f64)) {
    let mut x = (f64::INFINITY, f64::NEG_INFINITY);
    let mut y = (f64::INFINITY, f64::NEG_INFINITY);
    for &(px, py) in points {
        x = (x.0.min(px), x.1.max(px));
        y = (y.0.min(py), y.1.max(py));
    }
    let pad = |(min, max): (f64, f64)| {
        if !min.is_finite() || !max.is_finite() {
            return (-1.0, 1.0);
        }
        let span = max - min;
        if span <= f64::EPSILON {
            (min - 1.0, max + 1.0)
        } else {
            (min - span * 0.05, max + span * 0.05)
        }
    };
    (pad(x), pad(y))
}

fn axis_labels(bounds: (f64, f64)) -> Vec<Span<'static>> {
    let mid = (bounds.0 + bounds.1) / 2.0;
    vec![
        Span::raw(format!("{:.1}", bounds.0)),
        Span::raw(format!("{mid:.1}")),
        Span::raw(format!("{:.1}", bounds.1)),
    ]
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}

/// Run the shell until the user quits.
pub fn run(session: Session) -> TuiResult<()> {
    let mut app = App::new(session);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> TuiResult<()> {
    while !app.should_quit {
        app.drain_worker();
        terminal.draw(|frame| app.draw(frame))?;
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }
    }
    Ok(())
}
