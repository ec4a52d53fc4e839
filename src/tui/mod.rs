//! Ratatui-based terminal dashboard.
//!
//! Layout: header, banners, KPI row, the monthly chart (hover with the mouse or
//! ←/→), then the settings list or monthly table beside the vote/auth panel.
//! The dataset is fetched once on a worker thread; quitting cancels it. Sign-in
//! and remote vote writes run on workers too, so the screen never waits on the
//! network.

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseEvent,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use plotters::style::RGBColor;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};
use tracing::{info, warn};

use crate::app::pipeline::Derived;
use crate::app::session::{AuthStep, LoadStatus, RemoteVote, Session};
use crate::chart::{
    ChartLayout, EMPTY_MESSAGE, HoverState, SvgStyle, YDomain, format_compact, render_svg,
    shows_x_label,
};
use crate::cli::ViewArgs;
use crate::config::Settings;
use crate::data::{FetchHandle, SalesClient, TaskHandle};
use crate::domain::{
    ALL_CATEGORIES, AuthIdentity, AuthMode, ChartPoint, DATA_SOURCE_URL, DATASET_LABEL, Metric,
    Stance, month_name,
};
use crate::error::AppError;
use crate::gateway::RemoteGateway;
use crate::report::format_number;
use crate::store::LocalStore;

mod plotters_chart;

use plotters_chart::SalesPlottersChart;

const SERIES_COLOR: RGBColor = RGBColor(124, 92, 255);
const CHART_FILE: &str = "chart.svg";

/// Start the dashboard.
pub fn run(settings: &Settings, view: ViewArgs) -> Result<(), AppError> {
    let gateway = RemoteGateway::from_settings(settings);
    let mut session = Session::new(Arc::new(gateway), LocalStore::new(&settings.state_dir));
    session.set_filter(view.filter());
    session.set_metric(view.metric);
    session.begin_load();
    let fetch = FetchHandle::spawn(SalesClient::from_settings(settings));

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::terminal(format!("Failed to initialize terminal: {e}")))?;

    let mut dashboard = Dashboard::new(session, fetch);
    dashboard.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen, mouse) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::terminal(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture) {
            let _ = disable_raw_mode();
            return Err(AppError::terminal(format!(
                "Failed to enter alternate screen: {e}"
            )));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthField {
    Email,
    Password,
}

#[derive(Debug, Clone)]
struct AuthForm {
    mode: AuthMode,
    email: String,
    password: String,
    focus: AuthField,
}

impl AuthForm {
    fn new() -> Self {
        Self {
            mode: AuthMode::SignUp,
            email: String::new(),
            password: String::new(),
            focus: AuthField::Email,
        }
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            AuthField::Email => &mut self.email,
            AuthField::Password => &mut self.password,
        }
    }
}

/// Where the chart was last drawn, for mapping mouse cells back to months.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PlotArea {
    inner: Rect,
    layout: ChartLayout,
    count: usize,
}

struct Dashboard {
    session: Session,
    fetch: Option<FetchHandle>,
    hover: HoverState,
    show_table: bool,
    table_offset: usize,
    auth_form: Option<AuthForm>,
    /// In-flight sign-in; dropping it discards the answer.
    pending_auth: Option<(AuthMode, TaskHandle<AuthIdentity>)>,
    /// In-flight remote vote write; a newer vote replaces it.
    pending_vote: Option<TaskHandle<()>>,
    plot: Option<PlotArea>,
    status: String,
}

impl Dashboard {
    fn new(session: Session, fetch: FetchHandle) -> Self {
        Self {
            session,
            fetch: Some(fetch),
            hover: HoverState::new(),
            show_table: false,
            table_offset: 0,
            auth_form: None,
            pending_auth: None,
            pending_vote: None,
            plot: None,
            status: "Loading dataset…".to_string(),
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if self.poll_fetch() {
                needs_redraw = true;
            }
            if self.poll_jobs() {
                needs_redraw = true;
            }

            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::terminal(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::terminal(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read()
                .map_err(|e| AppError::terminal(format!("Event read error: {e}")))?
            {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Mouse(mouse) => {
                    needs_redraw = self.handle_mouse(mouse);
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        info!("dashboard closed");
        Ok(())
    }

    /// Deliver the fetch result once it arrives. Returns `true` if state changed.
    fn poll_fetch(&mut self) -> bool {
        let Some(handle) = self.fetch.as_mut() else {
            return false;
        };
        let Some(result) = handle.try_take() else {
            return false;
        };
        match result {
            Ok(rows) => {
                self.session.set_rows(rows);
                self.status = format!("Loaded {} grouped rows.", self.session.rows().len());
            }
            Err(err) => {
                self.session.fail_load(&err);
                self.status = "Dataset load failed.".to_string();
            }
        }
        self.fetch = None;
        true
    }

    /// Apply finished sign-in and vote jobs. Returns `true` if state changed.
    fn poll_jobs(&mut self) -> bool {
        let mut changed = false;

        if let Some(result) = self.pending_vote.as_mut().and_then(TaskHandle::try_take) {
            self.pending_vote = None;
            self.status = match self.session.finish_vote(result) {
                RemoteVote::Failed(_) => "Vote saved locally; remote write failed.".to_string(),
                RemoteVote::Saved | RemoteVote::Skipped => "Vote saved remotely.".to_string(),
            };
            changed = true;
        }

        if let Some((mode, handle)) = self.pending_auth.as_mut() {
            let mode = *mode;
            if let Some(result) = handle.try_take() {
                self.pending_auth = None;
                self.finish_auth(mode, result);
                changed = true;
            }
        }

        changed
    }

    fn finish_auth(&mut self, mode: AuthMode, result: Result<AuthIdentity, AppError>) {
        match self.session.finish_auth(mode, result) {
            Ok(identity) => {
                self.status = format!("Signed in as {}.", identity.email);
                self.auth_form = None;
            }
            Err(err) => {
                // Keep the form open; the message is shown inline.
                self.status = format!("{} failed.", mode.display_name());
                warn!(error = %err, "auth form submit failed");
            }
        }
    }

    /// Returns `true` when the dashboard should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.auth_form.is_some() {
            self.handle_auth_key(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Left | KeyCode::Right => {
                let count = self.point_count();
                let delta = if code == KeyCode::Left { -1 } else { 1 };
                self.hover.step(delta, count);
            }
            KeyCode::Esc => self.hover.leave(),
            KeyCode::Up => self.table_offset = self.table_offset.saturating_sub(1),
            KeyCode::Down => self.table_offset = self.table_offset.saturating_add(1),
            KeyCode::Char('c') => self.cycle_category(1),
            KeyCode::Char('C') => self.cycle_category(-1),
            KeyCode::Char('m') => self.change_metric(self.session.metric().next()),
            KeyCode::Char('M') => self.change_metric(self.session.metric().prev()),
            KeyCode::Char('t') => {
                self.show_table = !self.show_table;
                self.table_offset = 0;
            }
            KeyCode::Char('s') => self.vote(Stance::Support),
            KeyCode::Char('a') => self.vote(Stance::Against),
            KeyCode::Char('e') => {
                self.auth_form = Some(AuthForm::new());
                self.status = "Enter email and password.".to_string();
            }
            KeyCode::Char('o') => {
                if self.session.auth().is_some() {
                    self.session.log_out();
                    self.status = "Logged out.".to_string();
                }
            }
            KeyCode::Char('w') => self.write_chart(Path::new(CHART_FILE)),
            _ => {}
        }
        false
    }

    fn handle_auth_key(&mut self, code: KeyCode) {
        let Some(form) = self.auth_form.as_mut() else {
            return;
        };
        match code {
            KeyCode::Esc => {
                self.auth_form = None;
                self.pending_auth = None;
                self.status = "Sign-in canceled.".to_string();
            }
            KeyCode::Tab | KeyCode::BackTab => {
                form.focus = match form.focus {
                    AuthField::Email => AuthField::Password,
                    AuthField::Password => AuthField::Email,
                };
            }
            KeyCode::F(2) => form.mode = form.mode.toggle(),
            KeyCode::Backspace => {
                form.focused_mut().pop();
            }
            KeyCode::Char(c) => form.focused_mut().push(c),
            KeyCode::Enter => {
                if self.pending_auth.is_some() {
                    return;
                }
                let form = form.clone();
                match self.session.begin_auth(&form.email, &form.password) {
                    Ok(AuthStep::Local(identity)) => self.finish_auth(form.mode, Ok(identity)),
                    Ok(AuthStep::Remote(credentials)) => {
                        let gateway = self.session.gateway();
                        let mode = form.mode;
                        let handle = TaskHandle::spawn_with(move || {
                            gateway.authenticate(mode, &credentials)
                        });
                        self.pending_auth = Some((mode, handle));
                        self.status = format!("{}…", mode.display_name());
                    }
                    Err(err) => {
                        self.status = format!("{} failed.", form.mode.display_name());
                        warn!(error = %err, "auth form submit failed");
                    }
                }
            }
            _ => {}
        }
    }

    /// Returns `true` when a redraw is needed.
    fn handle_mouse(&mut self, mouse: MouseEvent) -> bool {
        if !matches!(mouse.kind, MouseEventKind::Moved | MouseEventKind::Drag(_)) {
            return false;
        }
        let Some(plot) = self.plot else {
            return false;
        };
        hover_at(&mut self.hover, &plot, mouse.column, mouse.row)
    }

    fn point_count(&mut self) -> usize {
        self.session.derived().points.len()
    }

    fn cycle_category(&mut self, delta: isize) {
        let mut options: Vec<String> = vec![ALL_CATEGORIES.to_string()];
        options.extend(self.session.categories().iter().cloned());

        let current = self.session.filter().as_str().to_string();
        let next = match options.iter().position(|c| *c == current) {
            Some(i) => (i as isize + delta).rem_euclid(options.len() as isize) as usize,
            None => 0,
        };
        self.session.set_filter(options[next].as_str());
        self.after_selection_change();
        self.status = format!("item type: {}", self.session.filter().display_name());
    }

    fn change_metric(&mut self, metric: Metric) {
        self.session.set_metric(metric);
        self.after_selection_change();
        self.status = format!("metric: {}", metric.display_name());
    }

    fn after_selection_change(&mut self) {
        let count = self.point_count();
        self.hover.clamp_to(count);
        self.table_offset = 0;
    }

    /// Record locally right away; the remote copy is written in the background.
    fn vote(&mut self, stance: Stance) {
        let (record, pending) = self.session.record_vote(stance);
        self.status = record.stance.acknowledgement().to_string();
        self.pending_vote = pending.map(|pending| {
            let gateway = self.session.gateway();
            TaskHandle::spawn_with(move || pending.send(gateway.as_ref()))
        });
    }

    fn write_chart(&mut self, path: &Path) {
        let derived = self.session.derived();
        let svg = render_svg(&derived.points, self.hover.hovered(), &SvgStyle::default());
        self.status = match std::fs::write(path, svg) {
            Ok(()) => format!("Wrote {}", path.display()),
            Err(e) => format!("Chart write failed: {e}"),
        };
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let derived = self.session.derived();
        let banners = self.banner_lines();

        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(banners.len() as u16),
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(10),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0], &derived);
        if !banners.is_empty() {
            frame.render_widget(Paragraph::new(Text::from(banners)), chunks[1]);
        }
        self.draw_kpis(frame, chunks[2], &derived);
        self.draw_chart(frame, chunks[3], &derived);

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[4]);
        if self.show_table {
            self.draw_table(frame, bottom[0], &derived);
        } else {
            self.draw_settings(frame, bottom[0]);
        }
        self.draw_vote_panel(frame, bottom[1]);
        self.draw_footer(frame, chunks[5]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect, derived: &Derived) {
        let status = match self.session.status() {
            LoadStatus::Idle => "idle",
            LoadStatus::Loading => "loading",
            LoadStatus::Success => "ready",
            LoadStatus::Error(_) => "error",
        };

        let lines = vec![
            Line::from(vec![
                Span::styled("wrs", Style::default().fg(Color::Cyan)),
                Span::raw(" — Warehouse & Retail Sales by Month"),
            ]),
            Line::from(Span::styled(
                format!("{DATASET_LABEL} | {DATA_SOURCE_URL}"),
                Style::default().fg(Color::Gray),
            )),
            Line::from(Span::styled(
                format!(
                    "item type: {} | metric: {} | months: {} | data: {status}",
                    self.session.filter().display_name(),
                    self.session.metric().display_name(),
                    derived.buckets.len(),
                ),
                Style::default().fg(Color::Gray),
            )),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn banner_lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        match self.session.status() {
            LoadStatus::Loading => lines.push(Line::from(Span::styled(
                " Loading dataset…",
                Style::default().fg(Color::Yellow),
            ))),
            LoadStatus::Error(msg) => lines.push(Line::from(Span::styled(
                format!(" Couldn't load the dataset. ({msg})"),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ))),
            LoadStatus::Idle | LoadStatus::Success => {}
        }
        if let Some(msg) = self.session.vote_error() {
            lines.push(Line::from(Span::styled(
                format!(" Vote saved locally, but Firestore write failed: {msg}"),
                Style::default().fg(Color::Red),
            )));
        }
        lines
    }

    fn draw_kpis(&self, frame: &mut ratatui::Frame<'_>, area: Rect, derived: &Derived) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(area);

        let kpis = &derived.kpis;
        let cards = [
            (format!("Total ({})", kpis.range_label), kpis.sum),
            ("Monthly average".to_string(), kpis.average),
            ("Latest month".to_string(), kpis.latest),
        ];
        for ((title, value), rect) in cards.into_iter().zip(cols.iter()) {
            let p = Paragraph::new(Span::styled(
                format_number(value),
                Style::default().add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Right)
            .block(Block::default().title(title).borders(Borders::ALL));
            frame.render_widget(p, *rect);
        }
    }

    fn draw_chart(&mut self, frame: &mut ratatui::Frame<'_>, area: Rect, derived: &Derived) {
        let title = format!("{} by month", self.session.metric().display_name());
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);
        self.plot = None;

        let points = &derived.points;
        if points.is_empty() {
            let msg = match self.session.status() {
                LoadStatus::Loading | LoadStatus::Idle => "Waiting for data...",
                LoadStatus::Error(_) => "No data (the dataset failed to load).",
                LoadStatus::Success => EMPTY_MESSAGE,
            };
            let p = Paragraph::new(msg).style(Style::default().fg(Color::Yellow));
            frame.render_widget(p, inner);
            return;
        }

        let n = points.len();
        let series: Vec<(f64, f64)> = points
            .iter()
            .enumerate()
            .map(|(i, p)| (i as f64, p.value))
            .collect();
        let values: Vec<f64> = points.iter().map(|p| p.value).collect();
        let domain = YDomain::from_values(&values);
        let ticks = domain.ticks();
        let x_bounds = if n > 1 {
            [0.0, (n - 1) as f64]
        } else {
            [-1.0, 1.0]
        };
        let hovered = self.hover.hovered().filter(|&i| i < n);

        let (chart_rect, insets) = chart_layout(inner);
        let widget = SalesPlottersChart {
            series: &series,
            hovered: hovered.map(|i| series[i]),
            y_ticks: &ticks,
            x_bounds,
            y_bounds: [domain.min, domain.max],
            color: SERIES_COLOR,
        };
        frame.render_widget(widget, chart_rect);

        let plot = PlotArea {
            inner,
            layout: terminal_layout(inner, chart_rect),
            count: n,
        };
        if insets.is_some() {
            draw_axis_ticks(frame, inner, chart_rect, &plot, points, domain);
        }
        if let Some(i) = hovered {
            draw_tooltip(frame, chart_rect, column_of(&plot, i), &points[i]);
        }
        self.plot = Some(plot);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items = vec![
            ListItem::new(format!(
                "Item type: {}  (c/C)",
                self.session.filter().display_name()
            )),
            ListItem::new(format!(
                "Metric: {}  (m/M)",
                self.session.metric().display_name()
            )),
            ListItem::new(format!(
                "Item types available: {}",
                self.session.categories().len()
            )),
        ];

        let list = List::new(items).block(Block::default().title("Settings").borders(Borders::ALL));
        frame.render_widget(list, area);
    }

    fn draw_table(&self, frame: &mut ratatui::Frame<'_>, area: Rect, derived: &Derived) {
        let block = Block::default()
            .title("Monthly totals (↑/↓ scroll)")
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines = vec![Line::from(Span::styled(
            format!("{:<16} {:>14} {:>14}", "month", "retail", "warehouse"),
            Style::default().fg(Color::Gray),
        ))];
        let visible = inner.height.saturating_sub(1) as usize;
        let offset = self
            .table_offset
            .min(derived.buckets.len().saturating_sub(visible));
        for b in derived.buckets.iter().skip(offset).take(visible) {
            lines.push(Line::from(format!(
                "{:<16} {:>14} {:>14}",
                format!("{} {}", month_name(b.month), b.year),
                format_number(b.retail_sales),
                format_number(b.warehouse_sales),
            )));
        }
        frame.render_widget(Paragraph::new(Text::from(lines)), inner);
    }

    fn draw_vote_panel(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        if let Some(form) = &self.auth_form {
            self.draw_auth_form(frame, area, form);
            return;
        }

        let caps = self.session.capabilities();
        let mut lines: Vec<Line> = Vec::new();

        match self.session.vote() {
            Some(vote) => {
                lines.push(Line::from(Span::styled(
                    vote.stance.acknowledgement(),
                    Style::default().add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(format!(
                    "Your vote was recorded on {}.",
                    vote.at
                        .with_timezone(&chrono::Local)
                        .format("%Y-%m-%d %H:%M:%S")
                )));
            }
            None => lines.push(Line::from("s support · a against")),
        }

        match self.session.auth() {
            Some(auth) => lines.push(Line::from(format!(
                "Signed in as {} (o to log out)",
                auth.email
            ))),
            None => lines.push(Line::from("Not signed in (e to sign in)")),
        }
        if !caps.auth_enabled {
            lines.push(Line::from(Span::styled(
                "Note: Firebase Auth API key not found, so this is local demo mode.",
                Style::default().fg(Color::Gray),
            )));
        }
        if caps.persistence_enabled {
            lines.push(Line::from(Span::styled(
                "vote logging: enabled",
                Style::default().fg(Color::Green),
            )));
        }

        let p = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: true })
            .block(Block::default().title("Vote").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_auth_form(&self, frame: &mut ratatui::Frame<'_>, area: Rect, form: &AuthForm) {
        let field_style = |field: AuthField| {
            if form.focus == field {
                Style::default().fg(Color::Black).bg(Color::White)
            } else {
                Style::default()
            }
        };

        let mut lines = vec![
            Line::from(format!("Mode: {}  (F2 toggles)", form.mode.display_name())),
            Line::from(vec![
                Span::raw("Email:    "),
                Span::styled(form.email.clone(), field_style(AuthField::Email)),
            ]),
            Line::from(vec![
                Span::raw("Password: "),
                Span::styled(
                    "*".repeat(form.password.chars().count()),
                    field_style(AuthField::Password),
                ),
            ]),
            Line::from(Span::styled(
                "Enter submit · Tab switch field · Esc cancel",
                Style::default().fg(Color::Gray),
            )),
        ];
        if self.pending_auth.is_some() {
            lines.push(Line::from(Span::styled(
                "Waiting for the identity service…",
                Style::default().fg(Color::Yellow),
            )));
        }
        if let Some(err) = self.session.auth_error() {
            lines.push(Line::from(Span::styled(
                err.to_string(),
                Style::default().fg(Color::Red),
            )));
        }

        let p = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: false })
            .block(Block::default().title("Account").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "←/→ hover  Esc clear  c/m item/metric  t table  s/a vote  e sign in  o log out  w svg  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 8,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10
        || inner.height <= insets.top + insets.bottom + 3
    {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

/// Cell-unit layout relative to `inner` whose plot spans exactly `chart`'s cells.
fn terminal_layout(inner: Rect, chart: Rect) -> ChartLayout {
    let pad_left = f64::from(chart.x - inner.x);
    let pad_top = f64::from(chart.y - inner.y);
    let plot_w = f64::from(chart.width.saturating_sub(1));
    let plot_h = f64::from(chart.height.saturating_sub(1));
    let width = f64::from(inner.width);
    let height = f64::from(inner.height);
    ChartLayout {
        width,
        height,
        pad_left,
        pad_right: width - pad_left - plot_w,
        pad_top,
        pad_bottom: height - pad_top - plot_h,
    }
}

/// Terminal column of point `index`.
fn column_of(plot: &PlotArea, index: usize) -> u16 {
    let x = plot.layout.x_at(index, plot.count).round().max(0.0) as u16;
    plot.inner.x + x
}

/// Route a mouse cell to the hover state; leaving the chart clears the hover.
///
/// Returns `true` when the hovered index changed.
fn hover_at(hover: &mut HoverState, plot: &PlotArea, column: u16, row: u16) -> bool {
    let inside = column >= plot.inner.x
        && column < plot.inner.x + plot.inner.width
        && row >= plot.inner.y
        && row < plot.inner.y + plot.inner.height;
    if !inside {
        let changed = hover.hovered().is_some();
        hover.leave();
        return changed;
    }
    let x = f64::from(column - plot.inner.x);
    let y = f64::from(row - plot.inner.y);
    hover.pointer_moved(&plot.layout, plot.count, x, y)
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    plot: &PlotArea,
    points: &[ChartPoint],
    domain: YDomain,
) {
    let style = Style::default().fg(Color::Gray);

    for v in domain.ticks() {
        let row = plot.layout.y_at(v, domain).round() as u16 + inner.y;
        let label = format_compact(v);
        let label_len = label.chars().count() as u16;
        let end = chart.x.saturating_sub(1);
        let start = end.saturating_sub(label_len);
        if start < inner.x || row >= inner.y + inner.height {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y: row,
                width: label_len,
                height: 1,
            },
        );
    }

    let y = chart.y + chart.height;
    if y >= inner.y + inner.height {
        return;
    }
    let mut next_free = inner.x;
    for (i, p) in points.iter().enumerate() {
        if !shows_x_label(i, points.len()) {
            continue;
        }
        let label_len = p.label.chars().count() as u16;
        let center = column_of(plot, i);
        let start = center
            .saturating_sub(label_len / 2)
            .min((inner.x + inner.width).saturating_sub(label_len));
        if start < next_free {
            continue;
        }
        frame.render_widget(
            Paragraph::new(p.label.clone()).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
        next_free = start + label_len + 1;
    }
}

/// Tooltip text: the full month label and the compact value, as in the SVG.
fn tooltip_text(point: &ChartPoint) -> (String, String) {
    (point.full_label.clone(), format_compact(point.value))
}

/// Two-line tooltip (month, value) centered above the hovered column.
fn draw_tooltip(frame: &mut ratatui::Frame<'_>, chart: Rect, column: u16, point: &ChartPoint) {
    let (label, value) = tooltip_text(point);
    let width = (label.chars().count().max(value.chars().count()) + 4) as u16;
    let height = 4u16;
    if width > chart.width || height > chart.height {
        return;
    }

    let max_x = chart.x + chart.width - width;
    let x = column.saturating_sub(width / 2).clamp(chart.x, max_x);
    let rect = Rect {
        x,
        y: chart.y,
        width,
        height,
    };

    let lines = vec![
        Line::from(Span::styled(label, Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            value,
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL)),
        rect,
    );
}
