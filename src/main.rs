use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use bola_stats::config;
use bola_stats::frontend::FrontEnd;
use bola_stats::loader::spawn_loader;
use bola_stats::report::ReportStatus;
use bola_stats::source::DataSource;
use bola_stats::state::{AppState, Delta, ProviderCommand, apply_delta};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
}

impl App {
    fn new(state: AppState, cmd_tx: Option<mpsc::Sender<ProviderCommand>>) -> Self {
        Self {
            state,
            should_quit: false,
            cmd_tx,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('l') | KeyCode::Right => self.state.step_round(true),
            KeyCode::Char('h') | KeyCode::Left => self.state.step_round(false),
            KeyCode::Char('a') | KeyCode::Char('A') => self.state.toggle_auto_round(),
            KeyCode::Char('d') | KeyCode::Char('D') => self.state.toggle_digest(),
            KeyCode::Char('j') | KeyCode::Down => self.state.scroll_by(1),
            KeyCode::Char('k') | KeyCode::Up => self.state.scroll_by(-1),
            KeyCode::PageDown => self.state.scroll_by(10),
            KeyCode::PageUp => self.state.scroll_by(-10),
            KeyCode::Char('r') | KeyCode::Char('R') => self.request_reload(),
            KeyCode::Char('x') | KeyCode::Char('X') => self.request_export(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Esc => self.state.help_overlay = false,
            _ => {}
        }
    }

    fn request_reload(&mut self) {
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log("[INFO] Reload unavailable");
            return;
        };
        if tx.send(ProviderCommand::Reload).is_err() {
            self.state.push_log("[WARN] Reload request failed");
        } else {
            self.state.loading = true;
            self.state.push_log("[INFO] Reload requested");
        }
    }

    fn request_export(&mut self) {
        let Some(report) = self.state.report.clone() else {
            self.state.push_log("[INFO] Nothing to export yet");
            return;
        };
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log("[INFO] Export unavailable");
            return;
        };
        let path = PathBuf::from(format!("gameweek_{}_trends.xlsx", report.round));
        if tx
            .send(ProviderCommand::Export {
                path: path.clone(),
                report,
            })
            .is_err()
        {
            self.state.push_log("[WARN] Export request failed");
        } else {
            self.state
                .push_log(format!("[INFO] Export started: {}", path.display()));
        }
    }
}

fn main() -> io::Result<()> {
    config::load_dotenv();
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let frontend = FrontEnd::from_args(&args);
    let source = if frontend.uses_upload_store() {
        let Some(db_path) = config::store_db_path() else {
            eprintln!("error: unable to resolve upload store path (set BOLA_STORE_DB)");
            return Ok(());
        };
        DataSource::Store { db_path }
    } else {
        config::remote_or_file_source()
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    spawn_loader(source, tx, cmd_rx);

    let mut app = App::new(AppState::new(frontend, config::today()), Some(cmd_tx));
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.on_key(key);
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(6),
            Constraint::Length(2),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    render_report(frame, chunks[1], &app.state);
    render_logs(frame, chunks[2], &app.state);

    let footer = Paragraph::new(footer_text(&app.state)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let round = match state.selected_round() {
        Some(round) => format!("Gameweek {round}"),
        None if state.loading => "Loading...".to_string(),
        None => "No gameweek".to_string(),
    };
    let mode = if state.strategy.is_auto() {
        "auto-current"
    } else {
        "manual"
    };
    let cap = if state.engine.is_digest() {
        "digest (top 3)"
    } else {
        "all trends"
    };
    let line1 = format!(" {} | {round} | {mode} | {cap}", state.frontend.title());
    let line2 = format!(
        " {} | source: {}",
        state.frontend.caption(),
        state.origin.as_deref().unwrap_or("-")
    );
    format!("{line1}\n{line2}")
}

fn footer_text(state: &AppState) -> String {
    let keys =
        "h/l/←/→ Round | a Auto round | d Digest | j/k Scroll | r Reload | x Export | ? Help | q Quit";
    match state.export_status.as_deref() {
        Some(status) => format!("{keys}\n {status}"),
        None => keys.to_string(),
    }
}

fn render_report(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(report) = state.report.as_ref() else {
        let msg = if state.loading {
            "Loading results and fixtures..."
        } else if state.fixtures.is_empty() {
            "No fixtures loaded."
        } else {
            "Selected gameweek has no fixtures."
        };
        let empty = Paragraph::new(msg).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    };

    let mut lines: Vec<Line> = Vec::new();
    if report.fixtures.is_empty() {
        lines.push(Line::from("No fixtures in this gameweek."));
    }
    for fixture in &report.fixtures {
        let date = fixture
            .date
            .map(|d| format!("  {}", d.format("%a %d %b %H:%M")))
            .unwrap_or_default();
        lines.push(Line::from(vec![
            Span::styled(
                fixture.label(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(date, Style::default().fg(Color::DarkGray)),
        ]));
        match fixture.status {
            ReportStatus::Trends => {
                for trend in fixture.trends.lines() {
                    lines.push(Line::from(Span::styled(
                        format!("  • {trend}"),
                        Style::default().fg(Color::Green),
                    )));
                }
            }
            status => {
                lines.push(Line::from(Span::styled(
                    format!("  {}", state.frontend.empty_message(status)),
                    Style::default().fg(Color::Yellow),
                )));
            }
        }
        lines.push(Line::from(""));
    }

    let title = format!(
        "{} ({} fixtures, {} trends)",
        state.frontend.round_heading(report.round),
        report.fixtures.len(),
        report.trend_count()
    );
    let body = Paragraph::new(lines)
        .block(Block::default().title(title).borders(Borders::ALL))
        .wrap(Wrap { trim: false })
        .scroll((state.scroll, 0));
    frame.render_widget(body, area);
}

fn render_logs(frame: &mut Frame, area: Rect, state: &AppState) {
    let visible = area.height.saturating_sub(2) as usize;
    let start = state.logs.len().saturating_sub(visible);
    let lines: Vec<Line> = state
        .logs
        .iter()
        .skip(start)
        .map(|msg| {
            let style = if msg.starts_with("[WARN]") {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(Span::styled(msg.clone(), style))
        })
        .collect();
    let logs = Paragraph::new(lines).block(Block::default().title("Log").borders(Borders::ALL));
    frame.render_widget(logs, area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Bola Stats - Help",
        "",
        "  h / ←        Previous gameweek",
        "  l / →        Next gameweek",
        "  a            Toggle auto-current gameweek",
        "  d            Toggle digest (top 3 trends)",
        "  j/k or ↑/↓   Scroll",
        "  r            Reload tables",
        "  x            Export gameweek to XLSX",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Trends use the last 5 meetings and need 4/5 or better.",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
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
