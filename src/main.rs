use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap};

use league_terminal::api::LeagueApi;
use league_terminal::config::Config;
use league_terminal::demo_backend::DemoBackend;
use league_terminal::forms::Form;
use league_terminal::http_api::HttpApi;
use league_terminal::http_client::build_http_client;
use league_terminal::state::{
    ApiCommand, AppState, Delta, Focus, LeaguePicker, NoticeKind, Tab, apply_delta,
};
use league_terminal::views::{self, ListView, StatsView};
use league_terminal::worker::spawn_api_worker;

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: mpsc::Sender<ApiCommand>,
    toast_duration: Duration,
}

impl App {
    fn new(cmd_tx: mpsc::Sender<ApiCommand>, toast_duration: Duration) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
            toast_duration,
        }
    }

    fn dispatch(&mut self, cmd: ApiCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            self.state
                .show_notice(NoticeKind::Error, "API worker is not running");
        }
    }

    fn switch_tab(&mut self, tab: Tab) {
        let cmd = self.state.switch_tab(tab);
        self.dispatch(cmd);
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.confirm.is_some() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    if let Some(cmd) = self.state.confirm_pending() {
                        self.dispatch(cmd);
                    }
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.state.cancel_pending()
                }
                _ => {}
            }
            return;
        }

        if self.state.detail.is_some() {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('b') | KeyCode::Char('q')
            ) {
                self.state.detail = None;
            }
            return;
        }

        if self.state.help_overlay {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
                self.state.help_overlay = false;
            }
            return;
        }

        match self.state.focus {
            Focus::Form => self.on_form_key(key),
            Focus::Browse => self.on_browse_key(key),
        }
    }

    fn on_form_key(&mut self, key: KeyEvent) {
        let tab = self.state.tab;
        match key.code {
            KeyCode::Esc => self.state.focus = Focus::Browse,
            KeyCode::Tab | KeyCode::Down => self.state.form_mut(tab).next_field(),
            KeyCode::BackTab | KeyCode::Up => self.state.form_mut(tab).prev_field(),
            KeyCode::Backspace => self.state.form_mut(tab).backspace(),
            KeyCode::Enter => {
                if let Some(cmd) = self.state.submit_form() {
                    self.dispatch(cmd);
                }
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.state.form_mut(tab).push_char(ch)
            }
            _ => {}
        }
    }

    fn on_browse_key(&mut self, key: KeyEvent) {
        let tab = self.state.tab;
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.switch_tab(Tab::Leagues),
            KeyCode::Char('2') => self.switch_tab(Tab::Teams),
            KeyCode::Char('3') => self.switch_tab(Tab::Statistics),
            KeyCode::Tab => self.switch_tab(tab.next()),
            KeyCode::Char('e') => self.state.focus = Focus::Form,
            KeyCode::Char('m') => self.state.form_mut(tab).cycle_mode(),
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char(']') | KeyCode::Char('l') | KeyCode::Right => {
                if let Some(picker) = self.state.picker_mut(tab) {
                    picker.next();
                }
            }
            KeyCode::Char('[') | KeyCode::Char('h') | KeyCode::Left => {
                if let Some(picker) = self.state.picker_mut(tab) {
                    picker.prev();
                }
            }
            KeyCode::Char('r') => {
                if let Some(cmd) = self.state.load_current() {
                    self.dispatch(cmd);
                }
            }
            KeyCode::Enter | KeyCode::Char('v') => {
                let cmd = match tab {
                    Tab::Leagues => self.state.view_selected_league(),
                    Tab::Teams | Tab::Statistics => self.state.load_current(),
                };
                if let Some(cmd) = cmd {
                    self.dispatch(cmd);
                }
            }
            KeyCode::Char('x') | KeyCode::Delete => self.state.request_delete(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let config = Config::load()?;
    let api: Box<dyn LeagueApi + Send>;
    let backend_label: String;
    if config.demo {
        api = Box::new(DemoBackend::seeded());
        backend_label = "demo (in-memory)".to_string();
    } else {
        let client = build_http_client(config.timeout)?;
        let http = HttpApi::new(client, config.api_url.clone());
        backend_label = http.base_url().to_string();
        api = Box::new(http);
    }

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let _worker = spawn_api_worker(api, tx, cmd_rx);

    let mut app = App::new(cmd_tx, config.toast);
    app.state.push_log(format!("[INFO] Backend: {backend_label}"));
    app.dispatch(ApiCommand::LoadLeagues);

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("enter alternate screen")?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend).context("create terminal")?;

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
        app.state
            .clear_toast_after(Instant::now(), app.toast_duration);

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
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
    let area = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(area);

    render_tabs(frame, chunks[0], &app.state);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(40), Constraint::Min(20)])
        .split(chunks[1]);

    let state = &app.state;
    render_form(
        frame,
        body[0],
        state.form(state.tab),
        state.focus == Focus::Form,
    );
    match state.tab {
        Tab::Leagues => render_leagues(frame, body[1], state),
        Tab::Teams => render_teams(frame, body[1], state),
        Tab::Statistics => render_statistics(frame, body[1], state),
    }

    render_toast(frame, chunks[2], state);

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[3]);

    let footer = Paragraph::new(footer_text(state)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[4]);

    if let Some(detail) = &state.detail {
        render_detail_overlay(frame, area, &views::league_detail_lines(detail));
    }
    if let Some(pending) = &state.confirm {
        render_confirm_overlay(frame, area, &pending.prompt);
    }
    if state.help_overlay {
        render_help_overlay(frame, area);
    }
}

fn render_tabs(frame: &mut Frame, area: Rect, state: &AppState) {
    let titles = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| format!("{} {}", i + 1, tab.label()))
        .collect::<Vec<_>>();
    let selected = Tab::ALL.iter().position(|t| *t == state.tab).unwrap_or(0);
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .title("League Management")
                .borders(Borders::ALL),
        )
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn render_form(frame: &mut Frame, area: Rect, form: &Form, editing: bool) {
    let title = if editing {
        format!("{} (editing)", form.kind.title())
    } else {
        form.kind.title().to_string()
    };
    let border_style = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let mut lines = Vec::new();
    for (idx, field) in form.fields.iter().enumerate() {
        let focused = editing && idx == form.focused;
        let label_style = if focused {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        lines.push(Line::from(Span::styled(field.label, label_style)));
        let value = if focused {
            format!("> {}_", field.value)
        } else {
            format!("  {}", field.value)
        };
        lines.push(Line::from(value));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(paragraph, area);
}

fn render_leagues(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("All Leagues").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if !state.leagues_loaded {
        render_hint(frame, inner, "Loading leagues...");
        return;
    }
    render_list_view(
        frame,
        inner,
        &views::league_cards(&state.leagues),
        state.league_selected,
    );
}

fn render_teams(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);
    render_picker(frame, sections[0], &state.team_picker);

    let block = Block::default().title("Teams").borders(Borders::ALL);
    let inner = block.inner(sections[1]);
    frame.render_widget(block, sections[1]);

    if state.teams_league.is_none() {
        render_hint(frame, inner, "Pick a league with [ ] and press r to load teams");
        return;
    }
    render_list_view(
        frame,
        inner,
        &views::team_cards(&state.teams),
        state.team_selected,
    );
}

fn render_statistics(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);
    render_picker(frame, sections[0], &state.stats_picker);

    let block = Block::default().title("Statistics").borders(Borders::ALL);
    let inner = block.inner(sections[1]);
    frame.render_widget(block, sections[1]);

    if state.stats_league.is_none() {
        render_hint(
            frame,
            inner,
            "Pick a league with [ ] and press r to load statistics",
        );
        return;
    }

    let blocks = match views::statistics_view(&state.statistics) {
        StatsView::Placeholder(text) => {
            render_hint(frame, inner, text);
            return;
        }
        StatsView::Blocks(blocks) => blocks,
    };

    let mut lines = Vec::new();
    for stat in blocks {
        lines.push(Line::from(Span::styled(
            stat.heading,
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for cell in stat.cells {
            lines.push(Line::from(vec![
                Span::raw(format!("  {} ", cell.label)),
                Span::styled(
                    cell.value.to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]));
        }
        lines.push(Line::from(""));
    }
    let paragraph = Paragraph::new(lines).scroll((state.stats_scroll, 0));
    frame.render_widget(paragraph, inner);
}

fn render_picker(frame: &mut Frame, area: Rect, picker: &LeaguePicker) {
    let options = views::league_options(&picker.leagues);
    let label = options
        .get(picker.selected)
        .map(|o| o.label.as_str())
        .unwrap_or(views::SELECT_LEAGUE);
    let paragraph = Paragraph::new(format!("< {label} >"))
        .block(Block::default().title("League").borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn render_list_view(frame: &mut Frame, area: Rect, view: &ListView, selected: usize) {
    let cards = match view {
        ListView::Placeholder(text) => {
            render_hint(frame, area, text);
            return;
        }
        ListView::Cards(cards) => cards,
    };

    const CARD_HEIGHT: u16 = 3;
    if area.height < CARD_HEIGHT {
        render_hint(frame, area, "List needs more height");
        return;
    }

    let visible = (area.height / CARD_HEIGHT) as usize;
    let (start, end) = visible_range(selected, cards.len(), visible);

    for (i, idx) in (start..end).enumerate() {
        let card_area = Rect {
            x: area.x,
            y: area.y + (i as u16) * CARD_HEIGHT,
            width: area.width,
            height: CARD_HEIGHT,
        };
        let card = &cards[idx];
        let is_selected = idx == selected;
        let style = if is_selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };

        let fields = card
            .fields
            .iter()
            .map(|(label, value)| format!("{label}: {value}"))
            .collect::<Vec<_>>()
            .join(" | ");
        let actions = if is_selected {
            card.actions
                .iter()
                .map(|action| format!("[{}] {action}", action_key(action)))
                .collect::<Vec<_>>()
                .join("  ")
        } else {
            String::new()
        };
        let prefix = if is_selected { "> " } else { "  " };
        let lines = vec![
            Line::from(Span::styled(
                format!("{prefix}{}", card.title),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("    {fields}")),
            Line::from(Span::styled(
                format!("    {actions}"),
                Style::default().fg(Color::Cyan),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).style(style), card_area);
    }
}

fn action_key(action: &str) -> &'static str {
    match action {
        "View Details" => "Enter",
        "Delete" | "Remove" => "x",
        _ => "?",
    }
}

fn render_hint(frame: &mut Frame, area: Rect, text: &str) {
    let hint = Paragraph::new(text.to_string())
        .style(Style::default().fg(Color::DarkGray))
        .wrap(Wrap { trim: true });
    frame.render_widget(hint, area);
}

fn render_toast(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(toast) = &state.toast else {
        return;
    };
    let style = match toast.kind {
        NoticeKind::Success => Style::default().fg(Color::Black).bg(Color::Green),
        NoticeKind::Error => Style::default().fg(Color::White).bg(Color::Red),
    };
    let paragraph = Paragraph::new(format!(" {} ", toast.message)).style(style);
    frame.render_widget(paragraph, area);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    let skip = state.logs.len().saturating_sub(3);
    state
        .logs
        .iter()
        .skip(skip)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn footer_text(state: &AppState) -> String {
    if state.focus == Focus::Form {
        return "Type to edit | Tab/↓ Next | Shift-Tab/↑ Prev | Enter Submit | Esc Done".to_string();
    }
    match state.tab {
        Tab::Leagues => {
            "1/2/3 Tabs | j/k Move | Enter View | x Delete | e Edit form | m Mode | r Reload | ? Help | q Quit"
                .to_string()
        }
        Tab::Teams => {
            "1/2/3 Tabs | [ ] League | r Load | j/k Move | x Remove | e Edit form | ? Help | q Quit"
                .to_string()
        }
        Tab::Statistics => {
            "1/2/3 Tabs | [ ] League | r Load | j/k Scroll | e Edit form | m Mode | ? Help | q Quit"
                .to_string()
        }
    }
}

fn render_detail_overlay(frame: &mut Frame, area: Rect, lines: &[String]) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);
    let detail = Paragraph::new(lines.join("\n"))
        .block(
            Block::default()
                .title("League Details (Esc to close)")
                .borders(Borders::ALL),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(detail, popup_area);
}

fn render_confirm_overlay(frame: &mut Frame, area: Rect, prompt: &str) {
    let popup_area = centered_rect(50, 20, area);
    frame.render_widget(Clear, popup_area);
    let text = format!("{prompt}\n\ny Confirm | n Cancel");
    let confirm = Paragraph::new(text)
        .block(
            Block::default()
                .title("Confirm")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(confirm, popup_area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "League Terminal - Help",
        "",
        "Global:",
        "  1 / 2 / 3    Leagues / Teams / Statistics",
        "  Tab          Next tab",
        "  e            Edit the form (Esc to leave)",
        "  m            Switch form mode",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Lists:",
        "  j/k or ↑/↓   Move/scroll",
        "  [ / ]        Change league (Teams, Statistics)",
        "  r            Load / reload",
        "  Enter / v    League details",
        "  x / Del      Delete league / remove team",
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
