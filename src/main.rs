mod app;
mod event;
mod ui;

use std::fs::{self, File};
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use dsarush::config::{Config, PracticeMode};
use dsarush::session::KeyInput;
use dsarush::snippet::{Difficulty, Language};

use app::{App, AppScreen, Practice};
use event::{AppEvent, EventHandler};
use ui::components::history_table::HistoryTable;
use ui::components::hud::{Hud, HudStats};
use ui::components::progress_bar::ProgressBar;
use ui::components::reorder_list::ReorderList;
use ui::components::results::Results;
use ui::components::typing_area::TypingArea;
use ui::layout::{AppLayout, centered_rect, pack_hint_lines};
use ui::theme::Theme;

#[derive(Parser)]
#[command(
    name = "dsarush",
    version,
    about = "Typing practice on data-structure and algorithm snippets"
)]
struct Cli {
    #[arg(short, long, help = "Topic to practice, e.g. \"Linked List\"")]
    topic: Option<String>,

    #[arg(short, long, help = "Operation within the topic, e.g. \"Push\"")]
    sub_topic: Option<String>,

    #[arg(short, long, help = "Difficulty (easy, medium, hard)")]
    difficulty: Option<Difficulty>,

    #[arg(short, long, help = "Snippet language (cpp, java)")]
    language: Option<Language>,

    #[arg(short, long, help = "Practice mode (typing, reorder)")]
    mode: Option<PracticeMode>,

    #[arg(long, help = "Theme name")]
    theme: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let mut config = Config::load().unwrap_or_else(|e| {
        log::warn!(target: "config", "ignoring unreadable config: {e}");
        Config::default()
    });
    if let Some(topic) = cli.topic {
        config.topic = topic;
        config.sub_topic = None;
    }
    if let Some(sub_topic) = cli.sub_topic {
        config.sub_topic = Some(sub_topic);
    }
    if let Some(difficulty) = cli.difficulty {
        config.difficulty = difficulty;
    }
    if let Some(language) = cli.language {
        config.language = language;
    }
    if let Some(mode) = cli.mode {
        config.mode = mode;
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }

    let theme = Theme::load(&config.theme).unwrap_or_else(|| {
        log::warn!(
            target: "config",
            "unknown theme {:?}, available: {}",
            config.theme,
            Theme::available_themes().join(", ")
        );
        Theme::default()
    });
    log::info!(target: "config", "theme {}", theme.name);
    let mut app = App::new(config, theme)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = app.config.save() {
        log::warn!(target: "config", "failed to save config: {e}");
    }
    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    } else if let Some(text) = app.share_text() {
        println!("{text}");
    }

    Ok(())
}

/// Log to `<data_dir>/dsarush/dsarush.log`; the terminal is owned by the UI.
/// `RUST_LOG` overrides the default `warn` filter.
fn init_logging() {
    let dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dsarush");
    let file = fs::create_dir_all(&dir).and_then(|_| File::create(dir.join("dsarush.log")));
    let Ok(file) = file else {
        return;
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick | AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Repeats would type a character more than once.
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Practice => handle_practice_key(app, key),
        AppScreen::Result => handle_result_key(app, key),
        AppScreen::History => handle_history_key(app, key),
    }
}

fn handle_practice_key(app: &mut App, key: KeyEvent) {
    let now = Instant::now();
    match key.code {
        KeyCode::Esc => app.new_snippet(now),
        KeyCode::F(2) => app.toggle_mode(now),
        KeyCode::F(3) => app.cycle_difficulty(now),
        KeyCode::F(4) => app.cycle_language(now),
        KeyCode::F(5) => app.cycle_topic(false, now),
        KeyCode::F(6) => app.cycle_topic(true, now),
        KeyCode::F(7) => app.cycle_sub_topic(now),
        _ => match app.config.mode {
            PracticeMode::Typing => {
                if let Some(input) = KeyInput::from_key_event(&key) {
                    app.type_key(input, now);
                }
            }
            PracticeMode::Reorder => match key.code {
                KeyCode::Up | KeyCode::Char('k') => app.reorder_up(now),
                KeyCode::Down | KeyCode::Char('j') => app.reorder_down(now),
                KeyCode::Char(' ') | KeyCode::Enter => app.toggle_grab(),
                _ => {}
            },
        },
    }
}

fn handle_result_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') | KeyCode::Enter => app.new_snippet(Instant::now()),
        KeyCode::Char('h') => app.show_history(),
        KeyCode::Char('q') => app.should_quit = true,
        _ => {}
    }
}

fn handle_history_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_history(),
        KeyCode::Char('x') => app.clear_history(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let bg = Block::default().style(Style::default().bg(app.theme.colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Practice => render_practice(frame, app),
        AppScreen::Result => render_result(frame, app),
        AppScreen::History => render_history(frame, app),
    }
}

fn render_practice(frame: &mut ratatui::Frame, app: &App) {
    let now = Instant::now();
    let layout = AppLayout::new(frame.area());
    let colors = &app.theme.colors;

    let label = format!(
        "{} \u{00b7} {} \u{00b7} {} \u{00b7} {}",
        app.snippet.topic,
        app.config.sub_topic.as_deref().unwrap_or("all"),
        app.config.difficulty,
        app.config.language,
    );
    let title = app.snippet.display_title();

    let (stats, (done, total, unit)) = match &app.practice {
        Practice::Typing(session) => {
            frame.render_widget(
                TypingArea::new(session, &app.syntax, &app.theme, title),
                layout.main,
            );
            let stats = HudStats::Typing {
                combo: session.combo(),
                multiplier: session.multiplier(),
                wpm: session.live_wpm(now),
                errors: session.errors(),
            };
            (stats, (session.cursor(), session.target().len(), "chars"))
        }
        Practice::Reorder(state) => {
            frame.render_widget(
                ReorderList::new(&state.session, state.cursor, state.grabbed, now, &app.theme),
                layout.main,
            );
            let items = state.session.items();
            let placed = (0..items.len())
                .filter(|&i| state.session.is_line_correct(i))
                .count();
            let stats = HudStats::Reorder {
                elapsed_secs: now.saturating_duration_since(state.session.started_at()).as_secs(),
                lines: items.len(),
            };
            (stats, (placed, items.len(), "lines"))
        }
    };
    frame.render_widget(Hud::new(label, stats, &app.theme), layout.header);

    if layout.progress.height > 0 {
        frame.render_widget(
            ProgressBar::new(done, total, unit, &app.theme),
            layout.progress,
        );
    }

    let mut hints = vec!["[Esc] new snippet", "[F2] mode", "[F3] difficulty", "[F4] language"];
    hints.extend(["[F5/F6] topic", "[F7] operation"]);
    if app.config.mode == PracticeMode::Reorder {
        hints.push("[\u{2191}\u{2193}] move  [Space] grab");
    }
    hints.push("[Ctrl-C] quit");
    let footer: Vec<Line> = pack_hint_lines(&hints, layout.footer.width as usize)
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.text_pending()))))
        .collect();
    frame.render_widget(Paragraph::new(footer), layout.footer);
}

fn render_result(frame: &mut ratatui::Frame, app: &App) {
    if let Some(stats) = &app.last_stats {
        let centered = centered_rect(70, 85, frame.area());
        let results = Results::new(stats, &app.snippet, &app.syntax_lines, &app.theme);
        frame.render_widget(results, centered);
    }
}

fn render_history(frame: &mut ratatui::Frame, app: &App) {
    let centered = centered_rect(80, 85, frame.area());
    let stats = app.history.stats();
    let table = HistoryTable::new(&app.history.sessions, stats.as_ref(), &app.theme);
    frame.render_widget(table, centered);
}
