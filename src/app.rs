use crate::audio::{AudioBackend, NullBackend, RodioBackend};
use crate::config::{self, PlayerConfig};
use crate::persistence::{JsonFileStore, MemoryStore, SessionStore};
use crate::session::{PlaybackSession, SessionSlot};
use crate::ui::{Page, Screen};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const SEEK_STEP_SECONDS: f64 = 5.0;
const VOLUME_STEP_PERCENT: f32 = 5.0;

#[derive(Debug, Default, Clone)]
pub struct AppStartupOptions {
    pub config_dir: Option<PathBuf>,
    pub music_dir: Option<PathBuf>,
    pub null_audio: bool,
    pub verbose: bool,
}

enum Flow {
    Continue,
    Quit,
}

pub fn run_with_startup(options: AppStartupOptions) -> Result<()> {
    let root = match options.config_dir.clone() {
        Some(dir) => dir,
        None => config::config_root()?,
    };
    config::ensure_config_dir(&root)?;
    crate::logging::setup_logger(&config::log_path(&root), options.verbose)?;

    let mut player_config = config::load_config(&root)?;
    if !config::config_path(&root).exists() {
        config::save_config(&root, &player_config)?;
    }
    if let Some(dir) = options.music_dir.clone() {
        player_config.music_dir = Some(dir);
    }

    let mut slot = SessionSlot::new();
    let session = slot.get_or_init(|| build_session(&player_config, &root, options.null_audio))?;

    enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(out);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let output = session.backend_name();
    let mut page = Page::Home;
    let mut status = String::from("Ready");
    let mut dirty = true;
    let mut last_draw = Instant::now();

    let result: Result<()> = loop {
        session.tick(Instant::now());

        if dirty || last_draw.elapsed() > Duration::from_millis(250) {
            let view = session.view();
            terminal.draw(|frame| {
                crate::ui::draw(
                    frame,
                    &Screen {
                        page,
                        player: &view,
                        status: &status,
                        output: &output,
                    },
                )
            })?;
            dirty = false;
            last_draw = Instant::now();
        }

        if !event::poll(Duration::from_millis(33))? {
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        dirty = true;
        if let Flow::Quit = handle_key(session, key, &mut page, &mut status) {
            break Ok(());
        }
    };

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    session.shutdown();
    log::info!("session closed");
    result
}

fn build_session(
    player_config: &PlayerConfig,
    root: &Path,
    null_audio: bool,
) -> crate::error::PlayerResult<PlaybackSession> {
    let media_root = Some(root.to_path_buf());
    let backend: Box<dyn AudioBackend> = if null_audio {
        Box::new(NullBackend::new().with_media_root(media_root))
    } else {
        match RodioBackend::new(media_root.clone()) {
            Ok(backend) => Box::new(backend),
            Err(err) => {
                log::warn!("audio output unavailable, using null engine: {err:#}");
                Box::new(NullBackend::new().with_media_root(media_root))
            }
        }
    };

    let session_file = config::session_path(root);
    let store: Box<dyn SessionStore> = match JsonFileStore::open(&session_file) {
        Ok(store) => Box::new(store),
        Err(err) => {
            log::warn!("session state not restored, keeping it in memory: {err:#}");
            Box::new(MemoryStore::new())
        }
    };

    PlaybackSession::new(
        player_config.session_settings(),
        player_config.resolve_tracks(),
        backend,
        store,
    )
}

fn handle_key(
    session: &mut PlaybackSession,
    key: KeyEvent,
    page: &mut Page,
    status: &mut String,
) -> Flow {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Flow::Quit;
    }

    if session.view().prompt_visible {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                session.answer_consent(true);
                *status = String::from("Music enabled");
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                session.answer_consent(false);
                *status = String::from("Music disabled");
            }
            KeyCode::Char('q') => return Flow::Quit,
            _ => {}
        }
        return Flow::Continue;
    }

    match key.code {
        KeyCode::Char('q') => return Flow::Quit,
        KeyCode::Tab | KeyCode::Right => go_to(session, page.next(), page, status),
        KeyCode::BackTab | KeyCode::Left => go_to(session, page.previous(), page, status),
        KeyCode::Char(ch @ '1'..='4') => {
            let index = ch as usize - '1' as usize;
            go_to(session, Page::ALL[index], page, status);
        }
        KeyCode::Char(' ') => {
            session.toggle_play_pause();
            *status = if session.state().is_playing {
                String::from("Playing")
            } else {
                String::from("Paused")
            };
        }
        KeyCode::Char('n') => session.next_track(),
        KeyCode::Char('p') => session.prev_track(),
        KeyCode::Char('.') => {
            let target = session.state().elapsed + SEEK_STEP_SECONDS;
            session.seek_to(target);
        }
        KeyCode::Char(',') => {
            let target = session.state().elapsed - SEEK_STEP_SECONDS;
            session.seek_to(target);
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let percent = session.state().volume * 100.0 + VOLUME_STEP_PERCENT;
            session.set_volume(percent);
            *status = format!("Volume: {}%", (session.state().volume * 100.0).round() as u16);
        }
        KeyCode::Char('-') => {
            let percent = session.state().volume * 100.0 - VOLUME_STEP_PERCENT;
            session.set_volume(percent);
            *status = format!("Volume: {}%", (session.state().volume * 100.0).round() as u16);
        }
        KeyCode::Char('m') => session.toggle_mute(),
        KeyCode::Char('x') => {
            session.dismiss();
            *status = String::from("Player closed");
        }
        KeyCode::Char('o') => {
            session.reopen();
            *status = String::from("Player reopened");
        }
        _ => {}
    }
    Flow::Continue
}

fn go_to(session: &mut PlaybackSession, target: Page, page: &mut Page, status: &mut String) {
    if target == *page {
        return;
    }
    *page = target;
    let epoch = session.navigate(Instant::now());
    *status = format!("Navigated to {} (epoch {})", target.route(), epoch.value());
}
