use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, AppEvent, Command};
use crate::audio::{MediaBackend, TransportState};
use crate::config::{self, DefaultsStore};
use crate::mpris::{ControlCmd, MprisHandle};
use crate::runtime::mpris_sync::{Published, update_mpris};
use crate::ui::{self, Focus, Prompt, PromptKind, View};

/// What a key press asks the event loop to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    None,
    Quit,
    Run(Command),
    PlayPause,
    CycleRepeatMode,
    SelectNext,
    SelectPrevious,
    SelectFirst,
    SelectLast,
}

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    pub view: View,
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    /// Last playback state published to MPRIS.
    pub published: Published,
}

impl EventLoopState {
    pub fn new() -> Self {
        Self {
            view: View::default(),
            pending_gg: false,
            published: Published::default(),
        }
    }
}

/// Main terminal event loop: ticks the player, draws, and dispatches keys and
/// MPRIS commands. Returns `Ok(())` when shutdown is requested.
pub fn run<B: MediaBackend, S: DefaultsStore>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App<B, S>,
    mpris: &MprisHandle,
    control_rx: &mpsc::Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    let poll_interval = Duration::from_millis(settings.ui.poll_interval_ms);

    loop {
        app.tick();
        apply_events(app.take_events(), &mut state.view);
        update_mpris(mpris, app, &mut state.published);

        terminal.draw(|f| ui::draw(f, app, &state.view, &settings.ui))?;

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, app) {
                return Ok(());
            }
        }

        if event::poll(poll_interval)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let action = map_key(key, app.playlists().len(), state);
                if dispatch(action, app) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Errors open the popup; everything else becomes the status message.
fn apply_events(events: Vec<AppEvent>, view: &mut View) {
    for event in events {
        match event {
            AppEvent::Error { source, message } => {
                view.popup = Some(format!("{source:?}: {message}"));
            }
            AppEvent::TrackStarted(path) => {
                view.message = path
                    .file_name()
                    .map(|n| format!("Started {}", n.to_string_lossy()));
            }
            AppEvent::TracksReplaced { count } => {
                view.message = Some(format!("Loaded {count} tracks"));
            }
            AppEvent::PlaylistSaved(path) => {
                view.message = Some(format!("Saved {}", path.display()));
            }
        }
    }
}

/// Run `action` against the player. Returns true when the loop should exit.
fn dispatch<B: MediaBackend, S: DefaultsStore>(action: Action, app: &mut App<B, S>) -> bool {
    match action {
        Action::None => {}
        Action::Quit => return true,
        Action::Run(cmd) => {
            app.execute(cmd);
        }
        Action::PlayPause => play_pause(app),
        Action::CycleRepeatMode => {
            let mode = app.repeat_mode().cycle();
            app.execute(Command::SetRepeatMode(mode));
        }
        Action::SelectNext => app.select_next(),
        Action::SelectPrevious => app.select_previous(),
        Action::SelectFirst => app.select(0),
        Action::SelectLast => app.select(app.tracks().len().saturating_sub(1)),
    }
    false
}

/// Pause when playing, otherwise resume the current track or play the
/// selected one.
fn play_pause<B: MediaBackend, S: DefaultsStore>(app: &mut App<B, S>) {
    match app.state() {
        TransportState::Playing => {
            app.execute(Command::Pause);
        }
        TransportState::Paused => {
            if let Some(track) = app.current().cloned() {
                app.play(&track);
            }
        }
        TransportState::Stopped | TransportState::Unknown => {
            app.execute(Command::Play);
        }
    }
}

fn handle_control_cmd<B: MediaBackend, S: DefaultsStore>(cmd: ControlCmd, app: &mut App<B, S>) -> bool {
    log::debug!("MPRIS command {cmd:?}");
    match cmd {
        ControlCmd::Quit => return true,
        ControlCmd::Play => {
            if app.state() != TransportState::Playing {
                play_pause(app);
            }
        }
        ControlCmd::Pause => {
            app.execute(Command::Pause);
        }
        ControlCmd::PlayPause => play_pause(app),
        ControlCmd::Stop => {
            app.execute(Command::Stop);
        }
        ControlCmd::Next => {
            app.execute(Command::Next);
        }
        ControlCmd::Prev => {
            app.execute(Command::Previous);
        }
    }
    false
}

/// Translate a key press into an `Action`, editing prompts and popups in
/// `state.view` on the way.
pub fn map_key(key: KeyEvent, playlist_count: usize, state: &mut EventLoopState) -> Action {
    let view = &mut state.view;

    if view.popup.is_some() {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
            view.popup = None;
        }
        return Action::None;
    }

    if let Some(prompt) = view.prompt.as_mut() {
        state.pending_gg = false;
        match key.code {
            KeyCode::Esc => view.prompt = None,
            KeyCode::Backspace => {
                prompt.input.pop();
            }
            KeyCode::Enter => {
                let input = prompt.input.trim().to_string();
                let kind = prompt.kind;
                view.prompt = None;
                if input.is_empty() {
                    return Action::None;
                }
                return match kind {
                    PromptKind::OpenDirectory => Action::Run(Command::OpenDirectory(expand_home(&input))),
                    PromptKind::SavePlaylist => Action::Run(Command::SavePlaylist(input)),
                };
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                prompt.input.push(c);
            }
            _ => {}
        }
        return Action::None;
    }

    if key.code != KeyCode::Char('g') {
        state.pending_gg = false;
    }

    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Tab => {
            view.focus = match view.focus {
                Focus::Tracks => Focus::Playlists,
                Focus::Playlists => Focus::Tracks,
            };
            Action::None
        }
        KeyCode::Char('j') | KeyCode::Down => match view.focus {
            Focus::Tracks => Action::SelectNext,
            Focus::Playlists => {
                if view.playlist_cursor + 1 < playlist_count {
                    view.playlist_cursor += 1;
                }
                Action::None
            }
        },
        KeyCode::Char('k') | KeyCode::Up => match view.focus {
            Focus::Tracks => Action::SelectPrevious,
            Focus::Playlists => {
                view.playlist_cursor = view.playlist_cursor.saturating_sub(1);
                Action::None
            }
        },
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                Action::SelectFirst
            } else {
                state.pending_gg = true;
                Action::None
            }
        }
        KeyCode::Char('G') => Action::SelectLast,
        KeyCode::Enter => match view.focus {
            Focus::Tracks => Action::Run(Command::Play),
            Focus::Playlists => Action::Run(Command::OpenPlaylist(view.playlist_cursor)),
        },
        KeyCode::Char('p') | KeyCode::Char(' ') => Action::PlayPause,
        KeyCode::Char('x') => Action::Run(Command::Stop),
        KeyCode::Char('l') => Action::Run(Command::Next),
        KeyCode::Char('h') => Action::Run(Command::Previous),
        KeyCode::Char('+') | KeyCode::Char('=') => Action::Run(Command::VolumeUp),
        KeyCode::Char('-') => Action::Run(Command::VolumeDown),
        KeyCode::Char('m') => Action::Run(Command::Mute),
        KeyCode::Char('r') => Action::CycleRepeatMode,
        KeyCode::Char('o') => {
            view.prompt = Some(Prompt {
                kind: PromptKind::OpenDirectory,
                input: String::new(),
            });
            Action::None
        }
        KeyCode::Char('w') => {
            view.prompt = Some(Prompt {
                kind: PromptKind::SavePlaylist,
                input: String::new(),
            });
            Action::None
        }
        _ => Action::None,
    }
}

/// Expand a leading `~` to `$HOME`.
fn expand_home(input: &str) -> PathBuf {
    if let Some(rest) = input.strip_prefix('~') {
        if let Some(home) = std::env::var_os("HOME") {
            let rest = rest.trim_start_matches('/');
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(input)
}
