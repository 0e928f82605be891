//! UI rendering helpers for the terminal user interface.
//!
//! This module contains the view state the event loop edits (focus, prompts,
//! popups) and the functions that render it with `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::audio::MediaBackend;
use crate::config::{DefaultsStore, UiSettings};
use crate::library::format_hms;

const CONTROLS: &[(&str, &str)] = &[
    ("j/k", "up/down"),
    ("gg/G", "top/bottom"),
    ("enter", "play / open playlist"),
    ("space/p", "play/pause"),
    ("x", "stop"),
    ("h/l", "prev/next"),
    ("-/+", "volume"),
    ("m", MUTE_PLACEHOLDER),
    ("r", "repeat mode"),
    ("o", "open dir"),
    ("w", "save playlist"),
    ("tab", "tracks/playlists"),
    ("q", "quit"),
];

/// Replaced by the player's current mute action when rendered.
const MUTE_PLACEHOLDER: &str = "{mute}";

/// Which list receives cursor keys.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Tracks,
    Playlists,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PromptKind {
    OpenDirectory,
    SavePlaylist,
}

impl PromptKind {
    fn title(self) -> &'static str {
        match self {
            Self::OpenDirectory => " open directory (enter confirms, esc cancels) ",
            Self::SavePlaylist => " save playlist as (enter confirms, esc cancels) ",
        }
    }
}

/// A single-line text input shown over the lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: String,
}

/// Front-end state that is not part of the player itself.
#[derive(Debug, Default)]
pub struct View {
    pub focus: Focus,
    pub playlist_cursor: usize,
    pub prompt: Option<Prompt>,
    /// Error text shown in a modal popup until dismissed.
    pub popup: Option<String>,
    /// Last informational message for the status box.
    pub message: Option<String>,
}

/// Render the controls help text, naming the mute key after `mute_label`.
fn controls_text(mute_label: &str) -> String {
    CONTROLS
        .iter()
        .map(|&(k, v)| {
            let v = if v == MUTE_PLACEHOLDER { mute_label } else { v };
            format!("[{k}] {v}")
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(3);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Window of `total` rows of height `height` that keeps `selected` centered.
///
/// Returns `(start, end, selected_pos_in_window)`.
fn visible_window(total: usize, height: usize, selected: usize) -> (usize, usize, usize) {
    if total <= height || height == 0 {
        return (0, total, selected.min(total.saturating_sub(1)));
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height, selected - start)
}

fn status_text<B: MediaBackend, S: DefaultsStore>(app: &App<B, S>, view: &View) -> String {
    let mut parts: Vec<String> = Vec::new();

    parts.push(format!(" {}", app.state()));
    match app.current() {
        Some(t) => parts.push(format!("Song: {}", t.name)),
        None => parts.push("Song: -".to_string()),
    }
    parts.push(format!("Repeat: {}", app.repeat_mode()));

    let volume = format!("Volume: {:.0}%", app.volume() * 100.0);
    if app.is_muted() {
        parts.push(format!("{volume} (muted)"));
    } else {
        parts.push(volume);
    }

    if app.is_scanning() {
        parts.push("Scanning...".to_string());
    }
    if let Some(msg) = &view.message {
        parts.push(msg.clone());
    }

    parts.join(" • ")
}

fn bordered(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

/// Render the entire UI into the provided `frame`.
pub fn draw<B: MediaBackend, S: DefaultsStore>(
    frame: &mut Frame,
    app: &App<B, S>,
    view: &View,
    ui_settings: &UiSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" encore ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let status = Paragraph::new(status_text(app, view))
        .block(bordered(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[1]);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" progress "))
        .ratio((app.progress() / 100.0).clamp(0.0, 1.0))
        .label(app.time_info().to_string());
    frame.render_widget(gauge, chunks[2]);

    let lists = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(chunks[3]);
    draw_tracks(frame, app, view, lists[0]);
    draw_playlists(frame, app, view, lists[1]);

    let footer = Paragraph::new(controls_text(app.mute_label()))
        .block(bordered(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);

    if let Some(prompt) = &view.prompt {
        let area = centered_rect_sized(72, 3, chunks[3]);
        frame.render_widget(Clear, area);
        let input = Paragraph::new(format!("{}_", prompt.input))
            .block(Block::default().borders(Borders::ALL).title(prompt.kind.title()));
        frame.render_widget(input, area);
    }

    if let Some(err) = &view.popup {
        let area = centered_rect_sized(72, 7, chunks[3]);
        frame.render_widget(Clear, area);
        let popup = Paragraph::new(err.as_str())
            .red()
            .block(bordered(" error (esc closes) "))
            .wrap(Wrap { trim: true });
        frame.render_widget(popup, area);
    }
}

fn draw_tracks<B: MediaBackend, S: DefaultsStore>(
    frame: &mut Frame,
    app: &App<B, S>,
    view: &View,
    area: Rect,
) {
    let tracks = app.tracks();
    let height = area.height.saturating_sub(2) as usize;
    let selected = app.selected().unwrap_or(0);
    let (start, end, pos) = visible_window(tracks.len(), height, selected);
    let playing = app.current_index();

    // Only build items for the visible window.
    let items: Vec<ListItem> = tracks[start..end]
        .iter()
        .enumerate()
        .map(|(offset, t)| {
            let time = t.duration.map(format_hms).unwrap_or_default();
            let line = format!("{}  {}", t.name, time);
            if playing == Some(start + offset) {
                ListItem::new(line).bold()
            } else {
                ListItem::new(line)
            }
        })
        .collect();

    let title = format!(" tracks ({}) ", tracks.len());
    let mut list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_symbol("> ");
    if view.focus == Focus::Tracks {
        list = list.highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    }

    let mut state = ListState::default();
    if app.selected().is_some() && !tracks.is_empty() {
        state.select(Some(pos));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_playlists<B: MediaBackend, S: DefaultsStore>(
    frame: &mut Frame,
    app: &App<B, S>,
    view: &View,
    area: Rect,
) {
    let items: Vec<ListItem> = app
        .playlists()
        .iter()
        .map(|p| ListItem::new(p.name.as_str()))
        .collect();

    let mut list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" playlists "))
        .highlight_symbol("> ");
    if view.focus == Focus::Playlists {
        list = list.highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    }

    let mut state = ListState::default();
    if !app.playlists().is_empty() {
        state.select(Some(view.playlist_cursor.min(app.playlists().len() - 1)));
    }
    frame.render_stateful_widget(list, area, &mut state);
}
