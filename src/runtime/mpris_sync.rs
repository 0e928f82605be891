use crate::app::App;
use crate::audio::{MediaBackend, TransportState};
use crate::config::DefaultsStore;
use crate::mpris::MprisHandle;

/// What was last published to MPRIS, to avoid redundant updates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Published {
    status: TransportState,
    index: Option<usize>,
    title: Option<String>,
    can_go_next: bool,
    can_go_previous: bool,
}

impl Published {
    pub fn of<B: MediaBackend, S: DefaultsStore>(app: &App<B, S>) -> Self {
        Self {
            status: app.state(),
            index: app.current_index(),
            title: app.current().map(|t| t.name.clone()),
            can_go_next: app.can_go_next(),
            can_go_previous: app.can_go_previous(),
        }
    }
}

/// Push `app`'s playback state to MPRIS if it changed since `last`.
pub fn update_mpris<B: MediaBackend, S: DefaultsStore>(
    mpris: &MprisHandle,
    app: &App<B, S>,
    last: &mut Published,
) {
    let now = Published::of(app);
    if now == *last {
        return;
    }

    if now.index != last.index || now.title != last.title {
        mpris.set_track_metadata(now.index, app.current());
    }
    if now.status != last.status {
        mpris.set_status(now.status);
    }
    if now.can_go_next != last.can_go_next || now.can_go_previous != last.can_go_previous {
        mpris.set_navigation(now.can_go_next, now.can_go_previous);
    }
    *last = now;
}
