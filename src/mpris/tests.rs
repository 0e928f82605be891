use super::*;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

fn make_track() -> Track {
    Track {
        name: "Test Title".to_string(),
        path: PathBuf::from("/tmp/music/test.mp3"),
        duration: Some(Duration::from_secs(75)),
    }
}

fn handle() -> (MprisHandle, Arc<Mutex<SharedState>>, Receiver<()>) {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify_tx, notify_rx) = mpsc::channel::<()>();
    let handle = MprisHandle {
        state: state.clone(),
        notify: notify_tx,
    };
    (handle, state, notify_rx)
}

fn player(state: &Arc<Mutex<SharedState>>) -> PlayerIface {
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    PlayerIface {
        tx,
        state: state.clone(),
    }
}

#[test]
fn set_track_metadata_sets_and_clears_shared_state() {
    let (handle, state, notify) = handle();

    let track = make_track();
    handle.set_track_metadata(Some(7), Some(&track));

    {
        let s = state.lock().unwrap();
        assert_eq!(s.title.as_deref(), Some("Test Title"));
        assert!(s.url.as_deref().unwrap().contains("/tmp/music/test.mp3"));
        assert_eq!(s.length_micros, Some(75_000_000));
        assert_eq!(
            s.track_id.as_ref().map(|p| p.as_str()),
            Some("/org/mpris/MediaPlayer2/track/7")
        );
    }

    handle.set_track_metadata(None, None);
    {
        let s = state.lock().unwrap();
        assert_eq!(s.title, None);
        assert_eq!(s.url, None);
        assert_eq!(s.length_micros, None);
        assert!(s.track_id.is_none());
    }

    assert_eq!(notify.try_iter().count(), 2);
}

#[test]
fn playback_status_maps_transport_state() {
    let (handle, state, _notify) = handle();
    let iface = player(&state);

    assert_eq!(iface.playback_status(), "Stopped");
    handle.set_status(TransportState::Playing);
    assert_eq!(iface.playback_status(), "Playing");
    assert!(iface.can_pause());
    handle.set_status(TransportState::Paused);
    assert_eq!(iface.playback_status(), "Paused");
    assert!(!iface.can_pause());
    handle.set_status(TransportState::Stopped);
    assert_eq!(iface.playback_status(), "Stopped");
}

#[test]
fn navigation_flags_are_published() {
    let (handle, state, _notify) = handle();
    let iface = player(&state);
    assert!(!iface.can_go_next());

    handle.set_navigation(true, false);
    assert!(iface.can_go_next());
    assert!(!iface.can_go_previous());
}

#[test]
fn metadata_includes_expected_keys_when_present() {
    let (handle, state, _notify) = handle();
    let iface = player(&state);

    handle.set_track_metadata(Some(1), Some(&make_track()));
    let map = iface.metadata();
    for k in ["mpris:trackid", "xesam:title", "xesam:url", "mpris:length"] {
        assert!(map.contains_key(k), "missing key: {k}");
    }

    handle.set_track_metadata(None, None);
    let map = iface.metadata();
    assert!(map.contains_key("xesam:title"));
    assert!(!map.contains_key("mpris:trackid"));
}

#[test]
fn player_methods_forward_control_commands() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface { tx, state };

    iface.play();
    iface.pause();
    iface.play_pause();
    iface.stop();
    iface.next();
    iface.previous();

    let got: Vec<ControlCmd> = rx.try_iter().collect();
    assert_eq!(
        got,
        vec![
            ControlCmd::Play,
            ControlCmd::Pause,
            ControlCmd::PlayPause,
            ControlCmd::Stop,
            ControlCmd::Next,
            ControlCmd::Prev,
        ]
    );
}
