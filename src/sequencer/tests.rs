use std::collections::HashSet;
use std::path::PathBuf;

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::config::RepeatModeSetting;
use crate::library::Track;

fn abc() -> Vec<Track> {
    ["a", "b", "c"]
        .iter()
        .map(|n| Track::new(*n, format!("/m/{n}.mp3"), None))
        .collect()
}

fn seq(mode: RepeatMode, tracks: &[Track], current: Option<&Track>) -> Sequencer<StdRng> {
    let mut s = Sequencer::with_rng(StdRng::seed_from_u64(7));
    s.set_mode(mode, tracks, current, current.is_some());
    s
}

fn name(t: Option<Track>) -> Option<String> {
    t.map(|t| t.name)
}

#[test]
fn normal_steps_forward_and_back() {
    let t = abc();
    let mut s = seq(RepeatMode::Normal, &t, None);
    assert_eq!(name(s.next_track(&t, Some(&t[0]), Advance::Next)).as_deref(), Some("b"));
    assert_eq!(name(s.next_track(&t, Some(&t[1]), Advance::Finished)).as_deref(), Some("c"));
    assert_eq!(name(s.next_track(&t, Some(&t[2]), Advance::Previous)).as_deref(), Some("b"));
}

#[test]
fn normal_is_a_no_op_at_the_boundaries() {
    let t = abc();
    let mut s = seq(RepeatMode::Normal, &t, None);
    assert_eq!(s.next_track(&t, Some(&t[2]), Advance::Next), None);
    assert_eq!(s.next_track(&t, Some(&t[2]), Advance::Finished), None);
    assert_eq!(s.next_track(&t, Some(&t[0]), Advance::Previous), None);

    assert!(!s.can_go_next(&t, Some(&t[2])));
    assert!(!s.can_go_previous(&t, Some(&t[0])));
    assert!(s.can_go_next(&t, Some(&t[0])));
    assert!(s.can_go_previous(&t, Some(&t[1])));
}

#[test]
fn normal_with_current_outside_the_list_starts_at_the_top() {
    let t = abc();
    let stray = Track::new("x", "/elsewhere/x.mp3", None);
    let mut s = seq(RepeatMode::Normal, &t, None);
    assert_eq!(name(s.next_track(&t, Some(&stray), Advance::Next)).as_deref(), Some("a"));
    assert_eq!(s.next_track(&t, Some(&stray), Advance::Previous), None);
    assert!(s.can_go_next(&t, Some(&stray)));
    assert!(!s.can_go_previous(&t, Some(&stray)));
}

#[test]
fn repeat_list_wraps_both_ways() {
    let t = abc();
    let mut s = seq(RepeatMode::RepeatList, &t, None);
    assert_eq!(name(s.next_track(&t, Some(&t[2]), Advance::Next)).as_deref(), Some("a"));
    assert_eq!(name(s.next_track(&t, Some(&t[2]), Advance::Finished)).as_deref(), Some("a"));
    assert_eq!(name(s.next_track(&t, Some(&t[0]), Advance::Previous)).as_deref(), Some("c"));
    assert!(s.can_go_next(&t, Some(&t[2])));
    assert!(s.can_go_previous(&t, Some(&t[0])));
}

#[test]
fn repeat_list_cycles_the_whole_list_and_returns_to_start() {
    let t = abc();
    let mut s = seq(RepeatMode::RepeatList, &t, None);
    let mut cur = t[0].clone();
    let mut seen = vec![cur.name.clone()];
    for _ in 0..t.len() {
        cur = s.next_track(&t, Some(&cur), Advance::Next).unwrap();
        seen.push(cur.name.clone());
    }
    assert_eq!(seen, vec!["a", "b", "c", "a"]);
}

#[test]
fn repeat_track_always_returns_current() {
    let t = abc();
    let mut s = seq(RepeatMode::RepeatTrack, &t, None);
    for advance in [Advance::Next, Advance::Previous, Advance::Finished] {
        assert_eq!(s.next_track(&t, Some(&t[1]), advance), Some(t[1].clone()));
    }
    assert_eq!(s.next_track(&t, None, Advance::Next), None);
    assert!(s.can_go_next(&t, Some(&t[2])));
    assert!(s.can_go_previous(&t, Some(&t[0])));
}

#[test]
fn guards_need_a_current_track() {
    let t = abc();
    for mode in RepeatMode::ALL {
        let s = seq(mode, &t, None);
        assert!(!s.can_go_next(&t, None), "{mode:?}");
        assert!(!s.can_go_previous(&t, None), "{mode:?}");
    }
}

#[test]
fn shuffle_and_repeat_list_guards_need_a_non_empty_list() {
    let t = abc();
    for mode in [RepeatMode::Shuffle, RepeatMode::RepeatList] {
        let s = seq(mode, &t, Some(&t[0]));
        assert!(s.can_go_next(&t, Some(&t[0])));
        assert!(s.can_go_previous(&t, Some(&t[0])));
        assert!(!s.can_go_next(&[], Some(&t[0])));
        assert!(!s.can_go_previous(&[], Some(&t[0])));
    }
}

#[test]
fn entering_shuffle_excludes_the_active_track() {
    let t = abc();
    let s = seq(RepeatMode::Shuffle, &t, Some(&t[1]));
    let names: Vec<&str> = s.pool().iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["a", "c"]);

    let mut idle = Sequencer::with_rng(StdRng::seed_from_u64(1));
    idle.set_mode(RepeatMode::Shuffle, &t, Some(&t[1]), false);
    assert_eq!(idle.pool().len(), 3);
}

#[test]
fn shuffle_plays_every_track_once_per_cycle() {
    let t = abc();
    let mut s = seq(RepeatMode::Shuffle, &t, None);
    let mut cur: Option<Track> = None;

    for _cycle in 0..4 {
        let mut seen = HashSet::new();
        for _ in 0..t.len() {
            let next = s.next_track(&t, cur.as_ref(), Advance::Finished).unwrap();
            assert!(seen.insert(next.path.clone()), "repeated {:?} within a cycle", next.path);
            cur = Some(next);
        }
        assert_eq!(seen.len(), t.len());
        assert!(s.pool().is_empty());
    }
}

#[test]
fn shuffle_previous_behaves_like_next() {
    let t = abc();
    let mut s = seq(RepeatMode::Shuffle, &t, None);
    let mut seen = HashSet::new();
    for _ in 0..t.len() {
        let next = s.next_track(&t, None, Advance::Previous).unwrap();
        seen.insert(next.path);
    }
    assert_eq!(seen.len(), 3);
}

#[test]
fn shuffle_on_an_empty_list_is_a_no_op() {
    let mut s = seq(RepeatMode::Shuffle, &[], None);
    assert_eq!(s.next_track(&[], None, Advance::Next), None);
}

#[test]
fn re_entering_shuffle_resets_the_pool() {
    let t = abc();
    let mut s = seq(RepeatMode::Shuffle, &t, None);
    s.next_track(&t, None, Advance::Next);
    s.next_track(&t, None, Advance::Next);
    assert_eq!(s.pool().len(), 1);

    s.set_mode(RepeatMode::Normal, &t, None, false);
    assert!(s.pool().is_empty());
    s.set_mode(RepeatMode::Shuffle, &t, None, false);
    assert_eq!(s.pool().len(), 3);
}

#[test]
fn mark_played_only_affects_shuffle() {
    let t = abc();
    let mut s = seq(RepeatMode::Shuffle, &t, None);
    s.mark_played(&t[0]);
    assert!(!s.pool().iter().any(|p| p.same_file(&t[0])));

    let mut n = seq(RepeatMode::Normal, &t, None);
    n.mark_played(&t[0]);
    assert!(n.pool().is_empty());
}

#[test]
fn duplicate_paths_resolve_to_the_first_occurrence() {
    let mut t = abc();
    t.push(t[0].clone());
    let mut s = seq(RepeatMode::Normal, &t, None);
    let next = s.next_track(&t, Some(&t[3]), Advance::Next).unwrap();
    assert_eq!(next.path, PathBuf::from("/m/b.mp3"));
}

#[test]
fn mode_cycle_and_setting_conversion() {
    let mut m = RepeatMode::Normal;
    let mut order = vec![m];
    for _ in 0..4 {
        m = m.cycle();
        order.push(m);
    }
    assert_eq!(&order[..4], &RepeatMode::ALL);
    assert_eq!(order[4], RepeatMode::Normal);

    assert_eq!(RepeatMode::from(RepeatModeSetting::RepeatList), RepeatMode::RepeatList);
    assert_eq!(RepeatMode::default(), RepeatMode::Normal);
}
