use chrono::Utc;

use triage::classify::UrgencyLevel;
use triage::pipeline::state::{DashboardState, LevelFilter, View};
use triage::pipeline::transcript::{CaptureEpoch, Speaker};
use triage::pipeline::StateDelta;
use triage::records::{CallId, CallRecord, PriorityEntry, WaitTime};
use triage::responders::ResponderKind;

fn finalized(n: u64, level: UrgencyLevel) -> StateDelta {
    let id = CallId(format!("2025-05-24-{n:03}"));
    StateDelta::CallFinalized {
        record: CallRecord {
            id: id.clone(),
            transcript: vec![format!("Caller: call {n}")],
            created_at: Utc::now(),
        },
        entry: PriorityEntry {
            id,
            level,
            wait: WaitTime { minutes: 5 },
        },
        banner: format!("AI Analysis: Danger Level: {level}"),
    }
}

#[test]
fn stores_are_capped_newest_first() {
    let mut state = DashboardState::with_cap(3);
    for n in 1..=4 {
        state.reduce(finalized(n, UrgencyLevel::Low));
    }

    assert_eq!(state.priority.len(), 3);
    assert_eq!(state.calls.len(), 3);
    // Newest at the head, oldest (call 1) evicted.
    assert_eq!(state.priority.front().unwrap().id.as_str(), "2025-05-24-004");
    assert!(!state
        .calls
        .iter()
        .any(|call| call.id.as_str() == "2025-05-24-001"));
}

#[test]
fn finalization_clears_buffer_and_sets_banner() {
    let mut state = DashboardState::new();
    state.reduce(StateDelta::LineAppended {
        speaker: Speaker::Caller,
        text: "hello".to_string(),
    });
    assert!(!state.live.is_empty());

    state.reduce(finalized(1, UrgencyLevel::High));
    assert!(state.live.is_empty());
    assert_eq!(
        state.banner.as_deref(),
        Some("AI Analysis: Danger Level: High")
    );
}

#[test]
fn lines_are_dropped_while_call_is_ending() {
    let mut state = DashboardState::new();
    state.reduce(StateDelta::LineAppended {
        speaker: Speaker::Caller,
        text: "first".to_string(),
    });
    state.reduce(StateDelta::CallFrozen);
    state.reduce(StateDelta::LineAppended {
        speaker: Speaker::Caller,
        text: "too late".to_string(),
    });
    assert_eq!(state.live.lines(), ["Caller: first"]);
}

#[test]
fn guidance_lands_on_its_own_record() {
    let mut state = DashboardState::new();
    state.reduce(finalized(1, UrgencyLevel::Medium));
    let id = CallId("2025-05-24-001".to_string());

    state.reduce(StateDelta::GuidanceReady {
        id: id.clone(),
        kind: ResponderKind::Comforting,
        items: vec!["Are you safe?".to_string()],
    });

    let board = state.guidance(&id).unwrap();
    assert_eq!(board.comforting, vec!["Are you safe?"]);
    assert!(board.details.is_empty());
}

#[test]
fn guidance_for_evicted_call_is_discarded() {
    let mut state = DashboardState::with_cap(1);
    state.reduce(finalized(1, UrgencyLevel::Low));
    state.reduce(finalized(2, UrgencyLevel::Low));

    // Call 1 was evicted by call 2; its late guidance must not stick.
    let evicted = CallId("2025-05-24-001".to_string());
    state.reduce(StateDelta::GuidanceReady {
        id: evicted.clone(),
        kind: ResponderKind::ImportantDetails,
        items: vec!["stale".to_string()],
    });
    assert!(state.guidance(&evicted).is_none());
}

#[test]
fn stale_live_questions_are_discarded() {
    let mut state = DashboardState::new();
    state.reduce(StateDelta::LineAppended {
        speaker: Speaker::Caller,
        text: "first call".to_string(),
    });
    let old_epoch = state.live.epoch();

    // Finalization clears the buffer and advances the epoch.
    state.reduce(finalized(1, UrgencyLevel::Low));
    assert_ne!(state.live.epoch(), old_epoch);

    state.reduce(StateDelta::LiveQuestionsReady {
        epoch: old_epoch,
        items: vec!["who is this for?".to_string()],
    });
    assert!(state.live_questions.is_empty());

    // Questions for the current epoch do land.
    state.reduce(StateDelta::LiveQuestionsReady {
        epoch: state.live.epoch(),
        items: vec!["current".to_string()],
    });
    assert_eq!(state.live_questions, vec!["current"]);
}

#[test]
fn manual_danger_mark_overrides_banner() {
    let mut state = DashboardState::new();
    state.reduce(StateDelta::ManualDangerMark);
    assert_eq!(state.banner.as_deref(), Some("Manually marked as Dangerous"));
}

#[test]
fn dispatch_delta_is_idempotent() {
    let mut state = DashboardState::new();
    let id = CallId("2025-05-24-001".to_string());
    let t0 = Utc::now();
    let t1 = t0 + chrono::TimeDelta::minutes(2);

    state.reduce(StateDelta::Dispatched { id: id.clone(), at: t0 });
    state.reduce(StateDelta::Dispatched { id: id.clone(), at: t1 });
    assert_eq!(state.dispatch.dispatched_at(&id), Some(t0));
}

#[test]
fn history_search_is_case_insensitive() {
    let mut state = DashboardState::new();
    state.reduce(finalized(1, UrgencyLevel::Low));
    state.reduce(finalized(2, UrgencyLevel::Low));

    assert_eq!(state.search_calls("CALL 1").len(), 1);
    assert_eq!(state.search_calls("-002").len(), 1);
    assert_eq!(state.search_calls("").len(), 2);
    assert!(state.search_calls("flood").is_empty());
}

#[test]
fn priority_filter_by_level() {
    let mut state = DashboardState::new();
    state.reduce(finalized(1, UrgencyLevel::High));
    state.reduce(finalized(2, UrgencyLevel::Low));
    state.reduce(finalized(3, UrgencyLevel::High));

    assert_eq!(state.filter_priority(LevelFilter::All).len(), 3);
    let high = state.filter_priority(LevelFilter::Only(UrgencyLevel::High));
    assert_eq!(high.len(), 2);
    assert!(high.iter().all(|e| e.level == UrgencyLevel::High));
}

#[test]
fn snapshot_round_trip_preserves_lists_and_view() {
    let mut state = DashboardState::new();
    state.reduce(finalized(1, UrgencyLevel::High));
    state.reduce(StateDelta::ViewChanged(View::History));

    let restored = DashboardState::restore(state.snapshot(), 10);
    assert_eq!(restored.priority.len(), 1);
    assert_eq!(restored.calls.len(), 1);
    assert_eq!(restored.view, View::History);
}

#[test]
fn epoch_survives_capture_restarts() {
    let mut state = DashboardState::new();
    let e0 = state.live.epoch();
    state.reduce(StateDelta::ListeningChanged(true));
    state.reduce(StateDelta::ListeningChanged(false));
    // Toggling listening never advances the epoch; only a cleared buffer does.
    assert_eq!(state.live.epoch(), e0);
    assert_eq!(state.live.epoch(), CaptureEpoch(0));
}
