//! Property-based tests for playback sessions
//!
//! Uses proptest to verify invariants across many random inputs.

mod common;

use common::{direct, let_tasks_run, Harness};
use hush_core::Track;
use hush_playback::{
    clamp_volume, snap_timer_minutes, HistoryBridge, SessionVisibility, VisibilityController,
    Volumes,
};
use proptest::prelude::*;
use std::collections::HashSet;
use std::time::Duration;

// ===== Helpers =====

#[derive(Debug, Clone)]
enum Op {
    Open(Vec<u8>),
    Update(Vec<u8>),
    Remove(u8),
    Toggle,
    Close(bool),
    ShowFullScreen,
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        prop::collection::vec(0u8..6, 0..5).prop_map(Op::Open),
        prop::collection::vec(0u8..6, 0..5).prop_map(Op::Update),
        (0u8..6).prop_map(Op::Remove),
        Just(Op::Toggle),
        any::<bool>().prop_map(Op::Close),
        Just(Op::ShowFullScreen),
    ]
}

fn tracks(ids: &[u8]) -> Vec<Track> {
    ids.iter().map(|id| direct(&format!("t{id}"))).collect()
}

#[derive(Debug, Clone, Copy)]
enum VisibilityOp {
    Minimize,
    FullScreen,
    Hide(bool),
}

fn arbitrary_visibility_op() -> impl Strategy<Value = VisibilityOp> {
    prop_oneof![
        Just(VisibilityOp::Minimize),
        Just(VisibilityOp::FullScreen),
        any::<bool>().prop_map(VisibilityOp::Hide),
    ]
}

// ===== Property Tests =====

proptest! {
    /// Property: clamped volumes always land in [0, 1]
    #[test]
    fn clamped_volume_in_range(volume in any::<f32>()) {
        let clamped = clamp_volume(volume);
        prop_assert!((0.0..=1.0).contains(&clamped));
        if (0.0..=1.0).contains(&volume) {
            prop_assert_eq!(clamped, volume);
        }
    }

    /// Property: the stored level is exactly what `set` returned
    #[test]
    fn stored_volume_matches_returned(levels in prop::collection::vec(-2.0f32..2.0, 1..20)) {
        let mut volumes = Volumes::default();
        let id = "rain".into();
        for level in levels {
            let stored = volumes.set(&id, level);
            prop_assert_eq!(volumes.get(&id), stored);
        }
    }

    /// Property: snapped timer values are multiples of the step, capped at max
    #[test]
    fn snapped_timer_is_multiple_of_step(value in -10.0f32..500.0, snap in 1u32..15, max in 1u32..240) {
        let minutes = snap_timer_minutes(value, snap, max);
        prop_assert!(minutes <= max);
        prop_assert!(minutes == max || minutes % snap == 0);
    }

    /// Property: the full player flag is set exactly when full screen is shown
    #[test]
    fn full_player_flag_tracks_visibility(ops in prop::collection::vec(arbitrary_visibility_op(), 0..30)) {
        let mut controller = VisibilityController::new();
        for op in ops {
            match op {
                VisibilityOp::Minimize => controller.show_minimized(),
                VisibilityOp::FullScreen => controller.show_full_screen(),
                VisibilityOp::Hide(clear) => {
                    controller.hide(clear);
                }
            }
            prop_assert_eq!(
                controller.full_player_open(),
                controller.visibility() == SessionVisibility::FullScreen
            );
            prop_assert_eq!(
                controller.mini_player_visible(),
                controller.visibility() == SessionVisibility::Minimized
            );
        }
    }

    /// Property: a single-track open is recorded at most once until reset
    #[test]
    fn history_dedup(ids in prop::collection::vec(0u8..5, 1..30)) {
        let mut bridge = HistoryBridge::new();
        let mut recorded = 0;
        for id in &ids {
            if bridge.entry_for_open(&tracks(&[*id])).is_some() {
                recorded += 1;
            }
        }
        let distinct: HashSet<_> = ids.iter().collect();
        prop_assert_eq!(recorded, distinct.len());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: whatever the call sequence, track ids stay unique and every
    /// player that was ever loaded is released exactly once by shutdown
    #[test]
    fn players_are_never_leaked(ops in prop::collection::vec(arbitrary_op(), 1..25)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .start_paused(true)
            .build()
            .unwrap();

        let (unique, players) = runtime.block_on(async {
            let h = Harness::new();
            for op in ops {
                match op {
                    Op::Open(ids) => h.session.open(tracks(&ids)).unwrap(),
                    Op::Update(ids) => h.session.update(tracks(&ids)).unwrap(),
                    Op::Remove(id) => h.session.remove(format!("t{id}")).unwrap(),
                    Op::Toggle => h.session.toggle_play().unwrap(),
                    Op::Close(clear) => h.session.close(clear).unwrap(),
                    Op::ShowFullScreen => h.session.show_full_screen().unwrap(),
                }
                let_tasks_run().await;
            }
            tokio::time::sleep(Duration::from_secs(1)).await;

            let snapshot = h.session.snapshot();
            let ids: HashSet<_> = snapshot.track_ids().into_iter().map(str::to_string).collect();
            let unique = ids.len() == snapshot.tracks.len();

            h.shutdown().await;
            (unique, h.backend.players())
        });

        prop_assert!(unique);
        for player in players {
            prop_assert_eq!(player.unloads, 1, "player for {} released {} times", player.uri, player.unloads);
        }
    }
}
