use cybertype::{
    grade::Grade,
    metrics::Metrics,
    session::{Phase, Session, TEST_DURATION_SECS},
};
use proptest::prelude::*;

fn typed_text() -> impl Strategy<Value = String> {
    prop::collection::vec(prop_oneof![Just(' '), any::<char>(), "[a-z]"
        .prop_map(|s| s.chars().next().unwrap_or('a'))], 0..80)
        .prop_map(|chars| chars.into_iter().collect())
}

proptest! {
    #[test]
    fn accuracy_in_range_and_counts_add_up(
        sample in "[a-z ]{0,60}",
        typed in typed_text(),
        elapsed in 0u32..=TEST_DURATION_SECS,
    ) {
        let m = Metrics::compute(&sample, &typed, elapsed);

        prop_assert!(m.accuracy <= 100);
        prop_assert_eq!(m.error_count + m.correct_count, typed.chars().count());
        if typed.is_empty() {
            prop_assert_eq!(m.accuracy, 0);
        }
        if elapsed == 0 {
            prop_assert_eq!(m.wpm, 0);
        }
    }

    #[test]
    fn typing_the_sample_exactly_is_error_free(sample in "[a-z]{1,10}( [a-z]{1,10}){0,6}", cut in 0usize..80) {
        let typed: String = sample.chars().take(cut).collect();
        let m = Metrics::compute(&sample, &typed, 30);

        prop_assert_eq!(m.error_count, 0);
        prop_assert_eq!(m.accuracy, if typed.is_empty() { 0 } else { 100 });
    }

    #[test]
    fn snapshot_counts_match_typed_length_in_any_phase(
        inputs in prop::collection::vec("[a-z ]{0,12}", 1..20),
        ticks in 0u32..70,
    ) {
        let mut session = Session::new("the quick brown fox jumps".to_string(), 0);
        for (i, input) in inputs.iter().enumerate() {
            session.submit_input(input);
            if i % 3 == 0 {
                for _ in 0..ticks {
                    session.tick();
                }
            }
            let snap = session.snapshot();
            prop_assert_eq!(
                snap.error_count + snap.correct_count,
                snap.typed_text.chars().count()
            );
        }
    }

    #[test]
    fn grade_is_deterministic(wpm in 0u32..200, accuracy in 0u32..=100) {
        prop_assert_eq!(Grade::from_scores(wpm, accuracy), Grade::from_scores(wpm, accuracy));
    }

    #[test]
    fn phases_only_move_forward(ops in prop::collection::vec(0u8..3, 0..200)) {
        let mut session = Session::new("the quick brown fox".to_string(), 0);
        let mut last = session.phase();
        let mut last_remaining = session.remaining_seconds();

        for op in ops {
            match op {
                0 => { session.push_char('t'); }
                1 => { session.backspace(); }
                _ => session.tick(),
            }

            let rank = |p: Phase| match p { Phase::Idle => 0, Phase::Running => 1, Phase::Finished => 2 };
            prop_assert!(rank(session.phase()) >= rank(last));
            prop_assert!(session.remaining_seconds() <= last_remaining);
            if session.phase() != Phase::Running {
                // clock never moves outside Running except the final 1 -> 0 tick
                prop_assert!(session.remaining_seconds() == last_remaining || session.phase() == Phase::Finished);
            }
            last = session.phase();
            last_remaining = session.remaining_seconds();
        }
    }
}
