use super::*;
use crate::graph::{GestureEdge, MediaBindings, SlideNode, WorkflowGraph, ZoomPoint};
use crate::dispatch::ZoomDirection;

fn dispatcher(thresholds: ThresholdTable) -> GestureDispatcher {
    GestureDispatcher::new(DispatchConfig::default(), thresholds)
}

fn sample(label: GestureLabel, confidence: f32, at: Instant) -> GestureSample {
    GestureSample::new(label, confidence, at)
}

fn scenario_graph() -> WorkflowGraph {
    WorkflowGraph::new(
        vec![
            SlideNode::text("A", "Intro"),
            SlideNode::text("B", "Body"),
            SlideNode::text("C", "Outro"),
        ],
        vec![
            GestureEdge::new("e1", "A", "B", GestureLabel::ThumbUp),
            GestureEdge::new("e2", "B", "C", GestureLabel::Victory),
        ],
    )
}

/// Node binding Open_Palm to media, zoom and navigation at once
fn overlapping_graph() -> WorkflowGraph {
    let palm = GestureLabel::OpenPalm;
    let video = SlideNode::video(
        "v",
        "clip.mp4",
        MediaBindings {
            play_pause: Some(palm),
            ..MediaBindings::default()
        },
    )
    .with_zoom(ZoomPoint::new(50.0, 50.0), Some(palm), None);

    let image = SlideNode::text("z", "").with_zoom(ZoomPoint::new(20.0, 80.0), Some(palm), None);

    WorkflowGraph::new(
        vec![video, image, SlideNode::text("end", "")],
        vec![
            GestureEdge::new("v-end", "v", "end", palm),
            GestureEdge::new("z-end", "z", "end", palm),
        ],
    )
}

#[test]
fn test_rejects_while_calibrating() {
    let graph = scenario_graph();
    let actions = graph.slide_actions("A").unwrap();
    let mut dispatcher = dispatcher(ThresholdTable::uniform(0.1));

    let outcome = dispatcher.dispatch(
        Some(&actions),
        Some(&sample(GestureLabel::ThumbUp, 0.99, Instant::now())),
        true,
    );
    assert_eq!(outcome, DispatchOutcome::Rejected(RejectReason::Calibrating));
}

#[test]
fn test_rejects_missing_gesture() {
    let graph = scenario_graph();
    let actions = graph.slide_actions("A").unwrap();
    let mut dispatcher = dispatcher(ThresholdTable::uniform(0.1));

    let outcome = dispatcher.dispatch(Some(&actions), None, false);
    assert_eq!(outcome, DispatchOutcome::Rejected(RejectReason::NoGesture));
}

#[test]
fn test_scenario_thumb_up_then_weak_victory() {
    let graph = scenario_graph();
    let mut table = ThresholdTable::uniform(0.7);
    table.insert(GestureLabel::ThumbUp, 0.5);
    table.insert(GestureLabel::Victory, 0.6);
    let mut dispatcher = dispatcher(table);
    let now = Instant::now();

    let at_a = graph.slide_actions("A").unwrap();
    let outcome = dispatcher.dispatch(
        Some(&at_a),
        Some(&sample(GestureLabel::ThumbUp, 0.8, now)),
        false,
    );
    match outcome {
        DispatchOutcome::Action(DispatchAction::Navigate { edge, .. }) => {
            assert_eq!(edge.target, "B")
        }
        other => panic!("Expected Navigate, got {:?}", other),
    }

    let at_b = graph.slide_actions("B").unwrap();
    let outcome = dispatcher.dispatch(
        Some(&at_b),
        Some(&sample(GestureLabel::Victory, 0.4, now + Duration::from_millis(33))),
        false,
    );
    assert_eq!(
        outcome,
        DispatchOutcome::Rejected(RejectReason::BelowThreshold {
            confidence: 0.4,
            threshold: 0.6,
        })
    );
}

#[test]
fn test_threshold_is_inclusive_and_monotonic() {
    let graph = scenario_graph();
    let actions = graph.slide_actions("A").unwrap();
    let mut table = ThresholdTable::uniform(0.7);
    table.insert(GestureLabel::ThumbUp, 0.5);
    let now = Instant::now();

    for confidence in [0.0, 0.1, 0.3, 0.49] {
        let mut dispatcher = dispatcher(table.clone());
        let outcome = dispatcher.dispatch(
            Some(&actions),
            Some(&sample(GestureLabel::ThumbUp, confidence, now)),
            false,
        );
        assert!(!outcome.is_action(), "{} should not fire", confidence);
    }

    for confidence in [0.5, 0.51, 0.9, 1.0] {
        let mut dispatcher = dispatcher(table.clone());
        let outcome = dispatcher.dispatch(
            Some(&actions),
            Some(&sample(GestureLabel::ThumbUp, confidence, now)),
            false,
        );
        assert!(outcome.is_action(), "{} should fire", confidence);
    }
}

#[test]
fn test_missing_threshold_uses_default() {
    let graph = scenario_graph();
    let actions = graph.slide_actions("A").unwrap();
    let mut dispatcher = dispatcher(ThresholdTable::new());
    let now = Instant::now();

    assert_eq!(dispatcher.threshold_for(GestureLabel::ThumbUp), 0.7);
    let outcome = dispatcher.dispatch(
        Some(&actions),
        Some(&sample(GestureLabel::ThumbUp, 0.69, now)),
        false,
    );
    assert!(matches!(
        outcome,
        DispatchOutcome::Rejected(RejectReason::BelowThreshold { .. })
    ));

    let outcome = dispatcher.dispatch(
        Some(&actions),
        Some(&sample(GestureLabel::ThumbUp, 0.7, now)),
        false,
    );
    assert!(outcome.is_action());
}

#[test]
fn test_media_beats_zoom_and_navigation() {
    let graph = overlapping_graph();
    let actions = graph.slide_actions("v").unwrap();
    let mut dispatcher = dispatcher(ThresholdTable::uniform(0.5));

    let outcome = dispatcher.dispatch(
        Some(&actions),
        Some(&sample(GestureLabel::OpenPalm, 0.9, Instant::now())),
        false,
    );
    assert_eq!(
        outcome,
        DispatchOutcome::Action(DispatchAction::Media {
            gesture: GestureLabel::OpenPalm,
            command: MediaCommand::PlayPause,
        })
    );
}

#[test]
fn test_media_cooldown_does_not_fall_through() {
    let graph = overlapping_graph();
    let actions = graph.slide_actions("v").unwrap();
    let mut dispatcher = dispatcher(ThresholdTable::uniform(0.5));
    let now = Instant::now();

    assert!(dispatcher
        .dispatch(Some(&actions), Some(&sample(GestureLabel::OpenPalm, 0.9, now)), false)
        .is_action());

    let outcome = dispatcher.dispatch(
        Some(&actions),
        Some(&sample(GestureLabel::OpenPalm, 0.9, now + Duration::from_millis(100))),
        false,
    );
    assert_eq!(outcome, DispatchOutcome::Rejected(RejectReason::Cooldown));
}

#[test]
fn test_zoom_beats_navigation() {
    let graph = overlapping_graph();
    let actions = graph.slide_actions("z").unwrap();
    let mut dispatcher = dispatcher(ThresholdTable::uniform(0.5));

    let outcome = dispatcher.dispatch(
        Some(&actions),
        Some(&sample(GestureLabel::OpenPalm, 0.9, Instant::now())),
        false,
    );
    assert_eq!(
        outcome,
        DispatchOutcome::Action(DispatchAction::Zoom {
            gesture: GestureLabel::OpenPalm,
            direction: ZoomDirection::In,
            point: ZoomPoint::new(20.0, 80.0),
        })
    );
}

#[test]
fn test_play_pause_cooldown_expires() {
    let graph = overlapping_graph();
    let actions = graph.slide_actions("v").unwrap();
    let mut dispatcher = dispatcher(ThresholdTable::uniform(0.5));
    let now = Instant::now();
    let palm = |at| sample(GestureLabel::OpenPalm, 0.9, at);

    let fired: Vec<bool> = [0u64, 200, 999, 1000, 1500, 2000]
        .iter()
        .map(|ms| {
            dispatcher
                .dispatch(Some(&actions), Some(&palm(now + Duration::from_millis(*ms))), false)
                .is_action()
        })
        .collect();
    assert_eq!(fired, vec![true, false, false, true, false, true]);
}

#[test]
fn test_scrub_repeats_while_held() {
    let graph = WorkflowGraph::new(
        vec![SlideNode::video(
            "v",
            "clip.mp4",
            MediaBindings {
                scrub_forward: Some(GestureLabel::ThumbUp),
                ..MediaBindings::default()
            },
        )],
        vec![],
    );
    let actions = graph.slide_actions("v").unwrap();
    let mut dispatcher = dispatcher(ThresholdTable::uniform(0.5));
    let now = Instant::now();

    let fired = (0..30u64)
        .filter(|frame| {
            let at = now + Duration::from_millis(frame * 40);
            dispatcher
                .dispatch(
                    Some(&actions),
                    Some(&sample(GestureLabel::ThumbUp, 0.9, at)),
                    false,
                )
                .is_action()
        })
        .count();
    // 0..1160 ms at 400 ms spacing: 0, 400, 800
    assert_eq!(fired, 3);
}

#[test]
fn test_held_gesture_navigates_once() {
    let graph = scenario_graph();
    let actions = graph.slide_actions("A").unwrap();
    let mut dispatcher = dispatcher(ThresholdTable::uniform(0.5));
    let now = Instant::now();

    let outcomes: Vec<DispatchOutcome> = (0..5u64)
        .map(|frame| {
            let at = now + Duration::from_millis(frame * 33);
            dispatcher.dispatch(
                Some(&actions),
                Some(&sample(GestureLabel::ThumbUp, 0.9, at)),
                false,
            )
        })
        .collect();

    assert!(outcomes[0].is_action());
    for outcome in &outcomes[1..] {
        assert_eq!(*outcome, DispatchOutcome::Rejected(RejectReason::Held));
    }
    assert_eq!(dispatcher.held_gesture(), Some(GestureLabel::ThumbUp));
}

#[test]
fn test_release_rearms_navigation() {
    let graph = scenario_graph();
    let actions = graph.slide_actions("A").unwrap();
    let mut dispatcher = dispatcher(ThresholdTable::uniform(0.5));
    let now = Instant::now();
    let thumb = sample(GestureLabel::ThumbUp, 0.9, now);

    assert!(dispatcher.dispatch(Some(&actions), Some(&thumb), false).is_action());
    assert!(!dispatcher.dispatch(Some(&actions), Some(&thumb), false).is_action());

    dispatcher.dispatch(Some(&actions), None, false);
    assert_eq!(dispatcher.held_gesture(), None);
    assert!(dispatcher.dispatch(Some(&actions), Some(&thumb), false).is_action());

    // A different label also releases the hold
    dispatcher.dispatch(
        Some(&actions),
        Some(&sample(GestureLabel::ClosedFist, 0.9, now)),
        false,
    );
    assert!(dispatcher.dispatch(Some(&actions), Some(&thumb), false).is_action());
}

#[test]
fn test_flicker_below_threshold_keeps_hold() {
    let graph = scenario_graph();
    let actions = graph.slide_actions("A").unwrap();
    let mut dispatcher = dispatcher(ThresholdTable::uniform(0.5));
    let now = Instant::now();

    assert!(dispatcher
        .dispatch(Some(&actions), Some(&sample(GestureLabel::ThumbUp, 0.9, now)), false)
        .is_action());
    dispatcher.dispatch(
        Some(&actions),
        Some(&sample(GestureLabel::ThumbUp, 0.3, now)),
        false,
    );
    assert_eq!(
        dispatcher.dispatch(
            Some(&actions),
            Some(&sample(GestureLabel::ThumbUp, 0.9, now)),
            false
        ),
        DispatchOutcome::Rejected(RejectReason::Held)
    );
}

#[test]
fn test_held_zoom_fires_once() {
    let graph = overlapping_graph();
    let actions = graph.slide_actions("z").unwrap();
    let mut dispatcher = dispatcher(ThresholdTable::uniform(0.5));
    let now = Instant::now();

    let outcomes: Vec<DispatchOutcome> = (0..4u64)
        .map(|frame| {
            let at = now + Duration::from_millis(frame * 33);
            dispatcher.dispatch(
                Some(&actions),
                Some(&sample(GestureLabel::OpenPalm, 0.9, at)),
                false,
            )
        })
        .collect();

    assert!(matches!(
        outcomes[0],
        DispatchOutcome::Action(DispatchAction::Zoom {
            direction: ZoomDirection::In,
            ..
        })
    ));
    for outcome in &outcomes[1..] {
        assert_eq!(*outcome, DispatchOutcome::Rejected(RejectReason::Held));
    }
}

#[test]
fn test_navigation_hold_does_not_reach_media_on_arrival() {
    let palm = GestureLabel::OpenPalm;
    let graph = WorkflowGraph::new(
        vec![
            SlideNode::text("A", ""),
            SlideNode::video(
                "V",
                "clip.mp4",
                MediaBindings {
                    play_pause: Some(palm),
                    scrub_forward: Some(GestureLabel::ThumbUp),
                    ..MediaBindings::default()
                },
            ),
        ],
        vec![
            GestureEdge::new("e1", "A", "V", palm),
            GestureEdge::new("e2", "A", "V", GestureLabel::ThumbUp),
        ],
    );
    let at_a = graph.slide_actions("A").unwrap();
    let at_v = graph.slide_actions("V").unwrap();
    let now = Instant::now();
    let at = |ms: u64| now + Duration::from_millis(ms);

    for gesture in [palm, GestureLabel::ThumbUp] {
        let mut dispatcher = dispatcher(ThresholdTable::uniform(0.5));
        assert!(matches!(
            dispatcher.dispatch(Some(&at_a), Some(&sample(gesture, 0.9, at(0))), false),
            DispatchOutcome::Action(DispatchAction::Navigate { .. })
        ));
        for ms in [33, 66, 2000] {
            assert_eq!(
                dispatcher.dispatch(Some(&at_v), Some(&sample(gesture, 0.9, at(ms))), false),
                DispatchOutcome::Rejected(RejectReason::Held),
                "{} held for {} ms",
                gesture,
                ms
            );
        }

        dispatcher.dispatch(Some(&at_v), None, false);
        assert!(matches!(
            dispatcher.dispatch(Some(&at_v), Some(&sample(gesture, 0.9, at(2100))), false),
            DispatchOutcome::Action(DispatchAction::Media { .. })
        ));
    }
}

#[test]
fn test_unbound_gesture_has_no_effect() {
    let graph = scenario_graph();
    let actions = graph.slide_actions("C").unwrap();
    let mut dispatcher = dispatcher(ThresholdTable::uniform(0.5));

    let outcome = dispatcher.dispatch(
        Some(&actions),
        Some(&sample(GestureLabel::ThumbUp, 0.9, Instant::now())),
        false,
    );
    assert_eq!(outcome, DispatchOutcome::Rejected(RejectReason::NoBinding));

    let outcome = dispatcher.dispatch(
        None,
        Some(&sample(GestureLabel::Victory, 0.9, Instant::now())),
        false,
    );
    assert_eq!(outcome, DispatchOutcome::Rejected(RejectReason::NoBinding));
}

#[test]
fn test_reset_forgets_hold_and_cooldown() {
    let graph = overlapping_graph();
    let actions = graph.slide_actions("v").unwrap();
    let mut dispatcher = dispatcher(ThresholdTable::uniform(0.5));
    let now = Instant::now();
    let palm = sample(GestureLabel::OpenPalm, 0.9, now);

    assert!(dispatcher.dispatch(Some(&actions), Some(&palm), false).is_action());
    dispatcher.reset();
    assert_eq!(dispatcher.held_gesture(), None);
    assert!(dispatcher.dispatch(Some(&actions), Some(&palm), false).is_action());
}

#[test]
fn test_set_thresholds_replaces_table() {
    let mut dispatcher = dispatcher(ThresholdTable::new());
    dispatcher.set_thresholds(ThresholdTable::uniform(0.25));
    assert!(dispatcher.thresholds().is_complete());
    assert_eq!(dispatcher.threshold_for(GestureLabel::Victory), 0.25);
}
