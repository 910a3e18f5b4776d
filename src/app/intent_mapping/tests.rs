use crate::app::events::{CameraAction, EngineCommand, EngineIntent, EntityType};
use crate::app::state::EngineState;
use crate::core::TrainPhase;
use crate::shared::{EngineOptions, PointerButton};
use glam::Vec2;

use super::map_intent_to_commands;

#[test]
fn floors_expand_without_arguments_uses_option_defaults() {
    let state = EngineState::new();

    let commands = map_intent_to_commands(
        &state,
        EngineIntent::FloorsExpandRequested {
            duration: None,
            interval: None,
        },
    );

    assert_eq!(commands.len(), 1);
    match &commands[0] {
        EngineCommand::ExpandFloors { duration, interval } => {
            assert_eq!(*duration, EngineOptions::default().tween_duration);
            assert_eq!(*interval, EngineOptions::default().floor_expand_interval);
        }
        other => panic!("ExpandFloors erwartet, erhalten: {other:?}"),
    }
}

#[test]
fn explicit_duration_overrides_default() {
    let state = EngineState::new();

    let commands = map_intent_to_commands(
        &state,
        EngineIntent::TrainMoveRequested {
            train_id: "train-1".into(),
            phase: TrainPhase::Enter,
            duration: Some(2.5),
        },
    );

    assert!(matches!(
        &commands[0],
        EngineCommand::MoveTrain { duration, .. } if *duration == 2.5
    ));
}

#[test]
fn train_move_without_duration_uses_train_default() {
    let state = EngineState::new();

    let commands = map_intent_to_commands(
        &state,
        EngineIntent::TrainMoveRequested {
            train_id: "train-1".into(),
            phase: TrainPhase::Exit,
            duration: None,
        },
    );

    assert!(matches!(
        &commands[0],
        EngineCommand::MoveTrain { duration, phase: TrainPhase::Exit, .. }
            if *duration == EngineOptions::default().train_move_duration
    ));
}

#[test]
fn zero_wheel_delta_maps_to_nothing() {
    let state = EngineState::new();

    let commands = map_intent_to_commands(
        &state,
        EngineIntent::WheelScrolled {
            screen: Vec2::new(10.0, 10.0),
            delta: 0.0,
        },
    );

    assert!(commands.is_empty());
}

#[test]
fn negative_frame_time_is_clamped() {
    let state = EngineState::new();

    let commands = map_intent_to_commands(&state, EngineIntent::FrameAdvanced { dt: -0.5 });

    assert!(matches!(commands[0], EngineCommand::AdvanceFrame { dt } if dt == 0.0));
}

#[test]
fn cancel_and_camera_button_map_one_to_one() {
    let state = EngineState::new();

    let cancel = map_intent_to_commands(
        &state,
        EngineIntent::CreateCancelled {
            kind: EntityType::Path,
        },
    );
    let button = map_intent_to_commands(
        &state,
        EngineIntent::CameraButtonChanged {
            action: CameraAction::Pan,
            button: Some(PointerButton::Middle),
        },
    );

    assert!(matches!(
        cancel[..],
        [EngineCommand::CancelTool {
            kind: EntityType::Path
        }]
    ));
    assert!(matches!(
        button[..],
        [EngineCommand::SetCameraButton {
            action: CameraAction::Pan,
            button: Some(PointerButton::Middle)
        }]
    ));
}
