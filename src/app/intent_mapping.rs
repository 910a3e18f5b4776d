//! Mapping von Engine-Intents auf mutierende Engine-Commands.
//!
//! Fehlende Dauern und Abstände werden hier aus den Optionen aufgelöst,
//! damit Commands vollständig und reproduzierbar im Log stehen.

use super::events::{EngineCommand, EngineIntent};
use super::state::EngineState;

/// Übersetzt einen `EngineIntent` in eine Sequenz ausführbarer `EngineCommand`s.
pub fn map_intent_to_commands(state: &EngineState, intent: EngineIntent) -> Vec<EngineCommand> {
    let options = &state.options;
    match intent {
        EngineIntent::FrameAdvanced { dt } => vec![EngineCommand::AdvanceFrame { dt: dt.max(0.0) }],
        EngineIntent::ViewportResized { size } => vec![EngineCommand::ResizeViewport { size }],

        EngineIntent::PointerPressed { pointer } => vec![EngineCommand::RoutePointerDown { pointer }],
        EngineIntent::PointerMoved { pointer } => vec![EngineCommand::RoutePointerMove { pointer }],
        EngineIntent::PointerReleased { pointer } => vec![EngineCommand::RoutePointerUp { pointer }],
        EngineIntent::WheelScrolled { screen, delta } => {
            if delta == 0.0 {
                Vec::new()
            } else {
                vec![EngineCommand::ZoomAtScreen { screen, delta }]
            }
        }

        EngineIntent::LoadModelRequested { url } => vec![EngineCommand::LoadModel { url }],
        EngineIntent::ModelHierarchyRequested { url } => {
            vec![EngineCommand::RequestModelHierarchy { url }]
        }
        EngineIntent::PreloadModelRequested { url } => vec![EngineCommand::PreloadModel { url }],

        EngineIntent::CameraEnabledChanged { enabled } => {
            vec![EngineCommand::SetCameraEnabled { enabled }]
        }
        EngineIntent::CameraButtonChanged { action, button } => {
            vec![EngineCommand::SetCameraButton { action, button }]
        }
        EngineIntent::ExtendViewRequested { duration } => vec![EngineCommand::ExtendView {
            duration: duration.unwrap_or(options.tween_duration),
        }],
        EngineIntent::CameraStateRequested { state, duration } => {
            vec![EngineCommand::TweenCameraTo {
                state,
                duration: duration.unwrap_or(options.tween_duration),
            }]
        }

        EngineIntent::FloorVisibilityRequested { floor_id, visible } => {
            vec![EngineCommand::SetFloorVisibility { floor_id, visible }]
        }
        EngineIntent::FloorsExpandRequested { duration, interval } => {
            vec![EngineCommand::ExpandFloors {
                duration: duration.unwrap_or(options.tween_duration),
                interval: interval.unwrap_or(options.floor_expand_interval),
            }]
        }
        EngineIntent::FloorsCollapseRequested { duration } => vec![EngineCommand::CollapseFloors {
            duration: duration.unwrap_or(options.tween_duration),
        }],

        EngineIntent::MarkerCreateRequested { draft } => {
            vec![EngineCommand::BeginMarkerPlacement { draft }]
        }
        EngineIntent::LabelCreateRequested { draft } => {
            vec![EngineCommand::BeginLabelPlacement { draft }]
        }
        EngineIntent::PathCreateRequested { draft } => vec![EngineCommand::BeginPath { draft }],
        EngineIntent::TrainCreateRequested { draft } => {
            vec![EngineCommand::BeginTrainPathSelection { draft }]
        }
        EngineIntent::CreateCancelled { kind } => vec![EngineCommand::CancelTool { kind }],
        EngineIntent::PathFinishRequested => vec![EngineCommand::FinishPath],
        EngineIntent::TrainPathConfirmed => vec![EngineCommand::ConfirmTrainPath],

        EngineIntent::EditStartRequested { kind, mode } => {
            vec![EngineCommand::StartEdit { kind, mode }]
        }
        EngineIntent::EditFinishRequested { kind } => vec![EngineCommand::FinishEdit { kind }],
        EngineIntent::GizmoModeChanged { mode } => vec![EngineCommand::SetGizmoMode { mode }],

        EngineIntent::TrainMoveRequested {
            train_id,
            phase,
            duration,
        } => vec![EngineCommand::MoveTrain {
            train_id,
            phase,
            duration: duration.unwrap_or(options.train_move_duration),
        }],
        EngineIntent::TrainProgressChanged { train_id, u } => {
            vec![EngineCommand::SetTrainProgress { train_id, u }]
        }

        EngineIntent::EntityVisibilityRequested { kind, id, visible } => {
            vec![EngineCommand::SetEntityVisibility { kind, id, visible }]
        }
        EngineIntent::EntitiesRemoveRequested { kind, id } => {
            vec![EngineCommand::RemoveEntities { kind, id }]
        }
        EngineIntent::EntitiesImportRequested { kind, payload } => {
            vec![EngineCommand::ImportEntities { kind, payload }]
        }

        EngineIntent::OptionsChanged { options } => vec![EngineCommand::ApplyOptions { options }],
    }
}

#[cfg(test)]
mod tests;
