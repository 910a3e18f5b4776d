//! Authoring Controller für zentrale Event-Verarbeitung.

use super::error::EngineError;
use super::events::{EngineCommand, EngineIntent};
use super::render_scene;
use super::state::EngineState;
use crate::shared::RenderScene;

/// Orchestriert Host-Eingaben und Use-Cases auf den EngineState.
#[derive(Default)]
pub struct AuthoringController;

impl AuthoringController {
    /// Erstellt einen neuen Controller.
    pub fn new() -> Self {
        Self
    }

    /// Verarbeitet einen Intent über Intent->Command Mapping.
    pub fn handle_intent(
        &mut self,
        state: &mut EngineState,
        intent: EngineIntent,
    ) -> anyhow::Result<()> {
        let commands = self.map_intent_to_commands(state, intent);
        for command in commands {
            self.handle_command(state, command)?;
        }

        Ok(())
    }

    fn map_intent_to_commands(&self, state: &EngineState, intent: EngineIntent) -> Vec<EngineCommand> {
        super::intent_mapping::map_intent_to_commands(state, intent)
    }

    /// Führt mutierende Commands auf dem EngineState aus.
    /// Dispatcht direkt an die Use-Cases.
    pub fn handle_command(
        &mut self,
        state: &mut EngineState,
        command: EngineCommand,
    ) -> anyhow::Result<()> {
        if !state.initialized {
            return Err(EngineError::NotInitialized.into());
        }
        use super::use_cases::{
            camera, edit, entities, floors, frame, labels, lifecycle, markers, model, paths,
            pointer, tool_switch, trains,
        };

        match command {
            // === Frame & Zeiger ===
            EngineCommand::AdvanceFrame { dt } => frame::advance(state, dt),
            EngineCommand::ResizeViewport { size } => lifecycle::resize_viewport(state, size),
            EngineCommand::RoutePointerDown { pointer } => pointer::pointer_down(state, pointer),
            EngineCommand::RoutePointerMove { pointer } => pointer::pointer_move(state, pointer),
            EngineCommand::RoutePointerUp { pointer } => pointer::pointer_up(state, pointer),
            EngineCommand::ZoomAtScreen { screen, delta } => {
                camera::zoom_at_screen(state, screen, delta)
            }

            // === Modell ===
            EngineCommand::LoadModel { url } => model::load_model(state, &url),
            EngineCommand::RequestModelHierarchy { url } => model::request_hierarchy(state, &url),
            EngineCommand::PreloadModel { url } => model::preload_model(state, &url),

            // === Kamera ===
            EngineCommand::SetCameraEnabled { enabled } => camera::set_enabled(state, enabled),
            EngineCommand::SetCameraButton { action, button } => {
                camera::set_button(state, action, button)
            }
            EngineCommand::ExtendView { duration } => camera::extend_view(state, duration),
            EngineCommand::TweenCameraTo {
                state: target,
                duration,
            } => camera::tween_to(state, target, duration),

            // === Floors ===
            EngineCommand::SetFloorVisibility { floor_id, visible } => {
                floors::set_visibility(state, floor_id.as_deref(), visible)
            }
            EngineCommand::ExpandFloors { duration, interval } => {
                floors::expand(state, duration, interval)
            }
            EngineCommand::CollapseFloors { duration } => floors::collapse(state, duration),

            // === Platzierung ===
            EngineCommand::BeginMarkerPlacement { draft } => markers::begin_placement(state, draft),
            EngineCommand::BeginLabelPlacement { draft } => labels::begin_placement(state, draft),
            EngineCommand::BeginPath { draft } => paths::begin(state, draft),
            EngineCommand::BeginTrainPathSelection { draft } => {
                trains::begin_selection(state, draft)
            }
            EngineCommand::CancelTool { kind } => tool_switch::cancel(state, kind),
            EngineCommand::FinishPath => {
                paths::finish(state)?;
            }
            EngineCommand::ConfirmTrainPath => {
                trains::confirm(state)?;
            }

            // === Bearbeitung ===
            EngineCommand::StartEdit { kind, mode } => edit::start(state, kind, mode)?,
            EngineCommand::FinishEdit { kind } => edit::finish(state, kind)?,
            EngineCommand::SetGizmoMode { mode } => edit::set_gizmo_mode(state, mode)?,

            // === Züge ===
            EngineCommand::MoveTrain {
                train_id,
                phase,
                duration,
            } => trains::move_train(state, &train_id, phase, duration)?,
            EngineCommand::SetTrainProgress { train_id, u } => {
                trains::set_progress(state, &train_id, u)?
            }

            // === Verwaltung ===
            EngineCommand::SetEntityVisibility { kind, id, visible } => {
                entities::set_visibility(state, kind, id.as_deref(), visible)
            }
            EngineCommand::RemoveEntities { kind, id } => {
                entities::remove(state, kind, id.as_deref())
            }
            EngineCommand::ImportEntities { kind, payload } => {
                entities::import(state, kind, payload)?
            }

            // === Optionen ===
            EngineCommand::ApplyOptions { options } => lifecycle::apply_options(state, *options),
        }

        Ok(())
    }

    /// Baut die Render-Szene aus dem aktuellen EngineState.
    pub fn build_render_scene(&self, state: &EngineState) -> RenderScene {
        render_scene::build(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::events::EntityType;
    use crate::app::use_cases::test_support::ready_state;
    use crate::app::ActiveTool;
    use crate::core::PathDraft;

    #[test]
    fn commands_require_initialized_engine() {
        let mut controller = AuthoringController::new();
        let mut state = EngineState::new();

        let err = controller
            .handle_command(&mut state, EngineCommand::FinishPath)
            .unwrap_err();

        assert_eq!(
            err.downcast_ref::<EngineError>(),
            Some(&EngineError::NotInitialized)
        );
        assert_eq!(state.editor.active, ActiveTool::None);
    }

    #[test]
    fn misuse_surfaces_as_engine_error() {
        let mut controller = AuthoringController::new();
        let mut state = ready_state();

        let err = controller
            .handle_intent(
                &mut state,
                EngineIntent::EditFinishRequested {
                    kind: EntityType::Label,
                },
            )
            .unwrap_err();

        assert_eq!(
            err.downcast_ref::<EngineError>(),
            Some(&EngineError::EditNotActive(EntityType::Label))
        );
    }

    #[test]
    fn cancel_only_affects_matching_tool() {
        let mut controller = AuthoringController::new();
        let mut state = ready_state();
        controller
            .handle_intent(
                &mut state,
                EngineIntent::PathCreateRequested {
                    draft: PathDraft::default(),
                },
            )
            .unwrap();

        controller
            .handle_intent(
                &mut state,
                EngineIntent::CreateCancelled {
                    kind: EntityType::Marker,
                },
            )
            .unwrap();
        assert_eq!(state.editor.active, ActiveTool::PlacingPath);

        controller
            .handle_intent(
                &mut state,
                EngineIntent::CreateCancelled {
                    kind: EntityType::Path,
                },
            )
            .unwrap();
        assert_eq!(state.editor.active, ActiveTool::None);
    }
}
