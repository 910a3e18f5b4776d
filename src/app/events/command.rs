use super::intent::{CameraAction, EntityType, ImportPayload};
use crate::app::tools::edit::GizmoMode;
use crate::core::{CameraState, LabelDraft, MarkerDraft, PathDraft, TrainDraft, TrainPhase};
use crate::shared::{EngineOptions, PointerButton, PointerInfo};
use glam::Vec2;

/// Commands sind mutierende Schritte, die zentral ausgeführt werden.
/// Alle Defaults (Dauer, Abstand) sind bereits aus den Optionen aufgelöst.
#[derive(Debug, Clone)]
pub enum EngineCommand {
    /// Tweens und Kamera-Dämpfung einen Frame weiterrechnen
    AdvanceFrame { dt: f32 },
    ResizeViewport { size: Vec2 },

    /// Zeiger gedrückt: an aktives Werkzeug bzw. Kamera verteilen
    RoutePointerDown { pointer: PointerInfo },
    RoutePointerMove { pointer: PointerInfo },
    RoutePointerUp { pointer: PointerInfo },
    ZoomAtScreen { screen: Vec2, delta: f32 },

    LoadModel { url: String },
    RequestModelHierarchy { url: String },
    PreloadModel { url: String },

    SetCameraEnabled { enabled: bool },
    SetCameraButton {
        action: CameraAction,
        button: Option<PointerButton>,
    },
    ExtendView { duration: f32 },
    TweenCameraTo { state: CameraState, duration: f32 },

    SetFloorVisibility {
        floor_id: Option<String>,
        visible: bool,
    },
    ExpandFloors { duration: f32, interval: f32 },
    CollapseFloors { duration: f32 },

    BeginMarkerPlacement { draft: MarkerDraft },
    BeginLabelPlacement { draft: LabelDraft },
    BeginPath { draft: PathDraft },
    BeginTrainPathSelection { draft: TrainDraft },
    CancelTool { kind: EntityType },
    FinishPath,
    ConfirmTrainPath,

    StartEdit { kind: EntityType, mode: GizmoMode },
    FinishEdit { kind: EntityType },
    SetGizmoMode { mode: GizmoMode },

    MoveTrain {
        train_id: String,
        phase: TrainPhase,
        duration: f32,
    },
    SetTrainProgress { train_id: String, u: f32 },

    SetEntityVisibility {
        kind: EntityType,
        id: Option<String>,
        visible: bool,
    },
    RemoveEntities {
        kind: EntityType,
        id: Option<String>,
    },
    ImportEntities {
        kind: EntityType,
        payload: ImportPayload,
    },

    ApplyOptions { options: Box<EngineOptions> },
}
