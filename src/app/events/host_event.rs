//! Externe Events an die Host-Anwendung.

use crate::core::{
    FloorHierarchyEntry, LabelData, PathData, PoiData, TrainData, TrainPhase,
};
use crate::shared::PointerInfo;
use glam::Vec2;
use serde::Serialize;

/// Ursprüngliches Zeiger-Event plus projizierte Screen-Position der Entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerContext {
    pub pointer: PointerInfo,
    pub screen_position: Option<Vec2>,
}

/// Events des externen Kanals, als Plain-Data-Snapshots.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum HostEvent {
    ModelLoaded {
        url: String,
        floor_count: usize,
    },
    ModelLoadFailed {
        url: String,
        reason: String,
    },
    ModelHierarchy {
        url: String,
        entries: Vec<FloorHierarchyEntry>,
    },
    ModelPreloaded {
        url: String,
    },
    FloorsMoveFinished {
        expanded: bool,
    },
    MarkerCreated {
        data: PoiData,
    },
    LabelCreated {
        data: LabelData,
    },
    PathFinished {
        data: PathData,
    },
    TrainPathSelected {
        path_id: String,
    },
    TrainCreated {
        data: TrainData,
    },
    TrainMoveFinished {
        train_id: String,
        phase: TrainPhase,
    },
    PoiPointerUp {
        data: PoiData,
        context: PointerContext,
    },
    Label3DPointerUp {
        data: LabelData,
        context: PointerContext,
    },
    PoiTransformChange {
        data: PoiData,
        context: PointerContext,
    },
    LabelTransformChange {
        data: LabelData,
        context: PointerContext,
    },
    PoiFinishEdit {
        items: Vec<PoiData>,
    },
    LabelFinishEdit {
        items: Vec<LabelData>,
    },
    /// Vorbedingung nicht erfüllt; die Operation wurde übersprungen
    OperationFailed {
        operation: String,
        reason: String,
    },
}

impl HostEvent {
    /// Kurzname für Logs.
    pub fn name(&self) -> &'static str {
        match self {
            HostEvent::ModelLoaded { .. } => "ModelLoaded",
            HostEvent::ModelLoadFailed { .. } => "ModelLoadFailed",
            HostEvent::ModelHierarchy { .. } => "ModelHierarchy",
            HostEvent::ModelPreloaded { .. } => "ModelPreloaded",
            HostEvent::FloorsMoveFinished { .. } => "FloorsMoveFinished",
            HostEvent::MarkerCreated { .. } => "MarkerCreated",
            HostEvent::LabelCreated { .. } => "LabelCreated",
            HostEvent::PathFinished { .. } => "PathFinished",
            HostEvent::TrainPathSelected { .. } => "TrainPathSelected",
            HostEvent::TrainCreated { .. } => "TrainCreated",
            HostEvent::TrainMoveFinished { .. } => "TrainMoveFinished",
            HostEvent::PoiPointerUp { .. } => "PoiPointerUp",
            HostEvent::Label3DPointerUp { .. } => "Label3DPointerUp",
            HostEvent::PoiTransformChange { .. } => "PoiTransformChange",
            HostEvent::LabelTransformChange { .. } => "LabelTransformChange",
            HostEvent::PoiFinishEdit { .. } => "PoiFinishEdit",
            HostEvent::LabelFinishEdit { .. } => "LabelFinishEdit",
            HostEvent::OperationFailed { .. } => "OperationFailed",
        }
    }

    /// JSON-Darstellung für Hosts ohne Rust-Typen.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
