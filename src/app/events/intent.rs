use crate::app::tools::edit::GizmoMode;
use crate::core::{CameraState, LabelDraft, MarkerDraft, PathDraft, TrainDraft, TrainPhase};
use crate::shared::{EngineOptions, PointerButton, PointerInfo};
use glam::Vec2;

/// Fachliche Entity-Art für generische Operationen (Sichtbarkeit, Entfernen, Import).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    Marker,
    Label,
    Path,
    Train,
}

impl EntityType {
    pub fn name(self) -> &'static str {
        match self {
            EntityType::Marker => "marker",
            EntityType::Label => "label",
            EntityType::Path => "path",
            EntityType::Train => "train",
        }
    }

    /// Operationsname in `OperationFailed` für übersprungene Import-Einträge.
    pub fn import_operation(self) -> &'static str {
        match self {
            EntityType::Marker => "ImportMarker",
            EntityType::Label => "ImportLabel",
            EntityType::Path => "ImportPath",
            EntityType::Train => "ImportTrain",
        }
    }
}

/// Kamera-Aktion für die Button-Belegung.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraAction {
    Rotate,
    Pan,
    DragZoom,
}

/// Import-Nutzlast: bereits strukturierte Daten oder deren JSON-Text.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportPayload {
    Value(serde_json::Value),
    Json(String),
}

impl ImportPayload {
    /// Liefert die Einträge als Liste (ein einzelnes Objekt wird zur Liste mit einem Element).
    pub fn into_items(self) -> anyhow::Result<Vec<serde_json::Value>> {
        let value = match self {
            ImportPayload::Value(value) => value,
            ImportPayload::Json(text) => serde_json::from_str(&text)?,
        };
        Ok(match value {
            serde_json::Value::Array(items) => items,
            serde_json::Value::Null => Vec::new(),
            other => vec![other],
        })
    }
}

/// Engine-Intents: Eingaben von Host und Render-Loop ohne Mutationslogik.
#[derive(Debug, Clone)]
pub enum EngineIntent {
    /// Neuer Frame des Render-Loops (Sekunden seit dem letzten Frame)
    FrameAdvanced { dt: f32 },
    /// Viewport-Größe hat sich geändert
    ViewportResized { size: Vec2 },

    // === Zeiger ===
    PointerPressed { pointer: PointerInfo },
    PointerMoved { pointer: PointerInfo },
    PointerReleased { pointer: PointerInfo },
    /// Mausrad; positives Delta zoomt heraus
    WheelScrolled { screen: Vec2, delta: f32 },

    // === Modell ===
    LoadModelRequested { url: String },
    ModelHierarchyRequested { url: String },
    /// Marker-/Zugmodell vorab laden
    PreloadModelRequested { url: String },

    // === Kamera ===
    CameraEnabledChanged { enabled: bool },
    CameraButtonChanged {
        action: CameraAction,
        button: Option<PointerButton>,
    },
    ExtendViewRequested { duration: Option<f32> },
    CameraStateRequested {
        state: CameraState,
        duration: Option<f32>,
    },

    // === Floors ===
    /// `None` = alle Floors
    FloorVisibilityRequested {
        floor_id: Option<String>,
        visible: bool,
    },
    FloorsExpandRequested {
        duration: Option<f32>,
        interval: Option<f32>,
    },
    FloorsCollapseRequested { duration: Option<f32> },

    // === Platzierung ===
    MarkerCreateRequested { draft: MarkerDraft },
    LabelCreateRequested { draft: LabelDraft },
    PathCreateRequested { draft: PathDraft },
    TrainCreateRequested { draft: TrainDraft },
    /// Laufende Platzierung bzw. Bearbeitung der Art verwerfen
    CreateCancelled { kind: EntityType },
    PathFinishRequested,
    TrainPathConfirmed,

    // === Bearbeitung ===
    EditStartRequested { kind: EntityType, mode: GizmoMode },
    EditFinishRequested { kind: EntityType },
    GizmoModeChanged { mode: GizmoMode },

    // === Züge ===
    TrainMoveRequested {
        train_id: String,
        phase: TrainPhase,
        duration: Option<f32>,
    },
    TrainProgressChanged { train_id: String, u: f32 },

    // === Verwaltung ===
    /// `id = None` = alle Entities der Art
    EntityVisibilityRequested {
        kind: EntityType,
        id: Option<String>,
        visible: bool,
    },
    EntitiesRemoveRequested {
        kind: EntityType,
        id: Option<String>,
    },
    EntitiesImportRequested {
        kind: EntityType,
        payload: ImportPayload,
    },

    /// Optionen wurden geändert
    OptionsChanged { options: Box<EngineOptions> },
}
