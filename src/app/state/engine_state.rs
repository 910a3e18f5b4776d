use super::{
    EditorState, LabelStore, MarkerStore, ModelLibrary, OrbitState, OutlineState, PathStore,
    PointerState, TrainStore,
};
use crate::app::animation::AnimationSlots;
use crate::app::events::{EngineEvent, EventBus, HostEvent};
use crate::app::subsystems::Subsystem;
use crate::asset::{MemoryModelLoader, ModelLoader};
use crate::core::{
    Camera3D, EntityId, FloorRegistry, ResourceArena, SceneGraph, SceneGroup,
};
use crate::shared::EngineOptions;

/// Aktuell geladenes Facility-Modell.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedModel {
    pub url: String,
    /// Wurzel-Entities des Modells in der Modell-Gruppe
    pub roots: Vec<EntityId>,
}

/// Zentraler Engine-Zustand.
///
/// Besitzt Szenengraph, Ressourcen, Kamera, alle Werkzeuge und beide Event-Kanäle.
/// Mutationen laufen ausschließlich über Controller → Use-Cases.
pub struct EngineState {
    pub options: EngineOptions,
    pub scene: SceneGraph,
    pub resources: ResourceArena,
    pub camera: Camera3D,
    pub orbit: OrbitState,
    pub pointer: PointerState,
    pub outline: OutlineState,
    pub editor: EditorState,
    pub floors: FloorRegistry,
    pub model: Option<LoadedModel>,
    pub library: ModelLibrary,
    pub markers: MarkerStore,
    pub labels: LabelStore,
    pub paths: PathStore,
    pub trains: TrainStore,
    pub animations: AnimationSlots,
    /// Interner Kanal (Subsysteme und Beobachter)
    pub internal: EventBus<EngineEvent>,
    /// Externer Kanal (Host-Anwendung)
    pub external: EventBus<HostEvent>,
    /// Registrierte Reaktionen auf interne Events, in Aufrufreihenfolge
    pub subsystems: Vec<Subsystem>,
    pub loader: Box<dyn ModelLoader>,
    pub initialized: bool,
}

impl EngineState {
    /// Erstellt einen leeren State mit In-Memory-Lader und Standardoptionen.
    pub fn new() -> Self {
        Self::with_loader(EngineOptions::default(), Box::new(MemoryModelLoader::new()))
    }

    /// Erstellt einen State mit eigenen Optionen und Modell-Lader.
    /// Szenen-Gruppen und Subsysteme werden erst bei der Initialisierung angelegt.
    pub fn with_loader(options: EngineOptions, loader: Box<dyn ModelLoader>) -> Self {
        let options = options.sanitized();
        Self {
            orbit: OrbitState::new(options.buttons),
            options,
            scene: SceneGraph::new(),
            resources: ResourceArena::new(),
            camera: Camera3D::new(),
            pointer: PointerState::default(),
            outline: OutlineState::default(),
            editor: EditorState::new(),
            floors: FloorRegistry::new(),
            model: None,
            library: ModelLibrary::default(),
            markers: MarkerStore::default(),
            labels: LabelStore::default(),
            paths: PathStore::default(),
            trains: TrainStore::default(),
            animations: AnimationSlots::new(),
            internal: EventBus::new(),
            external: EventBus::new(),
            subsystems: Vec::new(),
            loader,
            initialized: false,
        }
    }

    /// Entity einer festen Gruppe (legt sie bei Bedarf an).
    pub fn group(&mut self, group: SceneGroup) -> EntityId {
        self.scene.ensure_group(group)
    }

    /// Weltmatrix eines Floors, falls bekannt.
    pub fn floor_world(&self, floor_id: &str) -> Option<glam::Mat4> {
        self.floors
            .entity_of(floor_id)
            .map(|entity| self.scene.world_matrix(entity))
    }

    /// Floor-ID unter einer Entity (erster Floor-Vorfahr).
    pub fn floor_of(&self, entity: EntityId) -> Option<String> {
        let floor_entity = self.scene.find_ancestor(entity, |node| {
            matches!(node.kind, crate::core::EntityKind::Floor { .. })
        })?;
        self.floors.floor_of_entity(floor_entity).map(str::to_string)
    }

    /// Sichtbarkeit des Floors (`true` ohne Floor-Bezug).
    pub fn floor_visible(&self, floor_id: Option<&str>) -> bool {
        floor_id
            .and_then(|id| self.floors.entity_of(id))
            .is_none_or(|entity| self.scene.is_visible_in_hierarchy(entity))
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::new()
    }
}
