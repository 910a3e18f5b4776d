//! `SceneAuthoringContext`: öffentliche Engine-Fassade für die Host-Anwendung.
//!
//! Besitzt State und Controller einer Engine-Instanz. Mutationen laufen als
//! Intents durch den Controller; Abschluss-Callbacks des Hosts werden in
//! einer Registry gehalten, die den externen Kanal abonniert.

use super::animation::AnimationKey;
use super::controller::AuthoringController;
use super::events::{
    CameraAction, EngineEvent, EngineIntent, EntityType, HostEvent, ImportPayload,
    SubscriptionId,
};
use super::state::EngineState;
use super::tools::GizmoMode;
use super::use_cases;
use crate::asset::ModelLoader;
use crate::core::{
    CameraState, FloorHierarchyEntry, LabelData, LabelDraft, MarkerDraft, PathData, PathDraft,
    PoiData, TrainData, TrainDraft, TrainPhase,
};
use crate::shared::{EngineOptions, PointerButton, PointerInfo, RenderScene};
use glam::Vec2;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;

/// Wofür ein Abschluss-Callback wartet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CompletionKey {
    ModelLoad(String),
    Hierarchy(String),
    Floors,
    Marker,
    Label,
    Path,
    Train,
    TrainMove(String),
}

impl CompletionKey {
    /// Schlüssel, die ein Host-Event abschließt.
    fn resolved_by(event: &HostEvent) -> Vec<CompletionKey> {
        match event {
            HostEvent::ModelLoaded { url, .. } => vec![CompletionKey::ModelLoad(url.clone())],
            HostEvent::ModelHierarchy { url, .. } => vec![CompletionKey::Hierarchy(url.clone())],
            HostEvent::ModelLoadFailed { url, .. } => vec![
                CompletionKey::ModelLoad(url.clone()),
                CompletionKey::Hierarchy(url.clone()),
            ],
            HostEvent::FloorsMoveFinished { .. } => vec![CompletionKey::Floors],
            HostEvent::MarkerCreated { .. } => vec![CompletionKey::Marker],
            HostEvent::LabelCreated { .. } => vec![CompletionKey::Label],
            HostEvent::PathFinished { .. } => vec![CompletionKey::Path],
            HostEvent::TrainCreated { .. } => vec![CompletionKey::Train],
            HostEvent::TrainMoveFinished { train_id, .. } => {
                vec![CompletionKey::TrainMove(train_id.clone())]
            }
            _ => Vec::new(),
        }
    }

    fn for_creation(kind: EntityType) -> CompletionKey {
        match kind {
            EntityType::Marker => CompletionKey::Marker,
            EntityType::Label => CompletionKey::Label,
            EntityType::Path => CompletionKey::Path,
            EntityType::Train => CompletionKey::Train,
        }
    }
}

type Completion = Box<dyn FnOnce(&HostEvent)>;

/// Ausstehende Host-Callbacks; je Schlüssel höchstens einer.
#[derive(Default)]
struct CompletionRegistry {
    pending: IndexMap<CompletionKey, Completion>,
    /// Zähler der gesehenen `OperationFailed`-Events
    failures: u64,
}

impl CompletionRegistry {
    fn register(&mut self, key: CompletionKey, completion: Completion) {
        if self.pending.insert(key.clone(), completion).is_some() {
            log::debug!("Callback für {:?} ersetzt", key);
        }
    }

    fn cancel(&mut self, key: &CompletionKey) {
        self.pending.shift_remove(key);
    }

    fn take_for(&mut self, event: &HostEvent) -> Vec<Completion> {
        CompletionKey::resolved_by(event)
            .iter()
            .filter_map(|key| self.pending.shift_remove(key))
            .collect()
    }

    fn len(&self) -> usize {
        self.pending.len()
    }
}

/// Eine Engine-Instanz mit allen Werkzeugen, Subsystemen und Event-Kanälen.
pub struct SceneAuthoringContext {
    state: EngineState,
    controller: AuthoringController,
    completions: Rc<RefCell<CompletionRegistry>>,
}

impl SceneAuthoringContext {
    /// Erstellt und initialisiert einen Kontext.
    pub fn new(options: EngineOptions, loader: Box<dyn ModelLoader>) -> Self {
        let mut context = Self {
            state: EngineState::with_loader(options, loader),
            controller: AuthoringController::new(),
            completions: Rc::new(RefCell::new(CompletionRegistry::default())),
        };
        context.init();
        context
    }

    /// Legt Gruppen und Subsysteme an und verbindet die Callback-Registry.
    /// Nach `teardown` erneut aufrufbar.
    pub fn init(&mut self) {
        if self.state.initialized {
            return;
        }
        use_cases::lifecycle::initialize(&mut self.state);
        let registry = Rc::clone(&self.completions);
        self.state.external.subscribe(move |event: &HostEvent| {
            let ready = {
                let mut registry = registry.borrow_mut();
                if matches!(event, HostEvent::OperationFailed { .. }) {
                    registry.failures += 1;
                }
                registry.take_for(event)
            };
            for completion in ready {
                completion(event);
            }
        });
    }

    /// Entsorgt Szene, Ressourcen, Abonnements und offene Callbacks.
    pub fn teardown(&mut self) {
        use_cases::lifecycle::teardown(&mut self.state);
        self.completions.borrow_mut().pending.clear();
    }

    pub fn is_initialized(&self) -> bool {
        self.state.initialized
    }

    /// Read-only Zugriff auf den Engine-Zustand.
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Anzahl noch ausstehender Host-Callbacks.
    pub fn pending_callbacks(&self) -> usize {
        self.completions.borrow().len()
    }

    fn dispatch(&mut self, intent: EngineIntent) -> anyhow::Result<()> {
        self.controller.handle_intent(&mut self.state, intent)
    }

    /// Registriert den Callback und dispatcht die Anfrage. Scheitert sie sofort
    /// (Fehler oder `OperationFailed` während des Dispatch), wird der Callback verworfen.
    fn dispatch_with_completion(
        &mut self,
        key: CompletionKey,
        completion: impl FnOnce(&HostEvent) + 'static,
        intent: EngineIntent,
    ) -> anyhow::Result<()> {
        let failures = {
            let mut registry = self.completions.borrow_mut();
            registry.register(key.clone(), Box::new(completion));
            registry.failures
        };
        let result = self.dispatch(intent);
        let mut registry = self.completions.borrow_mut();
        if result.is_err() || registry.failures != failures {
            log::debug!("Callback für {:?} verworfen", key);
            registry.cancel(&key);
        }
        result
    }

    // === Abonnements ===

    /// Abonniert den externen Kanal.
    pub fn subscribe(&mut self, handler: impl FnMut(&HostEvent) + 'static) -> SubscriptionId {
        self.state.external.subscribe(handler)
    }

    /// Abonniert den internen Kanal.
    pub fn subscribe_internal(
        &mut self,
        handler: impl FnMut(&EngineEvent) + 'static,
    ) -> SubscriptionId {
        self.state.internal.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.state.external.unsubscribe(id)
    }

    pub fn unsubscribe_internal(&mut self, id: SubscriptionId) -> bool {
        self.state.internal.unsubscribe(id)
    }

    // === Frame & Eingabe ===

    pub fn advance_frame(&mut self, dt: f32) -> anyhow::Result<()> {
        self.dispatch(EngineIntent::FrameAdvanced { dt })
    }

    pub fn resize(&mut self, size: Vec2) -> anyhow::Result<()> {
        self.dispatch(EngineIntent::ViewportResized { size })
    }

    pub fn pointer_down(&mut self, screen: Vec2, button: PointerButton) -> anyhow::Result<()> {
        self.dispatch(EngineIntent::PointerPressed {
            pointer: PointerInfo::new(screen, button),
        })
    }

    pub fn pointer_move(&mut self, screen: Vec2, button: PointerButton) -> anyhow::Result<()> {
        self.dispatch(EngineIntent::PointerMoved {
            pointer: PointerInfo::new(screen, button),
        })
    }

    pub fn pointer_up(&mut self, screen: Vec2, button: PointerButton) -> anyhow::Result<()> {
        self.dispatch(EngineIntent::PointerReleased {
            pointer: PointerInfo::new(screen, button),
        })
    }

    /// Klick ohne Bewegung (Down und Up an derselben Stelle).
    pub fn click(&mut self, screen: Vec2, button: PointerButton) -> anyhow::Result<()> {
        self.pointer_down(screen, button)?;
        self.pointer_up(screen, button)
    }

    pub fn wheel(&mut self, screen: Vec2, delta: f32) -> anyhow::Result<()> {
        self.dispatch(EngineIntent::WheelScrolled { screen, delta })
    }

    // === Modell ===

    /// Lädt das Facility-Modell. `on_load` erhält die Floor-Anzahl oder den Fehlergrund.
    pub fn load_model(
        &mut self,
        url: &str,
        on_load: impl FnOnce(Result<usize, String>) + 'static,
    ) -> anyhow::Result<()> {
        self.dispatch_with_completion(
            CompletionKey::ModelLoad(url.to_string()),
            move |event| {
                match event {
                    HostEvent::ModelLoaded { floor_count, .. } => on_load(Ok(*floor_count)),
                    HostEvent::ModelLoadFailed { reason, .. } => on_load(Err(reason.clone())),
                    _ => {}
                }
            },
            EngineIntent::LoadModelRequested {
                url: url.to_string(),
            },
        )
    }

    /// Liest die Floor-Hierarchie eines Modells, ohne die Szene zu verändern.
    pub fn get_model_hierarchy(
        &mut self,
        url: &str,
        on_complete: impl FnOnce(Vec<FloorHierarchyEntry>) + 'static,
    ) -> anyhow::Result<()> {
        self.dispatch_with_completion(
            CompletionKey::Hierarchy(url.to_string()),
            move |event| {
                if let HostEvent::ModelHierarchy { entries, .. } = event {
                    on_complete(entries.clone());
                }
            },
            EngineIntent::ModelHierarchyRequested {
                url: url.to_string(),
            },
        )
    }

    /// Lädt ein Marker- oder Zugmodell in die Bibliothek.
    pub fn preload_model(&mut self, url: &str) -> anyhow::Result<()> {
        self.dispatch(EngineIntent::PreloadModelRequested {
            url: url.to_string(),
        })
    }

    // === Kamera ===

    pub fn set_camera_enabled(&mut self, enabled: bool) -> anyhow::Result<()> {
        self.dispatch(EngineIntent::CameraEnabledChanged { enabled })
    }

    pub fn set_rotate_button(&mut self, button: Option<PointerButton>) -> anyhow::Result<()> {
        self.dispatch(EngineIntent::CameraButtonChanged {
            action: CameraAction::Rotate,
            button,
        })
    }

    pub fn set_pan_button(&mut self, button: Option<PointerButton>) -> anyhow::Result<()> {
        self.dispatch(EngineIntent::CameraButtonChanged {
            action: CameraAction::Pan,
            button,
        })
    }

    pub fn set_drag_zoom_button(&mut self, button: Option<PointerButton>) -> anyhow::Result<()> {
        self.dispatch(EngineIntent::CameraButtonChanged {
            action: CameraAction::DragZoom,
            button,
        })
    }

    /// Rahmt das geladene Modell ein.
    pub fn extend_view(&mut self, duration: Option<f32>) -> anyhow::Result<()> {
        self.dispatch(EngineIntent::ExtendViewRequested { duration })
    }

    pub fn camera_state(&self) -> CameraState {
        self.state.camera.state()
    }

    pub fn set_camera_state(
        &mut self,
        state: CameraState,
        duration: Option<f32>,
    ) -> anyhow::Result<()> {
        self.dispatch(EngineIntent::CameraStateRequested { state, duration })
    }

    // === Floors ===

    /// Zeigt bzw. verbirgt einen Floor (`None` = alle).
    pub fn set_floor_visibility(&mut self, floor_id: Option<&str>, visible: bool) -> anyhow::Result<()> {
        self.dispatch(EngineIntent::FloorVisibilityRequested {
            floor_id: floor_id.map(str::to_string),
            visible,
        })
    }

    /// Fächert die Floors auf; `on_complete` läuft nach dem letzten Frame.
    pub fn expand_floors(
        &mut self,
        duration: Option<f32>,
        interval: Option<f32>,
        on_complete: impl FnOnce() + 'static,
    ) -> anyhow::Result<()> {
        self.dispatch_floor_move(
            EngineIntent::FloorsExpandRequested { duration, interval },
            on_complete,
        )
    }

    pub fn collapse_floors(
        &mut self,
        duration: Option<f32>,
        on_complete: impl FnOnce() + 'static,
    ) -> anyhow::Result<()> {
        self.dispatch_floor_move(EngineIntent::FloorsCollapseRequested { duration }, on_complete)
    }

    /// Während einer laufenden Bewegung bleibt deren Callback bestehen.
    fn dispatch_floor_move(
        &mut self,
        intent: EngineIntent,
        on_complete: impl FnOnce() + 'static,
    ) -> anyhow::Result<()> {
        if self.state.animations.is_active(&AnimationKey::Floors) {
            return self.dispatch(intent);
        }
        self.dispatch_with_completion(CompletionKey::Floors, move |_| on_complete(), intent)
    }

    // === Platzierung ===

    pub fn create_marker(
        &mut self,
        draft: MarkerDraft,
        on_complete: impl FnOnce(PoiData) + 'static,
    ) -> anyhow::Result<()> {
        self.dispatch_with_completion(
            CompletionKey::Marker,
            move |event| {
                if let HostEvent::MarkerCreated { data } = event {
                    on_complete(data.clone());
                }
            },
            EngineIntent::MarkerCreateRequested { draft },
        )
    }

    pub fn create_label(
        &mut self,
        draft: LabelDraft,
        on_complete: impl FnOnce(LabelData) + 'static,
    ) -> anyhow::Result<()> {
        self.dispatch_with_completion(
            CompletionKey::Label,
            move |event| {
                if let HostEvent::LabelCreated { data } = event {
                    on_complete(data.clone());
                }
            },
            EngineIntent::LabelCreateRequested { draft },
        )
    }

    pub fn create_path(
        &mut self,
        draft: PathDraft,
        on_complete: impl FnOnce(PathData) + 'static,
    ) -> anyhow::Result<()> {
        self.dispatch_with_completion(
            CompletionKey::Path,
            move |event| {
                if let HostEvent::PathFinished { data } = event {
                    on_complete(data.clone());
                }
            },
            EngineIntent::PathCreateRequested { draft },
        )
    }

    pub fn finish_path(&mut self) -> anyhow::Result<()> {
        self.dispatch(EngineIntent::PathFinishRequested)
    }

    pub fn create_train(
        &mut self,
        draft: TrainDraft,
        on_complete: impl FnOnce(TrainData) + 'static,
    ) -> anyhow::Result<()> {
        self.dispatch_with_completion(
            CompletionKey::Train,
            move |event| {
                if let HostEvent::TrainCreated { data } = event {
                    on_complete(data.clone());
                }
            },
            EngineIntent::TrainCreateRequested { draft },
        )
    }

    pub fn confirm_train_path(&mut self) -> anyhow::Result<()> {
        self.dispatch(EngineIntent::TrainPathConfirmed)
    }

    /// Bricht Platzierung bzw. Bearbeitung der Art ab und verwirft deren Callback.
    pub fn cancel(&mut self, kind: EntityType) -> anyhow::Result<()> {
        self.completions
            .borrow_mut()
            .cancel(&CompletionKey::for_creation(kind));
        self.dispatch(EngineIntent::CreateCancelled { kind })
    }

    // === Bearbeitung ===

    pub fn start_edit(&mut self, kind: EntityType, mode: GizmoMode) -> anyhow::Result<()> {
        self.dispatch(EngineIntent::EditStartRequested { kind, mode })
    }

    pub fn finish_edit(&mut self, kind: EntityType) -> anyhow::Result<()> {
        self.dispatch(EngineIntent::EditFinishRequested { kind })
    }

    pub fn set_gizmo_mode(&mut self, mode: GizmoMode) -> anyhow::Result<()> {
        self.dispatch(EngineIntent::GizmoModeChanged { mode })
    }

    // === Züge ===

    /// Einfahrt bis zum Halt.
    pub fn do_enter(
        &mut self,
        train_id: &str,
        duration: Option<f32>,
        on_complete: impl FnOnce() + 'static,
    ) -> anyhow::Result<()> {
        self.move_train(train_id, TrainPhase::Enter, duration, on_complete)
    }

    /// Ausfahrt bis zum Pfadende.
    pub fn do_exit(
        &mut self,
        train_id: &str,
        duration: Option<f32>,
        on_complete: impl FnOnce() + 'static,
    ) -> anyhow::Result<()> {
        self.move_train(train_id, TrainPhase::Exit, duration, on_complete)
    }

    fn move_train(
        &mut self,
        train_id: &str,
        phase: TrainPhase,
        duration: Option<f32>,
        on_complete: impl FnOnce() + 'static,
    ) -> anyhow::Result<()> {
        self.dispatch_with_completion(
            CompletionKey::TrainMove(train_id.to_string()),
            move |_| on_complete(),
            EngineIntent::TrainMoveRequested {
                train_id: train_id.to_string(),
                phase,
                duration,
            },
        )
    }

    pub fn set_train_progress(&mut self, train_id: &str, u: f32) -> anyhow::Result<()> {
        self.dispatch(EngineIntent::TrainProgressChanged {
            train_id: train_id.to_string(),
            u,
        })
    }

    // === Verwaltung ===

    pub fn show(&mut self, kind: EntityType, id: &str) -> anyhow::Result<()> {
        self.set_visibility(kind, Some(id), true)
    }

    pub fn hide(&mut self, kind: EntityType, id: &str) -> anyhow::Result<()> {
        self.set_visibility(kind, Some(id), false)
    }

    pub fn show_all(&mut self, kind: EntityType) -> anyhow::Result<()> {
        self.set_visibility(kind, None, true)
    }

    pub fn hide_all(&mut self, kind: EntityType) -> anyhow::Result<()> {
        self.set_visibility(kind, None, false)
    }

    fn set_visibility(&mut self, kind: EntityType, id: Option<&str>, visible: bool) -> anyhow::Result<()> {
        self.dispatch(EngineIntent::EntityVisibilityRequested {
            kind,
            id: id.map(str::to_string),
            visible,
        })
    }

    pub fn remove(&mut self, kind: EntityType, id: &str) -> anyhow::Result<()> {
        self.dispatch(EngineIntent::EntitiesRemoveRequested {
            kind,
            id: Some(id.to_string()),
        })
    }

    /// Entfernt alle Entities der Art.
    pub fn clear(&mut self, kind: EntityType) -> anyhow::Result<()> {
        self.dispatch(EngineIntent::EntitiesRemoveRequested { kind, id: None })
    }

    /// Exportiert eine Entity als JSON-Liste mit einem Eintrag.
    pub fn export(&self, kind: EntityType, id: &str) -> anyhow::Result<serde_json::Value> {
        Ok(use_cases::entities::export(&self.state, kind, Some(id))?)
    }

    pub fn export_all(&self, kind: EntityType) -> anyhow::Result<serde_json::Value> {
        Ok(use_cases::entities::export(&self.state, kind, None)?)
    }

    pub fn import(&mut self, kind: EntityType, payload: ImportPayload) -> anyhow::Result<()> {
        self.dispatch(EngineIntent::EntitiesImportRequested { kind, payload })
    }

    // === Optionen & Rendering ===

    pub fn apply_options(&mut self, options: EngineOptions) -> anyhow::Result<()> {
        self.dispatch(EngineIntent::OptionsChanged {
            options: Box::new(options),
        })
    }

    pub fn render_scene(&self) -> RenderScene {
        self.controller.build_render_scene(&self.state)
    }
}

impl Drop for SceneAuthoringContext {
    fn drop(&mut self) {
        self.teardown();
    }
}
