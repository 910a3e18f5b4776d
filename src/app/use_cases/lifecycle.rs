//! Initialisierung, Teardown und Laufzeit-Optionen der Engine.

use super::tool_switch;
use crate::app::events::EngineEvent;
use crate::app::state::{
    ActiveTool, EngineState, LabelStore, MarkerStore, PathStore, TrainStore,
};
use crate::app::subsystems::{publish_internal, Subsystem};
use crate::core::SceneGroup;
use crate::shared::EngineOptions;
use glam::Vec2;

/// Legt die Szenen-Gruppen an und registriert die Subsysteme.
/// Ein zweiter Aufruf ist wirkungslos.
pub fn initialize(state: &mut EngineState) {
    if state.initialized {
        log::debug!("Engine bereits initialisiert");
        return;
    }
    for group in SceneGroup::ALL {
        state.scene.ensure_group(group);
    }
    state.subsystems = Subsystem::ALL.to_vec();
    state.initialized = true;
    log::info!(
        "Engine initialisiert ({} Gruppen, {} Subsysteme)",
        SceneGroup::ALL.len(),
        state.subsystems.len()
    );
    publish_internal(state, EngineEvent::EngineInitialized);
}

/// Baut alles ab: Werkzeuge, Tweens, Szene, Ressourcen und Abonnements.
pub fn teardown(state: &mut EngineState) {
    if !state.initialized {
        return;
    }
    tool_switch::set_active_tool(state, ActiveTool::None);
    state.animations.clear();
    state.orbit.stop();
    state.outline.clear();

    let disposed = state.scene.dispose_all(&mut state.resources);
    state.resources.clear();
    state.floors.clear();
    state.model = None;
    state.markers = MarkerStore::default();
    state.labels = LabelStore::default();
    state.paths = PathStore::default();
    state.trains = TrainStore::default();

    state.subsystems.clear();
    state.internal.clear();
    state.external.clear();
    state.initialized = false;
    log::info!("Engine abgebaut, {} Entities entsorgt", disposed.len());
}

/// Übernimmt neue Optionen. Die Button-Belegung wirkt sofort,
/// während der Pfad-Bearbeitung erst nach deren Ende.
pub fn apply_options(state: &mut EngineState, options: EngineOptions) {
    let options = options.sanitized();
    match state.orbit.saved_buttons.as_mut() {
        Some(saved) => *saved = options.buttons,
        None => state.orbit.buttons = options.buttons,
    }
    state.options = options;
    log::debug!("Optionen übernommen");
}

/// Setzt die Viewport-Größe der Kamera (mindestens 1×1 Pixel).
pub fn resize_viewport(state: &mut EngineState, size: Vec2) {
    state.camera.viewport = size.max(Vec2::ONE);
}
