//! Gemeinsame Helfer für Marker- und Label-Platzierung sowie Modell-Instanzen.

use crate::app::picking;
use crate::app::state::EngineState;
use crate::app::subsystems::report_failure;
use crate::asset::{ModelAsset, ModelNodeDesc};
use crate::core::{EntityId, EntityKind, GpuResource, PickLayer, PickShape};
use glam::{Vec2, Vec3};

/// Erzeugt die wartende Vorschau-Entity. Sie ist nicht pickbar und bleibt
/// unsichtbar, bis der Zeiger zum ersten Mal einen Punkt trifft.
pub(crate) fn spawn_preview(
    state: &mut EngineState,
    parent: EntityId,
    name: &str,
    shape: PickShape,
) -> EntityId {
    let id = state.scene.spawn(parent, name, EntityKind::Preview);
    if let Some(node) = state.scene.node_mut(id) {
        node.shape = shape;
        node.layer = PickLayer::Default;
        node.visible = false;
    }
    id
}

/// Setzt die Vorschau auf den Weltpunkt unter dem Zeiger.
pub(crate) fn follow_pointer(state: &mut EngineState, pending: EntityId, screen: Vec2) {
    let Some(point) = picking::pick(
        &state.scene,
        &state.resources,
        &state.camera,
        screen,
        None,
    ) else {
        return;
    };
    state.scene.set_world_position(pending, point);
    state.scene.set_visible(pending, true);
}

/// Ablageort einer Platzierung: Trefferpunkt plus Floor aus der Vorfahrenkette.
///
/// Ohne Treffer oder (bei geladenen Floors) ohne Floor unter dem Zeiger wird
/// `OperationFailed` gemeldet und das Werkzeug bleibt aktiv.
pub(crate) fn resolve_drop(
    state: &mut EngineState,
    operation: &str,
    screen: Vec2,
) -> Option<(Vec3, Option<String>)> {
    let Some(hit) = picking::pick_hit(&state.scene, &state.resources, &state.camera, screen)
    else {
        report_failure(state, operation, "Kein Objekt unter dem Zeiger");
        return None;
    };
    let floor_id = state.floor_of(hit.entity);
    if floor_id.is_none() && !state.floors.is_empty() {
        report_failure(state, operation, "Kein Floor unter dem Zeiger");
        return None;
    }
    Some((hit.point, floor_id))
}

/// Hängt die Meshes eines Bibliotheksmodells unter `parent` (nur Darstellung, nicht pickbar).
pub(crate) fn instantiate_asset(state: &mut EngineState, parent: EntityId, asset: &ModelAsset) {
    for root in &asset.roots {
        spawn_visual(state, parent, root);
    }
}

fn spawn_visual(state: &mut EngineState, parent: EntityId, desc: &ModelNodeDesc) {
    let id = state.scene.spawn(parent, &desc.name, EntityKind::ModelNode);
    if let Some(node) = state.scene.node_mut(id) {
        node.local = desc.transform;
    }
    for (i, mesh) in desc.meshes.iter().enumerate() {
        let part = if i == 0 {
            id
        } else {
            state
                .scene
                .spawn(id, &format!("{}#{}", desc.name, i), EntityKind::ModelNode)
        };
        let handle = state
            .resources
            .register(part, GpuResource::Geometry(mesh.clone()));
        if let Some(node) = state.scene.node_mut(part) {
            node.shape = PickShape::Mesh(handle);
        }
    }
    for child in &desc.children {
        spawn_visual(state, id, child);
    }
}
