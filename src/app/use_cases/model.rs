//! Use-Cases rund um Modell-Assets: Laden, Hierarchie-Abfrage, Vorladen.

use super::{entities, floors};
use crate::app::events::{EngineEvent, HostEvent};
use crate::app::state::{EngineState, LoadedModel};
use crate::app::subsystems::{emit, publish_internal};
use crate::asset::ModelNodeDesc;
use crate::core::{
    EntityId, EntityKind, FloorInfo, GpuResource, PickLayer, PickShape, SceneGroup,
};

/// Lädt ein Facility-Modell und ersetzt das bisherige.
///
/// Lade- und Parse-Fehler verändern die Szene nicht und werden als
/// `ModelLoadFailed` gemeldet.
pub fn load_model(state: &mut EngineState, url: &str) {
    let asset = match state.loader.load(url) {
        Ok(asset) => asset,
        Err(e) => {
            log::warn!("Modell '{}' konnte nicht geladen werden: {:#}", url, e);
            emit(
                state,
                HostEvent::ModelLoadFailed {
                    url: url.to_string(),
                    reason: format!("{e:#}"),
                },
            );
            return;
        }
    };

    unload_model(state);
    let group = state.group(SceneGroup::Model);
    let roots: Vec<EntityId> = asset
        .roots
        .iter()
        .map(|node| spawn_node(state, group, node))
        .collect();
    state.model = Some(LoadedModel {
        url: url.to_string(),
        roots,
    });

    let floor_count = state.floors.len();
    log::info!(
        "Modell '{}' geladen: {} Knoten, {} Floors",
        url,
        asset.node_count(),
        floor_count
    );
    publish_internal(
        state,
        EngineEvent::ModelLoaded {
            url: url.to_string(),
        },
    );
    emit(
        state,
        HostEvent::ModelLoaded {
            url: url.to_string(),
            floor_count,
        },
    );
}

/// Entfernt das aktuelle Modell samt Floors.
pub fn unload_model(state: &mut EngineState) {
    // Marker/Labels hängen während einer Floor-Bewegung an den Floors
    floors::abort_move(state);
    let Some(model) = state.model.take() else {
        return;
    };
    for root in model.roots {
        entities::dispose_entity(state, root);
    }
    state.floors.clear();
    log::debug!("Modell '{}' entladen", model.url);
}

fn spawn_node(state: &mut EngineState, parent: EntityId, desc: &ModelNodeDesc) -> EntityId {
    let kind = match &desc.floor {
        Some(floor) => EntityKind::Floor {
            floor_id: floor.floor_id.clone(),
        },
        None => EntityKind::ModelNode,
    };
    let id = state.scene.spawn(parent, &desc.name, kind);

    if let Some(node) = state.scene.node_mut(id) {
        node.local = desc.transform;
    }
    attach_meshes(state, id, desc);

    if let Some(floor) = &desc.floor {
        let registered = state.floors.insert(FloorInfo {
            floor_id: floor.floor_id.clone(),
            object_name: desc.name.clone(),
            display_name: floor.display_name.clone(),
            sorting_order: floor.sorting_order,
            entity: id,
            source_position: desc.transform.translation,
        });
        if registered {
            state.scene.set_layer(id, PickLayer::Pickable);
        } else if let Some(node) = state.scene.node_mut(id) {
            node.kind = EntityKind::ModelNode;
        }
    }

    for child in &desc.children {
        spawn_node(state, id, child);
    }
    id
}

/// Ein Mesh hängt direkt am Knoten, mehrere als eigene Kind-Knoten.
fn attach_meshes(state: &mut EngineState, id: EntityId, desc: &ModelNodeDesc) {
    match desc.meshes.as_slice() {
        [] => {}
        [mesh] => {
            let handle = state
                .resources
                .register(id, GpuResource::Geometry(mesh.clone()));
            if let Some(node) = state.scene.node_mut(id) {
                node.shape = PickShape::Mesh(handle);
                node.layer = PickLayer::Pickable;
            }
        }
        meshes => {
            for (i, mesh) in meshes.iter().enumerate() {
                let part = state.scene.spawn(
                    id,
                    &format!("{}#{}", desc.name, i),
                    EntityKind::ModelNode,
                );
                let handle = state
                    .resources
                    .register(part, GpuResource::Geometry(mesh.clone()));
                if let Some(node) = state.scene.node_mut(part) {
                    node.shape = PickShape::Mesh(handle);
                    node.layer = PickLayer::Pickable;
                }
            }
        }
    }
}

/// Lädt ein Modell ohne Szenenbezug und meldet dessen Floor-Hierarchie.
pub fn request_hierarchy(state: &mut EngineState, url: &str) {
    match state.loader.load(url) {
        Ok(asset) => {
            let entries = asset.floor_hierarchy();
            log::debug!("Hierarchie von '{}': {} Floors", url, entries.len());
            emit(
                state,
                HostEvent::ModelHierarchy {
                    url: url.to_string(),
                    entries,
                },
            );
        }
        Err(e) => {
            log::warn!("Hierarchie von '{}' nicht lesbar: {:#}", url, e);
            emit(
                state,
                HostEvent::ModelLoadFailed {
                    url: url.to_string(),
                    reason: format!("{e:#}"),
                },
            );
        }
    }
}

/// Lädt ein Marker-/Zugmodell in die Bibliothek (einmal pro URL).
pub fn preload_model(state: &mut EngineState, url: &str) {
    if !state.library.contains(url) {
        match state.loader.load(url) {
            Ok(asset) => {
                log::debug!("Modell '{}' vorgeladen", url);
                state.library.insert(asset);
            }
            Err(e) => {
                log::warn!("Vorladen von '{}' fehlgeschlagen: {:#}", url, e);
                emit(
                    state,
                    HostEvent::ModelLoadFailed {
                        url: url.to_string(),
                        reason: format!("{e:#}"),
                    },
                );
                return;
            }
        }
    }
    emit(
        state,
        HostEvent::ModelPreloaded {
            url: url.to_string(),
        },
    );
}
