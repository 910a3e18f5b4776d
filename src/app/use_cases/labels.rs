//! Use-Cases für Text-Labels: Billboard aus gerastertem Text, sonst wie Marker.

use super::{entities, placement, tool_switch};
use crate::app::events::{CreateKind, EngineEvent, EntityType, HostEvent};
use crate::app::state::{ActiveTool, EngineState};
use crate::app::subsystems::{emit, publish_internal};
use crate::core::{
    EntityId, EntityKind, GpuResource, LabelData, LabelDraft, LabelRecord, MaterialDesc,
    PickLayer, PickShape, SceneGroup, Transform,
};
use crate::shared::label_text::{rasterize_label, LabelStyle};
use glam::Vec2;

/// Rastert `text`, registriert Textur und Material an `entity` und liefert die Weltgröße.
fn attach_billboard(state: &mut EngineState, entity: EntityId, text: &str) -> Vec2 {
    let style = LabelStyle {
        scale: state.options.label_text_scale,
        ..LabelStyle::default()
    };
    let raster = rasterize_label(text, &style);
    let size = Vec2::new(raster.width_px as f32, raster.height_px as f32)
        * state.options.label_world_per_pixel;

    let texture = state
        .resources
        .register(entity, GpuResource::Texture(raster.image));
    let material = state.resources.register(
        entity,
        GpuResource::Material(MaterialDesc {
            texture: Some(texture),
            double_sided: true,
            ..MaterialDesc::default()
        }),
    );
    if let Some(node) = state.scene.node_mut(entity) {
        node.shape = PickShape::Billboard { size };
        node.material = Some(material);
    }
    size
}

/// Startet die Label-Platzierung.
pub fn begin_placement(state: &mut EngineState, draft: LabelDraft) {
    tool_switch::set_active_tool(state, ActiveTool::PlacingLabel);
    let group = state.group(SceneGroup::Label);
    let pending = placement::spawn_preview(state, group, "label-preview", PickShape::None);
    attach_billboard(state, pending, &draft.text);
    state.editor.label_placement.begin(draft, pending);
    publish_internal(
        state,
        EngineEvent::CreateStarted {
            kind: CreateKind::Label,
        },
    );
}

/// Wartendes Label folgt dem Zeiger.
pub fn follow_pointer(state: &mut EngineState, screen: Vec2) {
    if let Some(pending) = state.editor.label_placement.pending() {
        placement::follow_pointer(state, pending, screen);
    }
}

/// Setzt das wartende Label an der Klickposition ab.
pub fn place(state: &mut EngineState, screen: Vec2) {
    let Some((point, floor_id)) = placement::resolve_drop(state, "CreateLabel", screen) else {
        return;
    };
    let Some((draft, entity)) = state.editor.label_placement.complete() else {
        return;
    };

    let id = state
        .labels
        .ids
        .next_free(|candidate| state.labels.records.contains_key(candidate));
    let size = match state.scene.node_mut(entity) {
        Some(node) => {
            node.kind = EntityKind::Label {
                label_id: id.clone(),
            };
            node.name = id.clone();
            node.layer = PickLayer::Pickable;
            match node.shape {
                PickShape::Billboard { size } => size,
                _ => Vec2::ZERO,
            }
        }
        None => Vec2::ZERO,
    };
    state.scene.set_world_position(entity, point);
    state.scene.set_visible(entity, true);

    state.labels.records.insert(
        id.clone(),
        LabelRecord {
            id: id.clone(),
            text: draft.text,
            properties: draft.properties,
            floor_id,
            entity,
            size,
        },
    );
    tool_switch::set_active_tool(state, ActiveTool::None);

    log::info!("Label '{}' platziert", id);
    if let Some(data) = export_one(state, &id) {
        emit(state, HostEvent::LabelCreated { data });
    }
}

pub fn export_one(state: &EngineState, id: &str) -> Option<LabelData> {
    let record = state.labels.records.get(id)?;
    let world = state.scene.world_transform(record.entity);
    Some(LabelData {
        id: record.id.clone(),
        text: record.text.clone(),
        properties: record.properties.clone(),
        position: world.translation,
        rotation: world.rotation,
        scale: world.scale,
        floor_id: record.floor_id.clone(),
    })
}

pub fn export(state: &EngineState, id: Option<&str>) -> Vec<LabelData> {
    match id {
        Some(id) => export_one(state, id).into_iter().collect(),
        None => state
            .labels
            .records
            .keys()
            .filter_map(|id| export_one(state, id))
            .collect(),
    }
}

/// Baut Labels aus Exportdaten auf; vorhandene IDs werden ersetzt.
pub fn import(state: &mut EngineState, items: Vec<serde_json::Value>) -> usize {
    let mut imported = 0;
    for item in items {
        let Some(data) = entities::parse_item::<LabelData>(state, EntityType::Label, item) else {
            continue;
        };
        remove_one(state, &data.id);

        let group = state.group(SceneGroup::Label);
        let entity = state.scene.spawn(
            group,
            &data.id,
            EntityKind::Label {
                label_id: data.id.clone(),
            },
        );
        let size = attach_billboard(state, entity, &data.text);
        state.scene.set_layer(entity, PickLayer::Pickable);
        state.scene.set_world_transform(
            entity,
            Transform::from_trs(data.position, data.rotation, data.scale),
        );
        if !state.floor_visible(data.floor_id.as_deref()) {
            state.scene.set_visible(entity, false);
        }

        state.labels.records.insert(
            data.id.clone(),
            LabelRecord {
                id: data.id,
                text: data.text,
                properties: data.properties,
                floor_id: data.floor_id,
                entity,
                size,
            },
        );
        imported += 1;
    }
    imported
}

fn ids_for(state: &EngineState, id: Option<&str>) -> Vec<String> {
    match id {
        Some(id) => vec![id.to_string()],
        None => state.labels.records.keys().cloned().collect(),
    }
}

pub fn set_visibility(state: &mut EngineState, id: Option<&str>, visible: bool) {
    for id in ids_for(state, id) {
        let Some(entity) = state.labels.records.get(&id).map(|r| r.entity) else {
            log::warn!("Unbekanntes Label '{}'", id);
            continue;
        };
        state.scene.set_visible(entity, visible);
        state.scene.set_layer(
            entity,
            if visible {
                PickLayer::Pickable
            } else {
                PickLayer::Invisible
            },
        );
    }
}

pub fn remove(state: &mut EngineState, id: Option<&str>) {
    for id in ids_for(state, id) {
        remove_one(state, &id);
    }
}

fn remove_one(state: &mut EngineState, id: &str) {
    let edited = state
        .editor
        .label_edit
        .target()
        .is_some_and(|target| target.id == id);
    if edited {
        tool_switch::set_active_tool(state, ActiveTool::None);
    }
    if let Some(record) = state.labels.records.shift_remove(id) {
        entities::dispose_entity(state, record.entity);
        log::debug!("Label '{}' entfernt", id);
    }
}

/// Reaktion auf interne Events (Floor-Bewegung und -Sichtbarkeit).
pub fn on_engine_event(state: &mut EngineState, event: &EngineEvent) {
    match event {
        EngineEvent::FloorsBeforeMove => {
            for (entity, floor_id) in floor_bound(state) {
                if let Some(floor) = state.floors.entity_of(&floor_id) {
                    state.scene.reparent_keep_world(entity, floor);
                }
            }
        }
        EngineEvent::FloorsAfterMove { .. } => {
            let group = state.group(SceneGroup::Label);
            for (entity, _) in floor_bound(state) {
                state.scene.reparent_keep_world(entity, group);
            }
        }
        EngineEvent::FloorVisibilityChanged { floor_id, visible } => {
            for (entity, label_floor) in floor_bound(state) {
                if label_floor == *floor_id {
                    state.scene.set_visible(entity, *visible);
                }
            }
        }
        _ => {}
    }
}

fn floor_bound(state: &EngineState) -> Vec<(EntityId, String)> {
    state
        .labels
        .records
        .values()
        .filter_map(|r| r.floor_id.clone().map(|floor| (r.entity, floor)))
        .collect()
}
