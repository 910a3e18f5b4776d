//! Use-Cases für Marker (POIs): Platzierung, Sichtbarkeit, Entfernen, Import/Export.

use super::{entities, placement, tool_switch};
use crate::app::events::{CreateKind, EngineEvent, EntityType, HostEvent};
use crate::app::state::{ActiveTool, EngineState, MarkerStore};
use crate::app::subsystems::{emit, publish_internal, report_failure};
use crate::core::{
    EntityId, EntityKind, MarkerDraft, PickLayer, PickShape, PoiData, PoiRecord, SceneGroup,
    Transform,
};
use glam::{Vec2, Vec3};

/// Startet die Marker-Platzierung. Ein referenziertes Modell muss vorgeladen sein.
pub fn begin_placement(state: &mut EngineState, draft: MarkerDraft) {
    if let Some(model) = &draft.model {
        if !state.library.contains(model) {
            let reason = format!("Modell '{model}' ist nicht vorgeladen");
            report_failure(state, "CreateMarker", reason);
            return;
        }
    }

    tool_switch::set_active_tool(state, ActiveTool::PlacingMarker);
    let shape = marker_shape(state, draft.model.as_deref());
    let group = state.group(SceneGroup::Marker);
    let pending = placement::spawn_preview(state, group, "marker-preview", shape);
    state.editor.marker_placement.begin(draft, pending);
    publish_internal(
        state,
        EngineEvent::CreateStarted {
            kind: CreateKind::Marker,
        },
    );
}

fn marker_shape(state: &EngineState, model: Option<&str>) -> PickShape {
    match model.and_then(|url| state.library.bounds(url)) {
        Some(bounds) => PickShape::Box(bounds),
        None => PickShape::Billboard {
            size: Vec2::splat(state.options.marker_icon_size),
        },
    }
}

/// Wartender Marker folgt dem Zeiger.
pub fn follow_pointer(state: &mut EngineState, screen: Vec2) {
    if let Some(pending) = state.editor.marker_placement.pending() {
        placement::follow_pointer(state, pending, screen);
    }
}

/// Setzt den wartenden Marker an der Klickposition ab.
pub fn place(state: &mut EngineState, screen: Vec2) {
    let Some((point, floor_id)) = placement::resolve_drop(state, "CreateMarker", screen) else {
        return;
    };
    let Some((draft, entity)) = state.editor.marker_placement.complete() else {
        return;
    };

    let id = state
        .markers
        .ids
        .next_free(|candidate| state.markers.records.contains_key(candidate));
    promote(state, entity, &id);
    state.scene.set_world_position(entity, point);
    state.scene.set_visible(entity, true);

    state.markers.records.insert(
        id.clone(),
        PoiRecord {
            id: id.clone(),
            icon: draft.icon,
            model: draft.model,
            text: draft.text,
            properties: draft.properties,
            floor_id,
            entity,
        },
    );
    rebuild_batches(state);
    tool_switch::set_active_tool(state, ActiveTool::None);

    log::info!("Marker '{}' platziert", id);
    if let Some(data) = export_one(state, &id) {
        emit(state, HostEvent::MarkerCreated { data });
    }
}

/// Macht aus einer Vorschau-Entity einen pickbaren Marker.
fn promote(state: &mut EngineState, entity: EntityId, id: &str) {
    if let Some(node) = state.scene.node_mut(entity) {
        node.kind = EntityKind::Marker {
            poi_id: id.to_string(),
        };
        node.name = id.to_string();
        node.layer = PickLayer::Pickable;
    }
}

/// Exportdaten eines Markers (Welt-Transformation).
pub fn export_one(state: &EngineState, id: &str) -> Option<PoiData> {
    let record = state.markers.records.get(id)?;
    let world = state.scene.world_transform(record.entity);
    Some(PoiData {
        id: record.id.clone(),
        icon: record.icon.clone(),
        model: record.model.clone(),
        text: record.text.clone(),
        properties: record.properties.clone(),
        position: world.translation,
        rotation: world.rotation,
        scale: world.scale,
        floor_id: record.floor_id.clone(),
    })
}

/// Exportiert einen Marker oder alle.
pub fn export(state: &EngineState, id: Option<&str>) -> Vec<PoiData> {
    match id {
        Some(id) => export_one(state, id).into_iter().collect(),
        None => state
            .markers
            .records
            .keys()
            .filter_map(|id| export_one(state, id))
            .collect(),
    }
}

/// Baut Marker aus Exportdaten auf; vorhandene IDs werden ersetzt.
pub fn import(state: &mut EngineState, items: Vec<serde_json::Value>) -> usize {
    let mut imported = 0;
    for item in items {
        let Some(data) = entities::parse_item::<PoiData>(state, EntityType::Marker, item) else {
            continue;
        };
        if let Some(model) = &data.model {
            if !state.library.contains(model) {
                let reason = format!("Marker '{}': Modell '{}' nicht vorgeladen", data.id, model);
                report_failure(state, EntityType::Marker.import_operation(), reason);
                continue;
            }
        }
        remove_one(state, &data.id);

        let shape = marker_shape(state, data.model.as_deref());
        let group = state.group(SceneGroup::Marker);
        let entity = state.scene.spawn(
            group,
            &data.id,
            EntityKind::Marker {
                poi_id: data.id.clone(),
            },
        );
        if let Some(node) = state.scene.node_mut(entity) {
            node.shape = shape;
            node.layer = PickLayer::Pickable;
        }
        state.scene.set_world_transform(
            entity,
            Transform::from_trs(data.position, data.rotation, data.scale),
        );
        if !state.floor_visible(data.floor_id.as_deref()) {
            state.scene.set_visible(entity, false);
        }

        state.markers.records.insert(
            data.id.clone(),
            PoiRecord {
                id: data.id,
                icon: data.icon,
                model: data.model,
                text: data.text,
                properties: data.properties,
                floor_id: data.floor_id,
                entity,
            },
        );
        imported += 1;
    }
    rebuild_batches(state);
    imported
}

fn ids_for(state: &EngineState, id: Option<&str>) -> Vec<String> {
    match id {
        Some(id) => vec![id.to_string()],
        None => state.markers.records.keys().cloned().collect(),
    }
}

/// Zeigt oder verbirgt einen Marker (oder alle).
pub fn set_visibility(state: &mut EngineState, id: Option<&str>, visible: bool) {
    for id in ids_for(state, id) {
        let Some(entity) = state.markers.records.get(&id).map(|r| r.entity) else {
            log::warn!("Unbekannter Marker '{}'", id);
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
    rebuild_batches(state);
}

/// Entfernt einen Marker (oder alle).
pub fn remove(state: &mut EngineState, id: Option<&str>) {
    for id in ids_for(state, id) {
        remove_one(state, &id);
    }
    rebuild_batches(state);
}

fn remove_one(state: &mut EngineState, id: &str) {
    let edited = state
        .editor
        .marker_edit
        .target()
        .is_some_and(|target| target.id == id);
    if edited {
        tool_switch::set_active_tool(state, ActiveTool::None);
    }
    if let Some(record) = state.markers.records.shift_remove(id) {
        entities::dispose_entity(state, record.entity);
        log::debug!("Marker '{}' entfernt", id);
    }
}

/// Baut den Instanz-Index aus allen sichtbaren Markern neu auf.
pub fn rebuild_batches(state: &mut EngineState) {
    let mut batches: indexmap::IndexMap<String, Vec<EntityId>> = indexmap::IndexMap::new();
    for record in state.markers.records.values() {
        if state.scene.is_visible_in_hierarchy(record.entity) {
            batches
                .entry(MarkerStore::batch_key(record))
                .or_default()
                .push(record.entity);
        }
    }
    state.markers.batches = batches;
}

/// Reaktion auf interne Events.
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
            let group = state.group(SceneGroup::Marker);
            for (entity, _) in floor_bound(state) {
                state.scene.reparent_keep_world(entity, group);
            }
            rebuild_batches(state);
        }
        EngineEvent::FloorVisibilityChanged { floor_id, visible } => {
            for (entity, marker_floor) in floor_bound(state) {
                if marker_floor == *floor_id {
                    state.scene.set_visible(entity, *visible);
                }
            }
            rebuild_batches(state);
        }
        EngineEvent::ModelLoaded { .. } => rebuild_batches(state),
        _ => {}
    }
}

/// Marker mit Floor-Bezug als (Entity, Floor-ID).
fn floor_bound(state: &EngineState) -> Vec<(EntityId, String)> {
    state
        .markers
        .records
        .values()
        .filter_map(|r| r.floor_id.clone().map(|floor| (r.entity, floor)))
        .collect()
}

/// Weltposition eines Markers (für Tests und Host-Abfragen).
pub fn world_position(state: &EngineState, id: &str) -> Option<Vec3> {
    let record = state.markers.records.get(id)?;
    Some(state.scene.world_position(record.entity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::use_cases::test_support::{
        click, event_names, ready_state, record_host_events, screen_of, KIOSK,
    };
    use crate::app::use_cases::{model, pointer};
    use crate::shared::{PointerButton, PointerInfo};
    use approx::assert_relative_eq;

    fn draft() -> MarkerDraft {
        MarkerDraft {
            icon: "exit".into(),
            ..MarkerDraft::default()
        }
    }

    #[test]
    fn test_click_places_marker_on_floor() {
        let mut state = ready_state();
        let events = record_host_events(&mut state);
        begin_placement(&mut state, draft());
        assert_eq!(state.editor.active, ActiveTool::PlacingMarker);

        let screen = screen_of(&state, Vec3::new(15.0, 0.1, 0.0));
        click(&mut state, screen);

        assert_eq!(state.editor.active, ActiveTool::None);
        let data = export(&state, None);
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].id, "poi-1");
        assert_eq!(data[0].floor_id.as_deref(), Some("F1"));
        assert_relative_eq!(data[0].position.x, 15.0, epsilon = 1e-2);
        assert_relative_eq!(data[0].position.y, 0.1, epsilon = 1e-3);
        assert_eq!(event_names(&events), vec!["MarkerCreated"]);
        assert_eq!(state.markers.instance_count(), 1);
    }

    #[test]
    fn test_drag_does_not_place() {
        let mut state = ready_state();
        begin_placement(&mut state, draft());
        let start = screen_of(&state, Vec3::new(15.0, 0.1, 0.0));
        pointer::pointer_down(&mut state, PointerInfo::new(start, PointerButton::Primary));
        pointer::pointer_up(
            &mut state,
            PointerInfo::new(start + Vec2::new(5.0, 0.0), PointerButton::Primary),
        );
        assert!(state.markers.records.is_empty());
        assert_eq!(state.editor.active, ActiveTool::PlacingMarker);
    }

    #[test]
    fn test_model_marker_requires_preload() {
        let mut state = ready_state();
        let events = record_host_events(&mut state);
        let with_model = MarkerDraft {
            model: Some(KIOSK.into()),
            ..draft()
        };
        begin_placement(&mut state, with_model.clone());
        assert_eq!(state.editor.active, ActiveTool::None);
        assert_eq!(event_names(&events), vec!["OperationFailed"]);

        model::preload_model(&mut state, KIOSK);
        begin_placement(&mut state, with_model);
        assert_eq!(state.editor.active, ActiveTool::PlacingMarker);
    }

    #[test]
    fn test_export_import_round_trip() {
        let mut state = ready_state();
        begin_placement(&mut state, draft());
        let screen = screen_of(&state, Vec3::new(-12.0, 0.1, 6.0));
        click(&mut state, screen);
        let exported = export(&state, None);

        let json = serde_json::to_value(&exported).unwrap();
        remove(&mut state, None);
        assert!(state.markers.records.is_empty());

        let items = json.as_array().cloned().unwrap();
        assert_eq!(import(&mut state, items), 1);
        let restored = export(&state, None);
        assert_eq!(restored.len(), 1);
        assert_eq!(restored[0].id, exported[0].id);
        assert_eq!(restored[0].floor_id, exported[0].floor_id);
        assert_eq!(restored[0].properties, exported[0].properties);
        assert!(restored[0].position.abs_diff_eq(exported[0].position, 1e-5));
        assert!(restored[0].scale.abs_diff_eq(exported[0].scale, 1e-5));
    }

    #[test]
    fn test_markers_follow_floor_visibility() {
        let mut state = ready_state();
        begin_placement(&mut state, draft());
        let screen = screen_of(&state, Vec3::new(15.0, 0.1, 0.0));
        click(&mut state, screen);

        crate::app::use_cases::floors::set_visibility(&mut state, Some("F1"), false);
        assert_eq!(state.markers.instance_count(), 0);
        crate::app::use_cases::floors::set_visibility(&mut state, Some("F1"), true);
        assert_eq!(state.markers.instance_count(), 1);
    }
}
