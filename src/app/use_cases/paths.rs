//! Use-Cases für Pfade: Aufbau per Zeiger, Ribbon-Geometrie, Registrierung und Verwaltung.
//!
//! Segmentpunkte liegen im lokalen Raum ihres Floors. Die Ribbons werden in
//! Weltkoordinaten aufgebaut und nach jeder Floor-Bewegung neu erzeugt.

use super::{entities, tool_switch};
use crate::app::error::EngineError;
use crate::app::events::{CreateKind, EngineEvent, EntityType, HostEvent};
use crate::app::picking;
use crate::app::state::{ActiveTool, EngineState};
use crate::app::subsystems::{emit, publish_internal, report_failure};
use crate::app::tools::path::{build_ribbon, segment_polyline};
use crate::app::tools::{PathAction, ToolAnchor};
use crate::core::{
    EntityId, EntityKind, GpuResource, MeshData, PathData, PathDraft, PathRecord, PathSegment,
    PickLayer, PickShape, SceneGroup,
};
use crate::shared::{PointerButton, PointerInfo};
use glam::{Vec2, Vec3};

/// Startet den Aufbau eines neuen Pfads.
pub fn begin(state: &mut EngineState, draft: PathDraft) {
    tool_switch::set_active_tool(state, ActiveTool::PlacingPath);
    state.editor.path.begin(draft);
    let group = state.group(SceneGroup::Path);
    let container = state.scene.spawn(group, "path-building", EntityKind::Preview);
    state.paths.building.container = Some(container);
    publish_internal(
        state,
        EngineEvent::CreateStarted {
            kind: CreateKind::Path,
        },
    );
}

/// Anker unter dem Zeiger; nur das Modell zählt, nicht Pfade oder Marker.
fn anchor_at(state: &EngineState, screen: Vec2) -> Option<ToolAnchor> {
    let model_group = state.scene.group(SceneGroup::Model)?;
    let hit = picking::pick_filtered(
        &state.scene,
        &state.resources,
        &state.camera,
        screen,
        |node| state.scene.is_ancestor_of(model_group, node.id),
    )?;
    let anchor = match state.floor_of(hit.entity) {
        Some(floor_id) => match state.floor_world(&floor_id) {
            Some(world) => ToolAnchor::on_floor(hit.point, &floor_id, world),
            None => ToolAnchor::free(hit.point),
        },
        None => ToolAnchor::free(hit.point),
    };
    Some(anchor)
}

/// Pointer-Down: die Primärtaste gehört dem Werkzeug.
pub fn on_pointer_down(state: &mut EngineState, pointer: &PointerInfo) -> bool {
    if pointer.button != PointerButton::Primary || !state.editor.path.is_active() {
        return false;
    }
    let anchor = anchor_at(state, pointer.screen);
    state.editor.path.on_press(pointer.screen, anchor);
    true
}

/// Pointer-Move mit gedrückter Taste: Vorschau des entstehenden Segments.
pub fn on_pointer_move(state: &mut EngineState, pointer: &PointerInfo) {
    let anchor = anchor_at(state, pointer.screen);
    if let PathAction::Preview(points) = state.editor.path.on_move(anchor) {
        update_preview(state, points);
    }
}

/// Pointer-Up: Startpunkt setzen oder Segment abschließen.
pub fn on_pointer_up(state: &mut EngineState, pointer: &PointerInfo) {
    let anchor = anchor_at(state, pointer.screen);
    let threshold = state.options.click_threshold_px;
    match state
        .editor
        .path
        .on_release(pointer.screen, anchor, threshold)
    {
        PathAction::SeedPlaced => log::debug!("Pfad-Startpunkt gesetzt"),
        PathAction::SegmentAdded { world, .. } => {
            discard_preview(state);
            let Some(container) = state.paths.building.container else {
                return;
            };
            let index = state.paths.building.ribbons.len();
            let width = building_width(state);
            let ribbon = spawn_ribbon(
                state,
                container,
                &format!("segment-{index}"),
                EntityKind::Preview,
                world,
                width,
            );
            state.paths.building.ribbons.push(ribbon);
            log::debug!("Pfadsegment {} hinzugefügt", index + 1);
        }
        PathAction::Preview(_) | PathAction::None => {}
    }
}

fn building_width(state: &EngineState) -> f32 {
    state
        .editor
        .path
        .draft()
        .and_then(|d| d.width)
        .unwrap_or(state.options.path_ribbon_width)
}

fn ribbon_mesh(state: &EngineState, [start, control, end]: [Vec3; 3], width: f32) -> MeshData {
    let points = segment_polyline(start, control, end, state.options.path_segment_samples);
    build_ribbon(&points, width, state.options.path_ribbon_lift)
}

fn spawn_ribbon(
    state: &mut EngineState,
    parent: EntityId,
    name: &str,
    kind: EntityKind,
    world: [Vec3; 3],
    width: f32,
) -> EntityId {
    let mesh = ribbon_mesh(state, world, width);
    let id = state.scene.spawn(parent, name, kind);
    let handle = state.resources.register(id, GpuResource::Geometry(mesh));
    if let Some(node) = state.scene.node_mut(id) {
        node.shape = PickShape::Mesh(handle);
    }
    id
}

/// Ersetzt die Geometrie einer Ribbon-Entity.
fn replace_geometry(state: &mut EngineState, entity: EntityId, mesh: MeshData) {
    let handle = match state.scene.node(entity).map(|n| n.shape) {
        Some(PickShape::Mesh(handle)) => handle,
        _ => return,
    };
    state
        .resources
        .replace(handle, GpuResource::Geometry(mesh));
}

fn update_preview(state: &mut EngineState, points: [Vec3; 3]) {
    let width = building_width(state);
    match state.paths.building.preview {
        Some(preview) => {
            let mesh = ribbon_mesh(state, points, width);
            replace_geometry(state, preview, mesh);
        }
        None => {
            let Some(container) = state.paths.building.container else {
                return;
            };
            let preview = spawn_ribbon(
                state,
                container,
                "segment-preview",
                EntityKind::Preview,
                points,
                width,
            );
            state.paths.building.preview = Some(preview);
        }
    }
}

fn discard_preview(state: &mut EngineState) {
    if let Some(preview) = state.paths.building.preview.take() {
        entities::dispose_entity(state, preview);
    }
}

/// Verwirft den Pfad in Arbeit samt unfertigem Segment.
pub fn discard_building(state: &mut EngineState) {
    let building = std::mem::take(&mut state.paths.building);
    if let Some(container) = building.container {
        entities::dispose_entity(state, container);
        log::debug!("Pfad in Arbeit verworfen");
    }
}

/// Registriert den aufgebauten Pfad.
///
/// `Ok(None)`, wenn noch kein Segment existiert; der Pfad wird dann verworfen.
pub fn finish(state: &mut EngineState) -> Result<Option<PathData>, EngineError> {
    if state.editor.active != ActiveTool::PlacingPath {
        return Err(EngineError::NoActivePath);
    }
    let Some((draft, segments)) = state.editor.path.finish() else {
        return Err(EngineError::NoActivePath);
    };
    if segments.is_empty() {
        report_failure(state, "FinishPath", "Pfad ohne Segmente verworfen");
        tool_switch::set_active_tool(state, ActiveTool::None);
        return Ok(None);
    }

    let building = std::mem::take(&mut state.paths.building);
    tool_switch::set_active_tool(state, ActiveTool::None);
    if let Some(preview) = building.preview {
        entities::dispose_entity(state, preview);
    }
    let Some(entity) = building.container else {
        return Err(EngineError::NoActivePath);
    };

    let id = state
        .paths
        .ids
        .next_free(|candidate| state.paths.records.contains_key(candidate));
    let width = draft.width.unwrap_or(state.options.path_ribbon_width);
    retag(state, entity, &building.ribbons, &id);
    state.paths.records.insert(
        id.clone(),
        PathRecord {
            id: id.clone(),
            segments,
            width,
            entity,
            ribbons: building.ribbons,
        },
    );

    log::info!("Pfad '{}' registriert", id);
    publish_internal(
        state,
        EngineEvent::PathRegistered {
            path_id: id.clone(),
        },
    );
    let data = export_one(state, &id);
    if let Some(data) = &data {
        emit(state, HostEvent::PathFinished { data: data.clone() });
    }
    Ok(data)
}

/// Setzt Art und Layer von Container und Ribbons eines registrierten Pfads.
fn retag(state: &mut EngineState, container: EntityId, ribbons: &[EntityId], id: &str) {
    if let Some(node) = state.scene.node_mut(container) {
        node.kind = EntityKind::Path {
            path_id: id.to_string(),
        };
        node.name = id.to_string();
    }
    for ribbon in ribbons {
        if let Some(node) = state.scene.node_mut(*ribbon) {
            node.kind = EntityKind::PathRibbon {
                path_id: id.to_string(),
            };
            node.layer = PickLayer::Pickable;
        }
    }
}

/// Weltpunkte (Start, Kontrolle, Ende) eines Segments mit aktuellen Floor-Matrizen.
pub fn segment_world(state: &EngineState, segment: &PathSegment) -> [Vec3; 3] {
    [&segment.start, &segment.control, &segment.end].map(|point| {
        point.to_world(
            point
                .floor_id
                .as_deref()
                .and_then(|floor| state.floor_world(floor)),
        )
    })
}

/// Abgetastete Weltpolylinie eines ganzen Pfads (Segmentfugen ohne Doppelpunkte).
pub fn world_polyline(state: &EngineState, path_id: &str) -> Option<Vec<Vec3>> {
    let record = state.paths.records.get(path_id)?;
    let samples = state.options.path_segment_samples;
    let mut points: Vec<Vec3> = Vec::new();
    for segment in &record.segments {
        let [start, control, end] = segment_world(state, segment);
        let sampled = segment_polyline(start, control, end, samples);
        let skip = usize::from(points.last().is_some_and(|last| last.abs_diff_eq(start, 1e-4)));
        points.extend(sampled.into_iter().skip(skip));
    }
    Some(points)
}

/// Erzeugt alle Ribbons eines Pfads aus den aktuellen Floor-Matrizen neu.
fn rebuild_ribbons(state: &mut EngineState, path_id: &str) {
    let Some(record) = state.paths.records.get(path_id) else {
        return;
    };
    let width = record.width;
    let parts: Vec<(EntityId, [Vec3; 3])> = record
        .ribbons
        .iter()
        .zip(&record.segments)
        .map(|(ribbon, segment)| (*ribbon, segment_world(state, segment)))
        .collect();
    for (ribbon, world) in parts {
        let mesh = ribbon_mesh(state, world, width);
        replace_geometry(state, ribbon, mesh);
    }
}

fn rebuild_all(state: &mut EngineState) {
    let ids: Vec<String> = state.paths.records.keys().cloned().collect();
    for id in ids {
        rebuild_ribbons(state, &id);
    }
}

pub fn export_one(state: &EngineState, id: &str) -> Option<PathData> {
    let record = state.paths.records.get(id)?;
    Some(PathData {
        id: record.id.clone(),
        width: record.width,
        segments: record.segments.clone(),
    })
}

pub fn export(state: &EngineState, id: Option<&str>) -> Vec<PathData> {
    match id {
        Some(id) => export_one(state, id).into_iter().collect(),
        None => state
            .paths
            .records
            .keys()
            .filter_map(|id| export_one(state, id))
            .collect(),
    }
}

/// Baut Pfade aus Exportdaten auf; vorhandene IDs werden ersetzt.
///
/// Züge auf einem ersetzten Pfad bleiben erhalten und folgen der neuen Geometrie.
pub fn import(state: &mut EngineState, items: Vec<serde_json::Value>) -> usize {
    let mut imported = 0;
    for item in items {
        let Some(data) = entities::parse_item::<PathData>(state, EntityType::Path, item) else {
            continue;
        };
        if data.segments.is_empty() {
            let reason = format!("Pfad '{}' ohne Segmente", data.id);
            report_failure(state, EntityType::Path.import_operation(), reason);
            continue;
        }
        if let Some(previous) = detach(state, &data.id) {
            entities::dispose_entity(state, previous);
            log::debug!("Pfad '{}' wird ersetzt", data.id);
        }

        let group = state.group(SceneGroup::Path);
        let entity = state.scene.spawn(
            group,
            &data.id,
            EntityKind::Path {
                path_id: data.id.clone(),
            },
        );
        let ribbons: Vec<EntityId> = data
            .segments
            .iter()
            .enumerate()
            .map(|(i, segment)| {
                let world = segment_world(state, segment);
                spawn_ribbon(
                    state,
                    entity,
                    &format!("segment-{i}"),
                    EntityKind::PathRibbon {
                        path_id: data.id.clone(),
                    },
                    world,
                    data.width,
                )
            })
            .collect();
        for ribbon in &ribbons {
            state.scene.set_layer(*ribbon, PickLayer::Pickable);
        }

        state.paths.records.insert(
            data.id.clone(),
            PathRecord {
                id: data.id.clone(),
                segments: data.segments,
                width: data.width,
                entity,
                ribbons,
            },
        );
        publish_internal(state, EngineEvent::PathRegistered { path_id: data.id });
        imported += 1;
    }
    imported
}

fn ids_for(state: &EngineState, id: Option<&str>) -> Vec<String> {
    match id {
        Some(id) => vec![id.to_string()],
        None => state.paths.records.keys().cloned().collect(),
    }
}

pub fn set_visibility(state: &mut EngineState, id: Option<&str>, visible: bool) {
    for id in ids_for(state, id) {
        let Some(entity) = state.paths.records.get(&id).map(|r| r.entity) else {
            log::warn!("Unbekannter Pfad '{}'", id);
            continue;
        };
        state.scene.set_visible(entity, visible);
    }
}

/// Entfernt einen Pfad (oder alle); Züge auf dem Pfad folgen über `PathRemoved`.
pub fn remove(state: &mut EngineState, id: Option<&str>) {
    for id in ids_for(state, id) {
        remove_one(state, &id);
    }
}

fn remove_one(state: &mut EngineState, id: &str) {
    let Some(entity) = detach(state, id) else {
        return;
    };
    publish_internal(
        state,
        EngineEvent::PathRemoved {
            path_id: id.to_string(),
        },
    );
    entities::dispose_entity(state, entity);
    log::debug!("Pfad '{}' entfernt", id);
}

/// Nimmt den Record aus dem Store; die Container-Entity lebt noch.
fn detach(state: &mut EngineState, id: &str) -> Option<EntityId> {
    state.paths.records.shift_remove(id).map(|record| record.entity)
}

/// Floors, die ein Pfad berührt.
fn floors_of(record: &PathRecord) -> Vec<&str> {
    let mut floors: Vec<&str> = record
        .segments
        .iter()
        .flat_map(|s| [&s.start, &s.control, &s.end])
        .filter_map(|p| p.floor_id.as_deref())
        .collect();
    floors.sort_unstable();
    floors.dedup();
    floors
}

/// Reaktion auf interne Events: Ribbons während Floor-Bewegungen ausblenden.
pub fn on_engine_event(state: &mut EngineState, event: &EngineEvent) {
    match event {
        EngineEvent::FloorsBeforeMove => {
            if let Some(group) = state.scene.group(SceneGroup::Path) {
                state.scene.set_visible(group, false);
            }
        }
        EngineEvent::FloorsAfterMove { .. } => {
            rebuild_all(state);
            if let Some(group) = state.scene.group(SceneGroup::Path) {
                state.scene.set_visible(group, true);
            }
        }
        EngineEvent::FloorVisibilityChanged { floor_id, .. } => {
            let affected: Vec<(EntityId, bool)> = state
                .paths
                .records
                .values()
                .filter(|r| floors_of(r).contains(&floor_id.as_str()))
                .map(|r| {
                    let visible = floors_of(r)
                        .into_iter()
                        .all(|floor| state.floor_visible(Some(floor)));
                    (r.entity, visible)
                })
                .collect();
            for (entity, visible) in affected {
                state.scene.set_visible(entity, visible);
            }
        }
        EngineEvent::ModelLoaded { .. } => rebuild_all(state),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::use_cases::test_support::{
        click, event_names, ready_state, record_host_events, screen_of,
    };
    use crate::app::use_cases::{floors, pointer};
    use crate::core::path::is_continuous;
    use crate::core::PathMode;
    use approx::assert_relative_eq;

    fn straight() -> PathDraft {
        PathDraft::default()
    }

    /// Deck von F2 ausblenden, damit alle Klicks auf F1 landen.
    fn f1_only() -> EngineState {
        let mut state = ready_state();
        floors::set_visibility(&mut state, Some("F2"), false);
        state
    }

    fn click_world(state: &mut EngineState, x: f32, z: f32) {
        let screen = screen_of(state, Vec3::new(x, 0.1, z));
        click(state, screen);
    }

    #[test]
    fn test_two_straight_segments_share_joint() {
        let mut state = f1_only();
        let events = record_host_events(&mut state);
        begin(&mut state, straight());
        click_world(&mut state, 0.0, 0.0);
        click_world(&mut state, 1.0, 0.0);
        click_world(&mut state, 2.0, 0.0);

        let data = finish(&mut state).unwrap().expect("Pfad erwartet");
        assert_eq!(data.segments.len(), 2);
        assert!(is_continuous(&data.segments));
        let joint = data.segments[0].end.position;
        assert_relative_eq!(joint.x, 1.0, epsilon = 1e-3);
        assert_relative_eq!(joint.z, 0.0, epsilon = 1e-3);
        assert_eq!(data.segments[0].end.floor_id.as_deref(), Some("F1"));
        assert_eq!(state.editor.active, ActiveTool::None);
        assert_eq!(event_names(&events), vec!["PathFinished"]);
        assert_eq!(state.paths.records[&data.id].ribbons.len(), 2);
    }

    #[test]
    fn test_path_authoring_remaps_camera_buttons() {
        let mut state = f1_only();
        let original = state.orbit.buttons;
        begin(&mut state, straight());
        assert_eq!(state.orbit.buttons.rotate, Some(PointerButton::Secondary));
        tool_switch::set_active_tool(&mut state, ActiveTool::None);
        assert_eq!(state.orbit.buttons, original);
    }

    #[test]
    fn test_finish_without_segments_discards() {
        let mut state = f1_only();
        let events = record_host_events(&mut state);
        let entities_before = state.scene.len();
        begin(&mut state, straight());
        click_world(&mut state, 0.0, 0.0);

        assert_eq!(finish(&mut state), Ok(None));
        assert_eq!(state.scene.len(), entities_before);
        assert_eq!(event_names(&events), vec!["OperationFailed"]);
        assert_eq!(finish(&mut state), Err(EngineError::NoActivePath));
    }

    #[test]
    fn test_cancel_disposes_partial_path() {
        let mut state = f1_only();
        let resources_before = state.resources.live_count();
        begin(&mut state, straight());
        click_world(&mut state, 0.0, 0.0);
        click_world(&mut state, 3.0, 0.0);
        assert!(state.resources.live_count() > resources_before);

        tool_switch::set_active_tool(&mut state, ActiveTool::None);
        assert_eq!(state.resources.live_count(), resources_before);
        assert!(state.paths.records.is_empty());
    }

    #[test]
    fn test_curved_segment_mirrors_drag_handle() {
        let mut state = f1_only();
        begin(
            &mut state,
            PathDraft {
                mode: PathMode::Curved,
                width: None,
            },
        );
        click_world(&mut state, 0.0, 0.0);

        let end = screen_of(&state, Vec3::new(4.0, 0.1, 0.0));
        let handle = screen_of(&state, Vec3::new(4.0, 0.1, 2.0));
        pointer::pointer_down(&mut state, PointerInfo::new(end, PointerButton::Primary));
        pointer::pointer_move(&mut state, PointerInfo::new(handle, PointerButton::Primary));
        pointer::pointer_up(&mut state, PointerInfo::new(handle, PointerButton::Primary));

        let data = finish(&mut state).unwrap().unwrap();
        let control = data.segments[0].control.position;
        assert_relative_eq!(control.x, 4.0, epsilon = 1e-2);
        assert_relative_eq!(control.z, -2.0, epsilon = 1e-2);
    }

    #[test]
    fn test_ribbons_follow_expanded_floor() {
        let mut state = ready_state();
        begin(&mut state, straight());
        let deck = |x: f32| Vec3::new(x, 4.1, 0.0);
        let a = screen_of(&state, deck(-2.0));
        let b = screen_of(&state, deck(2.0));
        click(&mut state, a);
        click(&mut state, b);
        let data = finish(&mut state).unwrap().unwrap();
        assert_eq!(data.segments[0].start.floor_id.as_deref(), Some("F2"));

        let before = world_polyline(&state, &data.id).unwrap();
        floors::expand(&mut state, 0.0, 5.0);
        let after = world_polyline(&state, &data.id).unwrap();
        assert_relative_eq!(after[0].y - before[0].y, 5.0, epsilon = 1e-4);
        let group = state.scene.group(SceneGroup::Path).unwrap();
        assert!(state.scene.node(group).unwrap().visible);
    }
}
