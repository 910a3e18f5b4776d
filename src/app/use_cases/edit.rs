//! Bearbeitungs-Sessions für Marker und Labels.
//!
//! Ein Klick wählt das Ziel; bearbeitet wird eine Vorschau-Kopie mit Gizmo.
//! Beim Loslassen des Gizmos wird die Transformation auf das Original
//! übernommen. `FinishEdit` meldet alle berührten Entities gesammelt.

use super::{entities, labels, markers, tool_switch};
use crate::app::error::EngineError;
use crate::app::events::{EntityType, HostEvent, PointerContext};
use crate::app::picking;
use crate::app::state::{ActiveTool, EngineState};
use crate::app::subsystems::emit;
use crate::app::tools::edit::{drag_transform, pick_axis};
use crate::app::tools::{AuthoringTool, EditTarget, EditTool, GizmoMode};
use crate::core::{EntityKind, PickLayer, SceneGroup, Transform};
use crate::shared::{PointerButton, PointerInfo};

fn editing_tool(kind: EntityType) -> Result<ActiveTool, EngineError> {
    match kind {
        EntityType::Marker => Ok(ActiveTool::EditingMarker),
        EntityType::Label => Ok(ActiveTool::EditingLabel),
        EntityType::Path | EntityType::Train => Err(EngineError::NotEditable(kind)),
    }
}

fn tool_mut(state: &mut EngineState, kind: EntityType) -> &mut EditTool {
    match kind {
        EntityType::Label => &mut state.editor.label_edit,
        _ => &mut state.editor.marker_edit,
    }
}

fn tool(state: &EngineState, kind: EntityType) -> &EditTool {
    match kind {
        EntityType::Label => &state.editor.label_edit,
        _ => &state.editor.marker_edit,
    }
}

/// Startet eine Bearbeitungs-Session.
pub fn start(state: &mut EngineState, kind: EntityType, mode: GizmoMode) -> Result<(), EngineError> {
    let active = editing_tool(kind)?;
    tool_switch::set_active_tool(state, active);
    tool_mut(state, kind).begin(mode);
    log::debug!("Bearbeitung {} gestartet ({:?})", kind.name(), mode);
    Ok(())
}

/// Wechselt den Gizmo-Modus der laufenden Session.
pub fn set_gizmo_mode(state: &mut EngineState, mode: GizmoMode) -> Result<(), EngineError> {
    let kind = match state.editor.active {
        ActiveTool::EditingMarker => EntityType::Marker,
        ActiveTool::EditingLabel => EntityType::Label,
        _ => return Err(EngineError::GizmoWithoutEdit),
    };
    tool_mut(state, kind).set_mode(mode);
    Ok(())
}

/// Pointer-Down: ein getroffener Gizmo-Griff übernimmt den Press.
pub fn on_pointer_down(state: &mut EngineState, kind: EntityType, pointer: &PointerInfo) -> bool {
    tool_mut(state, kind).press(pointer.screen);
    if pointer.button != PointerButton::Primary {
        return false;
    }
    let Some(target) = tool(state, kind).target().cloned() else {
        return false;
    };

    let start = state.scene.world_transform(target.preview);
    let Some(axis) = pick_axis(
        &state.camera,
        start.translation,
        pointer.screen,
        state.options.gizmo_size_px,
        state.options.gizmo_handle_tolerance_px,
    ) else {
        return false;
    };

    tool_mut(state, kind).begin_drag(axis, pointer.screen, start);
    state.orbit.stop();
    state.orbit.suspended = true;
    log::debug!("Gizmo-Drag auf Achse {:?}", axis);
    true
}

/// Gizmo-Drag: Vorschau transformieren und Zwischenstand melden.
pub fn on_drag(state: &mut EngineState, kind: EntityType, pointer: &PointerInfo) {
    let edit = tool(state, kind);
    let (Some(drag), Some(target)) = (edit.drag().copied(), edit.target().cloned()) else {
        return;
    };
    let transform = drag_transform(
        edit.mode(),
        drag.axis,
        &drag.start,
        &state.camera,
        drag.start_screen,
        pointer.screen,
        state.options.gizmo_size_px,
        state.options.gizmo_rotate_speed,
    );
    state.scene.set_world_transform(target.preview, transform);
    state
        .scene
        .set_world_position(target.gizmo, transform.translation);

    let context = PointerContext {
        pointer: *pointer,
        screen_position: state.camera.project_to_screen(transform.translation),
    };
    let event = match kind {
        EntityType::Marker => markers::export_one(state, &target.id).map(|mut data| {
            data.position = transform.translation;
            data.rotation = transform.rotation;
            data.scale = transform.scale;
            HostEvent::PoiTransformChange { data, context }
        }),
        EntityType::Label => labels::export_one(state, &target.id).map(|mut data| {
            data.position = transform.translation;
            data.rotation = transform.rotation;
            data.scale = transform.scale;
            HostEvent::LabelTransformChange { data, context }
        }),
        EntityType::Path | EntityType::Train => None,
    };
    if let Some(event) = event {
        emit(state, event);
    }
}

/// Pointer-Up: Gizmo-Drag übernehmen oder per Klick ein neues Ziel wählen.
pub fn on_pointer_up(state: &mut EngineState, kind: EntityType, pointer: &PointerInfo) {
    if let Some(drag) = tool_mut(state, kind).end_drag() {
        state.orbit.suspended = false;
        commit(state, kind);
        log::debug!("Gizmo-Drag auf Achse {:?} übernommen", drag.axis);
        return;
    }
    let threshold = state.options.click_threshold_px;
    if tool_mut(state, kind).release(pointer.screen, threshold) {
        retarget_at(state, kind, pointer);
    }
}

/// Überträgt die Vorschau-Transformation auf das Original.
fn commit(state: &mut EngineState, kind: EntityType) {
    let Some(target) = tool(state, kind).target().cloned() else {
        return;
    };
    let world = state.scene.world_transform(target.preview);
    state.scene.set_world_transform(target.entity, world);
    if kind == EntityType::Marker {
        markers::rebuild_batches(state);
    }
    tool_mut(state, kind).mark_edited(&target.id);
}

/// Klick auf eine Entity der bearbeiteten Art macht sie zum neuen Ziel.
fn retarget_at(state: &mut EngineState, kind: EntityType, pointer: &PointerInfo) {
    let hit = picking::pick_filtered(
        &state.scene,
        &state.resources,
        &state.camera,
        pointer.screen,
        |node| match kind {
            EntityType::Marker => matches!(node.kind, EntityKind::Marker { .. }),
            EntityType::Label => matches!(node.kind, EntityKind::Label { .. }),
            EntityType::Path | EntityType::Train => false,
        },
    );
    let Some(hit) = hit else {
        return;
    };
    let id = match kind {
        EntityType::Marker => state.markers.by_entity(hit.entity).map(|r| r.id.clone()),
        EntityType::Label => state.labels.by_entity(hit.entity).map(|r| r.id.clone()),
        EntityType::Path | EntityType::Train => None,
    };
    let Some(id) = id else {
        return;
    };
    if tool(state, kind).target().is_some_and(|t| t.id == id) {
        return;
    }

    if let Some(previous) = tool(state, kind).target().cloned() {
        release_target(state, kind, &previous);
    }
    let target = spawn_preview(state, &id, hit.entity);
    tool_mut(state, kind).retarget(target);
    log::debug!("Bearbeitungsziel: {} '{}'", kind.name(), id);
}

/// Erzeugt Vorschau-Kopie und Gizmo; das Original wird ausgeblendet.
fn spawn_preview(state: &mut EngineState, id: &str, entity: crate::core::EntityId) -> EditTarget {
    let group = state.group(SceneGroup::OutlineSelection);
    let world = state.scene.world_transform(entity);
    let (shape, material) = state
        .scene
        .node(entity)
        .map(|n| (n.shape, n.material))
        .unwrap_or_default();

    let preview = state
        .scene
        .spawn(group, &format!("{id}-preview"), EntityKind::Preview);
    if let Some(node) = state.scene.node_mut(preview) {
        node.shape = shape;
        node.material = material;
        node.layer = PickLayer::Default;
    }
    state.scene.set_world_transform(preview, world);

    let gizmo = state
        .scene
        .spawn(group, &format!("{id}-gizmo"), EntityKind::Gizmo);
    state
        .scene
        .set_world_transform(gizmo, Transform::from_translation(world.translation));

    state.scene.set_visible(entity, false);
    markers::rebuild_batches(state);
    state.outline.selected = vec![preview];

    EditTarget {
        id: id.to_string(),
        entity,
        preview,
        gizmo,
    }
}

/// Entsorgt Vorschau und Gizmo und blendet das Original wieder ein.
fn release_target(state: &mut EngineState, kind: EntityType, target: &EditTarget) {
    entities::dispose_entity(state, target.preview);
    entities::dispose_entity(state, target.gizmo);
    if state.scene.contains(target.entity) {
        state.scene.set_visible(target.entity, true);
    }
    if kind == EntityType::Marker {
        markers::rebuild_batches(state);
    }
    state.outline.selected.clear();
}

/// Schließt die Session ohne Meldung (Werkzeugwechsel, Abbruch).
pub fn close_session(state: &mut EngineState, kind: EntityType) {
    let target = tool(state, kind).target().cloned();
    tool_mut(state, kind).reset();
    if let Some(target) = target {
        release_target(state, kind, &target);
    }
    state.orbit.suspended = false;
}

/// Beendet die Session und meldet alle bearbeiteten Entities in einem Event.
pub fn finish(state: &mut EngineState, kind: EntityType) -> Result<(), EngineError> {
    let expected = editing_tool(kind)?;
    if state.editor.active != expected {
        return Err(EngineError::EditNotActive(kind));
    }
    let edited: Vec<String> = tool(state, kind).edited().to_vec();
    tool_switch::set_active_tool(state, ActiveTool::None);

    log::info!("Bearbeitung {} beendet: {} geändert", kind.name(), edited.len());
    let event = match kind {
        EntityType::Label => HostEvent::LabelFinishEdit {
            items: edited
                .iter()
                .filter_map(|id| labels::export_one(state, id))
                .collect(),
        },
        _ => HostEvent::PoiFinishEdit {
            items: edited
                .iter()
                .filter_map(|id| markers::export_one(state, id))
                .collect(),
        },
    };
    emit(state, event);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tools::edit::gizmo_world_length;
    use crate::app::tools::GizmoAxis;
    use crate::app::use_cases::pointer;
    use crate::app::use_cases::test_support::{
        click, event_names, ready_state, record_host_events, screen_of,
    };
    use crate::core::MarkerDraft;
    use glam::Vec3;

    fn state_with_marker() -> (EngineState, String) {
        let mut state = ready_state();
        markers::begin_placement(
            &mut state,
            MarkerDraft {
                icon: "info".into(),
                ..MarkerDraft::default()
            },
        );
        let screen = screen_of(&state, Vec3::new(12.0, 0.1, 0.0));
        click(&mut state, screen);
        let id = state.markers.records.keys().next().cloned().unwrap();
        (state, id)
    }

    #[test]
    fn test_misuse_outside_session() {
        let mut state = ready_state();
        assert_eq!(
            finish(&mut state, EntityType::Marker),
            Err(EngineError::EditNotActive(EntityType::Marker))
        );
        assert_eq!(
            set_gizmo_mode(&mut state, GizmoMode::Rotate),
            Err(EngineError::GizmoWithoutEdit)
        );
        assert_eq!(
            start(&mut state, EntityType::Path, GizmoMode::Translate),
            Err(EngineError::NotEditable(EntityType::Path))
        );
    }

    #[test]
    fn test_click_builds_preview_and_hides_original() {
        let (mut state, id) = state_with_marker();
        start(&mut state, EntityType::Marker, GizmoMode::Translate).unwrap();
        let entity = state.markers.records[&id].entity;
        let screen = screen_of(&state, state.scene.world_position(entity));
        click(&mut state, screen);

        let target = state.editor.marker_edit.target().cloned().expect("Ziel erwartet");
        assert_eq!(target.id, id);
        assert!(!state.scene.node(entity).unwrap().visible);
        assert_eq!(state.outline.selected, vec![target.preview]);

        tool_switch::set_active_tool(&mut state, ActiveTool::None);
        assert!(!state.scene.contains(target.preview));
        assert!(!state.scene.contains(target.gizmo));
        assert!(state.scene.node(entity).unwrap().visible);
    }

    #[test]
    fn test_gizmo_drag_commits_and_finish_reports_edited_only() {
        let (mut state, id) = state_with_marker();
        let events = record_host_events(&mut state);
        start(&mut state, EntityType::Marker, GizmoMode::Translate).unwrap();
        let entity = state.markers.records[&id].entity;
        let origin = state.scene.world_position(entity);
        let screen = screen_of(&state, origin);
        click(&mut state, screen);

        let length = gizmo_world_length(&state.camera, origin, state.options.gizmo_size_px);
        let origin_screen = screen_of(&state, origin);
        let tip_screen = screen_of(&state, origin + GizmoAxis::X.vector() * length);
        let grab = origin_screen.lerp(tip_screen, 0.7);
        let direction = (tip_screen - origin_screen).normalize();
        let release = grab + direction * 20.0;

        pointer::pointer_down(&mut state, PointerInfo::new(grab, PointerButton::Primary));
        assert!(state.orbit.suspended);
        pointer::pointer_move(&mut state, PointerInfo::new(release, PointerButton::Primary));
        pointer::pointer_up(&mut state, PointerInfo::new(release, PointerButton::Primary));
        assert!(!state.orbit.suspended);

        let moved = state.scene.world_position(entity);
        assert!(moved.x > origin.x + 1.0);
        assert!((moved.z - origin.z).abs() < 1e-3);

        finish(&mut state, EntityType::Marker).unwrap();
        let names = event_names(&events);
        assert_eq!(names, vec!["PoiTransformChange", "PoiFinishEdit"]);
        match events.borrow().last() {
            Some(HostEvent::PoiFinishEdit { items }) => {
                assert_eq!(items.len(), 1);
                assert_eq!(items[0].id, id);
            }
            other => panic!("PoiFinishEdit erwartet, erhalten: {other:?}"),
        }
        assert_eq!(state.editor.active, ActiveTool::None);
    }
}
