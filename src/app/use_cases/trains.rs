//! Zug-Simulator: Pfadauswahl, Aufbau der Wagen und Bewegung entlang des Pfads.
//!
//! Die Wagenlage hängt nur vom Pfadparameter `u` ab: Kopf bei `u`, dahinter
//! die Wagen in festen Bogenlängen-Abständen. Wagen vor dem Pfadanfang sind
//! ausgeblendet.

use super::{entities, frame, paths, placement, tool_switch};
use crate::app::animation::{AnimationKey, Tween, TweenKind};
use crate::app::error::EngineError;
use crate::app::events::{CreateKind, EngineEvent, EntityType, HostEvent};
use crate::app::picking;
use crate::app::state::{ActiveTool, EngineState};
use crate::app::subsystems::{emit, publish_internal, report_failure};
use crate::app::tools::AuthoringTool;
use crate::core::train::{car_offsets, clamp_car_count};
use crate::core::{
    EntityId, EntityKind, PickShape, SceneGroup, TrainData, TrainDraft, TrainPhase, TrainRecord,
    Transform,
};
use crate::shared::spline_geometry::ArcLengthTable;
use crate::shared::Easing;
use glam::{Quat, Vec2, Vec3};

/// Startet die Pfadauswahl für einen neuen Zug.
///
/// Ohne registrierten Pfad oder mit fehlenden Wagenmodellen wird nichts angelegt.
pub fn begin_selection(state: &mut EngineState, draft: TrainDraft) {
    if state.paths.records.is_empty() {
        report_failure(state, "CreateTrain", "Kein Pfad registriert");
        return;
    }
    let missing: Vec<&str> = [&draft.head_model, &draft.body_model, &draft.tail_model]
        .into_iter()
        .filter(|url| !state.library.contains(url))
        .map(String::as_str)
        .collect();
    if !missing.is_empty() {
        let reason = format!("Wagenmodelle nicht vorgeladen: {}", missing.join(", "));
        report_failure(state, "CreateTrain", reason);
        return;
    }

    tool_switch::set_active_tool(state, ActiveTool::SelectingTrainPath);
    state.paths.visibility_before_selection = state
        .paths
        .records
        .values()
        .map(|r| {
            let visible = state.scene.node(r.entity).is_none_or(|n| n.visible);
            (r.entity, visible)
        })
        .collect();
    state.editor.train_select.begin(draft);
    publish_internal(
        state,
        EngineEvent::CreateStarted {
            kind: CreateKind::Train,
        },
    );
}

/// Klick auf ein Pfad-Ribbon wählt den Pfad; alle anderen werden ausgeblendet.
pub fn select_path_at(state: &mut EngineState, screen: Vec2) {
    let hit = picking::pick_filtered(
        &state.scene,
        &state.resources,
        &state.camera,
        screen,
        |node| matches!(node.kind, EntityKind::PathRibbon { .. }),
    );
    let Some(path_id) = hit
        .and_then(|hit| state.paths.by_entity(hit.entity))
        .map(|record| record.id.clone())
    else {
        log::debug!("Kein Pfad unter dem Zeiger");
        return;
    };
    if !state.editor.train_select.select(&path_id) {
        return;
    }

    let visibility: Vec<(EntityId, bool)> = state
        .paths
        .records
        .values()
        .map(|r| (r.entity, r.id == path_id))
        .collect();
    for (entity, visible) in visibility {
        state.scene.set_visible(entity, visible);
    }
    state.outline.selected = state
        .paths
        .records
        .get(&path_id)
        .map(|r| r.ribbons.clone())
        .unwrap_or_default();

    log::debug!("Zug-Pfad '{}' gewählt", path_id);
    emit(state, HostEvent::TrainPathSelected { path_id });
}

/// Beendet die Pfadauswahl: Sichtbarkeit von vor der Auswahl wiederherstellen, Outline leeren.
pub fn close_selection(state: &mut EngineState) {
    state.editor.train_select.reset();
    let snapshot = std::mem::take(&mut state.paths.visibility_before_selection);
    for (entity, visible) in snapshot {
        if state.scene.contains(entity) {
            state.scene.set_visible(entity, visible);
        }
    }
    state.outline.selected.clear();
}

/// Bestätigt den gewählten Pfad und baut den Zug am Einfahrtspunkt auf.
pub fn confirm(state: &mut EngineState) -> Result<TrainData, EngineError> {
    if state.editor.active != ActiveTool::SelectingTrainPath {
        return Err(EngineError::NoTrainSelection);
    }
    if state.editor.train_select.selected().is_none() {
        return Err(EngineError::NoTrainPathSelected);
    }
    let Some((draft, path_id)) = state.editor.train_select.confirm() else {
        return Err(EngineError::NoTrainSelection);
    };
    tool_switch::set_active_tool(state, ActiveTool::None);

    let id = state
        .trains
        .ids
        .next_free(|candidate| state.trains.records.contains_key(candidate));
    let data = TrainData {
        id,
        path_id,
        car_count: draft.car_count,
        head_model: draft.head_model,
        body_model: draft.body_model,
        tail_model: draft.tail_model,
        entrance_u: draft.entrance_u,
        stop_u: draft.stop_u,
        exit_u: draft.exit_u,
        progress: draft.entrance_u,
    };
    spawn_train(state, &data);

    let data = export_one(state, &data.id).unwrap_or(data);
    log::info!(
        "Zug '{}' auf Pfad '{}' erstellt ({} Wagen)",
        data.id,
        data.path_id,
        data.car_count
    );
    emit(state, HostEvent::TrainCreated { data: data.clone() });
    Ok(data)
}

/// Legt Container und Wagen an und platziert den Zug bei `data.progress`.
fn spawn_train(state: &mut EngineState, data: &TrainData) {
    let car_count = clamp_car_count(data.car_count, state.options.train_min_body_cars);
    let car_spacing = state
        .library
        .bounds(&data.body_model)
        .map_or(1.0, |b| b.size().z)
        + state.options.train_car_gap;

    let group = state.group(SceneGroup::Train);
    let entity = state.scene.spawn(
        group,
        &data.id,
        EntityKind::Train {
            train_id: data.id.clone(),
        },
    );

    let models = std::iter::once(&data.head_model)
        .chain(std::iter::repeat_n(&data.body_model, car_count as usize))
        .chain(std::iter::once(&data.tail_model));
    let mut cars = Vec::with_capacity(car_count as usize + 2);
    for (i, url) in models.enumerate() {
        let car = state.scene.spawn(
            entity,
            &format!("{}-car-{}", data.id, i),
            EntityKind::TrainCar {
                train_id: data.id.clone(),
            },
        );
        if let Some(asset) = state.library.get(url).cloned() {
            if let Some(bounds) = asset.bounds() {
                if let Some(node) = state.scene.node_mut(car) {
                    node.shape = PickShape::Box(bounds);
                }
            }
            placement::instantiate_asset(state, car, &asset);
        }
        cars.push(car);
    }

    state.trains.records.insert(
        data.id.clone(),
        TrainRecord {
            id: data.id.clone(),
            path_id: data.path_id.clone(),
            car_count,
            head_model: data.head_model.clone(),
            body_model: data.body_model.clone(),
            tail_model: data.tail_model.clone(),
            entrance_u: data.entrance_u,
            stop_u: data.stop_u,
            exit_u: data.exit_u,
            progress: data.progress,
            entity,
            cars,
            car_spacing,
        },
    );
    place_at(state, &data.id, data.progress);
}

/// Platziert alle Wagen eines Zugs beim Pfadparameter `u`.
pub fn place_at(state: &mut EngineState, train_id: &str, u: f32) {
    let u = u.clamp(0.0, 1.0);
    let Some(record) = state.trains.records.get_mut(train_id) else {
        return;
    };
    record.progress = u;
    let path_id = record.path_id.clone();
    let cars = record.cars.clone();
    let offsets = car_offsets(record.car_count, record.car_spacing);

    let Some(points) = paths::world_polyline(state, &path_id) else {
        return;
    };
    let table = ArcLengthTable::from_points(points);
    let head = u * table.total_length();

    for (car, offset) in cars.into_iter().zip(offsets) {
        let distance = head - offset;
        let sample = if distance < 0.0 {
            None
        } else {
            table.sample_at(distance)
        };
        match sample {
            Some((position, tangent)) => {
                let rotation = Quat::from_rotation_arc(Vec3::Z, tangent);
                state.scene.set_world_transform(
                    car,
                    Transform::from_trs(position, rotation, Vec3::ONE),
                );
                state.scene.set_visible(car, true);
            }
            None => state.scene.set_visible(car, false),
        }
    }
}

/// Fährt den Zug zum Halt- (`Enter`) bzw. Ausfahrtspunkt (`Exit`).
pub fn move_train(
    state: &mut EngineState,
    train_id: &str,
    phase: TrainPhase,
    duration: f32,
) -> Result<(), EngineError> {
    let Some(record) = state.trains.records.get(train_id) else {
        return Err(EngineError::UnknownTrain(train_id.to_string()));
    };
    let to = match phase {
        TrainPhase::Enter => record.stop_u,
        TrainPhase::Exit => record.exit_u,
    };
    let tween = Tween::new(
        TweenKind::TrainProgress {
            train_id: train_id.to_string(),
            from: record.progress,
            to,
            phase,
        },
        duration.max(0.0),
        Easing::QuadraticInOut,
    );
    if state
        .animations
        .start(AnimationKey::Train(train_id.to_string()), tween)
        .is_some()
    {
        log::debug!("Laufende Bewegung von Zug '{}' ersetzt", train_id);
    }
    if duration <= 0.0 {
        frame::step_animations(state, 0.0);
    }
    Ok(())
}

/// Setzt den Pfadparameter direkt (ohne Tween).
pub fn set_progress(state: &mut EngineState, train_id: &str, u: f32) -> Result<(), EngineError> {
    if !state.trains.records.contains_key(train_id) {
        return Err(EngineError::UnknownTrain(train_id.to_string()));
    }
    state
        .animations
        .cancel(&AnimationKey::Train(train_id.to_string()));
    place_at(state, train_id, u);
    Ok(())
}

pub fn export_one(state: &EngineState, id: &str) -> Option<TrainData> {
    let record = state.trains.records.get(id)?;
    Some(TrainData {
        id: record.id.clone(),
        path_id: record.path_id.clone(),
        car_count: record.car_count,
        head_model: record.head_model.clone(),
        body_model: record.body_model.clone(),
        tail_model: record.tail_model.clone(),
        entrance_u: record.entrance_u,
        stop_u: record.stop_u,
        exit_u: record.exit_u,
        progress: record.progress,
    })
}

pub fn export(state: &EngineState, id: Option<&str>) -> Vec<TrainData> {
    match id {
        Some(id) => export_one(state, id).into_iter().collect(),
        None => state
            .trains
            .records
            .keys()
            .filter_map(|id| export_one(state, id))
            .collect(),
    }
}

/// Baut Züge aus Exportdaten auf. Pfad und Wagenmodelle müssen vorhanden sein.
pub fn import(state: &mut EngineState, items: Vec<serde_json::Value>) -> usize {
    let mut imported = 0;
    for item in items {
        let Some(data) = entities::parse_item::<TrainData>(state, EntityType::Train, item) else {
            continue;
        };
        if !state.paths.records.contains_key(&data.path_id) {
            let reason = format!("Zug '{}': Pfad '{}' fehlt", data.id, data.path_id);
            report_failure(state, EntityType::Train.import_operation(), reason);
            continue;
        }
        let models = [&data.head_model, &data.body_model, &data.tail_model];
        if let Some(url) = models.into_iter().find(|url| !state.library.contains(url)) {
            let reason = format!("Zug '{}': Modell '{}' nicht vorgeladen", data.id, url);
            report_failure(state, EntityType::Train.import_operation(), reason);
            continue;
        }
        remove_one(state, &data.id);
        spawn_train(state, &data);
        imported += 1;
    }
    imported
}

fn ids_for(state: &EngineState, id: Option<&str>) -> Vec<String> {
    match id {
        Some(id) => vec![id.to_string()],
        None => state.trains.records.keys().cloned().collect(),
    }
}

pub fn set_visibility(state: &mut EngineState, id: Option<&str>, visible: bool) {
    for id in ids_for(state, id) {
        let Some(entity) = state.trains.records.get(&id).map(|r| r.entity) else {
            log::warn!("Unbekannter Zug '{}'", id);
            continue;
        };
        state.scene.set_visible(entity, visible);
    }
}

pub fn remove(state: &mut EngineState, id: Option<&str>) {
    for id in ids_for(state, id) {
        remove_one(state, &id);
    }
}

fn remove_one(state: &mut EngineState, id: &str) {
    state.animations.cancel(&AnimationKey::Train(id.to_string()));
    if let Some(record) = state.trains.records.shift_remove(id) {
        entities::dispose_entity(state, record.entity);
        log::debug!("Zug '{}' entfernt", id);
    }
}

fn relayout_all(state: &mut EngineState) {
    relayout_where(state, |_| true);
}

fn relayout_where(state: &mut EngineState, filter: impl Fn(&TrainRecord) -> bool) {
    let trains: Vec<(String, f32)> = state
        .trains
        .records
        .values()
        .filter(|r| filter(r))
        .map(|r| (r.id.clone(), r.progress))
        .collect();
    for (id, progress) in trains {
        place_at(state, &id, progress);
    }
}

/// Reaktion auf interne Events: Züge folgen ihren Pfaden.
pub fn on_engine_event(state: &mut EngineState, event: &EngineEvent) {
    match event {
        EngineEvent::FloorsBeforeMove => {
            if let Some(group) = state.scene.group(SceneGroup::Train) {
                state.scene.set_visible(group, false);
            }
        }
        EngineEvent::FloorsAfterMove { .. } => {
            relayout_all(state);
            if let Some(group) = state.scene.group(SceneGroup::Train) {
                state.scene.set_visible(group, true);
            }
        }
        EngineEvent::PathRemoved { path_id } => {
            let on_path: Vec<String> = state
                .trains
                .on_path(path_id)
                .map(|t| t.id.clone())
                .collect();
            for id in on_path {
                remove_one(state, &id);
            }
        }
        EngineEvent::PathRegistered { path_id } => {
            relayout_where(state, |train| train.path_id == *path_id);
        }
        EngineEvent::ModelLoaded { .. } => relayout_all(state),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::use_cases::test_support::{
        click, event_names, ready_state, record_host_events, screen_of,
    };
    use crate::app::use_cases::{floors, model};
    use crate::core::PathDraft;
    use approx::assert_relative_eq;

    fn draft() -> TrainDraft {
        TrainDraft {
            head_model: "head.glb".into(),
            body_model: "body.glb".into(),
            tail_model: "tail.glb".into(),
            car_count: 2,
            entrance_u: 0.0,
            stop_u: 0.5,
            exit_u: 1.0,
        }
    }

    fn add_path(state: &mut EngineState, z: f32) {
        paths::begin(state, PathDraft::default());
        for x in [-15.0, 15.0] {
            let screen = screen_of(state, Vec3::new(x, 0.1, z));
            click(state, screen);
        }
        paths::finish(state).unwrap();
    }

    /// Zug auf `path-1`, per Klick auf das Ribbon gewählt.
    fn confirm_train(state: &mut EngineState) -> TrainData {
        begin_selection(state, draft());
        let on_ribbon = screen_of(state, Vec3::new(0.0, 0.12, 10.0));
        click(state, on_ribbon);
        confirm(state).unwrap()
    }

    fn container_visible(state: &EngineState, path_id: &str) -> bool {
        let entity = state.paths.records[path_id].entity;
        state.scene.node(entity).unwrap().visible
    }

    /// Gerader Pfad auf F1 von x=-15 bis x=15.
    fn state_with_path() -> EngineState {
        let mut state = ready_state();
        floors::set_visibility(&mut state, Some("F2"), false);
        add_path(&mut state, 10.0);
        for url in ["head.glb", "body.glb", "tail.glb"] {
            model::preload_model(&mut state, url);
        }
        state
    }

    #[test]
    fn test_requires_path_and_models() {
        let mut state = ready_state();
        let events = record_host_events(&mut state);
        begin_selection(&mut state, draft());
        assert_eq!(state.editor.active, ActiveTool::None);

        let mut state = state_with_path();
        let mut missing = draft();
        missing.tail_model = "unbekannt.glb".into();
        begin_selection(&mut state, missing);
        assert_eq!(state.editor.active, ActiveTool::None);
        assert!(state.trains.records.is_empty());
        assert_eq!(event_names(&events), vec!["OperationFailed"]);
    }

    #[test]
    fn test_confirm_misuse_is_reported() {
        let mut state = state_with_path();
        assert_eq!(confirm(&mut state), Err(EngineError::NoTrainSelection));
        begin_selection(&mut state, draft());
        assert_eq!(confirm(&mut state), Err(EngineError::NoTrainPathSelected));
        assert_eq!(
            move_train(&mut state, "train-9", TrainPhase::Enter, 1.0),
            Err(EngineError::UnknownTrain("train-9".into()))
        );
    }

    #[test]
    fn test_select_confirm_and_enter() {
        let mut state = state_with_path();
        let events = record_host_events(&mut state);
        begin_selection(&mut state, draft());
        let on_ribbon = screen_of(&state, Vec3::new(0.0, 0.12, 10.0));
        click(&mut state, on_ribbon);
        assert_eq!(state.editor.train_select.selected(), Some("path-1"));
        assert!(!state.outline.selected.is_empty());

        let data = confirm(&mut state).unwrap();
        assert_eq!(data.car_count, 4);
        assert!(state.outline.selected.is_empty());
        let record = &state.trains.records[&data.id];
        assert_eq!(record.cars.len(), 6);
        assert_relative_eq!(record.car_spacing, 4.5);

        move_train(&mut state, &data.id, TrainPhase::Enter, 2.0).unwrap();
        crate::app::use_cases::frame::advance(&mut state, 1.0);
        crate::app::use_cases::frame::advance(&mut state, 1.5);
        let record = &state.trains.records[&data.id];
        assert_relative_eq!(record.progress, 0.5);
        let head = state.scene.world_position(record.cars[0]);
        assert_relative_eq!(head.x, 0.0, epsilon = 1e-2);
        assert!(!state.scene.node(record.cars[5]).unwrap().visible);
        assert_eq!(
            event_names(&events),
            vec!["TrainPathSelected", "TrainCreated", "TrainMoveFinished"]
        );
    }

    #[test]
    fn test_removing_path_removes_its_trains() {
        let mut state = state_with_path();
        begin_selection(&mut state, draft());
        let on_ribbon = screen_of(&state, Vec3::new(0.0, 0.12, 10.0));
        click(&mut state, on_ribbon);
        confirm(&mut state).unwrap();

        paths::remove(&mut state, Some("path-1"));
        assert!(state.trains.records.is_empty());
    }

    #[test]
    fn test_reimporting_path_keeps_its_trains() {
        let mut state = state_with_path();
        let train = confirm_train(&mut state);
        set_progress(&mut state, &train.id, 0.5).unwrap();
        let head_before = state
            .scene
            .world_position(state.trains.records[&train.id].cars[0]);

        let exported = serde_json::to_value(paths::export(&state, Some("path-1"))).unwrap();
        let items = match exported {
            serde_json::Value::Array(items) => items,
            other => vec![other],
        };
        assert_eq!(paths::import(&mut state, items), 1);

        let record = &state.trains.records[&train.id];
        assert_relative_eq!(record.progress, 0.5);
        let head_after = state.scene.world_position(record.cars[0]);
        assert!(head_after.abs_diff_eq(head_before, 1e-4));
        assert!(state.scene.node(record.cars[0]).unwrap().visible);
    }

    #[test]
    fn test_selection_restores_prior_path_visibility() {
        let mut state = state_with_path();
        add_path(&mut state, -10.0);
        paths::set_visibility(&mut state, Some("path-2"), false);

        confirm_train(&mut state);
        assert!(container_visible(&state, "path-1"));
        assert!(!container_visible(&state, "path-2"));

        paths::set_visibility(&mut state, Some("path-2"), true);
        begin_selection(&mut state, draft());
        let on_ribbon = screen_of(&state, Vec3::new(0.0, 0.12, 10.0));
        click(&mut state, on_ribbon);
        assert!(!container_visible(&state, "path-2"));

        tool_switch::set_active_tool(&mut state, ActiveTool::None);
        assert!(container_visible(&state, "path-2"));
    }

    #[test]
    fn test_skipped_imports_are_reported() {
        let mut state = state_with_path();
        let train = confirm_train(&mut state);
        let events = record_host_events(&mut state);

        let mut orphan = serde_json::to_value(&train).unwrap();
        orphan["id"] = "train-7".into();
        orphan["pathId"] = "path-9".into();
        let mut unloaded = serde_json::to_value(&train).unwrap();
        unloaded["id"] = "train-8".into();
        unloaded["bodyModel"] = "fehlt.glb".into();
        let broken = serde_json::json!({ "id": 3 });

        assert_eq!(import(&mut state, vec![orphan, unloaded, broken]), 0);
        assert_eq!(state.trains.records.len(), 1);
        let operations: Vec<String> = events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                HostEvent::OperationFailed { operation, .. } => Some(operation.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(operations, vec!["ImportTrain"; 3]);
    }
}
