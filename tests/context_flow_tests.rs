//! Durchstiche über die öffentliche Fassade: Laden, Floors, Platzierung,
//! Pfade, Züge, Import/Export und Fehlbedienung.

mod common;

use approx::assert_relative_eq;
use common::{click_world, context, settle, CARS, FLAT, STATION, TOWER};
use facility_scene_authoring::app::events::ImportPayload;
use facility_scene_authoring::{
    EngineError, EntityType, GizmoMode, HostEvent, MarkerDraft, PathData, PathDraft, PoiData,
    TrainData, TrainDraft,
};
use glam::Vec3;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

fn floor_y(ctx: &facility_scene_authoring::SceneAuthoringContext, floor_id: &str) -> f32 {
    let entity = ctx
        .state()
        .floors
        .entity_of(floor_id)
        .expect("Floor sollte registriert sein");
    ctx.state().scene.world_position(entity).y
}

/// Zeichnet einen geraden Pfad über die Punkte und liefert die Abschlussdaten.
fn draw_path(ctx: &mut facility_scene_authoring::SceneAuthoringContext, points: &[Vec3]) -> PathData {
    let finished = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&finished);
    ctx.create_path(PathDraft::default(), move |data| {
        *sink.borrow_mut() = Some(data)
    })
    .expect("Pfad starten");
    for point in points {
        click_world(ctx, *point);
    }
    ctx.finish_path().expect("Pfad abschließen");
    let data = finished.borrow_mut().take();
    data.expect("PathFinished sollte den Callback auslösen")
}

fn train_draft() -> TrainDraft {
    TrainDraft {
        head_model: CARS[0].into(),
        body_model: CARS[1].into(),
        tail_model: CARS[2].into(),
        car_count: 2,
        entrance_u: 0.0,
        stop_u: 0.5,
        exit_u: 1.0,
    }
}

#[test]
fn expand_spreads_floors_by_interval() {
    let mut ctx = context();
    ctx.load_model(STATION, |_| {}).unwrap();

    let done = Rc::new(Cell::new(false));
    let flag = Rc::clone(&done);
    ctx.expand_floors(Some(1.0), Some(5.0), move || flag.set(true))
        .unwrap();
    assert!(!done.get());
    settle(&mut ctx);

    assert!(done.get());
    assert!(ctx.state().floors.expanded);
    assert_relative_eq!(floor_y(&ctx, "F2") - floor_y(&ctx, "F1"), 5.0, epsilon = 1e-4);

    let collapsed = Rc::new(Cell::new(false));
    let flag = Rc::clone(&collapsed);
    ctx.collapse_floors(Some(0.0), move || flag.set(true)).unwrap();
    settle(&mut ctx);
    assert!(collapsed.get());
    assert_relative_eq!(floor_y(&ctx, "F2"), floor_y(&ctx, "F1"), epsilon = 1e-4);
}

fn local_position(ctx: &facility_scene_authoring::SceneAuthoringContext, floor_id: &str) -> Vec3 {
    let entity = ctx.state().floors.entity_of(floor_id).expect("Floor");
    ctx.state().scene.node(entity).expect("Floor-Node").local.translation
}

#[test]
fn collapse_restores_each_floor_source_position() {
    let mut ctx = context();
    ctx.load_model(TOWER, |_| {}).unwrap();
    let ids = ["B1", "G0", "R1"];
    let sources: Vec<Vec3> = ids
        .iter()
        .map(|id| ctx.state().floors.get(id).expect("Floor").source_position)
        .collect();
    assert_ne!(sources[0], sources[1]);
    for (id, source) in ids.iter().zip(&sources) {
        assert!(local_position(&ctx, id).abs_diff_eq(*source, 1e-5));
    }

    ctx.expand_floors(Some(0.8), Some(6.5), || {}).unwrap();
    settle(&mut ctx);
    for (i, (id, source)) in ids.iter().zip(&sources).enumerate() {
        let expected = *source + Vec3::Y * (i as f32 * 6.5);
        assert!(local_position(&ctx, id).abs_diff_eq(expected, 1e-4), "{id}");
    }

    ctx.collapse_floors(Some(0.45), || {}).unwrap();
    settle(&mut ctx);
    for (id, source) in ids.iter().zip(&sources) {
        let local = local_position(&ctx, id);
        assert!(local.abs_diff_eq(*source, 1e-5), "{id}: {local:?} != {source:?}");
    }
    assert!(!ctx.state().floors.expanded);
}

#[test]
fn two_straight_segments_share_their_joint() {
    let mut ctx = context();
    ctx.load_model(FLAT, |_| {}).unwrap();

    let data = draw_path(
        &mut ctx,
        &[
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
        ],
    );

    assert_eq!(data.segments.len(), 2);
    let joint = data.segments[0].end.position;
    assert!(joint.abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), 1e-2), "{joint:?}");
    assert_eq!(data.segments[1].start.position, joint);
    assert_eq!(data.segments[0].end.floor_id.as_deref(), Some("F1"));
}

#[test]
fn marker_export_import_round_trip() {
    let mut ctx = context();
    ctx.load_model(STATION, |_| {}).unwrap();

    let created: Rc<RefCell<Option<PoiData>>> = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&created);
    ctx.create_marker(
        MarkerDraft {
            icon: "exit".into(),
            text: "Ausgang".into(),
            ..MarkerDraft::default()
        },
        move |data| *sink.borrow_mut() = Some(data),
    )
    .unwrap();
    click_world(&mut ctx, Vec3::new(-12.0, 0.0, 6.0));
    let created = created.borrow_mut().take().expect("MarkerCreated");
    assert_eq!(created.floor_id.as_deref(), Some("F1"));

    let exported = ctx.export_all(EntityType::Marker).unwrap();
    let text = serde_json::to_string(&exported).unwrap();

    ctx.clear(EntityType::Marker).unwrap();
    assert_eq!(ctx.export_all(EntityType::Marker).unwrap(), serde_json::json!([]));

    ctx.import(EntityType::Marker, ImportPayload::Json(text))
        .unwrap();
    let restored: Vec<PoiData> =
        serde_json::from_value(ctx.export_all(EntityType::Marker).unwrap()).unwrap();
    assert_eq!(restored.len(), 1);
    assert_eq!(restored[0].id, created.id);
    assert_eq!(restored[0].text, "Ausgang");
    assert!(restored[0].position.abs_diff_eq(created.position, 1e-4));
}

#[test]
fn train_enters_and_reports_completion() {
    let mut ctx = context();
    ctx.load_model(FLAT, |_| {}).unwrap();
    draw_path(
        &mut ctx,
        &[Vec3::new(-15.0, 0.0, 10.0), Vec3::new(15.0, 0.0, 10.0)],
    );
    for url in CARS {
        ctx.preload_model(url).unwrap();
    }

    let train: Rc<RefCell<Option<TrainData>>> = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&train);
    ctx.create_train(train_draft(), move |data| *sink.borrow_mut() = Some(data))
        .unwrap();
    click_world(&mut ctx, Vec3::new(0.0, 0.02, 10.0));
    ctx.confirm_train_path().unwrap();
    let train = train.borrow_mut().take().expect("TrainCreated");

    let arrived = Rc::new(Cell::new(false));
    let flag = Rc::clone(&arrived);
    ctx.do_enter(&train.id, Some(0.5), move || flag.set(true))
        .unwrap();
    settle(&mut ctx);

    assert!(arrived.get());
    let exported: Vec<TrainData> =
        serde_json::from_value(ctx.export(EntityType::Train, &train.id).unwrap()).unwrap();
    assert_relative_eq!(exported[0].progress, 0.5);
    assert_eq!(ctx.pending_callbacks(), 0);
}

#[test]
fn unknown_train_move_keeps_no_callback() {
    let mut ctx = context();
    ctx.load_model(FLAT, |_| {}).unwrap();

    let err = ctx.do_exit("train-7", None, || {}).unwrap_err();
    assert_eq!(
        err.downcast_ref::<EngineError>(),
        Some(&EngineError::UnknownTrain("train-7".into()))
    );
    assert_eq!(ctx.pending_callbacks(), 0);
}

#[test]
fn misuse_surfaces_as_engine_error() {
    let mut ctx = context();
    ctx.load_model(STATION, |_| {}).unwrap();

    let err = ctx.finish_edit(EntityType::Label).unwrap_err();
    assert_eq!(
        err.downcast_ref::<EngineError>(),
        Some(&EngineError::EditNotActive(EntityType::Label))
    );
    let err = ctx.set_gizmo_mode(GizmoMode::Rotate).unwrap_err();
    assert_eq!(
        err.downcast_ref::<EngineError>(),
        Some(&EngineError::GizmoWithoutEdit)
    );
    let err = ctx.finish_path().unwrap_err();
    assert_eq!(
        err.downcast_ref::<EngineError>(),
        Some(&EngineError::NoActivePath)
    );

    ctx.teardown();
    let err = ctx.show_all(EntityType::Marker).unwrap_err();
    assert_eq!(
        err.downcast_ref::<EngineError>(),
        Some(&EngineError::NotInitialized)
    );
}

#[test]
fn precondition_failures_go_to_external_channel() {
    let mut ctx = context();
    ctx.load_model(STATION, |_| {}).unwrap();
    let failures = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&failures);
    ctx.subscribe(move |event| {
        if let HostEvent::OperationFailed { operation, .. } = event {
            sink.borrow_mut().push(operation.clone());
        }
    });

    ctx.create_train(train_draft(), |_| panic!("kein Zug erwartet"))
        .unwrap();

    assert_eq!(*failures.borrow(), vec!["CreateTrain".to_string()]);
}

#[test]
fn hierarchy_is_sorted_and_leaves_scene_untouched() {
    let mut ctx = context();
    let entries = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&entries);

    ctx.get_model_hierarchy(STATION, move |list| *sink.borrow_mut() = list)
        .unwrap();

    let entries = entries.borrow();
    let ids: Vec<&str> = entries.iter().map(|e| e.floor_id.as_str()).collect();
    assert_eq!(ids, vec!["F1", "F2"]);
    assert_eq!(entries[1].display_name, "Galerie");
    assert!(ctx.state().model.is_none());
    assert!(ctx.state().floors.is_empty());
}
