//! Gemeinsame Test-Szene: zweistöckiges Gebäude, Bibliotheksmodelle, Draufsicht-Kamera.

use super::{lifecycle, model, pointer};
use crate::app::events::HostEvent;
use crate::app::state::EngineState;
use crate::asset::{MemoryModelLoader, ModelAsset, ModelNodeDesc};
use crate::core::{MeshData, Transform};
use crate::shared::{EngineOptions, PointerButton, PointerInfo};
use glam::{Vec2, Vec3};
use std::cell::RefCell;
use std::rc::Rc;

pub(crate) const BUILDING: &str = "building.glb";
pub(crate) const KIOSK: &str = "kiosk.glb";

/// F1 (40×40) und F2 (10×10, 4 m höher) teilen dieselbe Quellposition.
pub(crate) fn building_asset() -> ModelAsset {
    let deck = ModelNodeDesc::new("Deck")
        .with_transform(Transform::from_translation(Vec3::new(0.0, 4.0, 0.0)))
        .with_mesh(MeshData::slab(10.0, 10.0, 0.2));
    ModelAsset::new(
        BUILDING,
        vec![ModelNodeDesc::new("Building")
            .with_child(
                ModelNodeDesc::new("Floor_1")
                    .with_floor("F1", 0, "Erdgeschoss")
                    .with_mesh(MeshData::slab(40.0, 40.0, 0.2)),
            )
            .with_child(
                ModelNodeDesc::new("Floor_2")
                    .with_floor("F2", 1, "Obergeschoss")
                    .with_child(deck),
            )],
    )
}

fn car_asset(url: &str) -> ModelAsset {
    ModelAsset::new(
        url,
        vec![ModelNodeDesc::new("Car").with_mesh(MeshData::cuboid(Vec3::new(1.0, 1.0, 2.0)))],
    )
}

/// Initialisierter State mit geladenem Gebäude und Kamera senkrecht darüber.
pub(crate) fn ready_state() -> EngineState {
    let loader = MemoryModelLoader::new()
        .with(building_asset())
        .with(ModelAsset::new(
            KIOSK,
            vec![ModelNodeDesc::new("Kiosk").with_mesh(MeshData::cuboid(Vec3::splat(0.5)))],
        ))
        .with(car_asset("head.glb"))
        .with(car_asset("body.glb"))
        .with(car_asset("tail.glb"));
    let mut state = EngineState::with_loader(EngineOptions::default(), Box::new(loader));
    lifecycle::initialize(&mut state);
    lifecycle::resize_viewport(&mut state, Vec2::new(800.0, 600.0));
    state.camera.position = Vec3::new(0.0, 50.0, 0.001);
    state.camera.look_at(Vec3::ZERO);
    model::load_model(&mut state, BUILDING);
    state
}

/// Bildschirmposition eines Weltpunkts.
pub(crate) fn screen_of(state: &EngineState, world: Vec3) -> Vec2 {
    state
        .camera
        .project_to_screen(world)
        .expect("Punkt sollte vor der Kamera liegen")
}

/// Klick mit der Primärtaste ohne Bewegung.
pub(crate) fn click(state: &mut EngineState, screen: Vec2) {
    let info = PointerInfo::new(screen, PointerButton::Primary);
    pointer::pointer_down(state, info);
    pointer::pointer_up(state, info);
}

/// Zeichnet alle Host-Events auf.
pub(crate) fn record_host_events(state: &mut EngineState) -> Rc<RefCell<Vec<HostEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    state
        .external
        .subscribe(move |event: &HostEvent| sink.borrow_mut().push(event.clone()));
    events
}

/// Namen der aufgezeichneten Host-Events.
pub(crate) fn event_names(events: &Rc<RefCell<Vec<HostEvent>>>) -> Vec<&'static str> {
    events.borrow().iter().map(HostEvent::name).collect()
}
