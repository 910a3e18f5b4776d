//! Gemeinsame Fixtures der Integrationstests.

#![allow(dead_code)]

use facility_scene_authoring::core::{Camera3D, MeshData, Transform};
use facility_scene_authoring::{
    EngineOptions, MemoryModelLoader, ModelAsset, ModelNodeDesc, PointerButton,
    SceneAuthoringContext,
};
use glam::{Vec2, Vec3};

pub const STATION: &str = "station.glb";
pub const FLAT: &str = "flat.glb";
pub const TOWER: &str = "tower.glb";
pub const CARS: [&str; 3] = ["head.glb", "body.glb", "tail.glb"];

/// Quadratische Bodenfläche bei y = 0 (Seitenlänge `size`).
pub fn ground_quad(size: f32) -> MeshData {
    let h = size * 0.5;
    MeshData::new(
        vec![
            Vec3::new(-h, 0.0, -h),
            Vec3::new(h, 0.0, -h),
            Vec3::new(h, 0.0, h),
            Vec3::new(-h, 0.0, h),
        ],
        vec![0, 1, 2, 0, 2, 3],
    )
}

/// Zwei Floors an derselben Quellposition; F2 trägt eine kleinere Galerie.
pub fn station_asset() -> ModelAsset {
    ModelAsset::new(
        STATION,
        vec![ModelNodeDesc::new("Station")
            .with_child(
                ModelNodeDesc::new("Level_A")
                    .with_floor("F1", 0, "Erdgeschoss")
                    .with_mesh(ground_quad(60.0)),
            )
            .with_child(
                ModelNodeDesc::new("Level_B")
                    .with_floor("F2", 1, "Galerie")
                    .with_child(
                        ModelNodeDesc::new("Gallery")
                            .with_transform(Transform::from_translation(Vec3::new(
                                0.0, 4.0, 0.0,
                            )))
                            .with_mesh(ground_quad(8.0)),
                    ),
            )],
    )
}

/// Ein einzelner Floor, dessen Oberfläche bei y = 0 liegt.
pub fn flat_asset() -> ModelAsset {
    ModelAsset::new(
        FLAT,
        vec![ModelNodeDesc::new("Plate")
            .with_floor("F1", 0, "Ebene")
            .with_mesh(ground_quad(40.0))],
    )
}

/// Drei Floors mit eigenen Quellpositionen (versetzt in Höhe und Grundriss).
pub fn tower_asset() -> ModelAsset {
    let level = |name: &str, id: &str, order: i32, offset: Vec3| {
        ModelNodeDesc::new(name)
            .with_transform(Transform::from_translation(offset))
            .with_floor(id, order, name)
            .with_mesh(ground_quad(20.0))
    };
    ModelAsset::new(
        TOWER,
        vec![ModelNodeDesc::new("Tower")
            .with_child(level("Basement", "B1", 0, Vec3::new(0.0, -3.0, 0.0)))
            .with_child(level("Ground", "G0", 1, Vec3::new(2.0, 0.5, -1.0)))
            .with_child(level("Roof", "R1", 2, Vec3::new(-1.5, 4.25, 3.0)))],
    )
}

fn car_asset(url: &str) -> ModelAsset {
    ModelAsset::new(
        url,
        vec![ModelNodeDesc::new("Car").with_mesh(MeshData::cuboid(Vec3::new(1.0, 1.0, 2.0)))],
    )
}

/// Kontext mit allen Test-Assets, 800×600 Viewport und Kamera senkrecht über dem Ursprung.
pub fn context() -> SceneAuthoringContext {
    let mut loader = MemoryModelLoader::new()
        .with(station_asset())
        .with(flat_asset())
        .with(tower_asset());
    for url in CARS {
        loader.insert(car_asset(url));
    }
    let mut ctx = SceneAuthoringContext::new(EngineOptions::default(), Box::new(loader));
    ctx.resize(Vec2::new(800.0, 600.0)).expect("Resize");

    let mut camera = Camera3D::new();
    camera.position = Vec3::new(0.0, 50.0, 0.001);
    camera.look_at(Vec3::ZERO);
    ctx.set_camera_state(camera.state(), Some(0.0))
        .expect("Kamera setzen");
    ctx.advance_frame(0.0).expect("Frame");
    ctx
}

pub fn screen_of(ctx: &SceneAuthoringContext, world: Vec3) -> Vec2 {
    ctx.state()
        .camera
        .project_to_screen(world)
        .expect("Punkt sollte sichtbar sein")
}

pub fn click_world(ctx: &mut SceneAuthoringContext, world: Vec3) {
    let screen = screen_of(ctx, world);
    ctx.click(screen, PointerButton::Primary).expect("Klick");
}

/// Rechnet Frames, bis keine Animation mehr läuft.
pub fn settle(ctx: &mut SceneAuthoringContext) {
    for _ in 0..1000 {
        if ctx.state().animations.is_empty() {
            return;
        }
        ctx.advance_frame(1.0 / 60.0).expect("Frame");
    }
    panic!("Animationen laufen nach 1000 Frames noch");
}
