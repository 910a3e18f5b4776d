//! Facility Scene Authoring (Demo).
//!
//! Lädt ein Gebäudemodell, fächert die Floors auf, setzt per simulierter
//! Zeiger-Eingabe einen Marker und einen Pfad und gibt den Export als JSON aus.

use facility_scene_authoring::core::{Camera3D, MeshData, Transform};
use facility_scene_authoring::{
    EngineOptions, EntityType, GltfFileLoader, MarkerDraft, MemoryModelLoader, ModelAsset,
    ModelLoader, ModelNodeDesc, PathDraft, PointerButton, SceneAuthoringContext,
};
use glam::{Vec2, Vec3};
use std::path::Path;

const DEMO_URL: &str = "demo-building.glb";
const FRAME_DT: f32 = 1.0 / 60.0;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!(
        "Facility Scene Authoring v{} startet...",
        env!("CARGO_PKG_VERSION")
    );

    let options = EngineOptions::load_from_file(&EngineOptions::config_path());
    let (loader, url) = loader_from_args(std::env::args().nth(1).as_deref());
    let mut ctx = SceneAuthoringContext::new(options, loader);
    ctx.resize(Vec2::new(1280.0, 720.0))?;

    ctx.load_model(&url, |result| match result {
        Ok(floors) => log::info!("Modell bereit ({} Floors)", floors),
        Err(reason) => log::error!("Modell nicht geladen: {}", reason),
    })?;
    if ctx.state().model.is_none() {
        anyhow::bail!("Modell '{}' konnte nicht geladen werden", url);
    }

    look_down(&mut ctx, 90.0)?;
    ctx.expand_floors(None, None, || log::info!("Floors aufgefächert"))?;
    run_until_idle(&mut ctx)?;

    let floor_top = Vec3::Y * 0.1;
    ctx.create_marker(
        MarkerDraft {
            icon: "info".into(),
            text: "Information".into(),
            ..MarkerDraft::default()
        },
        |data| log::info!("Marker '{}' erstellt", data.id),
    )?;
    click_world(&mut ctx, Vec3::new(12.0, 0.0, 0.0) + floor_top)?;

    ctx.create_path(PathDraft::default(), |data| {
        log::info!("Pfad '{}' mit {} Segmenten", data.id, data.segments.len())
    })?;
    for corner in [
        Vec3::new(-15.0, 0.0, -15.0),
        Vec3::new(-15.0, 0.0, 15.0),
        Vec3::new(15.0, 0.0, 15.0),
    ] {
        click_world(&mut ctx, corner + floor_top)?;
    }
    ctx.finish_path()?;

    let export = serde_json::json!({
        "markers": ctx.export_all(EntityType::Marker)?,
        "paths": ctx.export_all(EntityType::Path)?,
        "camera": ctx.camera_state(),
    });
    println!("{}", serde_json::to_string_pretty(&export)?);

    let scene = ctx.render_scene();
    log::info!(
        "Render-Szene: {} Meshes, {} Marker-Instanzen, {} Billboards",
        scene.meshes.len(),
        scene.instance_count(),
        scene.billboards.len()
    );
    Ok(())
}

/// glTF-Datei aus dem Argument oder das eingebaute Demo-Gebäude.
fn loader_from_args(arg: Option<&str>) -> (Box<dyn ModelLoader>, String) {
    match arg {
        Some(path) => {
            let path = Path::new(path);
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            let url = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            (Box::new(GltfFileLoader::new(base)), url)
        }
        None => (
            Box::new(MemoryModelLoader::new().with(demo_building())),
            DEMO_URL.to_string(),
        ),
    }
}

/// Zwei Geschosse: Erdgeschoss 40×40, Galerie 10×10 vier Meter darüber.
fn demo_building() -> ModelAsset {
    let gallery = ModelNodeDesc::new("Gallery")
        .with_transform(Transform::from_translation(Vec3::new(0.0, 4.0, 0.0)))
        .with_mesh(MeshData::slab(10.0, 10.0, 0.2));
    ModelAsset::new(
        DEMO_URL,
        vec![ModelNodeDesc::new("Station")
            .with_child(
                ModelNodeDesc::new("Level_0")
                    .with_floor("L0", 0, "Erdgeschoss")
                    .with_mesh(MeshData::slab(40.0, 40.0, 0.2)),
            )
            .with_child(
                ModelNodeDesc::new("Level_1")
                    .with_floor("L1", 1, "Galerie")
                    .with_child(gallery),
            )],
    )
}

/// Kamera senkrecht über dem Ursprung.
fn look_down(ctx: &mut SceneAuthoringContext, height: f32) -> anyhow::Result<()> {
    let mut camera = Camera3D::new();
    camera.position = Vec3::new(0.0, height, 0.001);
    camera.look_at(Vec3::ZERO);
    ctx.set_camera_state(camera.state(), Some(0.0))?;
    ctx.advance_frame(0.0)
}

/// Frames rechnen, bis keine Animation mehr läuft.
fn run_until_idle(ctx: &mut SceneAuthoringContext) -> anyhow::Result<()> {
    for _ in 0..600 {
        if ctx.state().animations.is_empty() {
            break;
        }
        ctx.advance_frame(FRAME_DT)?;
    }
    Ok(())
}

fn click_world(ctx: &mut SceneAuthoringContext, world: Vec3) -> anyhow::Result<()> {
    let screen = ctx
        .state()
        .camera
        .project_to_screen(world)
        .ok_or_else(|| anyhow::anyhow!("Punkt {world:?} liegt hinter der Kamera"))?;
    ctx.click(screen, PointerButton::Primary)
}
