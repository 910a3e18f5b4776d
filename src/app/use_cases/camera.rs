//! Use-Case-Funktionen für die Kamera: Orbit, Pan, Zoom und Kamera-Tweens.
//!
//! Rotation und Pan laufen über gedämpfte Deltas: jede Zeigerbewegung
//! addiert zum Rest-Delta, jeder Frame wendet den Anteil `1 - s` an und
//! behält `s`. Nach dem Loslassen klingt die Bewegung dadurch aus.

use crate::app::animation::{AnimationKey, Tween, TweenKind};
use crate::app::events::CameraAction;
use crate::app::picking;
use crate::app::state::{CameraDrag, EngineState};
use crate::app::subsystems::report_failure;
use crate::core::geometry::ray_plane;
use crate::core::{Camera3D, CameraState, Plane, Projection, SceneGroup};
use crate::shared::{Easing, PointerButton, PointerInfo};
use glam::{Quat, Vec2, Vec3};

/// Unterhalb davon gilt ein Rest-Delta als ausgeklungen.
const DELTA_EPSILON: f32 = 1e-6;

/// Weltpunkt unter dem Zeiger; ohne Treffer ein Punkt entlang der Blickrichtung.
fn pick_or_fallback(state: &EngineState, screen: Vec2) -> Vec3 {
    picking::pick(&state.scene, &state.resources, &state.camera, screen, None).unwrap_or_else(
        || state.camera.position + state.camera.forward() * state.options.pivot_fallback_distance,
    )
}

/// Startet eine Kamera-Geste passend zur Button-Belegung.
/// Liefert `false`, wenn der Button keiner Aktion zugeordnet ist.
pub fn begin_drag(state: &mut EngineState, pointer: &PointerInfo) -> bool {
    if !state.orbit.accepts_input() {
        return false;
    }
    let buttons = state.orbit.buttons;
    let drag = if buttons.rotate == Some(pointer.button) {
        let pivot = pick_or_fallback(state, pointer.screen);
        state.orbit.pivot = Some(pivot);
        state.orbit.rotate_delta = Vec2::ZERO;
        CameraDrag::Rotating { pivot }
    } else if buttons.pan == Some(pointer.button) {
        let hit = pick_or_fallback(state, pointer.screen);
        let modifiers = pointer.modifiers;
        let plane = if modifiers.shift || modifiers.ctrl || modifiers.alt {
            Plane::from_point_normal(hit, -state.camera.forward())
        } else {
            Plane::horizontal(hit.y)
        };
        state.orbit.pan_delta = Vec3::ZERO;
        CameraDrag::Panning { plane }
    } else if buttons.drag_zoom == Some(pointer.button) {
        CameraDrag::DragZooming {
            target: pick_or_fallback(state, pointer.screen),
        }
    } else {
        return false;
    };

    // Eine Nutzergeste bricht einen laufenden Kamera-Tween ab
    state.animations.cancel(&AnimationKey::Camera);
    state.orbit.drag = drag;
    state.orbit.last_screen = Some(pointer.screen);
    true
}

/// Zeigerbewegung während einer Kamera-Geste.
pub fn drag_move(state: &mut EngineState, screen: Vec2) {
    let Some(last) = state.orbit.last_screen else {
        return;
    };
    let delta = screen - last;
    match state.orbit.drag {
        CameraDrag::Idle => return,
        CameraDrag::Rotating { .. } => {
            state.orbit.rotate_delta += -delta * state.options.rotate_speed;
        }
        CameraDrag::Panning { plane } => {
            let previous = plane_point(&state.camera, last, &plane);
            let current = plane_point(&state.camera, screen, &plane);
            if let (Some(previous), Some(current)) = (previous, current) {
                state.orbit.pan_delta += previous - current;
            }
        }
        CameraDrag::DragZooming { target } => {
            let distance = state.camera.position.distance(target);
            let amount = -delta.y * distance * state.options.drag_zoom_speed;
            dolly_towards(
                &mut state.camera,
                target,
                amount,
                state.options.min_zoom_distance,
            );
        }
    }
    state.orbit.last_screen = Some(screen);
}

fn plane_point(camera: &Camera3D, screen: Vec2, plane: &Plane) -> Option<Vec3> {
    let ray = camera.ray_from_screen(screen);
    ray_plane(&ray, plane).map(|t| ray.at(t))
}

/// Beendet die Geste; Rest-Deltas klingen in den folgenden Frames aus.
pub fn end_drag(state: &mut EngineState) {
    state.orbit.drag = CameraDrag::Idle;
    state.orbit.last_screen = None;
}

/// Wendet die gedämpften Rotations- und Pan-Deltas für einen Frame an.
pub fn apply_damping(state: &mut EngineState) {
    let rotate = state.orbit.rotate_delta;
    if rotate.length_squared() > DELTA_EPSILON * DELTA_EPSILON {
        let s = state.options.rotate_smoothing;
        let step = rotate * (1.0 - s);
        let pivot = state.orbit.pivot.unwrap_or_else(|| {
            state.camera.position + state.camera.forward() * state.options.pivot_fallback_distance
        });
        orbit_around(
            &mut state.camera,
            pivot,
            step.x,
            step.y,
            state.options.vertical_clamp,
        );
        state.orbit.rotate_delta = rotate * s;
    } else {
        state.orbit.rotate_delta = Vec2::ZERO;
    }

    let pan = state.orbit.pan_delta;
    if pan.length_squared() > DELTA_EPSILON * DELTA_EPSILON {
        let s = state.options.pan_smoothing;
        state.camera.position += pan * (1.0 - s);
        state.orbit.pan_delta = pan * s;
    } else {
        state.orbit.pan_delta = Vec3::ZERO;
    }
}

/// Dreht die Kamera um `pivot`: Yaw um Welt-Y, Pitch um die Kamera-Rechte.
/// Der Pitch entfällt, wenn die Blickrichtung sonst zu nah an die Senkrechte käme.
pub fn orbit_around(camera: &mut Camera3D, pivot: Vec3, yaw: f32, pitch: f32, vertical_clamp: f32) {
    let yaw_rotation = Quat::from_rotation_y(yaw);
    let mut pitch_rotation = Quat::from_axis_angle(camera.right(), pitch);
    let candidate = yaw_rotation * pitch_rotation * camera.forward();
    if candidate.y.abs() > 1.0 - vertical_clamp {
        pitch_rotation = Quat::IDENTITY;
    }
    let rotation = yaw_rotation * pitch_rotation;
    camera.position = pivot + rotation * (camera.position - pivot);
    camera.rotation = (rotation * camera.rotation).normalize();
}

/// Bewegt die Kamera um `amount` auf `target` zu (negativ: weg), mit Mindestabstand.
pub fn dolly_towards(camera: &mut Camera3D, target: Vec3, amount: f32, min_distance: f32) {
    let offset = target - camera.position;
    let distance = offset.length();
    if distance <= f32::EPSILON {
        return;
    }
    let new_distance = (distance - amount).max(min_distance);
    camera.position = target - offset / distance * new_distance;
}

/// Mausrad: Schritt proportional zur Distanz zum Punkt unter dem Zeiger.
/// Positives Delta zoomt heraus.
pub fn zoom_at_screen(state: &mut EngineState, screen: Vec2, delta: f32) {
    if !state.orbit.accepts_input() || delta == 0.0 {
        return;
    }
    state.animations.cancel(&AnimationKey::Camera);
    let target = pick_or_fallback(state, screen);
    let distance = state.camera.position.distance(target);
    let amount = -delta * distance * state.options.zoom_interval;
    dolly_towards(
        &mut state.camera,
        target,
        amount,
        state.options.min_zoom_distance,
    );
    if state.camera.is_orthographic() {
        let factor = (1.0 - delta * state.options.zoom_interval).max(0.1);
        let zoom = state.camera.zoom() * factor;
        state.camera.set_zoom(zoom);
    }
}

/// Host schaltet die Kamera-Steuerung an oder aus.
pub fn set_enabled(state: &mut EngineState, enabled: bool) {
    state.orbit.enabled = enabled;
    if !enabled {
        state.orbit.stop();
    }
    log::debug!("Kamera-Steuerung {}", if enabled { "aktiv" } else { "inaktiv" });
}

/// Ändert die Button-Belegung einer Kamera-Aktion.
///
/// Während der Pfad-Bearbeitung wirkt die Änderung erst nach deren Ende.
pub fn set_button(state: &mut EngineState, action: CameraAction, button: Option<PointerButton>) {
    let mapping = match state.orbit.saved_buttons.as_mut() {
        Some(saved) => saved,
        None => &mut state.orbit.buttons,
    };
    match action {
        CameraAction::Rotate => mapping.rotate = button,
        CameraAction::Pan => mapping.pan = button,
        CameraAction::DragZoom => mapping.drag_zoom = button,
    }
}

/// Startet einen Kamera-Tween (Cancel-and-Replace im Kamera-Slot).
/// Eine Dauer ≤ 0 setzt die Pose sofort.
pub fn tween_to(state: &mut EngineState, target: CameraState, duration: f32) {
    state.orbit.stop();
    if duration <= 0.0 {
        state.animations.cancel(&AnimationKey::Camera);
        state.camera.apply_state(&target);
        return;
    }
    let tween = Tween::new(
        TweenKind::Camera {
            from: state.camera.state(),
            to: target,
        },
        duration,
        Easing::QuarticInOut,
    );
    state.animations.start(AnimationKey::Camera, tween);
}

/// Interpoliert die Kamera-Pose für einen Tween-Frame.
pub fn apply_tween_frame(camera: &mut Camera3D, from: &CameraState, to: &CameraState, eased: f32) {
    camera.apply_state(&CameraState {
        position: from.position.lerp(to.position, eased),
        rotation: from.rotation.slerp(to.rotation, eased),
        zoom: from.zoom + (to.zoom - from.zoom) * eased,
    });
}

/// Kamera-Pose, die die Bounding-Sphere des Modells bei gleicher Blickrichtung füllt.
pub fn framing_state(camera: &Camera3D, center: Vec3, radius: f32) -> CameraState {
    let radius = radius.max(f32::EPSILON);
    match camera.projection {
        Projection::Perspective { fov_y } => {
            let fov = fov_y.min(fov_y * camera.aspect());
            let distance = radius / (fov * 0.5).sin();
            CameraState {
                position: center - camera.forward() * distance,
                rotation: camera.rotation,
                zoom: camera.zoom(),
            }
        }
        Projection::Orthographic { half_height, .. } => {
            let visible = radius * camera.aspect().recip().max(1.0);
            CameraState {
                position: center - camera.forward() * (radius * 2.0 + camera.near),
                rotation: camera.rotation,
                zoom: half_height / visible,
            }
        }
    }
}

/// Rahmt das geladene Modell ein.
pub fn extend_view(state: &mut EngineState, duration: f32) {
    let group = state.group(SceneGroup::Model);
    let Some(bounds) = state.scene.subtree_bounds(group, &state.resources) else {
        report_failure(state, "ExtendView", "Kein sichtbares Modell geladen");
        return;
    };
    let sphere = bounds.bounding_sphere();
    let target = framing_state(&state.camera, sphere.center, sphere.radius);
    log::debug!(
        "ExtendView: Zentrum {:?}, Radius {:.2}",
        sphere.center,
        sphere.radius
    );
    tween_to(state, target, duration);
}
