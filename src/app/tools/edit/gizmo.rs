//! Transform-Gizmo: Handle-Picking im Screen-Space und Drag-Auswertung.

use super::state::{GizmoAxis, GizmoMode};
use crate::core::geometry::point_segment_distance_2d;
use crate::core::{Camera3D, Transform};
use glam::{Quat, Vec2, Vec3};

/// Welt-Länge der Gizmo-Achsen, sodass sie `size_px` Pixel lang erscheinen.
pub fn gizmo_world_length(camera: &Camera3D, origin: Vec3, size_px: f32) -> f32 {
    camera.world_per_pixel_at(camera.position.distance(origin)) * size_px
}

/// Achse, deren Screen-Strecke dem Zeiger am nächsten liegt (innerhalb der Toleranz).
pub fn pick_axis(
    camera: &Camera3D,
    origin: Vec3,
    screen: Vec2,
    size_px: f32,
    tolerance_px: f32,
) -> Option<GizmoAxis> {
    let origin_screen = camera.project_to_screen(origin)?;
    let length = gizmo_world_length(camera, origin, size_px);

    let mut best: Option<(GizmoAxis, f32)> = None;
    for axis in GizmoAxis::ALL {
        let Some(tip) = camera.project_to_screen(origin + axis.vector() * length) else {
            continue;
        };
        let distance = point_segment_distance_2d(screen, origin_screen, tip);
        if distance <= tolerance_px && best.is_none_or(|(_, d)| distance < d) {
            best = Some((axis, distance));
        }
    }
    best.map(|(axis, _)| axis)
}

/// Neue Welt-Transformation für einen Drag von `from` nach `to` (Screen-Pixel).
#[allow(clippy::too_many_arguments)]
pub fn drag_transform(
    mode: GizmoMode,
    axis: GizmoAxis,
    start: &Transform,
    camera: &Camera3D,
    from: Vec2,
    to: Vec2,
    size_px: f32,
    rotate_speed: f32,
) -> Transform {
    let origin = start.translation;
    let length = gizmo_world_length(camera, origin, size_px);
    let axis_screen = match (
        camera.project_to_screen(origin),
        camera.project_to_screen(origin + axis.vector() * length),
    ) {
        (Some(a), Some(b)) => b - a,
        _ => Vec2::ZERO,
    };
    let delta = to - from;
    let mut result = *start;

    match mode {
        GizmoMode::Translate => {
            let len_sq = axis_screen.length_squared();
            if len_sq > 1e-6 {
                let amount = delta.dot(axis_screen) / len_sq * length;
                result.translation = origin + axis.vector() * amount;
            }
        }
        GizmoMode::Rotate => {
            let angle = match axis_screen.try_normalize() {
                Some(dir) => delta.dot(dir.perp()) * rotate_speed,
                None => delta.x * rotate_speed,
            };
            result.rotation = (Quat::from_axis_angle(axis.vector(), angle) * start.rotation).normalize();
        }
        GizmoMode::Scale => {
            let amount_px = axis_screen
                .try_normalize()
                .map_or(delta.x, |dir| delta.dot(dir));
            let factor = (1.0 + amount_px / size_px.max(1.0)).max(0.01);
            result.scale[axis.index()] = start.scale[axis.index()] * factor;
        }
    }
    result
}
