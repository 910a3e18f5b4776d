use super::super::AuthoringTool;
use super::{drag_transform, gizmo_world_length, pick_axis, EditTarget, EditTool, GizmoAxis, GizmoMode};
use crate::core::{Camera3D, EntityId, Transform};
use approx::assert_relative_eq;
use glam::{Quat, Vec2, Vec3};

const SIZE_PX: f32 = 80.0;

fn target(id: &str) -> EditTarget {
    EditTarget {
        id: id.to_string(),
        entity: EntityId::from_raw(10),
        preview: EntityId::from_raw(11),
        gizmo: EntityId::from_raw(12),
    }
}

fn axis_on_screen(camera: &Camera3D, axis: GizmoAxis) -> (Vec2, Vec2) {
    let length = gizmo_world_length(camera, Vec3::ZERO, SIZE_PX);
    let a = camera.project_to_screen(Vec3::ZERO).expect("Ursprung sichtbar");
    let b = camera
        .project_to_screen(axis.vector() * length)
        .expect("Achsenspitze sichtbar");
    (a, b)
}

#[test]
fn test_pick_axis_hits_x_handle() {
    let camera = Camera3D::new();
    let (origin, tip) = axis_on_screen(&camera, GizmoAxis::X);
    let on_axis = origin.lerp(tip, 0.5);
    assert_eq!(pick_axis(&camera, Vec3::ZERO, on_axis, SIZE_PX, 8.0), Some(GizmoAxis::X));
}

#[test]
fn test_pick_axis_misses_far_from_handles() {
    let camera = Camera3D::new();
    let (origin, _) = axis_on_screen(&camera, GizmoAxis::X);
    let far = origin + Vec2::new(-200.0, -200.0);
    assert_eq!(pick_axis(&camera, Vec3::ZERO, far, SIZE_PX, 8.0), None);
}

#[test]
fn test_translate_drag_moves_along_axis_only() {
    let camera = Camera3D::new();
    let (origin, tip) = axis_on_screen(&camera, GizmoAxis::X);
    let length = gizmo_world_length(&camera, Vec3::ZERO, SIZE_PX);

    let result = drag_transform(
        GizmoMode::Translate,
        GizmoAxis::X,
        &Transform::IDENTITY,
        &camera,
        origin,
        tip,
        SIZE_PX,
        0.01,
    );
    assert_relative_eq!(result.translation.x, length, epsilon = 1e-3);
    assert_relative_eq!(result.translation.y, 0.0);
    assert_relative_eq!(result.translation.z, 0.0);
}

#[test]
fn test_scale_drag_by_gizmo_size_doubles_axis() {
    let camera = Camera3D::new();
    let (origin, tip) = axis_on_screen(&camera, GizmoAxis::X);
    let dir = (tip - origin).normalize();

    let result = drag_transform(
        GizmoMode::Scale,
        GizmoAxis::X,
        &Transform::IDENTITY,
        &camera,
        origin,
        origin + dir * SIZE_PX,
        SIZE_PX,
        0.01,
    );
    assert_relative_eq!(result.scale.x, 2.0, epsilon = 1e-4);
    assert_relative_eq!(result.scale.y, 1.0);
}

#[test]
fn test_rotate_drag_turns_around_axis() {
    let camera = Camera3D::new();
    let (origin, _) = axis_on_screen(&camera, GizmoAxis::Y);

    let result = drag_transform(
        GizmoMode::Rotate,
        GizmoAxis::Y,
        &Transform::IDENTITY,
        &camera,
        origin,
        origin + Vec2::new(100.0, 0.0),
        SIZE_PX,
        0.01,
    );
    let expected = Quat::from_rotation_y(1.0);
    assert_relative_eq!(result.rotation.dot(expected).abs(), 1.0, epsilon = 1e-3);
}

#[test]
fn test_edited_list_is_deduplicated() {
    let mut tool = EditTool::new("Marker-Bearbeitung");
    tool.begin(GizmoMode::Translate);
    tool.retarget(target("poi-1"));
    tool.mark_edited("poi-1");
    tool.mark_edited("poi-2");
    tool.mark_edited("poi-1");

    assert_eq!(tool.target().map(|t| t.id.as_str()), Some("poi-1"));
    assert_eq!(tool.edited(), ["poi-1".to_string(), "poi-2".to_string()]);

    tool.reset();
    assert!(tool.edited().is_empty());
    assert!(!tool.is_busy());
}

#[test]
fn test_drag_requires_target() {
    let mut tool = EditTool::new("Label-Bearbeitung");
    tool.begin(GizmoMode::Scale);
    tool.begin_drag(GizmoAxis::Y, Vec2::ZERO, Transform::IDENTITY);
    assert!(!tool.is_dragging());

    assert!(tool.retarget(target("label-1")).is_none());
    tool.begin_drag(GizmoAxis::Y, Vec2::ZERO, Transform::IDENTITY);
    assert!(tool.is_dragging());
    assert_eq!(tool.status_text(), "Transformiere…");
}
