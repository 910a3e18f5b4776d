use super::super::{AuthoringTool, ToolAnchor};
use super::{build_ribbon, segment_polyline, PathAction, PathTool};
use crate::core::path::is_continuous;
use crate::core::{PathDraft, PathMode};
use approx::assert_relative_eq;
use glam::{Mat4, Vec2, Vec3};

const THRESHOLD: f32 = 5.0;

fn click(tool: &mut PathTool, screen: Vec2, world: Vec3) -> PathAction {
    tool.on_press(screen, Some(ToolAnchor::free(world)));
    tool.on_release(screen, Some(ToolAnchor::free(world)), THRESHOLD)
}

fn straight_tool() -> PathTool {
    let mut tool = PathTool::new();
    tool.begin(PathDraft::default());
    tool
}

#[test]
fn test_first_click_places_seed() {
    let mut tool = straight_tool();
    assert_eq!(tool.status_text(), "Startpunkt klicken");
    let action = click(&mut tool, Vec2::new(100.0, 100.0), Vec3::ZERO);
    assert_eq!(action, PathAction::SeedPlaced);
    assert!(tool.seed().is_some());
    assert!(tool.segments().is_empty());
}

#[test]
fn test_drag_before_seed_places_nothing() {
    let mut tool = straight_tool();
    tool.on_press(Vec2::ZERO, Some(ToolAnchor::free(Vec3::ZERO)));
    let action = tool.on_release(Vec2::new(20.0, 0.0), Some(ToolAnchor::free(Vec3::X)), THRESHOLD);
    assert_eq!(action, PathAction::None);
    assert!(tool.seed().is_none());
}

#[test]
fn test_two_straight_segments_share_joint() {
    let mut tool = straight_tool();
    click(&mut tool, Vec2::new(0.0, 0.0), Vec3::ZERO);
    click(&mut tool, Vec2::new(50.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
    click(&mut tool, Vec2::new(100.0, 0.0), Vec3::new(2.0, 0.0, 0.0));

    let (_, segments) = tool.finish().expect("Pfad sollte abgeschlossen werden");
    assert_eq!(segments.len(), 2);
    assert!(is_continuous(&segments));
    assert_eq!(segments[0].end.position, Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(segments[1].start.position, Vec3::new(1.0, 0.0, 0.0));
    assert_relative_eq!(segments[0].control.position.x, 0.5);
    assert!(!tool.is_active());
}

#[test]
fn test_zero_length_segment_is_ignored() {
    let mut tool = straight_tool();
    click(&mut tool, Vec2::ZERO, Vec3::ONE);
    let action = click(&mut tool, Vec2::ZERO, Vec3::ONE);
    assert_eq!(action, PathAction::None);
    assert!(tool.segments().is_empty());
}

#[test]
fn test_curved_drag_mirrors_handle_through_end() {
    let mut tool = PathTool::new();
    tool.begin(PathDraft {
        mode: PathMode::Curved,
        width: None,
    });
    click(&mut tool, Vec2::ZERO, Vec3::ZERO);

    let end = Vec3::new(10.0, 0.0, 0.0);
    let handle = Vec3::new(12.0, 0.0, 3.0);
    tool.on_press(Vec2::new(100.0, 0.0), Some(ToolAnchor::free(end)));
    let preview = tool.on_move(Some(ToolAnchor::free(handle)));
    assert_eq!(
        preview,
        PathAction::Preview([Vec3::ZERO, Vec3::new(8.0, 0.0, -3.0), end])
    );
    let action = tool.on_release(Vec2::new(130.0, 20.0), Some(ToolAnchor::free(handle)), THRESHOLD);

    let PathAction::SegmentAdded { segment, world } = action else {
        panic!("Segment erwartet, erhalten: {action:?}");
    };
    assert_eq!(segment.end.position, end);
    assert_eq!(world[1], Vec3::new(8.0, 0.0, -3.0));
}

#[test]
fn test_curved_click_without_drag_falls_back_to_midpoint() {
    let mut tool = PathTool::new();
    tool.begin(PathDraft {
        mode: PathMode::Curved,
        width: None,
    });
    click(&mut tool, Vec2::ZERO, Vec3::ZERO);
    let action = click(&mut tool, Vec2::new(80.0, 0.0), Vec3::new(4.0, 0.0, 0.0));
    let PathAction::SegmentAdded { world, .. } = action else {
        panic!("Segment erwartet");
    };
    assert_eq!(world[1], Vec3::new(2.0, 0.0, 0.0));
}

#[test]
fn test_points_are_stored_floor_relative() {
    let mut tool = straight_tool();
    let floor_world = Mat4::from_translation(Vec3::new(0.0, 5.0, 0.0));
    let a = ToolAnchor::on_floor(Vec3::new(0.0, 5.0, 0.0), "F2", floor_world);
    let b = ToolAnchor::on_floor(Vec3::new(3.0, 5.0, 0.0), "F2", floor_world);
    tool.on_press(Vec2::ZERO, Some(a.clone()));
    tool.on_release(Vec2::ZERO, Some(a), THRESHOLD);
    tool.on_press(Vec2::new(40.0, 0.0), Some(b.clone()));
    tool.on_release(Vec2::new(40.0, 0.0), Some(b), THRESHOLD);

    let segment = &tool.segments()[0];
    assert_eq!(segment.start.floor_id.as_deref(), Some("F2"));
    assert_relative_eq!(segment.end.position.y, 0.0, epsilon = 1e-5);
    assert_relative_eq!(segment.control.position.x, 1.5, epsilon = 1e-5);
}

#[test]
fn test_ribbon_has_two_vertices_per_sample() {
    let points = segment_polyline(Vec3::ZERO, Vec3::new(5.0, 0.0, 5.0), Vec3::new(10.0, 0.0, 0.0), 8);
    let mesh = build_ribbon(&points, 1.0, 0.0);
    assert_eq!(mesh.positions.len(), 18);
    assert_eq!(mesh.triangle_count(), 16);
    assert_relative_eq!(mesh.positions[0].distance(mesh.positions[1]), 1.0, epsilon = 1e-5);
}

#[test]
fn test_ribbon_of_single_point_is_empty() {
    let mesh = build_ribbon(&[Vec3::ZERO], 1.0, 0.0);
    assert!(mesh.positions.is_empty());
}
