//! Picking-Service: Screen-Punkt → Weltpunkt per Strahltest gegen Szene oder Ebene.
//!
//! Getestet werden nur sichtbare Entities mit Layer `Pickable`. Unsichtbare
//! Teilbäume werden komplett übersprungen. Bei gleichem Abstand gewinnt der
//! zuerst (Tiefensuche, Einfügereihenfolge) gefundene Treffer.

use crate::core::geometry::{ray_aabb, ray_plane};
use crate::core::{
    Camera3D, EntityId, PickLayer, PickShape, Plane, Ray, ResourceArena, SceneGraph, SceneNode,
};
use glam::{Vec2, Vec3};

/// Nächster Szenentreffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub entity: EntityId,
    pub point: Vec3,
    /// Abstand vom Strahlursprung in Welteinheiten
    pub distance: f32,
}

/// Weltpunkt unter `screen`.
///
/// Mit Ebene wird nur diese geschnitten. Ohne Ebene gewinnt der nächste
/// Szenentreffer; fehlt einer, wird die Bodenebene (Y = 0) verwendet.
/// `None`, wenn auch die Bodenebene verfehlt wird.
pub fn pick(
    scene: &SceneGraph,
    resources: &ResourceArena,
    camera: &Camera3D,
    screen: Vec2,
    plane: Option<&Plane>,
) -> Option<Vec3> {
    let ray = camera.ray_from_screen(screen);
    if let Some(plane) = plane {
        return ray_plane(&ray, plane).map(|t| ray.at(t));
    }
    if let Some(hit) = intersect_scene(scene, resources, camera, &ray, |_| true) {
        return Some(hit.point);
    }
    ray_plane(&ray, &Plane::GROUND).map(|t| ray.at(t))
}

/// Nächster Szenentreffer unter `screen` (ohne Ebenen-Fallback).
pub fn pick_hit(
    scene: &SceneGraph,
    resources: &ResourceArena,
    camera: &Camera3D,
    screen: Vec2,
) -> Option<PickHit> {
    let ray = camera.ray_from_screen(screen);
    intersect_scene(scene, resources, camera, &ray, |_| true)
}

/// Wie `pick_hit`, aber nur gegen Knoten, die `filter` erfüllen.
pub fn pick_filtered(
    scene: &SceneGraph,
    resources: &ResourceArena,
    camera: &Camera3D,
    screen: Vec2,
    filter: impl Fn(&SceneNode) -> bool,
) -> Option<PickHit> {
    let ray = camera.ray_from_screen(screen);
    intersect_scene(scene, resources, camera, &ray, filter)
}

/// Tiefensuche über alle sichtbaren, pickbaren Knoten.
pub fn intersect_scene(
    scene: &SceneGraph,
    resources: &ResourceArena,
    camera: &Camera3D,
    ray: &Ray,
    filter: impl Fn(&SceneNode) -> bool,
) -> Option<PickHit> {
    let mut best: Option<PickHit> = None;
    let mut stack = vec![scene.root()];

    while let Some(id) = stack.pop() {
        let Some(node) = scene.node(id) else {
            continue;
        };
        if !node.visible || node.layer == PickLayer::Invisible {
            continue;
        }
        stack.extend(node.children.iter().rev());

        if node.layer != PickLayer::Pickable || !filter(node) {
            continue;
        }
        let Some(distance) = intersect_node(scene, resources, camera, ray, node) else {
            continue;
        };
        if best.is_none_or(|b| distance < b.distance) {
            best = Some(PickHit {
                entity: id,
                point: ray.at(distance),
                distance,
            });
        }
    }
    best
}

fn intersect_node(
    scene: &SceneGraph,
    resources: &ResourceArena,
    camera: &Camera3D,
    ray: &Ray,
    node: &SceneNode,
) -> Option<f32> {
    match node.shape {
        PickShape::None => None,
        PickShape::Mesh(handle) => {
            let mesh = resources.mesh(handle)?;
            let inverse = scene.world_matrix(node.id).inverse();
            // Unnormierte lokale Richtung: t bleibt der Weltabstand
            mesh.ray_intersect(&ray.transformed(&inverse))
        }
        PickShape::Box(aabb) => {
            let inverse = scene.world_matrix(node.id).inverse();
            ray_aabb(&ray.transformed(&inverse), &aabb)
        }
        PickShape::Billboard { size } => {
            let center = scene.world_position(node.id);
            let plane = Plane::from_point_normal(center, -camera.forward());
            let t = ray_plane(ray, &plane)?;
            let offset = ray.at(t) - center;
            let inside = offset.dot(camera.right()).abs() <= size.x * 0.5
                && offset.dot(camera.up()).abs() <= size.y * 0.5;
            inside.then_some(t)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Aabb, EntityKind, GpuResource, MeshData, Transform};
    use approx::assert_relative_eq;

    /// Kamera senkrecht über dem Ursprung, Blick nach unten.
    fn top_down_camera() -> Camera3D {
        let mut camera = Camera3D::new();
        camera.position = Vec3::new(0.0, 50.0, 0.001);
        camera.look_at(Vec3::ZERO);
        camera
    }

    fn center(camera: &Camera3D) -> Vec2 {
        camera.viewport * 0.5
    }

    fn spawn_slab(
        scene: &mut SceneGraph,
        arena: &mut ResourceArena,
        y: f32,
        layer: PickLayer,
    ) -> EntityId {
        let id = scene.spawn(scene.root(), "slab", EntityKind::ModelNode);
        let handle = arena.register(id, GpuResource::Geometry(MeshData::slab(10.0, 10.0, 0.2)));
        let node = scene.node_mut(id).unwrap();
        node.local = Transform::from_translation(Vec3::new(0.0, y, 0.0));
        node.shape = PickShape::Mesh(handle);
        node.layer = layer;
        id
    }

    #[test]
    fn test_nearest_pickable_wins() {
        let mut scene = SceneGraph::new();
        let mut arena = ResourceArena::new();
        let camera = top_down_camera();
        spawn_slab(&mut scene, &mut arena, 0.0, PickLayer::Pickable);
        let upper = spawn_slab(&mut scene, &mut arena, 5.0, PickLayer::Pickable);

        let hit = pick_hit(&scene, &arena, &camera, center(&camera)).expect("Treffer erwartet");
        assert_eq!(hit.entity, upper);
        assert_relative_eq!(hit.point.y, 5.1, epsilon = 1e-3);
        assert_relative_eq!(hit.distance, 44.8, epsilon = 1e-2);
    }

    #[test]
    fn test_non_pickable_layers_are_ignored() {
        let mut scene = SceneGraph::new();
        let mut arena = ResourceArena::new();
        let camera = top_down_camera();
        let lower = spawn_slab(&mut scene, &mut arena, 0.0, PickLayer::Pickable);
        spawn_slab(&mut scene, &mut arena, 5.0, PickLayer::Default);

        let hit = pick_hit(&scene, &arena, &camera, center(&camera)).expect("Treffer erwartet");
        assert_eq!(hit.entity, lower);
    }

    #[test]
    fn test_hidden_subtree_is_pruned() {
        let mut scene = SceneGraph::new();
        let mut arena = ResourceArena::new();
        let camera = top_down_camera();
        let upper = spawn_slab(&mut scene, &mut arena, 5.0, PickLayer::Pickable);
        scene.set_visible(upper, false);

        assert!(pick_hit(&scene, &arena, &camera, center(&camera)).is_none());
        let point = pick(&scene, &arena, &camera, center(&camera), None).expect("Bodenebene");
        assert_relative_eq!(point.y, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_explicit_plane_ignores_scene() {
        let mut scene = SceneGraph::new();
        let mut arena = ResourceArena::new();
        let camera = top_down_camera();
        spawn_slab(&mut scene, &mut arena, 5.0, PickLayer::Pickable);

        let plane = Plane::horizontal(-2.0);
        let point = pick(&scene, &arena, &camera, center(&camera), Some(&plane)).unwrap();
        assert_relative_eq!(point.y, -2.0, epsilon = 1e-4);
    }

    #[test]
    fn test_parallel_ray_misses_fallback_plane() {
        let scene = SceneGraph::new();
        let arena = ResourceArena::new();
        let mut camera = Camera3D::new();
        camera.position = Vec3::new(0.0, 10.0, 0.0);
        camera.look_at(Vec3::new(0.0, 10.0, -10.0));

        let point = pick(&scene, &arena, &camera, center(&camera), None);
        assert!(point.is_none());
    }

    #[test]
    fn test_box_and_billboard_shapes() {
        let mut scene = SceneGraph::new();
        let arena = ResourceArena::new();
        let camera = top_down_camera();

        let boxed = scene.spawn(scene.root(), "box", EntityKind::ModelNode);
        let node = scene.node_mut(boxed).unwrap();
        node.shape = PickShape::Box(Aabb::from_center_half_extents(Vec3::ZERO, Vec3::ONE));
        node.layer = PickLayer::Pickable;

        let board = scene.spawn(scene.root(), "label", EntityKind::ModelNode);
        let node = scene.node_mut(board).unwrap();
        node.local = Transform::from_translation(Vec3::new(0.0, 3.0, 0.0));
        node.shape = PickShape::Billboard {
            size: Vec2::new(2.0, 1.0),
        };
        node.layer = PickLayer::Pickable;

        let hit = pick_hit(&scene, &arena, &camera, center(&camera)).unwrap();
        assert_eq!(hit.entity, board);

        let only_boxes = pick_filtered(&scene, &arena, &camera, center(&camera), |n| {
            matches!(n.shape, PickShape::Box(_))
        })
        .unwrap();
        assert_eq!(only_boxes.entity, boxed);
        assert_relative_eq!(only_boxes.point.y, 1.0, epsilon = 1e-3);
    }
}
