//! Szenengraph als Arena: Entities mit exklusiver Parent-Kante, Sichtbarkeit und Pick-Layer.
//!
//! Die Knoten liegen in einer `IndexMap`, damit Tiefensuche und Iteration
//! deterministisch in Einfügereihenfolge ablaufen.

use super::geometry::Aabb;
use super::resources::{ResourceArena, ResourceHandle};
use super::transform::Transform;
use glam::{Mat4, Vec2, Vec3};
use indexmap::IndexMap;

/// Eindeutige, nie wiederverwendete Entity-ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl EntityId {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Pick-Layer einer Entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickLayer {
    /// Sichtbar, aber nicht pickbar
    #[default]
    Default,
    /// Ausgeblendet und nicht pickbar
    Invisible,
    /// Nimmt an Strahltests teil
    Pickable,
}

/// Feste Container-Gruppen unterhalb der Wurzel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneGroup {
    Model,
    Marker,
    Label,
    Path,
    Train,
    OutlineSelection,
}

impl SceneGroup {
    pub const ALL: [SceneGroup; 6] = [
        SceneGroup::Model,
        SceneGroup::Marker,
        SceneGroup::Label,
        SceneGroup::Path,
        SceneGroup::Train,
        SceneGroup::OutlineSelection,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SceneGroup::Model => "model-group",
            SceneGroup::Marker => "marker-group",
            SceneGroup::Label => "label-group",
            SceneGroup::Path => "path-group",
            SceneGroup::Train => "train-group",
            SceneGroup::OutlineSelection => "outline-selection-group",
        }
    }
}

/// Fachliche Art einer Entity (inkl. Rückverweis auf Domänen-IDs).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityKind {
    Root,
    Group(SceneGroup),
    ModelNode,
    Floor { floor_id: String },
    Marker { poi_id: String },
    Label { label_id: String },
    Path { path_id: String },
    PathRibbon { path_id: String },
    Train { train_id: String },
    TrainCar { train_id: String },
    Preview,
    Gizmo,
}

/// Form für Strahltests.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PickShape {
    #[default]
    None,
    /// Dreiecksnetz aus der Ressourcen-Arena (lokale Koordinaten)
    Mesh(ResourceHandle),
    /// Lokale Box
    Box(Aabb),
    /// Zur Kamera ausgerichtetes Rechteck in Welteinheiten, zentriert auf die Weltposition
    Billboard { size: Vec2 },
}

/// Ein Knoten im Szenengraph.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub id: EntityId,
    pub name: String,
    pub kind: EntityKind,
    pub local: Transform,
    pub parent: Option<EntityId>,
    pub children: Vec<EntityId>,
    pub visible: bool,
    pub layer: PickLayer,
    pub shape: PickShape,
    /// Material für den Renderer (optional)
    pub material: Option<ResourceHandle>,
}

/// Arena-basierter Szenengraph.
#[derive(Debug)]
pub struct SceneGraph {
    nodes: IndexMap<EntityId, SceneNode>,
    root: EntityId,
    groups: IndexMap<SceneGroup, EntityId>,
    next_id: u64,
}

impl SceneGraph {
    /// Erstellt einen Graph mit Wurzelknoten (ohne Gruppen).
    pub fn new() -> Self {
        let root = EntityId(1);
        let mut nodes = IndexMap::new();
        nodes.insert(
            root,
            SceneNode {
                id: root,
                name: "root".to_string(),
                kind: EntityKind::Root,
                local: Transform::IDENTITY,
                parent: None,
                children: Vec::new(),
                visible: true,
                layer: PickLayer::Default,
                shape: PickShape::None,
                material: None,
            },
        );
        Self {
            nodes,
            root,
            groups: IndexMap::new(),
            next_id: 1,
        }
    }

    pub fn root(&self) -> EntityId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node(&self, id: EntityId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: EntityId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes.values()
    }

    /// Legt die Gruppe an, falls sie noch nicht existiert.
    pub fn ensure_group(&mut self, group: SceneGroup) -> EntityId {
        if let Some(id) = self.groups.get(&group) {
            return *id;
        }
        let id = self.spawn(self.root, group.name(), EntityKind::Group(group));
        self.groups.insert(group, id);
        id
    }

    pub fn group(&self, group: SceneGroup) -> Option<EntityId> {
        self.groups.get(&group).copied()
    }

    /// Erzeugt eine neue Entity unter `parent` (Identität, sichtbar, Layer `Default`).
    /// Existiert `parent` nicht, wird die Wurzel verwendet.
    pub fn spawn(&mut self, parent: EntityId, name: &str, kind: EntityKind) -> EntityId {
        self.next_id += 1;
        let id = EntityId(self.next_id);
        let parent = if self.nodes.contains_key(&parent) {
            parent
        } else {
            self.root
        };
        self.nodes.insert(
            id,
            SceneNode {
                id,
                name: name.to_string(),
                kind,
                local: Transform::IDENTITY,
                parent: Some(parent),
                children: Vec::new(),
                visible: true,
                layer: PickLayer::Default,
                shape: PickShape::None,
                material: None,
            },
        );
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(id);
        }
        id
    }

    /// Weltmatrix durch Multiplikation aller Vorfahren.
    pub fn world_matrix(&self, id: EntityId) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut current = Some(id);
        while let Some(cid) = current {
            let Some(node) = self.nodes.get(&cid) else {
                break;
            };
            matrix = node.local.to_matrix() * matrix;
            current = node.parent;
        }
        matrix
    }

    pub fn world_transform(&self, id: EntityId) -> Transform {
        Transform::from_matrix(&self.world_matrix(id))
    }

    pub fn world_position(&self, id: EntityId) -> Vec3 {
        self.world_matrix(id).transform_point3(Vec3::ZERO)
    }

    /// Setzt die lokale Transformation so, dass die Weltlage `world` entspricht.
    pub fn set_world_transform(&mut self, id: EntityId, world: Transform) {
        let parent_world = self
            .nodes
            .get(&id)
            .and_then(|n| n.parent)
            .map(|p| self.world_matrix(p))
            .unwrap_or(Mat4::IDENTITY);
        let local = Transform::from_matrix(&(parent_world.inverse() * world.to_matrix()));
        if let Some(node) = self.nodes.get_mut(&id) {
            node.local = local;
        }
    }

    pub fn set_world_position(&mut self, id: EntityId, position: Vec3) {
        let mut world = self.world_transform(id);
        world.translation = position;
        self.set_world_transform(id, world);
    }

    /// Hängt `id` unter `new_parent` um und erhält dabei die Weltlage.
    /// Liefert `false` bei unbekannten IDs oder wenn ein Zyklus entstehen würde.
    pub fn reparent_keep_world(&mut self, id: EntityId, new_parent: EntityId) -> bool {
        if id == self.root || !self.contains(id) || !self.contains(new_parent) {
            return false;
        }
        if self.is_ancestor_of(id, new_parent) {
            return false;
        }
        let world = self.world_matrix(id);
        let parent_world = self.world_matrix(new_parent);

        if let Some(old_parent) = self.nodes.get(&id).and_then(|n| n.parent) {
            if old_parent == new_parent {
                return true;
            }
            if let Some(p) = self.nodes.get_mut(&old_parent) {
                p.children.retain(|c| *c != id);
            }
        }
        if let Some(p) = self.nodes.get_mut(&new_parent) {
            p.children.push(id);
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = Some(new_parent);
            node.local = Transform::from_matrix(&(parent_world.inverse() * world));
        }
        true
    }

    /// `true`, wenn `ancestor` gleich `id` ist oder über `id` liegt.
    pub fn is_ancestor_of(&self, ancestor: EntityId, id: EntityId) -> bool {
        self.find_ancestor(id, |node| node.id == ancestor).is_some()
    }

    /// Erster Knoten in der Vorfahrenkette (inklusive `id`), der `pred` erfüllt.
    pub fn find_ancestor(
        &self,
        id: EntityId,
        mut pred: impl FnMut(&SceneNode) -> bool,
    ) -> Option<EntityId> {
        let mut current = Some(id);
        while let Some(cid) = current {
            let node = self.nodes.get(&cid)?;
            if pred(node) {
                return Some(cid);
            }
            current = node.parent;
        }
        None
    }

    /// Sichtbar nur, wenn die Entity und alle Vorfahren sichtbar sind.
    pub fn is_visible_in_hierarchy(&self, id: EntityId) -> bool {
        let mut current = Some(id);
        while let Some(cid) = current {
            let Some(node) = self.nodes.get(&cid) else {
                return false;
            };
            if !node.visible {
                return false;
            }
            current = node.parent;
        }
        true
    }

    pub fn set_visible(&mut self, id: EntityId, visible: bool) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.visible = visible;
        }
    }

    pub fn set_layer(&mut self, id: EntityId, layer: PickLayer) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.layer = layer;
        }
    }

    /// Teilbaum in Pre-Order (Tiefensuche, `id` zuerst).
    pub fn descendants(&self, id: EntityId) -> Vec<EntityId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(&current) else {
                continue;
            };
            out.push(current);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// Entsorgt `id` samt Teilbaum (Kinder zuerst) und gibt deren Ressourcen frei.
    /// Gruppen und Wurzel werden hierbei nicht entfernt, nur ihre Kinder.
    pub fn dispose(&mut self, id: EntityId, resources: &mut ResourceArena) -> Vec<EntityId> {
        if !self.contains(id) {
            return Vec::new();
        }
        let keep_self = id == self.root || self.groups.values().any(|g| *g == id);
        let mut order = self.descendants(id);
        order.reverse();

        let mut disposed = Vec::with_capacity(order.len());
        for node_id in order {
            if keep_self && node_id == id {
                continue;
            }
            resources.release_owned_by(node_id);
            if let Some(node) = self.nodes.shift_remove(&node_id) {
                if let Some(parent) = node.parent.and_then(|p| self.nodes.get_mut(&p)) {
                    parent.children.retain(|c| *c != node_id);
                }
                disposed.push(node_id);
            }
        }
        disposed
    }

    /// Entsorgt zusätzlich die Gruppen selbst (Teardown).
    pub fn dispose_all(&mut self, resources: &mut ResourceArena) -> Vec<EntityId> {
        let mut disposed = self.dispose(self.root, resources);
        self.groups.clear();
        disposed.retain(|id| *id != self.root);
        disposed
    }

    /// Welt-Bounding-Box aller Pick-Formen (Mesh/Box) unterhalb von `id`.
    pub fn subtree_bounds(&self, id: EntityId, resources: &ResourceArena) -> Option<Aabb> {
        let mut result: Option<Aabb> = None;
        for node_id in self.descendants(id) {
            if !self.is_visible_in_hierarchy(node_id) {
                continue;
            }
            let Some(node) = self.nodes.get(&node_id) else {
                continue;
            };
            let local = match node.shape {
                PickShape::Mesh(handle) => resources.mesh(handle).and_then(|m| m.bounds()),
                PickShape::Box(aabb) => Some(aabb),
                _ => None,
            };
            if let Some(local) = local {
                let world = local.transformed(&self.world_matrix(node_id));
                result = Some(match result {
                    Some(acc) => acc.union(&world),
                    None => world,
                });
            }
        }
        result
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}
