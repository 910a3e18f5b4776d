//! Builder für Render-Szenen aus dem EngineState.

use crate::app::state::{EngineState, MarkerStore};
use crate::app::tools::edit::gizmo_world_length;
use crate::core::{EntityId, EntityKind, GpuResource, PickShape, ResourceHandle, SceneGroup};
use crate::shared::{
    BillboardDraw, GizmoDraw, MarkerBatch, MarkerInstance, MeshDraw, OutlineDraw, OutlineKind,
    RenderScene,
};
use indexmap::IndexMap;

const NEUTRAL_TINT: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Baut eine RenderScene aus dem aktuellen EngineState.
///
/// Marker werden als Instanz-Batches geliefert; ihre Modell-Meshes tauchen
/// deshalb nicht zusätzlich unter `meshes` auf.
pub fn build(state: &EngineState) -> RenderScene {
    let marker_group = state.scene.group(SceneGroup::Marker);
    let mut meshes = Vec::new();
    let mut billboards = Vec::new();

    let mut stack = vec![state.scene.root()];
    while let Some(id) = stack.pop() {
        let Some(node) = state.scene.node(id) else {
            continue;
        };
        if !node.visible || Some(id) == marker_group {
            continue;
        }
        stack.extend(node.children.iter().rev());

        match node.shape {
            PickShape::Mesh(geometry) => meshes.push(MeshDraw {
                entity: id,
                geometry,
                material: node.material,
                world: state.scene.world_matrix(id),
            }),
            PickShape::Billboard { size } => {
                if let Some(texture) = node.material.and_then(|m| texture_of(state, m)) {
                    billboards.push(BillboardDraw {
                        entity: id,
                        texture: Some(texture),
                        position: state.scene.world_position(id),
                        size,
                    });
                }
            }
            PickShape::None | PickShape::Box(_) => {}
        }
    }

    RenderScene {
        view: state.camera.view_matrix(),
        projection: state.camera.projection_matrix(),
        viewport: state.camera.viewport,
        meshes,
        marker_batches: marker_batches(state),
        billboards,
        outlines: outlines(state),
        gizmo: gizmo(state),
        pivot: state.orbit.active_pivot(),
    }
}

fn texture_of(state: &EngineState, material: ResourceHandle) -> Option<ResourceHandle> {
    match state.resources.get(material)? {
        GpuResource::Material(desc) => desc.texture,
        _ => None,
    }
}

/// Sichtbare Marker plus wartender Platzierungs- und Bearbeitungsvorschau.
fn marker_batches(state: &EngineState) -> Vec<MarkerBatch> {
    let mut grouped: IndexMap<String, Vec<EntityId>> = state.markers.batches.clone();

    let placement = state.editor.marker_placement.draft().and_then(|draft| {
        let key = match &draft.model {
            Some(model) => model.clone(),
            None => format!("icon:{}", draft.icon),
        };
        state.editor.marker_placement.pending().map(|e| (key, e))
    });
    let edit = state.editor.marker_edit.target().and_then(|target| {
        state
            .markers
            .records
            .get(&target.id)
            .map(|record| (MarkerStore::batch_key(record), target.preview))
    });
    for (key, entity) in placement.into_iter().chain(edit) {
        if state.scene.is_visible_in_hierarchy(entity) {
            grouped.entry(key).or_default().push(entity);
        }
    }

    grouped
        .into_iter()
        .map(|(key, entities)| MarkerBatch {
            key,
            instances: entities
                .into_iter()
                .map(|e| MarkerInstance::new(state.scene.world_matrix(e), tint(state, e)))
                .collect(),
        })
        .filter(|batch| !batch.instances.is_empty())
        .collect()
}

fn tint(state: &EngineState, entity: EntityId) -> [f32; 4] {
    if state.outline.selected.contains(&entity) {
        state.options.outline_selected_color
    } else if state.outline.hovered == Some(entity) {
        state.options.outline_hover_color
    } else {
        NEUTRAL_TINT
    }
}

fn outlines(state: &EngineState) -> Vec<OutlineDraw> {
    let selected = state.outline.selected.iter().map(|&entity| OutlineDraw {
        entity,
        kind: OutlineKind::Selected,
        color: state.options.outline_selected_color,
    });
    let hovered = state
        .outline
        .hovered
        .filter(|h| !state.outline.selected.contains(h))
        .map(|entity| OutlineDraw {
            entity,
            kind: OutlineKind::Hover,
            color: state.options.outline_hover_color,
        });
    selected
        .chain(hovered)
        .filter(|o| state.scene.contains(o.entity))
        .collect()
}

fn gizmo(state: &EngineState) -> Option<GizmoDraw> {
    let target = state
        .editor
        .marker_edit
        .target()
        .or_else(|| state.editor.label_edit.target())?;
    let node = state.scene.node(target.gizmo)?;
    if !matches!(node.kind, EntityKind::Gizmo) {
        return None;
    }
    let origin = state.scene.world_position(target.gizmo);
    Some(GizmoDraw {
        origin,
        length: gizmo_world_length(&state.camera, origin, state.options.gizmo_size_px),
    })
}
