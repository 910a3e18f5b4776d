//! Render-Szene als expliziter Übergabevertrag zwischen Engine und externem Renderer.
//!
//! Enthält nur Plain-Data: Matrizen, Ressourcen-Handles und GPU-fertige Instanzdaten.

use crate::core::{EntityId, MeshData, ResourceHandle};
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};

/// Instanzdaten für Marker-Batches (GPU-Layout).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MarkerInstance {
    /// Spaltenweise Weltmatrix
    pub model: [[f32; 4]; 4],
    /// RGBA-Tönung (Hover/Selektion)
    pub tint: [f32; 4],
}

impl MarkerInstance {
    pub fn new(model: Mat4, tint: [f32; 4]) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            tint,
        }
    }
}

/// Vertex für Ribbon-/Mesh-Geometrie (GPU-Layout).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    /// Vertex-Puffer eines Netzes; fehlende UVs werden mit Null belegt.
    pub fn from_mesh(mesh: &MeshData) -> Vec<MeshVertex> {
        mesh.positions
            .iter()
            .enumerate()
            .map(|(i, p)| MeshVertex {
                position: p.to_array(),
                uv: mesh.uvs.get(i).map_or([0.0, 0.0], |uv| uv.to_array()),
            })
            .collect()
    }
}

/// Ein sichtbares Mesh mit Weltmatrix.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshDraw {
    pub entity: EntityId,
    pub geometry: ResourceHandle,
    pub material: Option<ResourceHandle>,
    pub world: Mat4,
}

/// Alle Marker mit gleichem Modell/Icon in einem Instanz-Batch.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerBatch {
    /// Modell-Quelle oder `icon:<name>` bei reinen Icon-Markern
    pub key: String,
    pub instances: Vec<MarkerInstance>,
}

impl MarkerBatch {
    /// Instanzdaten als Byte-Slice für den Upload.
    pub fn instance_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }
}

/// Zur Kamera ausgerichtetes Label-Billboard.
#[derive(Debug, Clone, PartialEq)]
pub struct BillboardDraw {
    pub entity: EntityId,
    pub texture: Option<ResourceHandle>,
    pub position: Vec3,
    pub size: Vec2,
}

/// Outline-Art.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineKind {
    Hover,
    Selected,
}

/// Ein hervorgehobenes Objekt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlineDraw {
    pub entity: EntityId,
    pub kind: OutlineKind,
    pub color: [f32; 4],
}

/// Transform-Gizmo der laufenden Bearbeitung.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GizmoDraw {
    pub origin: Vec3,
    /// Achsenlänge in Welteinheiten (konstante Bildschirmgröße)
    pub length: f32,
}

/// Read-only Daten für einen Render-Frame.
#[derive(Debug, Clone, Default)]
pub struct RenderScene {
    pub view: Mat4,
    pub projection: Mat4,
    pub viewport: Vec2,
    pub meshes: Vec<MeshDraw>,
    pub marker_batches: Vec<MarkerBatch>,
    pub billboards: Vec<BillboardDraw>,
    pub outlines: Vec<OutlineDraw>,
    pub gizmo: Option<GizmoDraw>,
    /// Rotations-Pivot, solange rotiert wird
    pub pivot: Option<Vec3>,
}

impl RenderScene {
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty() && self.marker_batches.is_empty() && self.billboards.is_empty()
    }

    pub fn instance_count(&self) -> usize {
        self.marker_batches.iter().map(|b| b.instances.len()).sum()
    }
}
