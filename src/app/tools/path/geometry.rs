//! Ribbon-Geometrie: extrudiertes Band entlang einer quadratischen Kurve.

use crate::core::MeshData;
use crate::shared::spline_geometry::sample_quadratic;
use glam::{Vec2, Vec3};

/// Abgetastete Welt-Polylinie eines Segments.
pub fn segment_polyline(start: Vec3, control: Vec3, end: Vec3, samples: usize) -> Vec<Vec3> {
    sample_quadratic(start, control, end, samples)
}

/// Horizontale Seitenrichtung zur Tangente (Fallback X bei senkrechter Tangente).
pub fn ribbon_side(tangent: Vec3) -> Vec3 {
    tangent.cross(Vec3::Y).normalize_or(Vec3::X)
}

/// Baut ein flaches Band der Breite `width` entlang der Polylinie, um `lift` angehoben.
///
/// Pro Stützpunkt zwei Vertices (links/rechts), pro Abschnitt zwei Dreiecke.
/// UV: u quer (0/1), v entlang der Bogenlänge in Vielfachen der Breite.
pub fn build_ribbon(points: &[Vec3], width: f32, lift: f32) -> MeshData {
    if points.len() < 2 {
        return MeshData::default();
    }
    let half = width * 0.5;
    let mut positions = Vec::with_capacity(points.len() * 2);
    let mut normals = Vec::with_capacity(points.len() * 2);
    let mut uvs = Vec::with_capacity(points.len() * 2);
    let mut distance = 0.0;

    for (i, p) in points.iter().enumerate() {
        let prev = points[i.saturating_sub(1)];
        let next = points[(i + 1).min(points.len() - 1)];
        let side = ribbon_side(next - prev);
        if i > 0 {
            distance += prev.distance(*p);
        }
        let base = *p + Vec3::Y * lift;
        positions.push(base - side * half);
        positions.push(base + side * half);
        normals.extend([Vec3::Y, Vec3::Y]);
        let v = if width > f32::EPSILON { distance / width } else { 0.0 };
        uvs.push(Vec2::new(0.0, v));
        uvs.push(Vec2::new(1.0, v));
    }

    let mut indices = Vec::with_capacity((points.len() - 1) * 6);
    for i in 0..(points.len() as u32 - 1) {
        let l0 = i * 2;
        let r0 = l0 + 1;
        let l1 = l0 + 2;
        let r1 = l0 + 3;
        indices.extend([l0, l1, r0, r0, l1, r1]);
    }

    MeshData {
        positions,
        normals,
        uvs,
        indices,
    }
}
