//! Dreiecksnetz (CPU-Seite) für Picking und Rendering.

use super::geometry::{ray_triangle, Aabb, Ray};
use glam::{Vec2, Vec3};

/// Indiziertes Dreiecksnetz in lokalen Koordinaten.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Netz aus Positionen und Indizes (ohne Normalen/UVs).
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self {
            positions,
            normals: Vec::new(),
            uvs: Vec::new(),
            indices,
        }
    }

    /// Achsenparalleler Quader mit gegebener halber Kantenlänge um den Ursprung.
    pub fn cuboid(half: Vec3) -> Self {
        let aabb = Aabb::from_center_half_extents(Vec3::ZERO, half);
        let positions = aabb.corners().to_vec();
        #[rustfmt::skip]
        let indices = vec![
            0, 1, 3, 0, 3, 2, // -Z
            4, 6, 7, 4, 7, 5, // +Z
            0, 2, 6, 0, 6, 4, // -X
            1, 5, 7, 1, 7, 3, // +X
            0, 4, 5, 0, 5, 1, // -Y
            2, 3, 7, 2, 7, 6, // +Y
        ];
        Self::new(positions, indices)
    }

    /// Horizontale Platte (XZ) mit Breite/Tiefe und Dicke.
    pub fn slab(width: f32, depth: f32, thickness: f32) -> Self {
        Self::cuboid(Vec3::new(width * 0.5, thickness * 0.5, depth * 0.5))
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Lokale Bounding-Box, `None` bei leerem Netz.
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.positions.iter().copied())
    }

    /// Nächster Dreieckstreffer entlang eines Strahls in lokalen Koordinaten.
    pub fn ray_intersect(&self, ray: &Ray) -> Option<f32> {
        let mut best: Option<f32> = None;
        for tri in self.indices.chunks_exact(3) {
            let (Some(a), Some(b), Some(c)) = (
                self.positions.get(tri[0] as usize),
                self.positions.get(tri[1] as usize),
                self.positions.get(tri[2] as usize),
            ) else {
                continue;
            };
            if let Some(t) = ray_triangle(ray, *a, *b, *c) {
                if best.is_none_or(|b| t < b) {
                    best = Some(t);
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cuboid_ray_hits_top_face() {
        let mesh = MeshData::cuboid(Vec3::new(5.0, 0.5, 5.0));
        let ray = Ray::new(Vec3::new(1.0, 10.0, 1.0), Vec3::NEG_Y);
        let t = mesh.ray_intersect(&ray).expect("Deckfläche sollte getroffen werden");
        assert_relative_eq!(t, 9.5, epsilon = 1e-5);
    }

    #[test]
    fn test_bounds_of_slab() {
        let mesh = MeshData::slab(10.0, 4.0, 1.0);
        let b = mesh.bounds().unwrap();
        assert_relative_eq!(b.size().x, 10.0);
        assert_relative_eq!(b.size().z, 4.0);
        assert_eq!(mesh.triangle_count(), 12);
    }
}
