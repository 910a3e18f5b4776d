//! Geometrische Grundtypen und Schnitttests (Strahl, Ebene, AABB, Kugel, Dreieck).

use glam::{Mat4, Vec3};

/// Strahl mit normierter Richtung.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Erstellt einen Strahl; die Richtung wird normiert.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Punkt im Abstand `t` entlang des Strahls.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Transformiert den Strahl mit einer affinen Matrix (Richtung bleibt unnormiert,
    /// damit Abstände im Zielraum proportional bleiben).
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        Self {
            origin: matrix.transform_point3(self.origin),
            direction: matrix.transform_vector3(self.direction),
        }
    }
}

/// Unendliche Ebene in Normalform `n·p = d`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f32,
}

impl Plane {
    /// Horizontale Referenzebene durch den Ursprung (Y = 0).
    pub const GROUND: Plane = Plane {
        normal: Vec3::Y,
        distance: 0.0,
    };

    /// Ebene durch `point` mit Normale `normal`.
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalize_or_zero();
        Self {
            normal,
            distance: normal.dot(point),
        }
    }

    /// Horizontale Ebene auf Höhe `y`.
    pub fn horizontal(y: f32) -> Self {
        Self {
            normal: Vec3::Y,
            distance: y,
        }
    }
}

/// Achsenparallele Bounding-Box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Box mit Mittelpunkt und halber Kantenlänge.
    pub fn from_center_half_extents(center: Vec3, half: Vec3) -> Self {
        Self::new(center - half, center + half)
    }

    /// Kleinste Box um alle Punkte, `None` bei leerer Eingabe.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Vereinigung zweier Boxen.
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Die acht Eckpunkte.
    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }

    /// Transformiert die Box und liefert die umschließende achsenparallele Box.
    pub fn transformed(&self, matrix: &Mat4) -> Aabb {
        let corners = self.corners().map(|c| matrix.transform_point3(c));
        let mut result = Aabb {
            min: corners[0],
            max: corners[0],
        };
        for c in &corners[1..] {
            result.min = result.min.min(*c);
            result.max = result.max.max(*c);
        }
        result
    }

    /// Umkugel der Box.
    pub fn bounding_sphere(&self) -> Sphere {
        Sphere {
            center: self.center(),
            radius: self.size().length() * 0.5,
        }
    }
}

/// Kugel (Zentrum + Radius).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

/// Schnitt Strahl–Ebene. `None` bei parallelem Strahl oder Schnitt hinter dem Ursprung.
pub fn ray_plane(ray: &Ray, plane: &Plane) -> Option<f32> {
    let denom = plane.normal.dot(ray.direction);
    if denom.abs() < 1e-6 {
        return None;
    }
    let t = (plane.distance - plane.normal.dot(ray.origin)) / denom;
    (t >= 0.0).then_some(t)
}

/// Slab-Test Strahl–AABB. Liefert den Eintrittsabstand (0, falls der Ursprung innen liegt).
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    let mut t_min = 0.0f32;
    let mut t_max = f32::INFINITY;
    for axis in 0..3 {
        let origin = ray.origin[axis];
        let dir = ray.direction[axis];
        let (lo, hi) = (aabb.min[axis], aabb.max[axis]);
        if dir.abs() < 1e-9 {
            if origin < lo || origin > hi {
                return None;
            }
            continue;
        }
        let inv = 1.0 / dir;
        let mut t0 = (lo - origin) * inv;
        let mut t1 = (hi - origin) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_min = t_min.max(t0);
        t_max = t_max.min(t1);
        if t_min > t_max {
            return None;
        }
    }
    Some(t_min)
}

/// Möller–Trumbore Strahl–Dreieck (beidseitig).
pub fn ray_triangle(ray: &Ray, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
    const EPS: f32 = 1e-7;
    let edge1 = b - a;
    let edge2 = c - a;
    let p = ray.direction.cross(edge2);
    let det = edge1.dot(p);
    if det.abs() < EPS {
        return None;
    }
    let inv_det = 1.0 / det;
    let s = ray.origin - a;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(edge1);
    let v = ray.direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = edge2.dot(q) * inv_det;
    (t > EPS).then_some(t)
}

/// Abstand eines 2D-Punkts zu einer Strecke (Screen-Space Handle-Picking).
pub fn point_segment_distance_2d(p: glam::Vec2, a: glam::Vec2, b: glam::Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ray_plane_hits_ground() {
        let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        let t = ray_plane(&ray, &Plane::GROUND).expect("Treffer erwartet");
        assert_relative_eq!(t, 10.0);
    }

    #[test]
    fn test_ray_plane_parallel_is_none() {
        let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::X);
        assert!(ray_plane(&ray, &Plane::GROUND).is_none());
    }

    #[test]
    fn test_ray_plane_behind_origin_is_none() {
        let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::Y);
        assert!(ray_plane(&ray, &Plane::GROUND).is_none());
    }

    #[test]
    fn test_ray_aabb_entry_distance() {
        let aabb = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);
        assert_relative_eq!(ray_aabb(&ray, &aabb).unwrap(), 4.0);

        let miss = Ray::new(Vec3::new(3.0, 0.0, -5.0), Vec3::Z);
        assert!(ray_aabb(&miss, &aabb).is_none());
    }

    #[test]
    fn test_ray_triangle_hit_and_miss() {
        let a = Vec3::new(-1.0, 0.0, -1.0);
        let b = Vec3::new(1.0, 0.0, -1.0);
        let c = Vec3::new(0.0, 0.0, 1.0);
        let ray = Ray::new(Vec3::new(0.0, 3.0, 0.0), Vec3::NEG_Y);
        assert_relative_eq!(ray_triangle(&ray, a, b, c).unwrap(), 3.0);

        let miss = Ray::new(Vec3::new(5.0, 3.0, 0.0), Vec3::NEG_Y);
        assert!(ray_triangle(&miss, a, b, c).is_none());
    }

    #[test]
    fn test_aabb_transformed_translation() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let moved = aabb.transformed(&Mat4::from_translation(Vec3::new(0.0, 5.0, 0.0)));
        assert_relative_eq!(moved.min.y, 5.0);
        assert_relative_eq!(moved.max.y, 6.0);
    }

    #[test]
    fn test_point_segment_distance() {
        let d = point_segment_distance_2d(
            glam::Vec2::new(5.0, 3.0),
            glam::Vec2::ZERO,
            glam::Vec2::new(10.0, 0.0),
        );
        assert_relative_eq!(d, 3.0);
    }
}
