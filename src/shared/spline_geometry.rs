//! Reine Geometrie-Funktionen für quadratische Kurven und Bogenlängen.
//!
//! Layer-neutral: wird von Pfad-Tool, Ribbon-Aufbau und Zug-Simulation genutzt.

use glam::Vec3;

/// B(t) = (1-t)²·P0 + 2(1-t)t·P1 + t²·P2
pub fn quadratic_bezier(p0: Vec3, p1: Vec3, p2: Vec3, t: f32) -> Vec3 {
    let inv = 1.0 - t;
    inv * inv * p0 + 2.0 * inv * t * p1 + t * t * p2
}

/// B'(t) = 2(1-t)(P1-P0) + 2t(P2-P1)
pub fn quadratic_bezier_tangent(p0: Vec3, p1: Vec3, p2: Vec3, t: f32) -> Vec3 {
    2.0 * (1.0 - t) * (p1 - p0) + 2.0 * t * (p2 - p1)
}

/// `samples + 1` gleichmäßig in t verteilte Punkte (inkl. Start und Ende).
pub fn sample_quadratic(p0: Vec3, p1: Vec3, p2: Vec3, samples: usize) -> Vec<Vec3> {
    let samples = samples.max(1);
    (0..=samples)
        .map(|i| quadratic_bezier(p0, p1, p2, i as f32 / samples as f32))
        .collect()
}

/// Bogenlängen-Lookup über eine Polylinie.
#[derive(Debug, Clone, Default)]
pub struct ArcLengthTable {
    points: Vec<Vec3>,
    cumulative: Vec<f32>,
}

impl ArcLengthTable {
    /// Baut die Tabelle; aufeinanderfolgende identische Punkte werden übersprungen.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut table = Self::default();
        for p in points {
            match table.points.last() {
                Some(last) if last.distance_squared(p) < 1e-12 => continue,
                Some(last) => {
                    let acc = table.cumulative.last().copied().unwrap_or(0.0) + last.distance(p);
                    table.cumulative.push(acc);
                }
                None => table.cumulative.push(0.0),
            }
            table.points.push(p);
        }
        table
    }

    pub fn total_length(&self) -> f32 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Position und normierte Tangente bei Bogenlänge `distance` (geklemmt).
    pub fn sample_at(&self, distance: f32) -> Option<(Vec3, Vec3)> {
        let first = *self.points.first()?;
        if self.points.len() == 1 {
            return Some((first, Vec3::Z));
        }
        let distance = distance.clamp(0.0, self.total_length());
        let idx = self
            .cumulative
            .partition_point(|&len| len < distance)
            .clamp(1, self.points.len() - 1);

        let len_before = self.cumulative[idx - 1];
        let len_after = self.cumulative[idx];
        let frac = if (len_after - len_before).abs() > f32::EPSILON {
            (distance - len_before) / (len_after - len_before)
        } else {
            0.0
        };
        let a = self.points[idx - 1];
        let b = self.points[idx];
        let tangent = (b - a).normalize_or(Vec3::Z);
        Some((a.lerp(b, frac), tangent))
    }

    /// Position/Tangente beim normierten Parameter `u ∈ [0,1]`.
    pub fn sample_at_u(&self, u: f32) -> Option<(Vec3, Vec3)> {
        self.sample_at(u.clamp(0.0, 1.0) * self.total_length())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_quadratic_bezier_endpoints() {
        let p0 = Vec3::ZERO;
        let p1 = Vec3::new(5.0, 0.0, 10.0);
        let p2 = Vec3::new(10.0, 0.0, 0.0);
        assert!(quadratic_bezier(p0, p1, p2, 0.0).distance(p0) < 1e-5);
        assert!(quadratic_bezier(p0, p1, p2, 1.0).distance(p2) < 1e-5);
        assert!(quadratic_bezier(p0, p1, p2, 0.5).distance(Vec3::new(5.0, 0.0, 5.0)) < 1e-5);
    }

    #[test]
    fn test_straight_tangent_is_constant() {
        let p0 = Vec3::ZERO;
        let p2 = Vec3::new(4.0, 0.0, 0.0);
        let p1 = (p0 + p2) * 0.5;
        let t0 = quadratic_bezier_tangent(p0, p1, p2, 0.0).normalize();
        let t1 = quadratic_bezier_tangent(p0, p1, p2, 1.0).normalize();
        assert_relative_eq!(t0.dot(t1), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_arc_length_sampling_on_polyline() {
        let table = ArcLengthTable::from_points([
            Vec3::ZERO,
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 10.0),
        ]);
        assert_relative_eq!(table.total_length(), 20.0);

        let (pos, tangent) = table.sample_at(15.0).unwrap();
        assert_relative_eq!(pos.x, 10.0);
        assert_relative_eq!(pos.z, 5.0);
        assert_relative_eq!(tangent.z, 1.0);

        let (end, _) = table.sample_at_u(2.0).unwrap();
        assert_relative_eq!(end.z, 10.0);
    }

    #[test]
    fn test_duplicate_points_are_skipped() {
        let table = ArcLengthTable::from_points([Vec3::ZERO, Vec3::ZERO, Vec3::X]);
        assert_relative_eq!(table.total_length(), 1.0);
    }
}
