//! 3D-Kamera (perspektivisch oder orthografisch) mit Strahl- und Projektionshilfen.

use super::geometry::Ray;
use glam::{Mat4, Quat, Vec2, Vec3, Vec4Swizzles};
use serde::{Deserialize, Serialize};

/// Projektionsart der Kamera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Vertikaler Öffnungswinkel in Radiant
    Perspective { fov_y: f32 },
    /// Sichtbare Halbhöhe bei Zoom 1.0, geteilt durch `zoom`
    Orthographic { half_height: f32, zoom: f32 },
}

/// Pose-Schnappschuss für GetState/SetState.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub position: Vec3,
    pub rotation: Quat,
    /// Nur bei orthografischer Kamera relevant
    pub zoom: f32,
}

/// 3D-Kamera; Blickrichtung ist die lokale -Z-Achse.
#[derive(Debug, Clone)]
pub struct Camera3D {
    pub position: Vec3,
    pub rotation: Quat,
    pub projection: Projection,
    pub near: f32,
    pub far: f32,
    /// Viewport-Größe in Pixeln
    pub viewport: Vec2,
}

impl Camera3D {
    /// Minimaler Zoom-Faktor (orthografisch).
    pub const ZOOM_MIN: f32 = 0.01;
    /// Maximaler Zoom-Faktor (orthografisch).
    pub const ZOOM_MAX: f32 = 1000.0;

    /// Perspektivische Standardkamera (60° FOV) mit Blick auf den Ursprung.
    pub fn new() -> Self {
        let mut camera = Self {
            position: Vec3::new(0.0, 40.0, 60.0),
            rotation: Quat::IDENTITY,
            projection: Projection::Perspective {
                fov_y: 60f32.to_radians(),
            },
            near: 0.1,
            far: 5000.0,
            viewport: Vec2::new(1280.0, 720.0),
        };
        camera.look_at(Vec3::ZERO);
        camera
    }

    /// Orthografische Kamera mit gegebener Halbhöhe.
    pub fn orthographic(half_height: f32) -> Self {
        Self {
            projection: Projection::Orthographic {
                half_height,
                zoom: 1.0,
            },
            ..Self::new()
        }
    }

    pub fn is_orthographic(&self) -> bool {
        matches!(self.projection, Projection::Orthographic { .. })
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Richtet die Kamera auf `target` aus (Welt-Y als Up-Vektor).
    pub fn look_at(&mut self, target: Vec3) {
        let dir = (target - self.position).normalize_or_zero();
        if dir == Vec3::ZERO {
            return;
        }
        let up = if dir.abs_diff_eq(Vec3::Y, 1e-4) || dir.abs_diff_eq(Vec3::NEG_Y, 1e-4) {
            Vec3::Z
        } else {
            Vec3::Y
        };
        let view = Mat4::look_to_rh(self.position, dir, up);
        let (_, rotation, _) = view.inverse().to_scale_rotation_translation();
        self.rotation = rotation.normalize();
    }

    pub fn aspect(&self) -> f32 {
        self.viewport.x.max(1.0) / self.viewport.y.max(1.0)
    }

    /// Zoom-Faktor (1.0 bei perspektivischer Kamera).
    pub fn zoom(&self) -> f32 {
        match self.projection {
            Projection::Orthographic { zoom, .. } => zoom,
            Projection::Perspective { .. } => 1.0,
        }
    }

    pub fn set_zoom(&mut self, value: f32) {
        if let Projection::Orthographic { zoom, .. } = &mut self.projection {
            *zoom = value.clamp(Self::ZOOM_MIN, Self::ZOOM_MAX);
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position).inverse()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection {
            Projection::Perspective { fov_y } => {
                Mat4::perspective_rh(fov_y, self.aspect(), self.near, self.far)
            }
            Projection::Orthographic { half_height, zoom } => {
                let h = half_height / zoom.max(Self::ZOOM_MIN);
                let w = h * self.aspect();
                Mat4::orthographic_rh(-w, w, -h, h, self.near, self.far)
            }
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Screen-Pixel (Ursprung oben links) → NDC (-1..1, Y nach oben).
    pub fn screen_to_ndc(&self, screen: Vec2) -> Vec2 {
        let size = self.viewport.max(Vec2::ONE);
        Vec2::new(screen.x / size.x * 2.0 - 1.0, 1.0 - screen.y / size.y * 2.0)
    }

    /// NDC → Screen-Pixel.
    pub fn ndc_to_screen(&self, ndc: Vec2) -> Vec2 {
        let size = self.viewport.max(Vec2::ONE);
        Vec2::new((ndc.x + 1.0) * 0.5 * size.x, (1.0 - ndc.y) * 0.5 * size.y)
    }

    /// Strahl durch einen Screen-Punkt.
    pub fn ray_from_screen(&self, screen: Vec2) -> Ray {
        let ndc = self.screen_to_ndc(screen);
        let inv = self.view_projection().inverse();
        let near = inv * glam::Vec4::new(ndc.x, ndc.y, 0.0, 1.0);
        let far = inv * glam::Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let near = near.xyz() / near.w;
        let far = far.xyz() / far.w;
        Ray::new(near, far - near)
    }

    /// Projiziert einen Weltpunkt auf den Screen; `None` hinter der Kamera.
    pub fn project_to_screen(&self, world: Vec3) -> Option<Vec2> {
        let clip = self.view_projection() * world.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.xyz() / clip.w;
        Some(self.ndc_to_screen(Vec2::new(ndc.x, ndc.y)))
    }

    /// Welt-Einheiten pro Pixel in Distanz `distance` (für Gizmo- und Billboard-Größen).
    pub fn world_per_pixel_at(&self, distance: f32) -> f32 {
        let vh = self.viewport.y.max(1.0);
        match self.projection {
            Projection::Perspective { fov_y } => 2.0 * distance * (fov_y * 0.5).tan() / vh,
            Projection::Orthographic { half_height, zoom } => 2.0 * half_height / (zoom * vh),
        }
    }

    pub fn state(&self) -> CameraState {
        CameraState {
            position: self.position,
            rotation: self.rotation,
            zoom: self.zoom(),
        }
    }

    pub fn apply_state(&mut self, state: &CameraState) {
        self.position = state.position;
        self.rotation = state.rotation.normalize();
        self.set_zoom(state.zoom);
    }
}

impl Default for Camera3D {
    fn default() -> Self {
        Self::new()
    }
}
