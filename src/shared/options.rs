//! Zentrale Konfiguration der Szenen-Engine.
//!
//! `EngineOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use super::input::ButtonMapping;
use serde::{Deserialize, Serialize};

// ── Eingabe ─────────────────────────────────────────────────────────

/// Klick-vs-Drag-Schwelle in Screen-Pixeln.
pub const CLICK_THRESHOLD_PX: f32 = 5.0;

// ── Kamera ──────────────────────────────────────────────────────────

/// Dämpfung der Rotations-Deltas pro Frame.
pub const ROTATE_SMOOTHING: f32 = 0.6;
/// Dämpfung der Pan-Deltas pro Frame.
pub const PAN_SMOOTHING: f32 = 0.7;
/// Pivot-Abstand entlang der Blickrichtung, wenn Picking fehlschlägt.
pub const PIVOT_FALLBACK_DISTANCE: f32 = 50.0;
/// Mindestabstand der Blickrichtung zu senkrecht (Anteil von 1.0).
pub const VERTICAL_CLAMP: f32 = 0.01;
/// Radiant pro Pixel Zeigerbewegung beim Rotieren.
pub const ROTATE_SPEED: f32 = 0.005;
/// Anteil der Distanz zum Pick-Punkt pro Mausrad-Schritt.
pub const ZOOM_INTERVAL: f32 = 0.1;
/// Anteil der Distanz pro Pixel beim Drag-Zoom.
pub const DRAG_ZOOM_SPEED: f32 = 0.005;
/// Minimaler Abstand zum Zoom-Ziel.
pub const MIN_ZOOM_DISTANCE: f32 = 0.5;
/// Standard-Tweendauer (Sekunden).
pub const TWEEN_DURATION: f32 = 1.0;

// ── Floors ──────────────────────────────────────────────────────────

/// Standard-Abstand zwischen expandierten Floors.
pub const FLOOR_EXPAND_INTERVAL: f32 = 10.0;

// ── Pfade & Züge ────────────────────────────────────────────────────

/// Ribbon-Breite in Welteinheiten.
pub const PATH_RIBBON_WIDTH: f32 = 0.6;
/// Abtastungen pro Pfad-Segment.
pub const PATH_SEGMENT_SAMPLES: usize = 24;
/// Anhebung des Ribbons über den Boden (gegen Z-Fighting).
pub const PATH_RIBBON_LIFT: f32 = 0.02;
/// Standarddauer für Zug-Ein- und Ausfahrt (Sekunden).
pub const TRAIN_MOVE_DURATION: f32 = 5.0;
/// Minimale Anzahl Mittelwagen.
pub const TRAIN_MIN_BODY_CARS: u32 = 4;
/// Lücke zwischen zwei Wagen.
pub const TRAIN_CAR_GAP: f32 = 0.5;

// ── Marker & Labels ─────────────────────────────────────────────────

/// Kantenlänge des Marker-Icons in Welteinheiten.
pub const MARKER_ICON_SIZE: f32 = 1.5;
/// Welteinheiten pro Label-Pixel.
pub const LABEL_WORLD_PER_PIXEL: f32 = 0.05;
/// Skalierung des Bitmap-Fonts.
pub const LABEL_TEXT_SCALE: u32 = 2;

// ── Gizmo & Outline ─────────────────────────────────────────────────

/// Länge der Gizmo-Achsen in Screen-Pixeln.
pub const GIZMO_SIZE_PX: f32 = 80.0;
/// Pick-Toleranz für Gizmo-Achsen in Screen-Pixeln.
pub const GIZMO_HANDLE_TOLERANCE_PX: f32 = 8.0;
/// Radiant pro Pixel beim Rotations-Gizmo.
pub const GIZMO_ROTATE_SPEED: f32 = 0.01;
/// Outline-Farbe für Hover (RGBA).
pub const OUTLINE_HOVER_COLOR: [f32; 4] = [1.0, 0.85, 0.2, 1.0];
/// Outline-Farbe für Selektion (RGBA).
pub const OUTLINE_SELECTED_COLOR: [f32; 4] = [0.2, 0.6, 1.0, 1.0];

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Engine-Optionen.
/// Wird als `facility_scene_authoring.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    // ── Eingabe ─────────────────────────────────────────────────
    /// Klick-vs-Drag-Schwelle in Pixeln
    pub click_threshold_px: f32,
    /// Button-Belegung der Kamera
    pub buttons: ButtonMapping,

    // ── Kamera ──────────────────────────────────────────────────
    pub rotate_smoothing: f32,
    pub pan_smoothing: f32,
    pub pivot_fallback_distance: f32,
    pub vertical_clamp: f32,
    pub rotate_speed: f32,
    pub zoom_interval: f32,
    pub drag_zoom_speed: f32,
    pub min_zoom_distance: f32,
    pub tween_duration: f32,

    // ── Floors ──────────────────────────────────────────────────
    pub floor_expand_interval: f32,

    // ── Pfade & Züge ────────────────────────────────────────────
    pub path_ribbon_width: f32,
    pub path_segment_samples: usize,
    pub path_ribbon_lift: f32,
    pub train_move_duration: f32,
    pub train_min_body_cars: u32,
    pub train_car_gap: f32,

    // ── Marker & Labels ─────────────────────────────────────────
    pub marker_icon_size: f32,
    pub label_world_per_pixel: f32,
    pub label_text_scale: u32,

    // ── Gizmo & Outline ─────────────────────────────────────────
    pub gizmo_size_px: f32,
    pub gizmo_handle_tolerance_px: f32,
    pub gizmo_rotate_speed: f32,
    pub outline_hover_color: [f32; 4],
    pub outline_selected_color: [f32; 4],
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            click_threshold_px: CLICK_THRESHOLD_PX,
            buttons: ButtonMapping::default(),
            rotate_smoothing: ROTATE_SMOOTHING,
            pan_smoothing: PAN_SMOOTHING,
            pivot_fallback_distance: PIVOT_FALLBACK_DISTANCE,
            vertical_clamp: VERTICAL_CLAMP,
            rotate_speed: ROTATE_SPEED,
            zoom_interval: ZOOM_INTERVAL,
            drag_zoom_speed: DRAG_ZOOM_SPEED,
            min_zoom_distance: MIN_ZOOM_DISTANCE,
            tween_duration: TWEEN_DURATION,
            floor_expand_interval: FLOOR_EXPAND_INTERVAL,
            path_ribbon_width: PATH_RIBBON_WIDTH,
            path_segment_samples: PATH_SEGMENT_SAMPLES,
            path_ribbon_lift: PATH_RIBBON_LIFT,
            train_move_duration: TRAIN_MOVE_DURATION,
            train_min_body_cars: TRAIN_MIN_BODY_CARS,
            train_car_gap: TRAIN_CAR_GAP,
            marker_icon_size: MARKER_ICON_SIZE,
            label_world_per_pixel: LABEL_WORLD_PER_PIXEL,
            label_text_scale: LABEL_TEXT_SCALE,
            gizmo_size_px: GIZMO_SIZE_PX,
            gizmo_handle_tolerance_px: GIZMO_HANDLE_TOLERANCE_PX,
            gizmo_rotate_speed: GIZMO_ROTATE_SPEED,
            outline_hover_color: OUTLINE_HOVER_COLOR,
            outline_selected_color: OUTLINE_SELECTED_COLOR,
        }
    }
}

impl EngineOptions {
    /// Lädt Optionen aus einer TOML-Datei. Fehlt die Datei oder ist sie
    /// fehlerhaft, werden Standardwerte verwendet.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("facility_scene_authoring"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("facility_scene_authoring.toml")
    }

    /// Smoothing-Faktoren in (0,1) halten, sonst dämpft die Kamera nie aus.
    pub fn sanitized(mut self) -> Self {
        self.rotate_smoothing = self.rotate_smoothing.clamp(0.0, 0.99);
        self.pan_smoothing = self.pan_smoothing.clamp(0.0, 0.99);
        self.click_threshold_px = self.click_threshold_px.max(0.0);
        self.path_segment_samples = self.path_segment_samples.max(1);
        self.label_text_scale = self.label_text_scale.max(1);
        self
    }
}
