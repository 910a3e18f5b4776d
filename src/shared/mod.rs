//! Geteilte Typen für layer-übergreifende Verträge.
//!
//! Enthält Optionen, Eingabe-Typen, Kurvengeometrie und die Render-Szene,
//! die zwischen `app`, `asset` und einem externen Renderer geteilt werden.

pub mod easing;
pub mod input;
pub mod label_text;
pub mod options;
mod render_scene;
pub mod spline_geometry;

pub use easing::Easing;
pub use input::{ButtonMapping, ClickTracker, Modifiers, PointerButton, PointerInfo};
pub use options::EngineOptions;
pub use options::{CLICK_THRESHOLD_PX, TRAIN_MIN_BODY_CARS};
pub use render_scene::{
    BillboardDraw, GizmoDraw, MarkerBatch, MarkerInstance, MeshDraw, MeshVertex, OutlineDraw,
    OutlineKind,
    RenderScene,
};
