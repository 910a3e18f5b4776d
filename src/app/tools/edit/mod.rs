//! Bearbeitungs-Werkzeug: Entity anklicken, Vorschau per Gizmo transformieren, übernehmen.

mod gizmo;
mod lifecycle;
mod state;

pub use gizmo::{drag_transform, gizmo_world_length, pick_axis};
pub use state::{EditTarget, EditTool, GizmoAxis, GizmoDrag, GizmoMode};

#[cfg(test)]
mod tests;
