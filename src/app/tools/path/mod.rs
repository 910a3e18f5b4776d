//! Pfad-Werkzeug: Klick setzt den Start, Drag/Release erzeugt quadratische Segmente.

mod geometry;
mod lifecycle;
mod state;

pub use geometry::{build_ribbon, ribbon_side, segment_polyline};
pub use state::{PathAction, PathTool};

#[cfg(test)]
mod tests;
