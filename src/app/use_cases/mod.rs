//! Use-Cases: fachliche Operationen auf dem `EngineState`.
//!
//! Der Controller delegiert hierher; Use-Cases mutieren Szene und Stores und
//! veröffentlichen Events über die Helfer in `subsystems`.

pub mod camera;
pub mod edit;
pub mod entities;
pub mod floors;
pub mod frame;
pub mod labels;
pub mod lifecycle;
pub mod markers;
pub mod model;
pub mod outline;
pub mod paths;
mod placement;
pub mod pointer;
pub mod tool_switch;
pub mod trains;

#[cfg(test)]
pub(crate) mod test_support;
