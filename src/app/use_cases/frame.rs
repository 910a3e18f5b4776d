//! Frame-Schritt: Kamera-Dämpfung und alle laufenden Tweens.

use super::{camera, floors, trains};
use crate::app::animation::TweenKind;
use crate::app::events::HostEvent;
use crate::app::state::EngineState;
use crate::app::subsystems::emit;

/// Rechnet einen Frame weiter (`dt` in Sekunden).
pub fn advance(state: &mut EngineState, dt: f32) {
    camera::apply_damping(state);
    step_animations(state, dt);
}

/// Treibt alle Tween-Slots um `dt` voran und wendet die Zwischenstände an.
pub fn step_animations(state: &mut EngineState, dt: f32) {
    for frame in state.animations.advance(dt) {
        match frame.kind {
            TweenKind::Camera { from, to } => {
                camera::apply_tween_frame(&mut state.camera, &from, &to, frame.eased);
            }
            TweenKind::Floors { moves, expanded } => {
                floors::apply_frame(state, &moves, frame.eased, frame.finished);
                if frame.finished {
                    floors::finish_move(state, expanded);
                }
            }
            TweenKind::TrainProgress {
                train_id,
                from,
                to,
                phase,
            } => {
                let u = if frame.finished {
                    to
                } else {
                    from + (to - from) * frame.eased
                };
                trains::place_at(state, &train_id, u);
                if frame.finished {
                    log::debug!("Zug '{}' hat {:?} abgeschlossen", train_id, phase);
                    emit(state, HostEvent::TrainMoveFinished { train_id, phase });
                }
            }
        }
    }
}
