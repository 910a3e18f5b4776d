//! Animations-Slots: höchstens ein Tween pro Ziel, mit Cancel-and-Replace.

use crate::core::{CameraState, EntityId, TrainPhase};
use crate::shared::Easing;
use glam::Vec3;
use indexmap::IndexMap;

/// Ziel eines Tweens; jeder Schlüssel belegt genau einen Slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnimationKey {
    Camera,
    Floors,
    Train(String),
}

/// Bewegung eines Floors zwischen zwei lokalen Positionen.
#[derive(Debug, Clone, PartialEq)]
pub struct FloorMove {
    pub floor_id: String,
    pub entity: EntityId,
    pub from: Vec3,
    pub to: Vec3,
}

/// Was interpoliert wird.
#[derive(Debug, Clone, PartialEq)]
pub enum TweenKind {
    Camera {
        from: CameraState,
        to: CameraState,
    },
    Floors {
        moves: Vec<FloorMove>,
        /// Zielzustand nach Abschluss
        expanded: bool,
    },
    TrainProgress {
        train_id: String,
        from: f32,
        to: f32,
        phase: TrainPhase,
    },
}

/// Zeitlich begrenzte Interpolation.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    pub kind: TweenKind,
    pub duration: f32,
    pub elapsed: f32,
    pub easing: Easing,
}

impl Tween {
    pub fn new(kind: TweenKind, duration: f32, easing: Easing) -> Self {
        Self {
            kind,
            duration,
            elapsed: 0.0,
            easing,
        }
    }

    /// Linearer Fortschritt 0..1 (Dauer ≤ 0 gilt als sofort fertig).
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }
}

/// Ergebnis eines Frames für einen Slot.
#[derive(Debug, Clone, PartialEq)]
pub struct TweenFrame {
    pub key: AnimationKey,
    pub kind: TweenKind,
    /// Eased Fortschritt 0..1
    pub eased: f32,
    pub finished: bool,
}

/// Registry aller laufenden Tweens.
#[derive(Debug, Default)]
pub struct AnimationSlots {
    slots: IndexMap<AnimationKey, Tween>,
}

impl AnimationSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Startet einen Tween; ein laufender Tween im selben Slot wird abgebrochen und geliefert.
    pub fn start(&mut self, key: AnimationKey, tween: Tween) -> Option<Tween> {
        let replaced = self.slots.shift_remove(&key);
        if replaced.is_some() {
            log::debug!("Tween {:?} ersetzt", key);
        }
        self.slots.insert(key, tween);
        replaced
    }

    /// Startet nur, wenn der Slot frei ist. Liefert `false`, wenn die Anfrage verworfen wurde.
    pub fn start_exclusive(&mut self, key: AnimationKey, tween: Tween) -> bool {
        if self.slots.contains_key(&key) {
            return false;
        }
        self.slots.insert(key, tween);
        true
    }

    pub fn is_active(&self, key: &AnimationKey) -> bool {
        self.slots.contains_key(key)
    }

    pub fn cancel(&mut self, key: &AnimationKey) -> Option<Tween> {
        self.slots.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Rechnet alle Tweens um `dt` weiter; abgeschlossene Slots werden entfernt.
    pub fn advance(&mut self, dt: f32) -> Vec<TweenFrame> {
        let mut frames = Vec::with_capacity(self.slots.len());
        for (key, tween) in self.slots.iter_mut() {
            tween.elapsed += dt.max(0.0);
            let progress = tween.progress();
            frames.push(TweenFrame {
                key: key.clone(),
                kind: tween.kind.clone(),
                eased: tween.easing.apply(progress),
                finished: progress >= 1.0,
            });
        }
        self.slots.retain(|_, tween| tween.progress() < 1.0);
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn train_tween(duration: f32) -> Tween {
        Tween::new(
            TweenKind::TrainProgress {
                train_id: "train-1".into(),
                from: 0.0,
                to: 1.0,
                phase: TrainPhase::Enter,
            },
            duration,
            Easing::Linear,
        )
    }

    #[test]
    fn test_start_replaces_running_tween() {
        let mut slots = AnimationSlots::new();
        assert!(slots.start(AnimationKey::Camera, train_tween(1.0)).is_none());
        let replaced = slots.start(AnimationKey::Camera, train_tween(2.0));
        assert_eq!(replaced.map(|t| t.duration), Some(1.0));
        assert_eq!(slots.len(), 1);
    }

    #[test]
    fn test_exclusive_start_rejects_busy_slot() {
        let mut slots = AnimationSlots::new();
        assert!(slots.start_exclusive(AnimationKey::Floors, train_tween(1.0)));
        assert!(!slots.start_exclusive(AnimationKey::Floors, train_tween(3.0)));
        slots.advance(1.0);
        assert!(slots.start_exclusive(AnimationKey::Floors, train_tween(3.0)));
    }

    #[test]
    fn test_advance_reports_progress_and_finishes() {
        let mut slots = AnimationSlots::new();
        slots.start(AnimationKey::Train("train-1".into()), train_tween(2.0));

        let frames = slots.advance(0.5);
        assert_relative_eq!(frames[0].eased, 0.25);
        assert!(!frames[0].finished);

        let frames = slots.advance(2.0);
        assert_relative_eq!(frames[0].eased, 1.0);
        assert!(frames[0].finished);
        assert!(slots.is_empty());
    }

    #[test]
    fn test_zero_duration_finishes_on_first_frame() {
        let mut slots = AnimationSlots::new();
        slots.start(AnimationKey::Camera, train_tween(0.0));
        let frames = slots.advance(0.0);
        assert!(frames[0].finished);
        assert!(slots.is_empty());
    }
}
