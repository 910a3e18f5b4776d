//! Interne Subsysteme und die zentralen Publish-Helfer beider Kanäle.
//!
//! Subsysteme reagieren synchron und in Registrierungsreihenfolge auf
//! interne Events, bevor externe Beobachter des internen Kanals sie sehen.

use super::events::{EngineEvent, HostEvent};
use super::state::EngineState;
use super::use_cases;

/// Engine-Subsystem mit Reaktion auf interne Events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subsystem {
    /// Pfad-Ribbons folgen Floor-Bewegung und -Sichtbarkeit
    Paths,
    /// Züge folgen ihren Pfaden
    Trains,
    /// Marker hängen während Floor-Bewegungen am Floor
    Markers,
    /// Labels analog zu Markern
    Labels,
    /// Hover/Selektion wird bei Werkzeugwechsel und Entsorgung bereinigt
    Outline,
}

impl Subsystem {
    pub const ALL: [Subsystem; 5] = [
        Subsystem::Paths,
        Subsystem::Trains,
        Subsystem::Markers,
        Subsystem::Labels,
        Subsystem::Outline,
    ];

    fn react(self, state: &mut EngineState, event: &EngineEvent) {
        match self {
            Subsystem::Paths => use_cases::paths::on_engine_event(state, event),
            Subsystem::Trains => use_cases::trains::on_engine_event(state, event),
            Subsystem::Markers => use_cases::markers::on_engine_event(state, event),
            Subsystem::Labels => use_cases::labels::on_engine_event(state, event),
            Subsystem::Outline => use_cases::outline::on_engine_event(state, event),
        }
    }
}

/// Veröffentlicht ein internes Event: erst Subsysteme, dann Abonnenten.
pub fn publish_internal(state: &mut EngineState, event: EngineEvent) {
    log::debug!("Internes Event: {:?}", event);
    let subsystems = state.subsystems.clone();
    for subsystem in subsystems {
        subsystem.react(state, &event);
    }
    state.internal.publish(&event);
}

/// Sendet ein Event an die Host-Anwendung.
pub fn emit(state: &mut EngineState, event: HostEvent) {
    log::debug!("Host-Event: {}", event.name());
    state.external.publish(&event);
}

/// Vorbedingung nicht erfüllt: Warnung loggen und `OperationFailed` senden.
pub fn report_failure(state: &mut EngineState, operation: &str, reason: impl Into<String>) {
    let reason = reason.into();
    log::warn!("{} übersprungen: {}", operation, reason);
    emit(
        state,
        HostEvent::OperationFailed {
            operation: operation.to_string(),
            reason,
        },
    );
}
