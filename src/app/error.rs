//! Fehlbedienung der Engine-API (Aufruf außerhalb des Werkzeug-Lebenszyklus).

use super::events::EntityType;
use thiserror::Error;

/// Programmierfehler des Hosts; Vorbedingungsfehler im Betrieb laufen dagegen
/// als `HostEvent::OperationFailed` über den externen Kanal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Engine ist nicht initialisiert")]
    NotInitialized,
    #[error("Keine Bearbeitung für {} aktiv", .0.name())]
    EditNotActive(EntityType),
    #[error("Gizmo-Modus kann nur während einer Bearbeitung gesetzt werden")]
    GizmoWithoutEdit,
    #[error("Kein Pfad in Arbeit")]
    NoActivePath,
    #[error("Keine Zug-Pfadauswahl aktiv")]
    NoTrainSelection,
    #[error("Kein Pfad für den Zug ausgewählt")]
    NoTrainPathSelected,
    #[error("Unbekannter Zug '{0}'")]
    UnknownTrain(String),
    #[error("{} unterstützt keine Bearbeitung", .0.name())]
    NotEditable(EntityType),
}
