//! Interne Events zur Koordination der Engine-Subsysteme.

use crate::app::state::ActiveTool;
use crate::core::EntityId;

/// Welche Art von Entity gerade angelegt wird.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateKind {
    Marker,
    Label,
    Path,
    Train,
}

/// Events des internen Kanals (nur Engine-Subsysteme).
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Gruppen angelegt, Subsysteme registriert
    EngineInitialized,
    /// Neues Modell hängt in der Szene
    ModelLoaded { url: String },
    /// Ein Platzierungswerkzeug startet; Hover/Outline zurücksetzen
    CreateStarted { kind: CreateKind },
    /// Floors beginnen sich zu bewegen
    FloorsBeforeMove,
    /// Floor-Bewegung abgeschlossen
    FloorsAfterMove { expanded: bool },
    /// Sichtbarkeit eines Floors hat sich geändert
    FloorVisibilityChanged { floor_id: String, visible: bool },
    /// Entity wurde entsorgt
    EntityDisposed { entity: EntityId },
    /// Pfad wurde registriert (nach Finish oder Import)
    PathRegistered { path_id: String },
    /// Pfad wurde entfernt
    PathRemoved { path_id: String },
    /// Aktives Werkzeug gewechselt
    ActiveToolChanged { from: ActiveTool, to: ActiveTool },
}
