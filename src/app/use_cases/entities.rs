//! Generische Entity-Operationen: Entsorgung, Sichtbarkeit, Entfernen, Import/Export.

use super::{labels, markers, paths, trains};
use crate::app::events::{EngineEvent, EntityType, ImportPayload};
use crate::app::state::EngineState;
use crate::app::subsystems::{publish_internal, report_failure};
use crate::core::EntityId;

/// Entsorgt eine Entity samt Teilbaum und Ressourcen und meldet das intern.
pub fn dispose_entity(state: &mut EngineState, entity: EntityId) {
    let disposed = state.scene.dispose(entity, &mut state.resources);
    if disposed.is_empty() {
        return;
    }
    log::debug!("{} Entities unter {:?} entsorgt", disposed.len(), entity);
    publish_internal(state, EngineEvent::EntityDisposed { entity });
}

/// Zeigt oder verbirgt eine Entity (oder alle) einer Art.
pub fn set_visibility(state: &mut EngineState, kind: EntityType, id: Option<&str>, visible: bool) {
    match kind {
        EntityType::Marker => markers::set_visibility(state, id, visible),
        EntityType::Label => labels::set_visibility(state, id, visible),
        EntityType::Path => paths::set_visibility(state, id, visible),
        EntityType::Train => trains::set_visibility(state, id, visible),
    }
}

/// Entfernt eine Entity (oder alle) einer Art.
pub fn remove(state: &mut EngineState, kind: EntityType, id: Option<&str>) {
    match kind {
        EntityType::Marker => markers::remove(state, id),
        EntityType::Label => labels::remove(state, id),
        EntityType::Path => paths::remove(state, id),
        EntityType::Train => trains::remove(state, id),
    }
}

/// Importiert exportierte Daten einer Art. Nur ein nicht lesbares JSON ist ein Fehler;
/// einzelne ungültige Einträge werden übersprungen und als `OperationFailed` gemeldet.
pub fn import(state: &mut EngineState, kind: EntityType, payload: ImportPayload) -> anyhow::Result<()> {
    let items = payload.into_items()?;
    let count = items.len();
    let imported = match kind {
        EntityType::Marker => markers::import(state, items),
        EntityType::Label => labels::import(state, items),
        EntityType::Path => paths::import(state, items),
        EntityType::Train => trains::import(state, items),
    };
    log::info!("{}/{} {}-Einträge importiert", imported, count, kind.name());
    Ok(())
}

/// Exportiert eine Entity (oder alle) einer Art als JSON-Liste.
pub fn export(state: &EngineState, kind: EntityType, id: Option<&str>) -> serde_json::Result<serde_json::Value> {
    match kind {
        EntityType::Marker => serde_json::to_value(markers::export(state, id)),
        EntityType::Label => serde_json::to_value(labels::export(state, id)),
        EntityType::Path => serde_json::to_value(paths::export(state, id)),
        EntityType::Train => serde_json::to_value(trains::export(state, id)),
    }
}

/// Liest einen Import-Eintrag; ungültige Einträge werden gemeldet und verworfen.
pub(crate) fn parse_item<T: serde::de::DeserializeOwned>(
    state: &mut EngineState,
    kind: EntityType,
    item: serde_json::Value,
) -> Option<T> {
    match serde_json::from_value(item) {
        Ok(data) => Some(data),
        Err(e) => {
            let reason = format!("Ungültiger {}-Eintrag: {}", kind.name(), e);
            report_failure(state, kind.import_operation(), reason);
            None
        }
    }
}
