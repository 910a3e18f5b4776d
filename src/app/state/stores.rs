use crate::asset::ModelAsset;
use crate::core::{
    Aabb, EntityId, IdSequence, LabelRecord, PathRecord, PoiRecord, TrainRecord,
};
use indexmap::IndexMap;

/// Live-Marker nach ID plus abgeleiteter Batch-Index (Modell/Icon → Entities).
#[derive(Debug)]
pub struct MarkerStore {
    pub records: IndexMap<String, PoiRecord>,
    pub ids: IdSequence,
    /// Nur sichtbare Marker; wird nach jeder Änderung neu aufgebaut
    pub batches: IndexMap<String, Vec<EntityId>>,
}

impl Default for MarkerStore {
    fn default() -> Self {
        Self {
            records: IndexMap::new(),
            ids: IdSequence::new("poi"),
            batches: IndexMap::new(),
        }
    }
}

impl MarkerStore {
    pub fn by_entity(&self, entity: EntityId) -> Option<&PoiRecord> {
        self.records.values().find(|r| r.entity == entity)
    }

    /// Batch-Schlüssel: Modell-Quelle oder `icon:<name>`.
    pub fn batch_key(record: &PoiRecord) -> String {
        match &record.model {
            Some(model) => model.clone(),
            None => format!("icon:{}", record.icon),
        }
    }

    pub fn instance_count(&self) -> usize {
        self.batches.values().map(Vec::len).sum()
    }
}

/// Live-Labels nach ID.
#[derive(Debug)]
pub struct LabelStore {
    pub records: IndexMap<String, LabelRecord>,
    pub ids: IdSequence,
}

impl Default for LabelStore {
    fn default() -> Self {
        Self {
            records: IndexMap::new(),
            ids: IdSequence::new("label"),
        }
    }
}

impl LabelStore {
    pub fn by_entity(&self, entity: EntityId) -> Option<&LabelRecord> {
        self.records.values().find(|r| r.entity == entity)
    }
}

/// Szenen-Teile des gerade entstehenden Pfads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathBuild {
    pub container: Option<EntityId>,
    /// Ein Ribbon pro abgeschlossenem Segment
    pub ribbons: Vec<EntityId>,
    /// Vorschau des Segments unter dem Zeiger
    pub preview: Option<EntityId>,
}

/// Registrierte Pfade plus der Pfad in Arbeit.
#[derive(Debug)]
pub struct PathStore {
    pub records: IndexMap<String, PathRecord>,
    pub ids: IdSequence,
    pub building: PathBuild,
    /// Container-Sichtbarkeit vor der Zug-Pfadauswahl
    pub visibility_before_selection: Vec<(EntityId, bool)>,
}

impl Default for PathStore {
    fn default() -> Self {
        Self {
            records: IndexMap::new(),
            ids: IdSequence::new("path"),
            building: PathBuild::default(),
            visibility_before_selection: Vec::new(),
        }
    }
}

impl PathStore {
    /// Pfad-ID zu Container- oder Ribbon-Entity.
    pub fn by_entity(&self, entity: EntityId) -> Option<&PathRecord> {
        self.records
            .values()
            .find(|r| r.entity == entity || r.ribbons.contains(&entity))
    }
}

/// Live-Züge nach ID.
#[derive(Debug)]
pub struct TrainStore {
    pub records: IndexMap<String, TrainRecord>,
    pub ids: IdSequence,
}

impl Default for TrainStore {
    fn default() -> Self {
        Self {
            records: IndexMap::new(),
            ids: IdSequence::new("train"),
        }
    }
}

impl TrainStore {
    pub fn on_path<'a>(&'a self, path_id: &'a str) -> impl Iterator<Item = &'a TrainRecord> + 'a {
        self.records.values().filter(move |t| t.path_id == path_id)
    }
}

/// Vorab geladene Modell-Quellen (Marker- und Zugmodelle).
#[derive(Debug, Default)]
pub struct ModelLibrary {
    assets: IndexMap<String, ModelAsset>,
}

impl ModelLibrary {
    pub fn insert(&mut self, asset: ModelAsset) {
        self.assets.insert(asset.url.clone(), asset);
    }

    pub fn contains(&self, url: &str) -> bool {
        self.assets.contains_key(url)
    }

    pub fn get(&self, url: &str) -> Option<&ModelAsset> {
        self.assets.get(url)
    }

    /// Bounding-Box eines geladenen Modells.
    pub fn bounds(&self, url: &str) -> Option<Aabb> {
        self.assets.get(url).and_then(ModelAsset::bounds)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}
