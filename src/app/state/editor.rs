use crate::app::tools::{AuthoringTool, EditTool, PathTool, PlacementTool, TrainPathSelection};
use crate::core::{LabelDraft, MarkerDraft};

/// Aktives Autorenwerkzeug (höchstens eines gleichzeitig).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveTool {
    /// Nur Kamera und Hover
    #[default]
    None,
    PlacingMarker,
    PlacingLabel,
    PlacingPath,
    EditingMarker,
    EditingLabel,
    SelectingTrainPath,
}

/// Zustand aller Werkzeuge; genau eines ist über `active` freigeschaltet.
#[derive(Debug, Clone)]
pub struct EditorState {
    pub active: ActiveTool,
    pub marker_placement: PlacementTool<MarkerDraft>,
    pub label_placement: PlacementTool<LabelDraft>,
    pub path: PathTool,
    pub marker_edit: EditTool,
    pub label_edit: EditTool,
    pub train_select: TrainPathSelection,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorState {
    pub fn new() -> Self {
        Self {
            active: ActiveTool::None,
            marker_placement: PlacementTool::new("Marker-Platzierung"),
            label_placement: PlacementTool::new("Label-Platzierung"),
            path: PathTool::new(),
            marker_edit: EditTool::new("Marker-Bearbeitung"),
            label_edit: EditTool::new("Label-Bearbeitung"),
            train_select: TrainPathSelection::new(),
        }
    }

    /// Werkzeug-Instanz zum aktiven Werkzeug.
    pub fn tool(&self, tool: ActiveTool) -> Option<&dyn AuthoringTool> {
        match tool {
            ActiveTool::None => None,
            ActiveTool::PlacingMarker => Some(&self.marker_placement),
            ActiveTool::PlacingLabel => Some(&self.label_placement),
            ActiveTool::PlacingPath => Some(&self.path),
            ActiveTool::EditingMarker => Some(&self.marker_edit),
            ActiveTool::EditingLabel => Some(&self.label_edit),
            ActiveTool::SelectingTrainPath => Some(&self.train_select),
        }
    }

    /// Statustext des aktiven Werkzeugs.
    pub fn status_text(&self) -> &str {
        self.tool(self.active)
            .map_or("Navigation", |tool| tool.status_text())
    }
}
