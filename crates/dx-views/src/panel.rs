//! Panel abstraction - base trait for the inspector tabs

use egui::Ui;

use dx_core::{BlockId, WorkspaceSession};

/// Which inspector tab a panel fills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelKind {
    Markdown,
    Tables,
    Images,
    Entities,
}

impl PanelKind {
    /// Tab order of the inspector
    pub const INSPECTOR_TABS: [PanelKind; 4] = [
        PanelKind::Markdown,
        PanelKind::Tables,
        PanelKind::Images,
        PanelKind::Entities,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            PanelKind::Markdown => "Markdown",
            PanelKind::Tables => "Tables",
            PanelKind::Images => "Images",
            PanelKind::Entities => "Entities",
        }
    }
}

/// Base trait for all inspector panels
pub trait WorkspacePanel: Send {
    fn kind(&self) -> PanelKind;

    /// Get the display name
    fn title(&self) -> &str {
        self.kind().title()
    }

    /// Block ids the panel's items are keyed by, in display order
    fn item_ids(&self, session: &WorkspaceSession) -> Vec<BlockId>;

    /// Items currently marked as selected.
    ///
    /// Item ids are unique across panels, so at most one item in the whole
    /// inspector matches.
    fn highlighted(&self, session: &WorkspaceSession) -> Vec<BlockId> {
        let selection = session.state().snapshot();
        self.item_ids(session)
            .into_iter()
            .filter(|id| selection.is_selected(id))
            .collect()
    }

    /// Draw the UI
    fn ui(&mut self, session: &WorkspaceSession, ui: &mut Ui);
}
