//! Inspector - dockable tab strip holding the content panels

use std::collections::HashMap;

use egui::Ui;
use egui_dock::{DockArea, DockState, TabViewer};

use dx_core::WorkspaceSession;

use crate::entities::EntitiesPanel;
use crate::images::ImagesPanel;
use crate::markdown::MarkdownPanel;
use crate::panel::{PanelKind, WorkspacePanel};
use crate::tables::TablesPanel;

/// The right-hand side of the workspace
pub struct Inspector {
    dock_state: DockState<PanelKind>,
    panels: HashMap<PanelKind, Box<dyn WorkspacePanel>>,
}

impl Inspector {
    /// Build every panel for `session`. Panels unsubscribe when the inspector is dropped.
    pub fn new(session: &WorkspaceSession) -> Self {
        let panels: Vec<Box<dyn WorkspacePanel>> = vec![
            Box::new(MarkdownPanel::new(session)),
            Box::new(TablesPanel::new(session)),
            Box::new(ImagesPanel::new(session)),
            Box::new(EntitiesPanel::new()),
        ];

        Self {
            dock_state: default_dock_state(),
            panels: panels.into_iter().map(|p| (p.kind(), p)).collect(),
        }
    }

    pub fn panel(&self, kind: PanelKind) -> Option<&dyn WorkspacePanel> {
        self.panels.get(&kind).map(|p| p.as_ref())
    }

    /// Bring a tab to the front
    pub fn show_tab(&mut self, kind: PanelKind) {
        if let Some(location) = self.dock_state.find_tab(&kind) {
            self.dock_state.set_active_tab(location);
        }
    }

    /// Bring forward the tab listing `block_id`, if any panel does
    pub fn reveal(&mut self, session: &WorkspaceSession, block_id: &str) -> Option<PanelKind> {
        let kind = PanelKind::INSPECTOR_TABS.into_iter().find(|kind| {
            self.panels
                .get(kind)
                .map_or(false, |panel| panel.item_ids(session).iter().any(|id| id == block_id))
        })?;
        self.show_tab(kind);
        Some(kind)
    }

    pub fn reset_layout(&mut self) {
        self.dock_state = default_dock_state();
    }

    /// Draw the inspector
    pub fn ui(&mut self, ui: &mut Ui, session: &WorkspaceSession) {
        let available_rect = ui.available_rect_before_wrap();

        ui.allocate_ui(available_rect.size(), |ui| {
            DockArea::new(&mut self.dock_state)
                .id(egui::Id::new("inspector_dock"))
                .show_close_buttons(false)
                .draggable_tabs(true)
                .show_inside(ui, &mut InspectorTabViewer {
                    panels: &mut self.panels,
                    session,
                });
        });
    }
}

fn default_dock_state() -> DockState<PanelKind> {
    DockState::new(PanelKind::INSPECTOR_TABS.to_vec())
}

/// Tab viewer for egui_dock
struct InspectorTabViewer<'a> {
    panels: &'a mut HashMap<PanelKind, Box<dyn WorkspacePanel>>,
    session: &'a WorkspaceSession,
}

impl<'a> TabViewer for InspectorTabViewer<'a> {
    type Tab = PanelKind;

    fn title(&mut self, tab: &mut Self::Tab) -> egui::WidgetText {
        match self.panels.get(tab) {
            Some(panel) => panel.title().into(),
            None => tab.title().into(),
        }
    }

    fn ui(&mut self, ui: &mut Ui, tab: &mut Self::Tab) {
        if let Some(panel) = self.panels.get_mut(tab) {
            panel.ui(self.session, ui);
        }
    }

    fn closeable(&mut self, _tab: &mut Self::Tab) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{block, entity, open, table};
    use dx_core::review::ReviewPhase;
    use std::time::Duration;
    use dx_core::DocumentContent;

    fn highlighted(inspector: &Inspector, kind: PanelKind, session: &WorkspaceSession) -> Vec<String> {
        inspector.panel(kind).unwrap().highlighted(session)
    }

    #[tokio::test]
    async fn test_only_owning_panel_highlights() {
        let content = DocumentContent {
            blocks: vec![block("a", 1), block("b", 1)],
            tables: vec![table("c", 2), table("d", 2)],
            ..Default::default()
        };
        let session = open(content, 2);
        let inspector = Inspector::new(&session);

        session.state().select("b");
        assert_eq!(highlighted(&inspector, PanelKind::Markdown, &session), vec!["b".to_string()]);
        assert!(highlighted(&inspector, PanelKind::Tables, &session).is_empty());

        session.state().select("d");
        assert!(highlighted(&inspector, PanelKind::Markdown, &session).is_empty());
        assert_eq!(highlighted(&inspector, PanelKind::Tables, &session), vec!["d".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_evidence_shared_by_entities_highlights_one_item() {
        let content = DocumentContent {
            blocks: vec![block("block-1", 1), block("block-4", 2)],
            entities: vec![
                entity("ent-2", "block-4", 2, 0.9),
                entity("ent-3", "block-4", 2, 0.8),
                entity("ent-4", "block-4", 2, 0.6),
            ],
            ..Default::default()
        };
        let session = open(content, 2);
        let inspector = Inspector::new(&session);

        assert!(session.review().request_extraction());
        assert!(session.confirm_extraction());
        tokio::time::sleep(Duration::from_millis(2100)).await;
        assert_eq!(session.review().phase(), ReviewPhase::Done);

        let entities = session.review().entities();
        EntitiesPanel::follow_evidence(&session, &entities[0]);

        let lit: Vec<(PanelKind, Vec<String>)> = PanelKind::INSPECTOR_TABS
            .into_iter()
            .map(|kind| (kind, highlighted(&inspector, kind, &session)))
            .filter(|(_, ids)| !ids.is_empty())
            .collect();
        assert_eq!(lit, vec![(PanelKind::Markdown, vec!["block-4".to_string()])]);
    }

    #[tokio::test]
    async fn test_unknown_id_highlights_nothing() {
        let content = DocumentContent {
            blocks: vec![block("a", 1)],
            tables: vec![table("c", 1)],
            ..Default::default()
        };
        let session = open(content, 1);
        let inspector = Inspector::new(&session);

        session.state().select("block-99");
        assert_eq!(session.state().selected_block_id().as_deref(), Some("block-99"));
        for kind in PanelKind::INSPECTOR_TABS {
            assert!(highlighted(&inspector, kind, &session).is_empty());
        }
    }

    #[tokio::test]
    async fn test_reveal_finds_owning_tab() {
        let content = DocumentContent {
            blocks: vec![block("a", 1)],
            tables: vec![table("c", 1)],
            ..Default::default()
        };
        let session = open(content, 1);
        let mut inspector = Inspector::new(&session);

        assert_eq!(inspector.reveal(&session, "c"), Some(PanelKind::Tables));
        assert_eq!(inspector.reveal(&session, "a"), Some(PanelKind::Markdown));
        assert_eq!(inspector.reveal(&session, "zzz"), None);
    }

    #[tokio::test]
    async fn test_panels_detach_with_inspector() {
        let session = open(DocumentContent::default(), 1);
        let before = session.state().subscriber_count();

        let inspector = Inspector::new(&session);
        assert_eq!(session.state().subscriber_count(), before + 3);
        assert_eq!(inspector.panel(PanelKind::Entities).map(|p| p.title()), Some("Entities"));

        drop(inspector);
        assert_eq!(session.state().subscriber_count(), before);
    }
}
