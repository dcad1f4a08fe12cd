//! Workspace page: viewer on the left, inspector on the right, optional chat

use egui::{CentralPanel, Context, Key, SidePanel};

use dx_core::WorkspaceSession;
use dx_ui::{workspace_top_bar, TopBarAction};
use dx_views::{ChatPanel, DocumentViewer, Inspector};

pub enum WorkspaceAction {
    Back,
    ToggleTheme,
}

/// Keyboard shortcuts active while no text field has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shortcut {
    PreviousPage,
    NextPage,
    ClearSelection,
}

impl Shortcut {
    fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::ArrowLeft | Key::PageUp => Some(Shortcut::PreviousPage),
            Key::ArrowRight | Key::PageDown => Some(Shortcut::NextPage),
            Key::Escape => Some(Shortcut::ClearSelection),
            _ => None,
        }
    }
}

pub struct WorkspacePage {
    inspector: Inspector,
    viewer: DocumentViewer,
    chat: ChatPanel,
    chat_open: bool,
    session: WorkspaceSession,
}

impl WorkspacePage {
    pub fn new(session: WorkspaceSession) -> Self {
        Self {
            inspector: Inspector::new(&session),
            viewer: DocumentViewer::new(&session),
            chat: ChatPanel::new(),
            chat_open: session.settings().chat_open,
            session,
        }
    }

    pub fn session(&self) -> &WorkspaceSession {
        &self.session
    }

    fn apply_shortcut(&mut self, shortcut: Shortcut) {
        match shortcut {
            Shortcut::PreviousPage => self.viewer.prev_page(&self.session),
            Shortcut::NextPage => self.viewer.next_page(&self.session),
            Shortcut::ClearSelection => self.session.state().clear_selection(),
        }
    }

    fn handle_keys(&mut self, ctx: &Context) {
        if ctx.wants_keyboard_input() {
            return;
        }

        let shortcuts: Vec<Shortcut> = ctx.input(|i| {
            [Key::ArrowLeft, Key::ArrowRight, Key::PageUp, Key::PageDown, Key::Escape]
                .into_iter()
                .filter(|key| i.key_pressed(*key))
                .filter_map(Shortcut::from_key)
                .collect()
        });
        for shortcut in shortcuts {
            self.apply_shortcut(shortcut);
        }
    }

    pub fn ui(&mut self, ctx: &Context) -> Option<WorkspaceAction> {
        let mut action = None;

        match workspace_top_bar(ctx, self.session.document(), self.chat_open, self.session.is_busy()) {
            TopBarAction::Back => action = Some(WorkspaceAction::Back),
            TopBarAction::ToggleChat => self.chat_open = !self.chat_open,
            TopBarAction::ToggleTheme => action = Some(WorkspaceAction::ToggleTheme),
            TopBarAction::None => {}
        }

        self.handle_keys(ctx);

        if self.chat_open {
            SidePanel::right("chat_panel")
                .resizable(true)
                .default_width(340.0)
                .show(ctx, |ui| {
                    if let Some(block_id) = self.chat.ui(&self.session, ui) {
                        self.inspector.reveal(&self.session, &block_id);
                    }
                });
        }

        SidePanel::right("inspector_panel")
            .resizable(true)
            .default_width(440.0)
            .show(ctx, |ui| {
                self.inspector.ui(ui, &self.session);
            });

        CentralPanel::default().show(ctx, |ui| {
            if let Some(block_id) = self.viewer.ui(&self.session, ui) {
                self.inspector.reveal(&self.session, &block_id);
            }
        });

        action
    }
}
