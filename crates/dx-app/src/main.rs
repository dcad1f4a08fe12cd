//! Main application entry point

mod documents_page;
mod parse_page;
mod routes;
mod workspace_page;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use eframe::egui::{self, Context};
use parking_lot::Mutex;
use tokio::runtime::Runtime;
use tracing::{error, info};

use dx_core::events::events::ParseCompleted;
use dx_core::events::{typed_handler, EventBus};
use dx_core::{AppSettings, Document, WorkspaceSession};
use dx_data::{load_settings_or_default, DocumentSource, JsonSource, SampleSource};
use dx_ui::{apply_theme, Theme};

use documents_page::{DocumentsAction, DocumentsPage};
use parse_page::{ParseAction, ParsePage};
use routes::{resolve_document, LaunchArgs, Route, PARSED_DOCUMENT_ID};
use workspace_page::{WorkspaceAction, WorkspacePage};

/// How often to repaint while a deferred task is running
const BUSY_REPAINT: Duration = Duration::from_millis(50);

/// Main application state
struct DocExtractApp {
    /// Tokio runtime for source loading and deferred tasks
    runtime: Runtime,

    source: Arc<dyn DocumentSource>,
    documents: Vec<Document>,
    settings: AppSettings,
    events: Arc<EventBus>,

    route: Route,

    /// Route requested from a runtime thread, applied on the next frame
    pending_route: Arc<Mutex<Option<Route>>>,

    documents_page: DocumentsPage,
    parse_page: Option<ParsePage>,
    workspace: Option<WorkspacePage>,
}

impl DocExtractApp {
    fn new(cc: &eframe::CreationContext<'_>, runtime: Runtime, source: Arc<dyn DocumentSource>, settings: AppSettings) -> Self {
        apply_theme(&cc.egui_ctx, &Theme::from_dark_mode(settings.dark_mode));

        let documents = runtime.block_on(source.documents()).unwrap_or_else(|e| {
            error!("Failed to list documents from {}: {}", source.source_name(), e);
            Vec::new()
        });
        info!("Loaded {} documents from {}", documents.len(), source.source_name());

        let events = Arc::new(EventBus::new());
        let pending_route = Arc::new(Mutex::new(None));
        {
            let pending_route = pending_route.clone();
            let ctx = cc.egui_ctx.clone();
            events.subscribe::<ParseCompleted>(typed_handler(move |event: &ParseCompleted| {
                info!("Parsed {}, opening {}", event.file_name, event.document_id);
                *pending_route.lock() = Some(Route::Workspace(event.document_id.clone()));
                ctx.request_repaint();
            }));
        }

        Self {
            runtime,
            source,
            documents,
            settings,
            events,
            route: Route::Documents,
            pending_route,
            documents_page: DocumentsPage::new(),
            parse_page: None,
            workspace: None,
        }
    }

    /// Switch pages, tearing down whatever the old page owned
    fn navigate(&mut self, route: Route) {
        self.parse_page = None;
        self.workspace = None;

        match &route {
            Route::Documents => {}
            Route::NewParse => {
                let target = self
                    .documents
                    .first()
                    .map_or(PARSED_DOCUMENT_ID, |doc| doc.id.as_str());
                self.parse_page = Some(ParsePage::new(
                    &self.settings,
                    self.events.clone(),
                    target,
                    self.runtime.handle().clone(),
                ));
            }
            Route::Workspace(id) => match self.open_workspace(id) {
                Ok(page) => self.workspace = Some(page),
                Err(e) => {
                    error!("Failed to open {}: {:#}", id, e);
                    self.route = Route::Documents;
                    return;
                }
            },
        }

        self.route = route;
    }

    fn open_workspace(&self, id: &str) -> Result<WorkspacePage> {
        let document = resolve_document(&self.documents, id)
            .cloned()
            .context("No documents available")?;

        let content = self.runtime.block_on(self.source.content(&document.id))?;
        let responses = self.runtime.block_on(self.source.chat_responses())?;

        let session = WorkspaceSession::open(
            document,
            content,
            responses,
            self.settings.clone(),
            self.events.clone(),
            self.runtime.handle().clone(),
        );
        Ok(WorkspacePage::new(session))
    }

    fn toggle_theme(&mut self, ctx: &Context) {
        self.settings.dark_mode = !self.settings.dark_mode;
        apply_theme(ctx, &Theme::from_dark_mode(self.settings.dark_mode));
    }

    fn is_busy(&self) -> bool {
        self.workspace.as_ref().map_or(false, |w| w.session().is_busy())
            || self.parse_page.as_ref().map_or(false, |p| p.is_running())
    }
}

impl eframe::App for DocExtractApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let pending = self.pending_route.lock().take();
        if let Some(route) = pending {
            self.navigate(route);
        }

        match self.route.clone() {
            Route::Documents => {
                let source_name = self.source.source_name().to_string();
                let action = egui::CentralPanel::default()
                    .show(ctx, |ui| self.documents_page.ui(ui, &self.documents, &source_name))
                    .inner;

                match action {
                    Some(DocumentsAction::Open(id)) => self.navigate(Route::Workspace(id)),
                    Some(DocumentsAction::NewParse) => self.navigate(Route::NewParse),
                    None => {}
                }
            }
            Route::NewParse => {
                let action = self.parse_page.as_mut().and_then(|page| {
                    egui::CentralPanel::default().show(ctx, |ui| page.ui(ui)).inner
                });

                if let Some(ParseAction::Back) = action {
                    self.navigate(Route::Documents);
                }
            }
            Route::Workspace(_) => {
                let action = self.workspace.as_mut().and_then(|page| page.ui(ctx));

                match action {
                    Some(WorkspaceAction::Back) => self.navigate(Route::Documents),
                    Some(WorkspaceAction::ToggleTheme) => self.toggle_theme(ctx),
                    None => {}
                }
            }
        }

        // Deferred replies, extraction and upload progress land from runtime threads
        if self.is_busy() {
            ctx.request_repaint_after(BUSY_REPAINT);
        }
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let args = LaunchArgs::parse(std::env::args().skip(1));
    let settings = load_settings_or_default(args.settings_path.as_deref());

    let runtime = Runtime::new().context("Failed to start the tokio runtime")?;
    let source: Arc<dyn DocumentSource> = match &args.data_path {
        Some(path) => Arc::new(runtime.block_on(JsonSource::new(path.clone()))?),
        None => Arc::new(SampleSource::new()),
    };

    info!("Starting document extraction workspace");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([960.0, 600.0]),
        default_theme: if settings.dark_mode {
            eframe::Theme::Dark
        } else {
            eframe::Theme::Light
        },
        persist_window: false,
        ..Default::default()
    };

    eframe::run_native(
        "Document Extraction Workspace",
        options,
        Box::new(move |cc| Box::new(DocExtractApp::new(cc, runtime, source, settings))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}
