//! Simulated upload and parse of a new document

use std::path::Path;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{info, warn};

use crate::events::events::ParseCompleted;
use crate::events::EventBus;
use crate::settings::SimulationSettings;
use crate::tasks::{DeferredTask, TaskScope};

/// Errors raised when starting an upload
#[derive(Error, Debug, PartialEq)]
pub enum IngestError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFile(String),

    #[error("An upload is already in progress")]
    Busy,
}

const IMAGE_EXTENSIONS: [&str; 8] = ["png", "jpg", "jpeg", "gif", "webp", "bmp", "tif", "tiff"];

/// Kind of file accepted for parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Pdf,
    Image,
}

impl UploadKind {
    /// Classify a file by MIME type when known, otherwise by extension
    pub fn detect(file_name: &str, mime: Option<&str>) -> Result<Self, IngestError> {
        match mime.filter(|m| !m.is_empty()) {
            Some("application/pdf") => Ok(UploadKind::Pdf),
            Some(m) if m.starts_with("image/") => Ok(UploadKind::Image),
            Some(_) => Err(IngestError::UnsupportedFile(file_name.to_string())),
            None => {
                let extension = Path::new(file_name)
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| e.to_ascii_lowercase())
                    .unwrap_or_default();

                if extension == "pdf" {
                    Ok(UploadKind::Pdf)
                } else if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
                    Ok(UploadKind::Image)
                } else {
                    Err(IngestError::UnsupportedFile(file_name.to_string()))
                }
            }
        }
    }
}

/// Step of the upload flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsePhase {
    Upload,
    Uploading,
    Parsing,
    Done,
}

impl ParsePhase {
    pub const ALL: [ParsePhase; 4] = [
        ParsePhase::Upload,
        ParsePhase::Uploading,
        ParsePhase::Parsing,
        ParsePhase::Done,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ParsePhase::Upload => "Upload",
            ParsePhase::Uploading => "Uploading",
            ParsePhase::Parsing => "Parsing",
            ParsePhase::Done => "Done",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            ParsePhase::Upload => 0,
            ParsePhase::Uploading => 1,
            ParsePhase::Parsing => 2,
            ParsePhase::Done => 3,
        }
    }
}

/// Progress snapshot shown by the upload page
#[derive(Debug, Clone, PartialEq)]
pub struct ParseProgress {
    pub phase: ParsePhase,
    /// 0 to 100 within the current phase
    pub progress: f32,
    pub file_name: String,
    pub kind: Option<UploadKind>,
}

impl Default for ParseProgress {
    fn default() -> Self {
        Self {
            phase: ParsePhase::Upload,
            progress: 0.0,
            file_name: String::new(),
            kind: None,
        }
    }
}

/// Fake upload followed by a fake parse, ending in a [`ParseCompleted`] event
pub struct ParseSimulation {
    state: Arc<RwLock<ParseProgress>>,
    settings: SimulationSettings,
    rng: Arc<Mutex<StdRng>>,
    events: Arc<EventBus>,
    target_document_id: String,
}

impl ParseSimulation {
    pub fn new(settings: SimulationSettings, events: Arc<EventBus>, target_document_id: impl Into<String>) -> Self {
        Self::with_rng(settings, events, target_document_id, StdRng::from_entropy())
    }

    /// Same as [`ParseSimulation::new`] with a fixed random source
    pub fn with_rng(
        settings: SimulationSettings,
        events: Arc<EventBus>,
        target_document_id: impl Into<String>,
        rng: StdRng,
    ) -> Self {
        Self {
            state: Arc::new(RwLock::new(ParseProgress::default())),
            settings,
            rng: Arc::new(Mutex::new(rng)),
            events,
            target_document_id: target_document_id.into(),
        }
    }

    pub fn progress(&self) -> ParseProgress {
        self.state.read().clone()
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state.read().phase, ParsePhase::Uploading | ParsePhase::Parsing)
    }

    /// Back to the drop zone. Running tasks must be cancelled through their scope.
    pub fn reset(&self) {
        *self.state.write() = ParseProgress::default();
    }

    /// Validate the file and run the simulation on `scope`
    pub fn start(&self, scope: &TaskScope, file_name: &str, mime: Option<&str>) -> Result<DeferredTask, IngestError> {
        let kind = UploadKind::detect(file_name, mime).map_err(|e| {
            warn!("Rejected upload: {}", e);
            e
        })?;

        {
            let mut state = self.state.write();
            if matches!(state.phase, ParsePhase::Uploading | ParsePhase::Parsing) {
                return Err(IngestError::Busy);
            }
            *state = ParseProgress {
                phase: ParsePhase::Uploading,
                progress: 0.0,
                file_name: file_name.to_string(),
                kind: Some(kind),
            };
        }
        info!("Uploading {} as {:?}", file_name, kind);

        let state = self.state.clone();
        let rng = self.rng.clone();
        let settings = self.settings.clone();
        let events = self.events.clone();
        let document_id = self.target_document_id.clone();
        let file_name = file_name.to_string();

        Ok(scope.spawn("parse-simulation", async move {
            run_phase(&state, &rng, settings.upload_tick(), settings.upload_step).await;

            tokio::time::sleep(settings.phase_pause()).await;
            {
                let mut state = state.write();
                state.phase = ParsePhase::Parsing;
                state.progress = 0.0;
            }
            info!("Parsing {}", file_name);

            run_phase(&state, &rng, settings.parse_tick(), settings.parse_step).await;
            state.write().phase = ParsePhase::Done;

            tokio::time::sleep(settings.completion_pause()).await;
            info!("Parse of {} complete", file_name);
            events.publish(ParseCompleted { file_name, document_id });
        }))
    }
}

/// Advance progress by a random step every tick until it reaches 100
async fn run_phase(
    state: &RwLock<ParseProgress>,
    rng: &Mutex<StdRng>,
    tick: std::time::Duration,
    (low, high): (f32, f32),
) {
    let mut progress = 0.0_f32;
    loop {
        tokio::time::sleep(tick).await;

        let step = {
            let mut rng = rng.lock();
            if low < high { rng.gen_range(low..high) } else { low }
        };
        // A non-positive step would never finish
        progress = (progress + step.max(0.1)).min(100.0);
        state.write().progress = progress;

        if progress >= 100.0 {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::typed_handler;

    fn simulation(events: Arc<EventBus>) -> ParseSimulation {
        ParseSimulation::with_rng(SimulationSettings::default(), events, "doc-1", StdRng::seed_from_u64(7))
    }

    #[test]
    fn test_detect_by_mime() {
        assert_eq!(UploadKind::detect("scan", Some("application/pdf")), Ok(UploadKind::Pdf));
        assert_eq!(UploadKind::detect("scan", Some("image/png")), Ok(UploadKind::Image));
        assert_eq!(
            UploadKind::detect("notes.pdf", Some("text/plain")),
            Err(IngestError::UnsupportedFile("notes.pdf".to_string()))
        );
    }

    #[test]
    fn test_detect_by_extension() {
        assert_eq!(UploadKind::detect("report.PDF", None), Ok(UploadKind::Pdf));
        assert_eq!(UploadKind::detect("invoice.jpeg", Some("")), Ok(UploadKind::Image));
        assert!(UploadKind::detect("minutes.docx", None).is_err());
        assert!(UploadKind::detect("README", None).is_err());
    }

    #[test]
    fn test_phase_order() {
        let labels: Vec<&str> = ParsePhase::ALL.iter().map(|p| p.label()).collect();
        assert_eq!(labels, vec!["Upload", "Uploading", "Parsing", "Done"]);
        assert!(ParsePhase::ALL.iter().enumerate().all(|(i, p)| p.index() == i));
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_to_completion() {
        let events = Arc::new(EventBus::new());
        let completed = Arc::new(Mutex::new(Vec::new()));
        let sink = completed.clone();
        events.subscribe::<ParseCompleted>(typed_handler(move |e: &ParseCompleted| {
            sink.lock().push((e.file_name.clone(), e.document_id.clone()));
        }));

        let scope = TaskScope::current();
        let sim = simulation(events);
        let task = sim.start(&scope, "q3-report.pdf", Some("application/pdf")).unwrap();
        assert!(sim.is_running());
        assert_eq!(sim.start(&scope, "other.pdf", None).unwrap_err(), IngestError::Busy);

        task.join().await;

        let progress = sim.progress();
        assert_eq!(progress.phase, ParsePhase::Done);
        assert_eq!(progress.progress, 100.0);
        assert_eq!(progress.kind, Some(UploadKind::Pdf));
        assert_eq!(*completed.lock(), vec![("q3-report.pdf".to_string(), "doc-1".to_string())]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unsupported_file_does_not_start() {
        let scope = TaskScope::current();
        let sim = simulation(Arc::new(EventBus::new()));
        assert!(sim.start(&scope, "budget.xlsx", None).is_err());
        assert_eq!(sim.progress(), ParseProgress::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_stops_progress() {
        let events = Arc::new(EventBus::new());
        let completed = Arc::new(Mutex::new(0));
        let sink = completed.clone();
        events.subscribe::<ParseCompleted>(typed_handler(move |_: &ParseCompleted| {
            *sink.lock() += 1;
        }));

        let scope = TaskScope::current();
        let sim = simulation(events);
        let task = sim.start(&scope, "scan.png", None).unwrap();

        drop(scope);
        task.join().await;
        assert_eq!(*completed.lock(), 0);
        assert_eq!(sim.progress().phase, ParsePhase::Uploading);
    }
}
