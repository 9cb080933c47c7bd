//! Async-friendly session API backed by a dedicated worker thread
//!
//! The worker thread owns the draft store and the export pipeline and
//! executes commands sent from async tasks, so callers can suspend
//! cooperatively while an export runs. All mutation flows through the
//! command channel, which preserves the single-writer invariant on the
//! draft.

use crate::draft::{AgreementDraft, DraftField, DraftStore};
use crate::error::{Error, Result};
use crate::export::ExportPipeline;
use crate::template::{render_agreement, TemplateOptions};
use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::thread;
use tokio::sync::oneshot;

enum Command {
    Update(DraftField, String, oneshot::Sender<AgreementDraft>),
    Snapshot(oneshot::Sender<AgreementDraft>),
    Markup(oneshot::Sender<String>),
    Export(oneshot::Sender<Result<PathBuf>>),
    Close(oneshot::Sender<()>),
}

/// An async session over one agreement draft.
///
/// Cloning the session hands out another handle onto the same worker; the
/// draft itself stays single-owner on the worker thread.
#[derive(Clone)]
pub struct Session {
    cmd_tx: Sender<Command>,
}

impl Session {
    /// Create a session (spawns a background thread that owns the store and
    /// pipeline).
    pub fn new(pipeline: ExportPipeline, template: TemplateOptions) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();

        thread::spawn(move || {
            let mut store = DraftStore::new();
            // The rendered document always reflects the latest edit; the
            // first render covers the all-empty draft.
            let mut markup = render_agreement(&store.snapshot(), &template);

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    Command::Update(field, value, resp) => {
                        store.update(field, &value);
                        let snapshot = store.snapshot();
                        markup = render_agreement(&snapshot, &template);
                        let _ = resp.send(snapshot);
                    }
                    Command::Snapshot(resp) => {
                        let _ = resp.send(store.snapshot());
                    }
                    Command::Markup(resp) => {
                        let _ = resp.send(markup.clone());
                    }
                    Command::Export(resp) => {
                        let res = pipeline.export_to_pdf(&markup, &store.snapshot());
                        let _ = resp.send(res);
                    }
                    Command::Close(resp) => {
                        let _ = resp.send(());
                        break;
                    }
                }
            }
        });

        Self { cmd_tx }
    }

    /// Update a single draft field and return the resulting snapshot
    pub async fn update(&self, field: DraftField, value: &str) -> Result<AgreementDraft> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Update(field, value.to_string(), tx));
        rx.await
            .map_err(|e| Error::Other(format!("Update canceled: {}", e)))
    }

    /// Current full draft snapshot
    pub async fn snapshot(&self) -> Result<AgreementDraft> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Snapshot(tx));
        rx.await
            .map_err(|e| Error::Other(format!("Snapshot canceled: {}", e)))
    }

    /// Currently rendered document markup
    pub async fn markup(&self) -> Result<String> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Markup(tx));
        rx.await
            .map_err(|e| Error::Other(format!("Markup canceled: {}", e)))
    }

    /// Export the current document; resolves with the saved artifact path
    pub async fn export(&self) -> Result<PathBuf> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Export(tx));
        rx.await
            .map_err(|e| Error::Other(format!("Export canceled: {}", e)))?
    }

    /// Shut down the background worker
    pub async fn close(self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Close(tx));
        rx.await
            .map_err(|e| Error::Other(format!("Close canceled: {}", e)))
    }
}
