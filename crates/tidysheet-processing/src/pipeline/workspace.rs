//! Multi-file upload handling.
//!
//! A [`Workspace`] holds one [`FileSession`] per uploaded file name. Files
//! are decoded independently: a file that fails to decode is reported and
//! skipped without affecting the others.

use serde::Serialize;
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::pipeline::session::FileSession;
use crate::reporting::FileSummary;
use crate::types::TabularFile;

/// Result of uploading one file in a batch.
#[derive(Debug, Serialize)]
pub struct IngestOutcome {
    pub file_name: String,
    pub result: Result<FileSummary>,
}

impl IngestOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// All files uploaded in one user session.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    config: PipelineConfig,
    sessions: Vec<FileSession>,
}

impl Workspace {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            sessions: Vec::new(),
        }
    }

    /// Like [`Workspace::new`], rejecting an invalid configuration up front.
    pub fn try_new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Decode every file, returning one outcome per file in input order.
    ///
    /// Successful files get a session (replacing any earlier upload with the
    /// same name); failed files leave the workspace untouched.
    pub fn ingest<I>(&mut self, files: I) -> Vec<IngestOutcome>
    where
        I: IntoIterator<Item = TabularFile>,
    {
        let outcomes: Vec<IngestOutcome> = files
            .into_iter()
            .map(|file| {
                let file_name = file.name().to_string();
                let result = self.upload(file).and_then(|session| session.summary());
                if let Err(e) = &result {
                    warn!("Skipping '{}': {}", file_name, e);
                }
                IngestOutcome { file_name, result }
            })
            .collect();

        let loaded = outcomes.iter().filter(|o| o.is_ok()).count();
        info!("Ingested {} of {} uploaded files", loaded, outcomes.len());
        outcomes
    }

    /// Decode one file and store its session.
    pub fn upload(&mut self, file: TabularFile) -> Result<&mut FileSession> {
        let session = FileSession::open(file, &self.config)?;

        let idx = match self.position(session.name()) {
            Some(idx) => {
                info!("Replacing earlier upload of '{}'", session.name());
                self.sessions[idx] = session;
                idx
            }
            None => {
                self.sessions.push(session);
                self.sessions.len() - 1
            }
        };
        Ok(&mut self.sessions[idx])
    }

    pub fn session(&self, name: &str) -> Result<&FileSession> {
        self.sessions
            .iter()
            .find(|s| s.name() == name)
            .ok_or_else(|| PipelineError::UnknownFile(name.to_string()))
    }

    pub fn session_mut(&mut self, name: &str) -> Result<&mut FileSession> {
        self.sessions
            .iter_mut()
            .find(|s| s.name() == name)
            .ok_or_else(|| PipelineError::UnknownFile(name.to_string()))
    }

    /// Sessions in upload order.
    pub fn sessions(&self) -> &[FileSession] {
        &self.sessions
    }

    pub fn file_names(&self) -> Vec<&str> {
        self.sessions.iter().map(FileSession::name).collect()
    }

    /// Drop a file's session, releasing its table.
    pub fn remove(&mut self, name: &str) -> Result<FileSession> {
        let idx = self
            .position(name)
            .ok_or_else(|| PipelineError::UnknownFile(name.to_string()))?;
        Ok(self.sessions.remove(idx))
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.sessions.iter().position(|s| s.name() == name)
    }
}
