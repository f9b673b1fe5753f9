//! Fetching decision tables over HTTP or from a local directory.

use crate::catalog::Model;
use derive_more::{Display, Error};
use std::path::PathBuf;
use tabletoe_core::DecisionTable;
use tracing::{debug, info, instrument, warn};

/// Where table assets live.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum TableSource {
    /// Base URL; the table is fetched from `{base}/{file}`.
    #[display("{}", _0)]
    Http(String),
    /// Directory holding the table files.
    #[display("{}", _0.display())]
    Directory(PathBuf),
}

impl TableSource {
    /// Interprets `http://` and `https://` prefixes as URLs, anything else as a path.
    #[instrument]
    pub fn parse(source: &str) -> Self {
        let trimmed = source.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Http(trimmed.trim_end_matches('/').to_string())
        } else {
            Self::Directory(PathBuf::from(trimmed))
        }
    }

    /// Location of a model's asset, for messages.
    pub fn location(&self, model: Model) -> String {
        match self {
            Self::Http(base) => format!("{}/{}", base, model.file_name()),
            Self::Directory(dir) => dir.join(model.file_name()).display().to_string(),
        }
    }
}

/// Loads catalog tables from a [`TableSource`].
#[derive(Debug, Clone)]
pub struct TableLoader {
    source: TableSource,
    client: reqwest::Client,
}

impl TableLoader {
    /// Creates a loader for `source`.
    #[instrument]
    pub fn new(source: TableSource) -> Self {
        Self {
            source,
            client: reqwest::Client::new(),
        }
    }

    /// The configured source.
    pub fn source(&self) -> &TableSource {
        &self.source
    }

    /// Fetches and parses the table for `model`.
    #[instrument(skip(self), fields(source = %self.source))]
    pub async fn load(&self, model: Model) -> Result<DecisionTable, LoadError> {
        let location = self.source.location(model);
        info!(%location, "Loading decision table");

        let body = match &self.source {
            TableSource::Http(_) => self.fetch(&location).await?,
            TableSource::Directory(dir) => {
                let path = dir.join(model.file_name());
                tokio::fs::read_to_string(&path).await.map_err(|e| {
                    LoadError::new(LoadErrorKind::Io, format!("{}: {}", path.display(), e))
                })?
            }
        };

        let table = DecisionTable::from_json_str(&body)
            .map_err(|e| LoadError::new(LoadErrorKind::Parse, format!("{}: {}", location, e)))?;

        if table.rejected() > 0 {
            warn!(rejected = table.rejected(), "Some table entries were unusable");
        }
        info!(entries = table.len(), "Decision table loaded");
        Ok(table)
    }

    async fn fetch(&self, url: &str) -> Result<String, LoadError> {
        debug!(url, "Fetching table over HTTP");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LoadError::new(LoadErrorKind::Http, format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::new(
                LoadErrorKind::Status,
                format!("{} returned {}", url, status),
            ));
        }

        response
            .text()
            .await
            .map_err(|e| LoadError::new(LoadErrorKind::Http, format!("{}: {}", url, e)))
    }
}

/// Category of a table load failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum LoadErrorKind {
    /// Request could not be sent or the body could not be read.
    #[display("network error")]
    Http,
    /// Server answered with a non-success status.
    #[display("bad response")]
    Status,
    /// Local file could not be read.
    #[display("read error")]
    Io,
    /// Body was not a valid table.
    #[display("parse error")]
    Parse,
}

/// Table load error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Table load {}: {} at {}:{}", kind, message, file, line)]
pub struct LoadError {
    /// What went wrong.
    pub kind: LoadErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl LoadError {
    /// Creates a new load error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(kind: LoadErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Short text suitable for showing to the player.
    pub fn notice(&self) -> String {
        format!("Could not load model ({}). Playing randomly.", self.kind)
    }
}
