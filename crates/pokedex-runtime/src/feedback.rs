//! Append-only feedback log
//!
//! Each accepted verdict becomes one `label,flag` line. Lines are never read
//! back or checked against the catalog. Names holding a comma or a control
//! character are refused so one request always yields at most one line.

use crate::error::FeedbackError;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// User verdict on a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Wrong,
}

impl Verdict {
    /// `"correct"` and `"wrong"` are the only recognised answers.
    pub fn parse(answer: &str) -> Option<Self> {
        match answer {
            "correct" => Some(Verdict::Correct),
            "wrong" => Some(Verdict::Wrong),
            _ => None,
        }
    }

    pub fn flag(self) -> u8 {
        match self {
            Verdict::Correct => 1,
            Verdict::Wrong => 0,
        }
    }
}

/// Writer for the feedback file
#[derive(Debug, Clone)]
pub struct FeedbackLog {
    path: PathBuf,
}

impl FeedbackLog {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `name,flag`. The file is created on first use.
    ///
    /// The line goes out in a single write; concurrent writers are not
    /// otherwise serialized.
    pub async fn record(&self, name: &str, verdict: Verdict) -> Result<(), FeedbackError> {
        if name.chars().any(|c| c == ',' || c.is_control()) {
            return Err(FeedbackError::InvalidName(name.to_string()));
        }
        let line = format!("{},{}\n", name, verdict.flag());
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|source| self.error(source))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|source| self.error(source))?;
        file.flush().await.map_err(|source| self.error(source))
    }

    fn error(&self, source: std::io::Error) -> FeedbackError {
        FeedbackError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
