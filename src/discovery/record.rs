//! Saving a discovered configuration
//!
//! Discovery output is advisory console text by default. When the operator
//! asks for it, the confirmed candidate is written as JSON so it can be
//! copied into another tool's configuration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;
use uuid::Uuid;

use super::session::DiscoverySession;
use crate::error::DiscoveryResult;

/// A working configuration confirmed by a discovery session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveredConfig {
    /// Which discovery produced it (`endpoints`, `models`, ...)
    pub scenario: String,
    pub session_id: Uuid,
    pub discovered_at: DateTime<Utc>,
    /// Axis name to the value that worked
    pub fields: BTreeMap<String, String>,
    /// Content the provider returned for the test prompt
    pub payload: String,
    /// How many candidates were tried, the working one included
    pub attempts: usize,
}

impl DiscoveredConfig {
    /// Build from a finished session; `None` if nothing was found
    pub fn from_session(session: &DiscoverySession) -> Option<Self> {
        let found = session.found()?;

        Some(Self {
            scenario: session.name().to_string(),
            session_id: session.id(),
            discovered_at: Utc::now(),
            fields: found
                .candidate
                .fields()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            payload: found.outcome.payload().unwrap_or_default().to_string(),
            attempts: session.records().len(),
        })
    }

    /// Write as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> DiscoveryResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;

        tracing::info!("Saved discovered configuration to {}", path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> DiscoveryResult<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
