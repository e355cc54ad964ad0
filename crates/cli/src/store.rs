//! File-backed answer series storage

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use answer_chart_core::SeriesPayload;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// Answer id of the built-in demo curve
pub const DEMO_ANSWER_ID: &str = "3";
const DEMO_POINTS: u32 = 1000;

/// Series served by `/api/answer-data/{answer_id}`, keyed by answer id
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SeriesStore {
    /// Last update timestamp
    pub last_update: Option<DateTime<Utc>>,
    #[serde(default)]
    pub series: BTreeMap<String, SeriesPayload>,
}

impl SeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the store from a JSON file; a missing file is an empty store.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        let store: Self = serde_json::from_str(&content)?;
        Ok(store)
    }

    /// Write to a temp file next to `path`, then rename over it.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(|e| Error::FileWrite {
            path: dir.display().to_string(),
            source: e,
        })?;

        let write_err = |e: std::io::Error| Error::FileWrite {
            path: path.display().to_string(),
            source: e,
        };

        let content = serde_json::to_string_pretty(self)?;
        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(content.as_bytes()).map_err(write_err)?;
        tmp.persist(path).map_err(|e| write_err(e.error))?;

        Ok(())
    }

    /// Add or replace the series of an answer.
    pub fn insert(&mut self, answer_id: &str, payload: SeriesPayload) -> Option<SeriesPayload> {
        let previous = self.series.insert(answer_id.to_string(), payload);
        self.last_update = Some(Utc::now());
        previous
    }

    /// Stored series, falling back to the demo curve for [`DEMO_ANSWER_ID`].
    pub fn lookup(&self, answer_id: &str) -> Option<SeriesPayload> {
        self.series.get(answer_id).cloned().or_else(|| {
            (answer_id == DEMO_ANSWER_ID).then(demo_series)
        })
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// `y = 100 * log10(x) / log10(n)` over `x = 1..=n`: quality climbing
/// quickly then flattening as work grows.
pub fn demo_series() -> SeriesPayload {
    let n = DEMO_POINTS as f64;
    let (x, y) = (1..=DEMO_POINTS)
        .map(|i| {
            let value = 100.0 * (i as f64).log10() / n.log10();
            (serde_json::Value::from(i), Some(value))
        })
        .unzip();
    SeriesPayload::new(x, y)
}
