//! Live chart instances, keyed by canvas id

use std::collections::HashMap;

/// At most one chart handle per canvas.
#[derive(Debug)]
pub struct ChartRegistry<H> {
    charts: HashMap<String, H>,
}

impl<H> Default for ChartRegistry<H> {
    fn default() -> Self {
        Self {
            charts: HashMap::new(),
        }
    }
}

impl<H> ChartRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return the handle bound to `canvas_id`.
    pub fn take(&mut self, canvas_id: &str) -> Option<H> {
        self.charts.remove(canvas_id)
    }

    /// Bind `handle` to `canvas_id`, returning whatever was bound before.
    pub fn insert(&mut self, canvas_id: &str, handle: H) -> Option<H> {
        self.charts.insert(canvas_id.to_string(), handle)
    }

    pub fn get(&self, canvas_id: &str) -> Option<&H> {
        self.charts.get(canvas_id)
    }

    pub fn contains(&self, canvas_id: &str) -> bool {
        self.charts.contains_key(canvas_id)
    }

    /// Number of live charts
    pub fn count(&self) -> usize {
        self.charts.len()
    }
}
