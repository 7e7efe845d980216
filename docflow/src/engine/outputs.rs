//! The per-run map of published pipeline outputs.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use crate::document::Document;

/// Pipeline name to the document set it published during one run.
///
/// Every entry is written at most once. An entry becomes visible to readers
/// only after the whole set is stored, so a reader never observes a partial
/// set. Unpublished and unknown names both read as absent.
#[derive(Debug, Default)]
pub struct PipelineOutputs {
    slots: HashMap<String, OnceLock<Arc<[Document]>>>,
}

impl PipelineOutputs {
    /// Creates an empty slot for every name.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            slots: names
                .into_iter()
                .map(|name| (name.into(), OnceLock::new()))
                .collect(),
        }
    }

    /// Returns the published documents of `pipeline`, if any.
    #[must_use]
    pub fn get(&self, pipeline: &str) -> Option<&[Document]> {
        self.slots.get(pipeline)?.get().map(|docs| &docs[..])
    }

    /// Returns a shared handle to the published documents of `pipeline`.
    #[must_use]
    pub fn get_shared(&self, pipeline: &str) -> Option<Arc<[Document]>> {
        self.slots.get(pipeline)?.get().cloned()
    }

    /// Returns true if `pipeline` has published.
    #[must_use]
    pub fn contains(&self, pipeline: &str) -> bool {
        self.get(pipeline).is_some()
    }

    /// Names of the pipelines that have published so far.
    #[must_use]
    pub fn published(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .slots
            .iter()
            .filter(|(_, slot)| slot.get().is_some())
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Stores the output of `pipeline`.
    ///
    /// Returns false if the name has no slot or was already published; the
    /// first write always wins.
    pub(crate) fn publish(&self, pipeline: &str, documents: Arc<[Document]>) -> bool {
        let Some(slot) = self.slots.get(pipeline) else {
            return false;
        };
        let published = slot.set(documents).is_ok();
        if published {
            log::debug!("published output of pipeline '{pipeline}'");
        }
        published
    }
}
