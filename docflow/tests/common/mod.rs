//! Common test utilities for integration tests.
//!
//! This module provides helper functions and fixture builders for testing
//! the docflow engine.

use std::sync::{Arc, Mutex};

use docflow::{
    Document, Engine, EngineSettings, Error, FnModule, Module, NormalizedPath, Result, Trace,
};

/// A trace sink that keeps every record for later assertions.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct RecordingTrace {
    records: Mutex<Vec<(log::Level, String)>>,
}

#[allow(dead_code)]
impl RecordingTrace {
    /// Creates an empty recorder.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Messages recorded at `level`, in order.
    pub fn messages(&self, level: log::Level) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// Returns true if any message at `level` contains `needle`.
    pub fn contains(&self, level: log::Level, needle: &str) -> bool {
        self.messages(level).iter().any(|m| m.contains(needle))
    }
}

impl Trace for RecordingTrace {
    fn record(&self, level: log::Level, message: &str) {
        self.records
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }
}

/// Creates a text document at `/path`.
#[allow(dead_code)]
pub fn doc(path: &str, text: &str) -> Document {
    Document::new(NormalizedPath::file(path).unwrap(), text)
}

/// Creates `count` documents named `/1.md`, `/2.md`, ...
#[allow(dead_code)]
pub fn numbered_docs(count: usize) -> Vec<Document> {
    (1..=count)
        .map(|i| doc(&format!("/{i}.md"), &format!("document {i}")))
        .collect()
}

/// Creates an engine seeded with `docs` that records its trace.
#[allow(dead_code)]
pub fn engine_with(settings: EngineSettings, docs: Vec<Document>) -> (Engine, Arc<RecordingTrace>) {
    let trace = RecordingTrace::new();
    let mut engine = Engine::new(settings);
    engine.set_trace(trace.clone());
    engine.set_initial_documents(docs);
    (engine, trace)
}

/// A module that passes its inputs through and reads no pipelines.
#[allow(dead_code)]
pub fn identity() -> Arc<dyn Module> {
    Arc::new(FnModule::new("Identity", |docs, _| Ok(docs)).independent())
}

/// A module that sets `key` to `value` on every input.
#[allow(dead_code)]
pub fn tag(key: &'static str, value: &'static str) -> Arc<dyn Module> {
    Arc::new(
        FnModule::new("Tag", move |docs: Vec<Document>, _| {
            Ok(docs.iter().map(|d| d.with_metadata([(key, value)])).collect())
        })
        .independent(),
    )
}

/// A module that fails on the document at `path` and passes others through.
#[allow(dead_code)]
pub fn fail_on(path: &'static str) -> Arc<dyn Module> {
    Arc::new(
        FnModule::new("Explode", move |docs: Vec<Document>, _| {
            for d in &docs {
                if d.path().full_path() == path {
                    return Err(Error::module_for(d.path(), "boom"));
                }
            }
            Ok(docs)
        })
        .independent(),
    )
}

/// A module that always fails.
#[allow(dead_code)]
pub fn failing() -> Arc<dyn Module> {
    Arc::new(
        FnModule::new("Fail", |_, _| -> Result<Vec<Document>> { Err(Error::module("boom")) })
            .independent(),
    )
}

/// Settings with the given concurrency and otherwise defaults.
#[allow(dead_code)]
pub fn settings(parallel: bool) -> EngineSettings {
    EngineSettings {
        parallel,
        ..EngineSettings::default()
    }
}
