//! The engine: pipelines, initial documents and run orchestration.
//!
//! A run plans the pipelines into dependency waves, runs each wave on a
//! `rayon` thread pool, publishes every successful pipeline's documents
//! exactly once, and finally reports and signals completion.

mod notify;
mod outputs;
mod report;
mod schedule;

use std::fs;
use std::path::Path;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

use chrono::Utc;
use rayon::prelude::*;

use crate::cancel::CancellationToken;
use crate::config::{global_metadata, Config, EngineSettings, FailurePolicy};
use crate::document::{Content, Document};
use crate::error::{Error, Result};
use crate::logging::{Logger, Trace};
use crate::metadata::{MetaValue, Metadata};
use crate::path::NormalizedPath;
use crate::pipeline::{Pipeline, PipelineStatus};

pub use notify::RunCompleted;
pub use outputs::PipelineOutputs;
pub use report::{PipelineReport, RunOutcome, RunReport};

use notify::Notifier;

/// Metadata key holding the source file path of a discovered input.
pub const SOURCE_FILE_KEY: &str = "SourceFile";

/// Metadata key holding a discovered input's path relative to the input folder.
pub const RELATIVE_PATH_KEY: &str = "RelativePath";

/// Owns pipelines and drives runs.
///
/// # Examples
///
/// ```
/// use docflow::{Engine, FnModule, Pipeline, RunOutcome};
///
/// let mut engine = Engine::default();
/// engine
///     .add_pipeline(Pipeline::new("pages").with_module(
///         FnModule::new("Count", |docs, _ctx| Ok(docs)).independent(),
///     ))
///     .unwrap();
///
/// let report = engine.run().unwrap();
/// assert_eq!(report.outcome, RunOutcome::Succeeded);
/// assert_eq!(report.pipeline("pages").unwrap().documents, 1);
/// ```
pub struct Engine {
    settings: EngineSettings,
    pipelines: Vec<Pipeline>,
    global_metadata: Metadata,
    initial_documents: Option<Vec<Document>>,
    trace: Arc<dyn Trace>,
    notifier: Notifier,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineSettings::default())
    }
}

impl Engine {
    /// Creates an engine with no pipelines.
    ///
    /// The trace sink is a [`Logger`] at the settings' log level. A
    /// `max_nesting_depth` of 0 is raised to 1 so that every pipeline can run
    /// its own module list.
    #[must_use]
    pub fn new(mut settings: EngineSettings) -> Self {
        settings.max_nesting_depth = settings.max_nesting_depth.max(1);
        let trace = Arc::new(Logger::new(settings.log_level));
        Self {
            settings,
            pipelines: Vec::new(),
            global_metadata: Metadata::new(),
            initial_documents: None,
            trace,
            notifier: Notifier::default(),
        }
    }

    /// Creates an engine from a merged configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the configuration is invalid.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut engine = Self::new(EngineSettings::from_config(config)?);
        engine.global_metadata = global_metadata(config);
        Ok(engine)
    }

    /// The resolved settings.
    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// The trace sink.
    #[must_use]
    pub fn trace(&self) -> &dyn Trace {
        self.trace.as_ref()
    }

    /// Replaces the trace sink.
    pub fn set_trace(&mut self, trace: Arc<dyn Trace>) {
        self.trace = trace;
    }

    /// Metadata seeded into every initial document.
    #[must_use]
    pub fn global_metadata(&self) -> &Metadata {
        &self.global_metadata
    }

    /// Replaces the global metadata.
    pub fn set_global_metadata(&mut self, metadata: Metadata) {
        self.global_metadata = metadata;
    }

    /// Appends a pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicatePipeline`] if the name is taken.
    pub fn add_pipeline(&mut self, pipeline: Pipeline) -> Result<()> {
        if self.pipeline(pipeline.name()).is_some() {
            return Err(Error::DuplicatePipeline {
                name: pipeline.name().to_string(),
            });
        }
        self.pipelines.push(pipeline);
        Ok(())
    }

    /// Looks up a pipeline by name.
    #[must_use]
    pub fn pipeline(&self, name: &str) -> Option<&Pipeline> {
        self.pipelines.iter().find(|p| p.name() == name)
    }

    /// Pipelines in declaration order.
    #[must_use]
    pub fn pipelines(&self) -> &[Pipeline] {
        &self.pipelines
    }

    /// Sets the documents every pipeline starts from.
    pub fn set_initial_documents(&mut self, documents: Vec<Document>) {
        self.initial_documents = Some(documents);
    }

    /// The documents `execute` starts from when given no inputs.
    ///
    /// Without a configured set this is a single empty document at the input
    /// folder carrying the global metadata.
    #[must_use]
    pub fn initial_documents(&self) -> Vec<Document> {
        match &self.initial_documents {
            Some(docs) => docs.clone(),
            None => vec![Document::with_parts(
                self.settings.input.clone(),
                self.global_metadata.clone(),
                Content::Empty,
            )],
        }
    }

    /// Uses every file under the input folder as an initial document.
    ///
    /// Files are visited in name order. Each document is file-backed, carries
    /// the global metadata plus [`SOURCE_FILE_KEY`] and
    /// [`RELATIVE_PATH_KEY`], and is identified by its path under the input
    /// folder. Returns the number of documents found.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the input folder cannot be read.
    pub fn discover_inputs(&mut self) -> Result<usize> {
        let input = self.settings.input.clone();
        let mut files = Vec::new();
        collect_files(&input.to_std_path(), "", &mut files)?;

        let mut documents = Vec::with_capacity(files.len());
        for (relative, location) in files {
            let relative = NormalizedPath::file(&relative)?;
            let source = input.combine(&relative)?;
            let metadata = self.global_metadata.layer([
                (SOURCE_FILE_KEY, MetaValue::Path(source.clone())),
                (RELATIVE_PATH_KEY, MetaValue::Path(relative)),
            ]);
            documents.push(Document::with_parts(source, metadata, Content::File(location)));
        }

        self.trace
            .info(&format!("discovered {} input documents in {input}", documents.len()));
        let count = documents.len();
        self.initial_documents = Some(documents);
        Ok(count)
    }

    /// Returns a receiver that gets one [`RunCompleted`] after every run.
    pub fn subscribe_completion(&self) -> Receiver<RunCompleted> {
        self.notifier.subscribe()
    }

    /// Runs every pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CyclicDependency`] before anything runs if the
    /// declared reads form a cycle. Pipeline failures do not make the run
    /// itself fail; they are recorded in the report.
    pub fn run(&self) -> Result<RunReport> {
        self.run_with(&CancellationToken::new())
    }

    /// Runs every pipeline, honoring `cancel` between modules and before
    /// each pipeline starts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CyclicDependency`] before anything runs if the
    /// declared reads form a cycle, and [`Error::WorkerPool`] if the worker
    /// threads cannot be started.
    pub fn run_with(&self, cancel: &CancellationToken) -> Result<RunReport> {
        let started_at = Utc::now();
        let schedule = schedule::plan(&self.pipelines, self.settings.parallel, self.trace())
            .inspect_err(|err| self.trace.error(&err.to_string()))?;

        for pipeline in &self.pipelines {
            pipeline.finish(PipelineStatus::NotRun, None);
        }
        let outputs = PipelineOutputs::new(self.pipelines.iter().map(Pipeline::name));
        let mut errors: Vec<Option<String>> = vec![None; self.pipelines.len()];
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(worker_count(self.settings.max_parallelism))
            .thread_name(|i| format!("docflow-worker-{i}"))
            .build()
            .map_err(|e| Error::WorkerPool {
                message: e.to_string(),
            })?;

        for wave in &schedule.waves {
            let runnable: Vec<usize> = wave
                .iter()
                .copied()
                .filter(|&idx| self.admit(idx, &schedule.dependencies[idx], cancel))
                .collect();

            let results: Vec<Option<String>> = pool.install(|| {
                runnable
                    .par_iter()
                    .map(|&idx| self.run_pipeline(idx, &outputs, cancel))
                    .collect()
            });
            for (idx, error) in runnable.into_iter().zip(results) {
                errors[idx] = error;
            }
        }

        let pipelines: Vec<PipelineReport> = self
            .pipelines
            .iter()
            .zip(errors)
            .map(|(pipeline, error)| PipelineReport {
                name: pipeline.name().to_string(),
                status: pipeline.status(),
                documents: pipeline.last_output().map_or(0, |docs| docs.len()),
                error,
            })
            .collect();
        let outcome = RunReport::outcome_for(cancel.is_cancelled(), &pipelines);
        let report = RunReport {
            outcome,
            pipelines,
            started_at,
            finished_at: Utc::now(),
        };

        self.trace.info(&format!("run {outcome}"));
        let listeners = self.notifier.notify(&RunCompleted {
            outcome,
            output_folder: self.settings.output.clone(),
        });
        log::debug!("completion signal delivered to {listeners} listeners");
        Ok(report)
    }

    /// Runs pipeline `idx` and returns its failure text, if any.
    fn run_pipeline(
        &self,
        idx: usize,
        outputs: &PipelineOutputs,
        cancel: &CancellationToken,
    ) -> Option<String> {
        let pipeline = &self.pipelines[idx];
        if cancel.is_cancelled() {
            pipeline.finish(PipelineStatus::Cancelled, None);
            return None;
        }
        self.trace.info(&format!("running pipeline '{}'", pipeline.name()));
        match pipeline.run(self, outputs, cancel) {
            Ok(docs) => {
                self.trace.info(&format!(
                    "pipeline '{}' produced {} documents",
                    pipeline.name(),
                    docs.len()
                ));
                None
            }
            Err(err) if err.is_cancelled() => {
                self.trace
                    .warn(&format!("pipeline '{}' cancelled", pipeline.name()));
                None
            }
            Err(err) => {
                let message = err.pipeline_failure(pipeline.name());
                self.trace.error(&message);
                Some(err.to_string())
            }
        }
    }

    /// Decides whether pipeline `idx` may start; records why if not.
    fn admit(&self, idx: usize, dependencies: &[usize], cancel: &CancellationToken) -> bool {
        let pipeline = &self.pipelines[idx];
        if cancel.is_cancelled() {
            pipeline.finish(PipelineStatus::Cancelled, None);
            return false;
        }

        let unavailable: Vec<&str> = dependencies
            .iter()
            .map(|&dep| &self.pipelines[dep])
            .filter(|dep| dep.status() != PipelineStatus::Succeeded)
            .map(Pipeline::name)
            .collect();
        if unavailable.is_empty() {
            return true;
        }

        let names = unavailable.join(", ");
        match self.settings.failure_policy {
            FailurePolicy::BlockDependents => {
                self.trace.warn(&format!(
                    "pipeline '{}' blocked by failed dependencies: {names}",
                    pipeline.name()
                ));
                pipeline.finish(PipelineStatus::Blocked, None);
                false
            }
            FailurePolicy::Continue => {
                self.trace.warn(&format!(
                    "pipeline '{}' runs without output of: {names}",
                    pipeline.name()
                ));
                true
            }
        }
    }
}

/// Resolves a configured worker count; `0` means the available parallelism.
fn worker_count(configured: usize) -> usize {
    if configured > 0 {
        return configured;
    }
    std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
}

/// Collects `(relative path, filesystem path)` for every file under `dir`.
fn collect_files(
    dir: &Path,
    prefix: &str,
    files: &mut Vec<(String, std::path::PathBuf)>,
) -> Result<()> {
    let mut entries = fs::read_dir(dir)?.collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(fs::DirEntry::file_name);

    for entry in entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        let relative = if prefix.is_empty() {
            name
        } else {
            format!("{prefix}/{name}")
        };
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            collect_files(&path, &relative, files)?;
        } else {
            files.push((relative, path));
        }
    }
    Ok(())
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("settings", &self.settings)
            .field("pipelines", &self.pipelines)
            .field("global_metadata", &self.global_metadata)
            .finish_non_exhaustive()
    }
}
