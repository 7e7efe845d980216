//! Named module chains.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::cancel::CancellationToken;
use crate::context::ExecutionContext;
use crate::document::Document;
use crate::engine::{Engine, PipelineOutputs};
use crate::error::Result;
use crate::module::{combined_dependencies, Module};

/// The state a pipeline was left in by the most recent run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    /// The pipeline has not run.
    NotRun,
    /// The module chain completed and its output was published.
    Succeeded,
    /// A module failed; nothing was published.
    Failed,
    /// A dependency failed, so the pipeline was not started.
    Blocked,
    /// The run was cancelled before or while the pipeline ran.
    Cancelled,
}

impl fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotRun => write!(f, "not run"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
            Self::Blocked => write!(f, "blocked"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug)]
struct RunState {
    status: PipelineStatus,
    output: Option<Arc<[Document]>>,
}

/// A named, ordered module list and the documents it last produced.
///
/// # Examples
///
/// ```
/// use docflow::{FnModule, Pipeline, PipelineStatus};
///
/// let pipeline = Pipeline::new("pages")
///     .with_module(FnModule::new("Identity", |docs, _ctx| Ok(docs)).independent());
///
/// assert_eq!(pipeline.name(), "pages");
/// assert_eq!(pipeline.modules().len(), 1);
/// assert_eq!(pipeline.status(), PipelineStatus::NotRun);
/// assert_eq!(pipeline.dependencies(), Some(vec![]));
/// ```
pub struct Pipeline {
    name: String,
    modules: Vec<Arc<dyn Module>>,
    state: Mutex<RunState>,
}

impl Pipeline {
    /// Creates a pipeline with no modules.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_modules(name, Vec::new())
    }

    /// Creates a pipeline from a module list.
    pub fn with_modules(name: impl Into<String>, modules: Vec<Arc<dyn Module>>) -> Self {
        Self {
            name: name.into(),
            modules,
            state: Mutex::new(RunState {
                status: PipelineStatus::NotRun,
                output: None,
            }),
        }
    }

    /// Appends a module.
    #[must_use]
    pub fn with_module(mut self, module: impl Module + 'static) -> Self {
        self.modules.push(Arc::new(module));
        self
    }

    /// The pipeline's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The module list.
    #[must_use]
    pub fn modules(&self) -> &[Arc<dyn Module>] {
        &self.modules
    }

    /// Pipelines read by this pipeline's modules, or `None` if any module
    /// leaves its reads undeclared.
    #[must_use]
    pub fn dependencies(&self) -> Option<Vec<String>> {
        combined_dependencies(&self.modules)
    }

    /// Status after the most recent run.
    #[must_use]
    pub fn status(&self) -> PipelineStatus {
        self.state().status
    }

    /// Documents produced by the most recent successful run.
    #[must_use]
    pub fn last_output(&self) -> Option<Arc<[Document]>> {
        self.state().output.clone()
    }

    /// Runs the module chain from the engine's initial documents and
    /// publishes the result under this pipeline's name.
    ///
    /// Publishing happens only after the whole chain succeeded.
    pub(crate) fn run(
        &self,
        engine: &Engine,
        outputs: &PipelineOutputs,
        cancel: &CancellationToken,
    ) -> Result<Arc<[Document]>> {
        let ctx = ExecutionContext::new(engine, self, outputs, cancel);
        match ctx.execute(&self.modules, None) {
            Ok(docs) => {
                let docs: Arc<[Document]> = docs.into();
                outputs.publish(&self.name, Arc::clone(&docs));
                self.finish(PipelineStatus::Succeeded, Some(Arc::clone(&docs)));
                Ok(docs)
            }
            Err(err) => {
                let status = if err.is_cancelled() {
                    PipelineStatus::Cancelled
                } else {
                    PipelineStatus::Failed
                };
                self.finish(status, None);
                Err(err)
            }
        }
    }

    pub(crate) fn finish(&self, status: PipelineStatus, output: Option<Arc<[Document]>>) {
        let mut state = self.state();
        state.status = status;
        state.output = output;
    }

    fn state(&self) -> MutexGuard<'_, RunState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let modules: Vec<&str> = self.modules.iter().map(|m| m.name()).collect();
        f.debug_struct("Pipeline")
            .field("name", &self.name)
            .field("modules", &modules)
            .field("status", &self.status())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::FnModule;

    #[test]
    fn test_status_display() {
        assert_eq!(PipelineStatus::NotRun.to_string(), "not run");
        assert_eq!(PipelineStatus::Blocked.to_string(), "blocked");
    }

    #[test]
    fn test_dependencies_follow_modules() {
        let pipeline = Pipeline::new("p")
            .with_module(FnModule::new("a", |d, _| Ok(d)).reading(["x"]))
            .with_module(FnModule::new("b", |d, _| Ok(d)).reading(["y", "x"]));
        assert_eq!(pipeline.dependencies(), Some(vec!["x".to_string(), "y".to_string()]));

        let undeclared = Pipeline::new("q").with_module(FnModule::new("a", |d, _| Ok(d)));
        assert_eq!(undeclared.dependencies(), None);
    }

    #[test]
    fn test_finish_records_state() {
        let pipeline = Pipeline::new("p");
        pipeline.finish(PipelineStatus::Failed, None);
        assert_eq!(pipeline.status(), PipelineStatus::Failed);
        assert!(pipeline.last_output().is_none());
    }
}
