//! The execution context handed to every module.

use std::sync::Arc;

use crate::cancel::CancellationToken;
use crate::document::Document;
use crate::engine::{Engine, PipelineOutputs};
use crate::error::{Error, Result};
use crate::logging::Trace;
use crate::module::Module;
use crate::path::NormalizedPath;
use crate::pipeline::Pipeline;

/// A module's view of the running engine.
///
/// A context is a cheap bundle of borrows plus the current nesting depth.
/// [`ExecutionContext::execute`] is re-entrant: modules call it to run
/// nested module chains over any document subset, and each call is
/// independent of every other call.
#[derive(Clone, Copy)]
pub struct ExecutionContext<'a> {
    engine: &'a Engine,
    pipeline: &'a Pipeline,
    outputs: &'a PipelineOutputs,
    cancel: &'a CancellationToken,
    depth: usize,
}

impl<'a> ExecutionContext<'a> {
    pub(crate) fn new(
        engine: &'a Engine,
        pipeline: &'a Pipeline,
        outputs: &'a PipelineOutputs,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self {
            engine,
            pipeline,
            outputs,
            cancel,
            depth: 0,
        }
    }

    /// The owning engine.
    #[must_use]
    pub fn engine(&self) -> &'a Engine {
        self.engine
    }

    /// The pipeline being run.
    #[must_use]
    pub fn pipeline(&self) -> &'a Pipeline {
        self.pipeline
    }

    /// The engine's root folder.
    #[must_use]
    pub fn root_folder(&self) -> &'a NormalizedPath {
        &self.engine.settings().root
    }

    /// The engine's input folder.
    #[must_use]
    pub fn input_folder(&self) -> &'a NormalizedPath {
        &self.engine.settings().input
    }

    /// The engine's output folder.
    #[must_use]
    pub fn output_folder(&self) -> &'a NormalizedPath {
        &self.engine.settings().output
    }

    /// The trace sink.
    #[must_use]
    pub fn trace(&self) -> &'a dyn Trace {
        self.engine.trace()
    }

    /// Outputs published so far in this run.
    ///
    /// The running pipeline and pipelines that have not finished read as
    /// absent.
    #[must_use]
    pub fn documents(&self) -> &'a PipelineOutputs {
        self.outputs
    }

    /// Nesting depth: `0` for the pipeline's own module list.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns true if the run was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Runs `modules` in order, feeding each module's output to the next.
    ///
    /// With `inputs` of `None` the chain starts from the engine's initial
    /// documents rather than any pipeline's current set. An empty module
    /// list returns the inputs unchanged.
    ///
    /// # Errors
    ///
    /// - [`Error::Cancelled`] if the run is cancelled between modules
    /// - [`Error::NestingDepthExceeded`] if called deeper than the configured
    ///   limit
    /// - [`Error::ModuleExecution`] wrapping any module failure with the
    ///   pipeline name, module name and position
    pub fn execute(
        &self,
        modules: &[Arc<dyn Module>],
        inputs: Option<Vec<Document>>,
    ) -> Result<Vec<Document>> {
        let limit = self.engine.settings().max_nesting_depth;
        if self.depth >= limit {
            return Err(Error::NestingDepthExceeded { limit });
        }

        let mut documents = match inputs {
            Some(docs) => docs,
            None => self.engine.initial_documents(),
        };

        let child = Self {
            depth: self.depth + 1,
            ..*self
        };
        for (position, module) in modules.iter().enumerate() {
            if self.cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            log::debug!(
                "pipeline '{}' depth {} running module '{}' on {} documents",
                self.pipeline.name(),
                self.depth,
                module.name(),
                documents.len()
            );
            documents = module.execute(documents, &child).map_err(|err| {
                if err.is_cancelled() {
                    Error::Cancelled
                } else {
                    Error::ModuleExecution {
                        pipeline: self.pipeline.name().to_string(),
                        module: module.name().to_string(),
                        position,
                        source: Box::new(err),
                    }
                }
            })?;
        }
        Ok(documents)
    }
}
