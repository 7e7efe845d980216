//! Error types for the docflow engine.
//!
//! This module provides the error hierarchy for path construction, document
//! content access, module execution and engine orchestration, using
//! `thiserror` for ergonomic error handling.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with a docflow error.
///
/// # Examples
///
/// ```
/// use docflow::{Error, Result};
///
/// fn example_operation() -> Result<usize> {
///     Ok(3)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the docflow engine.
#[derive(Debug, Error)]
pub enum Error {
    /// A path literal was empty or otherwise unusable.
    #[error("invalid path '{path}': {reason}")]
    InvalidPath {
        /// The offending literal.
        path: String,
        /// The reason the path is invalid.
        reason: String,
    },

    /// A provider was supplied for a relative path.
    #[error("provider '{provider}' is not allowed on relative path '{path}'")]
    InvalidProvider {
        /// The provider that was supplied.
        provider: String,
        /// The relative path it was attached to.
        path: String,
    },

    /// The backing content of a document could not be read.
    #[error("content unavailable at {}: {source}", source_path.display())]
    ContentUnavailable {
        /// The location of the backing content.
        source_path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A module failed while executing inside a pipeline.
    #[error("module '{module}' (position {position}) in pipeline '{pipeline}' failed: {source}")]
    ModuleExecution {
        /// The pipeline the module was running in.
        pipeline: String,
        /// The name of the failing module.
        module: String,
        /// Zero-based position of the module in its module list.
        position: usize,
        /// The underlying failure.
        #[source]
        source: Box<Error>,
    },

    /// Pipelines depend on each other in a cycle.
    #[error("cyclic pipeline dependency: {}", cycle.join(" -> "))]
    CyclicDependency {
        /// The pipeline names forming the cycle, first name repeated last.
        cycle: Vec<String>,
    },

    /// Nested execution went deeper than the configured limit.
    #[error("maximum nesting depth of {limit} exceeded")]
    NestingDepthExceeded {
        /// The configured limit.
        limit: usize,
    },

    /// A module reported a failure of its own.
    #[error("{message}{}", document.as_ref().map(|d| format!(" (document {d})")).unwrap_or_default())]
    Module {
        /// Description of the failure.
        message: String,
        /// Path of the document being processed, if known.
        document: Option<String>,
    },

    /// The run was cancelled before this work completed.
    #[error("execution cancelled")]
    Cancelled,

    /// A pipeline with the same name is already registered.
    #[error("duplicate pipeline name '{name}'")]
    DuplicatePipeline {
        /// The duplicated name.
        name: String,
    },

    /// The worker threads for a run could not be started.
    #[error("failed to start worker pool: {message}")]
    WorkerPool {
        /// The thread-pool builder's description of the failure.
        message: String,
    },

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// A configuration file could not be parsed.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One frame of a module failure: where in which pipeline it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleFrame {
    /// Pipeline name.
    pub pipeline: String,
    /// Module name.
    pub module: String,
    /// Position within the module list at that nesting level.
    pub position: usize,
}

impl Error {
    /// Creates a module-specific failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use docflow::Error;
    ///
    /// let err = Error::module("template not found");
    /// assert_eq!(err.to_string(), "template not found");
    /// ```
    pub fn module(message: impl Into<String>) -> Self {
        Self::Module {
            message: message.into(),
            document: None,
        }
    }

    /// Creates a module-specific failure tied to a document.
    pub fn module_for(document: impl std::fmt::Display, message: impl Into<String>) -> Self {
        Self::Module {
            message: message.into(),
            document: Some(document.to_string()),
        }
    }

    /// Check if the error (or the failure it wraps) is a cancellation.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self.root_cause(), Self::Cancelled)
    }

    /// Returns the innermost error, skipping `ModuleExecution` wrappers.
    #[must_use]
    pub fn root_cause(&self) -> &Error {
        let mut current = self;
        while let Self::ModuleExecution { source, .. } = current {
            current = source;
        }
        current
    }

    /// Lists the module frames a failure travelled through, outermost first.
    ///
    /// Nested `execute` calls wrap failures once per level, so a failure
    /// three composites deep yields three frames.
    #[must_use]
    pub fn module_trail(&self) -> Vec<ModuleFrame> {
        let mut frames = Vec::new();
        let mut current = self;
        while let Self::ModuleExecution {
            pipeline,
            module,
            position,
            source,
        } = current
        {
            frames.push(ModuleFrame {
                pipeline: pipeline.clone(),
                module: module.clone(),
                position: *position,
            });
            current = source;
        }
        frames
    }

    /// One-line description of a pipeline failure for the trace sink.
    pub(crate) fn pipeline_failure(&self, pipeline: &str) -> String {
        let mut message = format!("pipeline '{pipeline}' failed: {self}");
        if let Some(frame) = self.module_trail().last() {
            message.push_str(&format!(
                " [innermost: module '{}' at position {}]",
                frame.module, frame.position
            ));
        }
        message
    }
}
