#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # docflow
//!
//! A content-transformation engine: input documents flow through named
//! pipelines of modules, and each pipeline publishes an immutable document
//! set that later pipelines may read.
//!
//! ## Core Types
//!
//! - [`NormalizedPath`] and [`Provider`]: virtual, provider-qualified paths
//! - [`Document`], [`Metadata`] and [`Content`]: immutable documents
//! - [`Module`] and [`ExecutionContext`]: the transformation contract and
//!   the re-entrant `execute` operation
//! - [`Pipeline`] and [`Engine`]: named module chains and their orchestration
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`], [`LogLevel`] and [`Trace`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use docflow::{Document, Engine, FnModule, FromPipeline, NormalizedPath, Pipeline};
//!
//! let mut engine = Engine::default();
//! engine.set_initial_documents(vec![
//!     Document::new(NormalizedPath::file("a.md").unwrap(), "alpha"),
//!     Document::new(NormalizedPath::file("b.md").unwrap(), "beta"),
//! ]);
//!
//! engine
//!     .add_pipeline(Pipeline::new("posts").with_module(
//!         FnModule::new("Tag", |docs, _ctx| {
//!             Ok(docs.iter().map(|d| d.with_metadata([("Kind", "post")])).collect())
//!         })
//!         .independent(),
//!     ))
//!     .unwrap();
//! engine
//!     .add_pipeline(Pipeline::new("index").with_module(FromPipeline::new(["posts"])))
//!     .unwrap();
//!
//! let report = engine.run().unwrap();
//! assert!(report.is_success());
//!
//! let index = engine.pipeline("index").unwrap().last_output().unwrap();
//! assert_eq!(index.len(), 2);
//! assert_eq!(index[0].metadata().get_text("Kind"), Some("post"));
//! ```

pub mod cancel;
pub mod config;
pub mod context;
pub mod control;
pub mod document;
pub mod engine;
pub mod error;
pub mod logging;
pub mod metadata;
pub mod module;
pub mod path;
pub mod pipeline;

// Re-export key types at crate root for convenience
pub use cancel::CancellationToken;
pub use config::{Config, ConfigBuilder, EngineSettings, FailurePolicy};
pub use context::ExecutionContext;
pub use control::{Branch, Concat, ForEach, FromPipeline, Fresh};
pub use document::{Content, Document};
pub use engine::{
    Engine, PipelineOutputs, PipelineReport, RunCompleted, RunOutcome, RunReport,
    RELATIVE_PATH_KEY, SOURCE_FILE_KEY,
};
pub use error::{Error, ModuleFrame, Result};
pub use logging::{init_logger, LogLevel, Logger, Trace};
pub use metadata::{MetaValue, Metadata};
pub use module::{FnModule, Module};
pub use path::{split_provider, NormalizedPath, PathKind, PathType, Provider};
pub use pipeline::{Pipeline, PipelineStatus};
