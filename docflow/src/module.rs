//! The module contract.
//!
//! A module turns an ordered document sequence into another one. Modules
//! are shared between threads and may be executed many times, so all of
//! their state must be immutable or internally synchronized.

use std::sync::Arc;

use crate::context::ExecutionContext;
use crate::document::Document;
use crate::error::Result;

/// A transformation unit.
pub trait Module: Send + Sync {
    /// A short name used in traces and error reports.
    fn name(&self) -> &str;

    /// Transforms `inputs` into a new document sequence.
    ///
    /// Implementations may call [`ExecutionContext::execute`] to run nested
    /// module chains.
    ///
    /// # Errors
    ///
    /// Any error aborts the enclosing pipeline.
    fn execute(&self, inputs: Vec<Document>, ctx: &ExecutionContext<'_>) -> Result<Vec<Document>>;

    /// Names of pipelines whose output this module reads.
    ///
    /// `None` means the module does not declare its reads; the engine then
    /// assumes it may read any earlier pipeline.
    fn pipeline_dependencies(&self) -> Option<Vec<String>> {
        None
    }
}

/// Combines the declared reads of a module list.
///
/// Returns `None` as soon as any module leaves its reads undeclared.
#[must_use]
pub fn combined_dependencies(modules: &[Arc<dyn Module>]) -> Option<Vec<String>> {
    let mut names: Vec<String> = Vec::new();
    for module in modules {
        for name in module.pipeline_dependencies()? {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    Some(names)
}

/// A module backed by a closure.
///
/// Reads are undeclared until [`FnModule::reading`] or
/// [`FnModule::independent`] is called.
///
/// # Examples
///
/// ```
/// use docflow::{FnModule, Module};
///
/// let upper = FnModule::new("Upper", |docs, _ctx| Ok(docs)).independent();
/// assert_eq!(upper.name(), "Upper");
/// assert_eq!(upper.pipeline_dependencies(), Some(vec![]));
/// ```
pub struct FnModule<F> {
    name: String,
    dependencies: Option<Vec<String>>,
    f: F,
}

impl<F> FnModule<F>
where
    F: Fn(Vec<Document>, &ExecutionContext<'_>) -> Result<Vec<Document>> + Send + Sync,
{
    /// Wraps `f` as a module named `name`.
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            dependencies: None,
            f,
        }
    }

    /// Declares that the module reads the given pipelines.
    #[must_use]
    pub fn reading<I, S>(mut self, pipelines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let deps = self.dependencies.get_or_insert_with(Vec::new);
        deps.extend(pipelines.into_iter().map(Into::into));
        self
    }

    /// Declares that the module reads no pipeline output.
    #[must_use]
    pub fn independent(mut self) -> Self {
        self.dependencies.get_or_insert_with(Vec::new);
        self
    }
}

impl<F> Module for FnModule<F>
where
    F: Fn(Vec<Document>, &ExecutionContext<'_>) -> Result<Vec<Document>> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self, inputs: Vec<Document>, ctx: &ExecutionContext<'_>) -> Result<Vec<Document>> {
        (self.f)(inputs, ctx)
    }

    fn pipeline_dependencies(&self) -> Option<Vec<String>> {
        self.dependencies.clone()
    }
}
