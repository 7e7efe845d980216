//! Control-flow modules.
//!
//! Each of these is an ordinary [`Module`] whose body runs one or more
//! nested module chains through [`ExecutionContext::execute`] and assembles
//! the results into its own output.

use std::sync::Arc;

use rayon::prelude::*;

use crate::context::ExecutionContext;
use crate::document::Document;
use crate::error::Result;
use crate::module::{combined_dependencies, Module};

/// Runs a sub-chain once per input document and concatenates the results.
///
/// With [`ForEach::parallel`] the documents are spread across the engine's
/// `rayon` pool; output order still follows input order.
pub struct ForEach {
    modules: Vec<Arc<dyn Module>>,
    parallel: bool,
}

impl ForEach {
    /// Creates a sequential `ForEach` over `modules`.
    #[must_use]
    pub fn new(modules: Vec<Arc<dyn Module>>) -> Self {
        Self {
            modules,
            parallel: false,
        }
    }

    /// Processes documents concurrently.
    #[must_use]
    pub fn parallel(mut self) -> Self {
        self.parallel = true;
        self
    }
}

impl Module for ForEach {
    fn name(&self) -> &str {
        "ForEach"
    }

    fn execute(&self, inputs: Vec<Document>, ctx: &ExecutionContext<'_>) -> Result<Vec<Document>> {
        let results: Vec<Result<Vec<Document>>> = if self.parallel {
            inputs
                .par_iter()
                .map(|doc| ctx.execute(&self.modules, Some(vec![doc.clone()])))
                .collect()
        } else {
            inputs
                .into_iter()
                .map(|doc| ctx.execute(&self.modules, Some(vec![doc])))
                .collect()
        };

        let mut output = Vec::new();
        for result in results {
            output.extend(result?);
        }
        Ok(output)
    }

    fn pipeline_dependencies(&self) -> Option<Vec<String>> {
        combined_dependencies(&self.modules)
    }
}

/// Appends the output of a sub-chain, run over the inputs, to the inputs.
pub struct Concat {
    modules: Vec<Arc<dyn Module>>,
}

impl Concat {
    /// Creates a `Concat` over `modules`.
    #[must_use]
    pub fn new(modules: Vec<Arc<dyn Module>>) -> Self {
        Self { modules }
    }
}

impl Module for Concat {
    fn name(&self) -> &str {
        "Concat"
    }

    fn execute(&self, inputs: Vec<Document>, ctx: &ExecutionContext<'_>) -> Result<Vec<Document>> {
        let extra = ctx.execute(&self.modules, Some(inputs.clone()))?;
        let mut output = inputs;
        output.extend(extra);
        Ok(output)
    }

    fn pipeline_dependencies(&self) -> Option<Vec<String>> {
        combined_dependencies(&self.modules)
    }
}

/// Runs a sub-chain over the inputs and passes the inputs through.
///
/// The sub-chain's output is discarded; its failures are not.
pub struct Branch {
    modules: Vec<Arc<dyn Module>>,
}

impl Branch {
    /// Creates a `Branch` over `modules`.
    #[must_use]
    pub fn new(modules: Vec<Arc<dyn Module>>) -> Self {
        Self { modules }
    }
}

impl Module for Branch {
    fn name(&self) -> &str {
        "Branch"
    }

    fn execute(&self, inputs: Vec<Document>, ctx: &ExecutionContext<'_>) -> Result<Vec<Document>> {
        ctx.execute(&self.modules, Some(inputs.clone()))?;
        Ok(inputs)
    }

    fn pipeline_dependencies(&self) -> Option<Vec<String>> {
        combined_dependencies(&self.modules)
    }
}

/// Emits the documents other pipelines published, replacing the inputs.
///
/// Pipelines that have not published read as empty.
pub struct FromPipeline {
    pipelines: Vec<String>,
}

impl FromPipeline {
    /// Reads the given pipelines, in order.
    pub fn new<I, S>(pipelines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pipelines: pipelines.into_iter().map(Into::into).collect(),
        }
    }
}

impl Module for FromPipeline {
    fn name(&self) -> &str {
        "FromPipeline"
    }

    fn execute(&self, _inputs: Vec<Document>, ctx: &ExecutionContext<'_>) -> Result<Vec<Document>> {
        let mut output = Vec::new();
        for name in &self.pipelines {
            match ctx.documents().get(name) {
                Some(docs) => output.extend_from_slice(docs),
                None => ctx
                    .trace()
                    .warn(&format!("no published documents for pipeline '{name}'")),
            }
        }
        Ok(output)
    }

    fn pipeline_dependencies(&self) -> Option<Vec<String>> {
        Some(self.pipelines.clone())
    }
}

/// Runs a sub-chain from the engine's initial documents, ignoring the inputs.
pub struct Fresh {
    modules: Vec<Arc<dyn Module>>,
}

impl Fresh {
    /// Creates a `Fresh` over `modules`.
    #[must_use]
    pub fn new(modules: Vec<Arc<dyn Module>>) -> Self {
        Self { modules }
    }
}

impl Module for Fresh {
    fn name(&self) -> &str {
        "Fresh"
    }

    fn execute(&self, _inputs: Vec<Document>, ctx: &ExecutionContext<'_>) -> Result<Vec<Document>> {
        ctx.execute(&self.modules, None)
    }

    fn pipeline_dependencies(&self) -> Option<Vec<String>> {
        combined_dependencies(&self.modules)
    }
}
