//! Dependency analysis and wave planning for pipelines.
//!
//! A pipeline depends on the pipelines its modules declare they read. A
//! pipeline with any undeclared module depends on every pipeline declared
//! before it. Pipelines are grouped into waves: every dependency of a
//! pipeline lives in an earlier wave, so a wave can run concurrently.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::logging::Trace;
use crate::pipeline::Pipeline;

/// The execution plan for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Schedule {
    /// Pipeline indices per wave, in declaration order within a wave.
    pub waves: Vec<Vec<usize>>,
    /// Dependency indices per pipeline.
    pub dependencies: Vec<Vec<usize>>,
}

/// Builds the schedule for `pipelines`.
///
/// With `parallel` off every wave holds exactly one pipeline and the
/// pipelines run one at a time in dependency order.
///
/// # Errors
///
/// Returns [`Error::CyclicDependency`] if the declared reads form a cycle.
pub(crate) fn plan(pipelines: &[Pipeline], parallel: bool, trace: &dyn Trace) -> Result<Schedule> {
    let dependencies = resolve_dependencies(pipelines, trace);
    if let Some(cycle) = find_cycle(&dependencies) {
        return Err(Error::CyclicDependency {
            cycle: cycle
                .into_iter()
                .map(|idx| pipelines[idx].name().to_string())
                .collect(),
        });
    }

    let levels = levels(&dependencies);
    let depth = levels.iter().copied().max().map_or(0, |max| max + 1);
    let mut waves: Vec<Vec<usize>> = vec![Vec::new(); depth];
    for (idx, level) in levels.iter().enumerate() {
        waves[*level].push(idx);
    }

    if !parallel {
        waves = waves
            .into_iter()
            .flatten()
            .map(|idx| vec![idx])
            .collect();
    }

    log::debug!("pipeline schedule: {waves:?}");
    Ok(Schedule {
        waves,
        dependencies,
    })
}

fn resolve_dependencies(pipelines: &[Pipeline], trace: &dyn Trace) -> Vec<Vec<usize>> {
    let index: HashMap<&str, usize> = pipelines
        .iter()
        .enumerate()
        .map(|(idx, p)| (p.name(), idx))
        .collect();

    pipelines
        .iter()
        .enumerate()
        .map(|(idx, pipeline)| {
            let Some(names) = pipeline.dependencies() else {
                return (0..idx).collect();
            };
            let mut deps = Vec::new();
            for name in names {
                match index.get(name.as_str()) {
                    Some(&dep) if dep == idx => trace.warn(&format!(
                        "pipeline '{}' reads its own output, which is never available during its run",
                        pipeline.name()
                    )),
                    Some(&dep) => {
                        if !deps.contains(&dep) {
                            deps.push(dep);
                        }
                    }
                    None => trace.warn(&format!(
                        "pipeline '{}' reads unknown pipeline '{name}'",
                        pipeline.name()
                    )),
                }
            }
            deps
        })
        .collect()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Returns a cycle as a list of indices with the first index repeated last.
fn find_cycle(dependencies: &[Vec<usize>]) -> Option<Vec<usize>> {
    fn visit(
        node: usize,
        dependencies: &[Vec<usize>],
        marks: &mut [Mark],
        stack: &mut Vec<usize>,
    ) -> Option<Vec<usize>> {
        marks[node] = Mark::InProgress;
        stack.push(node);
        for &dep in &dependencies[node] {
            match marks[dep] {
                Mark::InProgress => {
                    let start = stack.iter().position(|&n| n == dep).unwrap_or(0);
                    let mut cycle = stack[start..].to_vec();
                    cycle.push(dep);
                    return Some(cycle);
                }
                Mark::Unvisited => {
                    if let Some(cycle) = visit(dep, dependencies, marks, stack) {
                        return Some(cycle);
                    }
                }
                Mark::Done => {}
            }
        }
        stack.pop();
        marks[node] = Mark::Done;
        None
    }

    let mut marks = vec![Mark::Unvisited; dependencies.len()];
    let mut stack = Vec::new();
    (0..dependencies.len()).find_map(|node| {
        if marks[node] == Mark::Unvisited {
            visit(node, dependencies, &mut marks, &mut stack)
        } else {
            None
        }
    })
}

/// Longest dependency chain below each node. Requires an acyclic graph.
fn levels(dependencies: &[Vec<usize>]) -> Vec<usize> {
    fn level_of(node: usize, dependencies: &[Vec<usize>], memo: &mut [Option<usize>]) -> usize {
        if let Some(level) = memo[node] {
            return level;
        }
        let level = dependencies[node]
            .iter()
            .map(|&dep| level_of(dep, dependencies, memo) + 1)
            .max()
            .unwrap_or(0);
        memo[node] = Some(level);
        level
    }

    let mut memo = vec![None; dependencies.len()];
    (0..dependencies.len())
        .map(|node| level_of(node, dependencies, &mut memo))
        .collect()
}
