use petgraph::{algo::toposort, Graph};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::execution::error::{ExecutionError, Result};
use crate::types::{Future, Module};

/// Futures whose dependencies are all satisfied by earlier batches
pub type Batch = Vec<Arc<Future>>;

/// Group every future of the module tree into dependency-ordered batches.
///
/// Futures in one batch are independent of each other and may be executed
/// concurrently; within a batch they are ordered by id.
pub fn batch_futures(module: &Arc<Module>) -> Result<Vec<Batch>> {
    let futures = module.all_futures();

    let mut graph = Graph::<Arc<Future>, ()>::new();
    let mut node_map = HashMap::new();
    for future in &futures {
        let node = graph.add_node(Arc::clone(future));
        node_map.insert(future.id.clone(), node);
    }

    for future in &futures {
        let node = node_map[&future.id];
        for dependency in &future.dependencies {
            let dependency_node =
                node_map
                    .get(&dependency.id)
                    .ok_or_else(|| ExecutionError::MissingDependency {
                        future_id: future.id.clone(),
                        dependency: dependency.id.clone(),
                    })?;
            graph.add_edge(*dependency_node, node, ());
        }
    }

    let order = toposort(&graph, None).map_err(|cycle| ExecutionError::DependencyCycle {
        cycle: vec![graph[cycle.node_id()].id.clone()],
    })?;

    let mut depths = HashMap::new();
    let mut batches: Vec<Batch> = Vec::new();
    for node in order {
        let depth = graph
            .neighbors_directed(node, petgraph::Direction::Incoming)
            .map(|dependency| depths[&dependency] + 1)
            .max()
            .unwrap_or(0);
        depths.insert(node, depth);

        if batches.len() <= depth {
            batches.resize_with(depth + 1, Vec::new);
        }
        batches[depth].push(Arc::clone(&graph[node]));
    }

    for batch in &mut batches {
        batch.sort_by(|a, b| a.id.cmp(&b.id));
    }

    debug!(
        "Scheduled {} futures of {} in {} batches",
        futures.len(),
        module.id,
        batches.len()
    );
    Ok(batches)
}
