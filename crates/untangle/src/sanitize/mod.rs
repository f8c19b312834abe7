//! Task-graph sanitization and cycle detection.
//!
//! [`sanitize`] takes one extraction batch and returns a corrected copy plus
//! the list of cycles it found:
//!
//! 1. **Existence filter**: dependency IDs that name no task in the batch are
//!    dropped, preserving the relative order of the rest.
//! 2. **Graph construction**: one node per task ID, one edge `t -> d` per
//!    surviving dependency. Self-loops are kept.
//! 3. **Cycle search**: depth-first from every unvisited node in input order.
//!    Each back-edge yields one [`Cycle`].
//! 4. **Status rewrite**: every task whose ID appears in a cycle becomes
//!    [`TaskStatus::Blocked`]. Nothing else changes status.
//!
//! Dangling references and cycles are expected in extractor output and are
//! never errors. Cyclic edges are reported but not removed, so sanitizing an
//! already-sanitized batch reports the same cycles again.
//!
//! # Duplicate IDs
//!
//! IDs are expected to be unique. If they are not, the first record carrying
//! an ID owns its graph node, later records' dependencies become edges of that
//! node, and every record carrying a cyclic ID is blocked. Use
//! [`sanitize_strict`] to reject duplicates instead.
//!
//! # Example
//!
//! ```
//! use untangle::domain::{TaskId, TaskRecord, TaskStatus};
//! use untangle::sanitize::sanitize;
//!
//! let report = sanitize(vec![
//!     TaskRecord::new("a", ["b", "ghost"]),
//!     TaskRecord::new("b", ["a"]),
//! ]);
//!
//! assert_eq!(report.tasks[0].dependencies, vec![TaskId::from("b")]);
//! assert_eq!(report.cycles.len(), 1);
//! assert!(report.tasks.iter().all(|t| t.status == TaskStatus::Blocked));
//! ```

mod graph;

use crate::domain::{Cycle, SanitizeReport, TaskId, TaskRecord, TaskStatus};
use crate::error::{Error, Result};
use graph::TaskGraph;
use std::collections::{HashMap, HashSet};

/// Sanitize one batch of tasks.
///
/// The returned tasks have the same length, order and ID set as the input.
/// Only `dependencies` and `status` may differ.
pub fn sanitize(mut tasks: Vec<TaskRecord>) -> SanitizeReport {
    let dropped = drop_dangling(&mut tasks);

    let graph = TaskGraph::build(&tasks);
    let cycles = graph.find_cycles();

    let blocked = block_cycle_members(&mut tasks, &cycles);

    tracing::debug!(
        tasks = tasks.len(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        dropped,
        cycles = cycles.len(),
        blocked,
        "Sanitized task batch"
    );

    SanitizeReport { tasks, cycles }
}

/// Sanitize one batch after checking the record-shape preconditions.
///
/// # Errors
///
/// - `Error::MalformedRecord` if a record has an empty or blank ID
/// - `Error::DuplicateId` if two records share an ID
pub fn sanitize_strict(tasks: Vec<TaskRecord>) -> Result<SanitizeReport> {
    check_ids(&tasks)?;
    Ok(sanitize(tasks))
}

/// Find the cycles of a batch without modifying it.
///
/// Dependencies naming unknown tasks are ignored, so the result equals the
/// `cycles` of [`sanitize`] on the same input.
pub fn find_cycles(tasks: &[TaskRecord]) -> Vec<Cycle> {
    TaskGraph::build(tasks).find_cycles()
}

/// Verify that every record has a non-blank, unique ID.
///
/// # Errors
///
/// Returns the first violation in input order.
pub fn check_ids(tasks: &[TaskRecord]) -> Result<()> {
    let mut seen: HashMap<&TaskId, usize> = HashMap::with_capacity(tasks.len());
    for (index, task) in tasks.iter().enumerate() {
        if task.id.as_str().trim().is_empty() {
            return Err(Error::MalformedRecord {
                index,
                reason: "id is empty".to_string(),
            });
        }
        if let Some(&first) = seen.get(&task.id) {
            return Err(Error::DuplicateId {
                id: task.id.to_string(),
                first,
                index,
            });
        }
        seen.insert(&task.id, index);
    }
    Ok(())
}

/// Remove duplicate cycles, keeping the first occurrence of each.
///
/// Two cycles are duplicates when they describe the same closed walk starting
/// at different points, e.g. `[a, b, a]` and `[b, a, b]`. This is an optional
/// post-processing step; [`sanitize`] reports every back-edge as found.
pub fn dedup_cycles(cycles: Vec<Cycle>) -> Vec<Cycle> {
    let mut seen = HashSet::with_capacity(cycles.len());
    cycles
        .into_iter()
        .filter(|cycle| seen.insert(canonical_rotation(cycle)))
        .collect()
}

/// The open walk of a cycle, rotated to start at its smallest ID.
fn canonical_rotation(cycle: &Cycle) -> Vec<TaskId> {
    let ids = cycle.ids();
    let open = &ids[..ids.len().saturating_sub(1)];
    let Some(start) = open
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.cmp(b))
        .map(|(i, _)| i)
    else {
        return Vec::new();
    };
    open[start..].iter().chain(&open[..start]).cloned().collect()
}

/// Step 1: drop dependency entries that name no task in the batch.
///
/// Returns the number of entries dropped.
fn drop_dangling(tasks: &mut [TaskRecord]) -> usize {
    let present: HashSet<TaskId> = tasks.iter().map(|t| t.id.clone()).collect();
    let mut dropped = 0;

    for task in tasks.iter_mut() {
        let before = task.dependencies.len();
        task.dependencies.retain(|dep| present.contains(dep));
        let removed = before - task.dependencies.len();
        if removed > 0 {
            tracing::debug!(task = %task.id, removed, "Dropped dangling dependencies");
            dropped += removed;
        }
    }

    dropped
}

/// Step 4: block every task that appears in a cycle.
///
/// Returns the number of records whose status changed.
fn block_cycle_members(tasks: &mut [TaskRecord], cycles: &[Cycle]) -> usize {
    let members: HashSet<&TaskId> = cycles.iter().flat_map(Cycle::ids).collect();
    let mut changed = 0;

    for task in tasks.iter_mut() {
        if members.contains(&task.id) && task.status != TaskStatus::Blocked {
            task.status = TaskStatus::Blocked;
            changed += 1;
        }
    }

    changed
}
