//! Dependency graph analysis.
//!
//! Edges point from a task to its prerequisites ("A depends on B" is the
//! edge `A -> B`). Two analyses run over the graph:
//!
//! - **Cycle detection**: depth-first search from every unvisited task,
//!   recording each back edge onto the active path as a closed cycle.
//! - **Impact**: breadth-first search over reversed edges, counting how
//!   many other tasks become unblocked (directly or transitively) once a
//!   task is finished.
//!
//! Iteration always follows input order, so results are deterministic for
//! a given batch.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::trace;

use crate::task::NormalizedTask;

/// Forward and reverse adjacency built from one batch of tasks.
#[derive(Debug, Clone)]
pub struct DependencyGraph<'a> {
    /// Distinct keys in first-seen order
    order: Vec<&'a str>,
    /// key -> prerequisites present in the batch
    forward: HashMap<&'a str, Vec<&'a str>>,
    /// prerequisite -> dependents
    reverse: HashMap<&'a str, Vec<&'a str>>,
    /// Number of records, duplicates included
    task_count: usize,
}

/// Cycles found in a graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleReport<'a> {
    /// Keys taking part in at least one cycle
    pub members: HashSet<&'a str>,
    /// Each cycle as a path closed by repeating its first key
    pub paths: Vec<Vec<&'a str>>,
}

impl CycleReport<'_> {
    pub fn contains(&self, key: &str) -> bool {
        self.members.contains(key)
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl<'a> DependencyGraph<'a> {
    /// Build the graph.
    ///
    /// When two records share a key the later record's prerequisite list
    /// replaces the earlier one in the forward graph; both still contribute
    /// reverse edges. Prerequisites naming unknown keys are dropped from the
    /// forward graph.
    pub fn build(tasks: &'a [NormalizedTask<'a>]) -> Self {
        let mut order = Vec::with_capacity(tasks.len());
        let mut raw_forward: HashMap<&'a str, &'a [String]> = HashMap::with_capacity(tasks.len());
        let mut reverse: HashMap<&'a str, Vec<&'a str>> = HashMap::new();

        for task in tasks {
            let key = task.key.as_str();
            if raw_forward.insert(key, task.dependencies).is_none() {
                order.push(key);
            }
            for dep in task.dependencies {
                reverse.entry(dep.as_str()).or_default().push(key);
            }
        }

        let forward: HashMap<&'a str, Vec<&'a str>> = raw_forward
            .iter()
            .map(|(&key, &deps)| {
                let known: Vec<&'a str> = deps
                    .iter()
                    .map(String::as_str)
                    .filter(|d| raw_forward.contains_key(d))
                    .collect();
                (key, known)
            })
            .collect();

        Self {
            order,
            forward,
            reverse,
            task_count: tasks.len(),
        }
    }

    /// Distinct keys in first-seen order.
    pub fn keys(&self) -> &[&'a str] {
        &self.order
    }

    pub fn task_count(&self) -> usize {
        self.task_count
    }

    pub fn contains(&self, key: &str) -> bool {
        self.forward.contains_key(key)
    }

    /// Known prerequisites of `key`.
    pub fn prerequisites(&self, key: &str) -> &[&'a str] {
        self.forward.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Tasks that list `key` as a prerequisite.
    pub fn dependents(&self, key: &str) -> &[&'a str] {
        self.reverse.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Find every cycle reachable by depth-first search.
    ///
    /// A back edge onto the active path closes a cycle; an edge into an
    /// already finished node is a converging path and records nothing.
    pub fn detect_cycles(&self) -> CycleReport<'a> {
        let mut report = CycleReport::default();
        let mut visited: HashSet<&'a str> = HashSet::with_capacity(self.order.len());
        let mut on_stack: HashSet<&'a str> = HashSet::new();
        let mut path: Vec<&'a str> = Vec::new();
        // (node, index of the next prerequisite to explore)
        let mut frames: Vec<(&'a str, usize)> = Vec::new();

        for &root in &self.order {
            if visited.contains(root) {
                continue;
            }
            visited.insert(root);
            on_stack.insert(root);
            path.push(root);
            frames.push((root, 0));

            while let Some(frame) = frames.last_mut() {
                let (node, next) = *frame;
                let prereqs = self.prerequisites(node);

                let Some(&dep) = prereqs.get(next) else {
                    frames.pop();
                    path.pop();
                    on_stack.remove(node);
                    continue;
                };
                frame.1 += 1;

                if on_stack.contains(dep) {
                    let start = path.iter().position(|&k| k == dep).unwrap_or(0);
                    let mut cycle = path[start..].to_vec();
                    cycle.push(dep);
                    trace!(cycle = ?cycle, "dependency cycle");
                    report.members.extend(cycle.iter().copied());
                    report.paths.push(cycle);
                } else if visited.insert(dep) {
                    on_stack.insert(dep);
                    path.push(dep);
                    frames.push((dep, 0));
                }
            }
        }

        report
    }

    /// Number of distinct tasks transitively unlocked by finishing `key`,
    /// excluding `key` itself.
    pub fn unlock_count(&self, key: &str) -> usize {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = self.dependents(key).iter().copied().collect();

        while let Some(current) = queue.pop_front() {
            if !seen.insert(current) {
                continue;
            }
            queue.extend(self.dependents(current).iter().copied());
        }

        seen.remove(key);
        seen.len()
    }

    /// Impact score per key: unlock count over `max(1, task_count - 1)`.
    pub fn impact_scores(&self) -> HashMap<&'a str, f64> {
        let denom = self.task_count.saturating_sub(1).max(1) as f64;
        self.order
            .iter()
            .map(|&key| (key, (self.unlock_count(key) as f64 / denom).min(1.0)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::normalize::normalize_all;
    use crate::task::TaskRecord;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    fn records(edges: &[(&str, &[&str])]) -> Vec<TaskRecord> {
        edges
            .iter()
            .map(|(id, deps)| {
                TaskRecord::new(id.to_uppercase())
                    .with_id(*id)
                    .with_dependencies(deps.iter().copied())
            })
            .collect()
    }

    #[test]
    fn test_pure_cycle_flags_every_member() {
        let recs = records(&[("a", &["b"]), ("b", &["c"]), ("c", &["a"])]);
        let tasks = normalize_all(&recs, day());
        let graph = DependencyGraph::build(&tasks);
        let report = graph.detect_cycles();

        assert_eq!(report.paths, vec![vec!["a", "b", "c", "a"]]);
        for key in ["a", "b", "c"] {
            assert!(report.contains(key));
        }
    }

    #[test]
    fn test_converging_paths_are_not_cycles() {
        // d depends on b and c, both of which depend on a
        let recs = records(&[("a", &[]), ("b", &["a"]), ("c", &["a"]), ("d", &["b", "c"])]);
        let tasks = normalize_all(&recs, day());
        let graph = DependencyGraph::build(&tasks);
        assert!(graph.detect_cycles().is_empty());
    }

    #[test]
    fn test_self_loop() {
        let recs = records(&[("a", &["a"]), ("b", &[])]);
        let tasks = normalize_all(&recs, day());
        let graph = DependencyGraph::build(&tasks);
        let report = graph.detect_cycles();
        assert_eq!(report.paths, vec![vec!["a", "a"]]);
        assert!(!report.contains("b"));
        assert_eq!(graph.impact_scores()["a"], 0.0);
    }

    #[test]
    fn test_two_independent_cycles_and_a_tail() {
        let recs = records(&[
            ("a", &["b"]),
            ("b", &["a"]),
            ("c", &["d"]),
            ("d", &["c"]),
            ("e", &["a"]),
        ]);
        let tasks = normalize_all(&recs, day());
        let graph = DependencyGraph::build(&tasks);
        let report = graph.detect_cycles();
        assert_eq!(report.paths.len(), 2);
        assert!(report.contains("d"));
        assert!(!report.contains("e"));
    }

    #[test]
    fn test_dangling_dependencies_are_ignored() {
        let recs = records(&[("a", &["ghost"]), ("b", &["a", "phantom"])]);
        let tasks = normalize_all(&recs, day());
        let graph = DependencyGraph::build(&tasks);
        assert_eq!(graph.prerequisites("a"), &[] as &[&str]);
        assert_eq!(graph.prerequisites("b"), &["a"]);
        assert!(!graph.contains("ghost"));
        assert!(graph.detect_cycles().is_empty());
    }

    #[test]
    fn test_impact_of_chain_root_is_one() {
        // c -> b -> a: finishing a unlocks b and c
        let recs = records(&[("a", &[]), ("b", &["a"]), ("c", &["b"])]);
        let tasks = normalize_all(&recs, day());
        let graph = DependencyGraph::build(&tasks);
        let scores = graph.impact_scores();
        assert_eq!(scores["a"], 1.0);
        assert_eq!(scores["b"], 0.5);
        assert_eq!(scores["c"], 0.0);
    }

    #[test]
    fn test_impact_inside_cycle_excludes_self() {
        let recs = records(&[("a", &["b"]), ("b", &["c"]), ("c", &["a"])]);
        let tasks = normalize_all(&recs, day());
        let graph = DependencyGraph::build(&tasks);
        for score in graph.impact_scores().values() {
            assert_eq!(*score, 1.0);
        }
    }

    #[test]
    fn test_single_task_impact_is_zero() {
        let recs = records(&[("solo", &[])]);
        let tasks = normalize_all(&recs, day());
        let graph = DependencyGraph::build(&tasks);
        assert_eq!(graph.impact_scores()["solo"], 0.0);
    }

    #[test]
    fn test_long_chain_does_not_recurse() {
        let ids: Vec<String> = (0..20_000).map(|i| format!("t{i}")).collect();
        let recs: Vec<TaskRecord> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let deps: Vec<String> = if i + 1 < ids.len() { vec![ids[i + 1].clone()] } else { vec![] };
                TaskRecord::new(id.clone()).with_id(id.clone()).with_dependencies(deps)
            })
            .collect();
        let tasks = normalize_all(&recs, day());
        let graph = DependencyGraph::build(&tasks);
        assert!(graph.detect_cycles().is_empty());
    }
}
