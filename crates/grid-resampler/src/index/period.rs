//! Augmented interval tree for period records.
//!
//! Nodes live in a flat arena and refer to their children by position.
//! The tree is built from intervals sorted by (start, end) by always
//! splitting at the midpoint, so it is balanced by construction. Every node
//! carries `max_end`, the latest end time anywhere in its subtree, which
//! lets an overlap search skip whole subtrees:
//!
//! ```text
//!                 [2,3) max_end=6
//!                /               \
//!       [1,2) max_end=2     [4,5) max_end=6
//!                           /          \
//!                  [3,4) max_end=4   [5,6) max_end=6
//! ```

use chrono::{DateTime, Utc};
use grid_common::TimeInterval;

#[derive(Debug, Clone)]
struct Node {
    interval: TimeInterval,
    record: usize,
    max_end: DateTime<Utc>,
    left: Option<usize>,
    right: Option<usize>,
}

/// Balanced interval tree answering overlap queries in O(log n + k).
#[derive(Debug, Clone, Default)]
pub struct PeriodTree {
    nodes: Vec<Node>,
    root: Option<usize>,
}

impl PeriodTree {
    /// Build a tree over `intervals`, where position `i` is record `i`.
    pub fn build(intervals: &[TimeInterval]) -> Self {
        let mut sorted: Vec<(TimeInterval, usize)> = intervals
            .iter()
            .enumerate()
            .map(|(record, interval)| (*interval, record))
            .collect();
        sorted.sort();

        let mut tree = Self {
            nodes: Vec::with_capacity(sorted.len()),
            root: None,
        };
        tree.root = tree.build_range(&sorted);
        tree
    }

    fn build_range(&mut self, sorted: &[(TimeInterval, usize)]) -> Option<usize> {
        if sorted.is_empty() {
            return None;
        }

        let mid = sorted.len() / 2;
        let left = self.build_range(&sorted[..mid]);
        let right = self.build_range(&sorted[mid + 1..]);

        let (interval, record) = sorted[mid];
        let mut max_end = interval.end();
        for child in [left, right].into_iter().flatten() {
            max_end = max_end.max(self.nodes[child].max_end);
        }

        self.nodes.push(Node {
            interval,
            record,
            max_end,
            left,
            right,
        });
        Some(self.nodes.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Records overlapping `target`, ordered by (start, end).
    pub fn find_overlaps(&self, target: &TimeInterval) -> Vec<usize> {
        let mut found = Vec::new();
        self.collect_overlaps(self.root, target, &mut found);
        found
    }

    fn collect_overlaps(&self, node: Option<usize>, target: &TimeInterval, found: &mut Vec<usize>) {
        let Some(id) = node else {
            return;
        };
        let node = &self.nodes[id];

        // Everything on the left ends by max_end; nothing there can reach past target.start.
        if let Some(left) = node.left {
            if self.nodes[left].max_end > target.start() {
                self.collect_overlaps(Some(left), target, found);
            }
        }

        if node.interval.overlaps(target) {
            found.push(node.record);
        }

        // Right subtree starts no earlier than this node.
        if node.interval.start() < target.end() {
            self.collect_overlaps(node.right, target, found);
        }
    }

    /// Records whose half-open interval contains `t`, ordered by (start, end).
    pub fn find_containing(&self, t: DateTime<Utc>) -> Vec<usize> {
        let mut found = Vec::new();
        self.collect_containing(self.root, t, &mut found);
        found
    }

    fn collect_containing(&self, node: Option<usize>, t: DateTime<Utc>, found: &mut Vec<usize>) {
        let Some(id) = node else {
            return;
        };
        let node = &self.nodes[id];

        if let Some(left) = node.left {
            if self.nodes[left].max_end > t {
                self.collect_containing(Some(left), t, found);
            }
        }

        if node.interval.contains(t) {
            found.push(node.record);
        }

        if node.interval.start() <= t {
            self.collect_containing(node.right, t, found);
        }
    }

    /// Record with the earliest start (leftmost node).
    pub fn find_minimum(&self) -> Option<(usize, TimeInterval)> {
        let mut id = self.root?;
        while let Some(left) = self.nodes[id].left {
            id = left;
        }
        let node = &self.nodes[id];
        Some((node.record, node.interval))
    }

    /// Record with the latest end, found by following `max_end` down.
    pub fn find_maximum(&self) -> Option<(usize, TimeInterval)> {
        let mut id = self.root?;
        loop {
            let node = &self.nodes[id];
            let target = node.max_end;
            let next = [node.right, node.left]
                .into_iter()
                .flatten()
                .find(|&child| self.nodes[child].max_end == target);

            match next {
                Some(child) if node.interval.end() != target => id = child,
                _ => return Some((node.record, node.interval)),
            }
        }
    }

    /// Depth of the tree (0 when empty).
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], node: Option<usize>) -> usize {
            match node {
                None => 0,
                Some(id) => 1 + walk(nodes, nodes[id].left).max(walk(nodes, nodes[id].right)),
            }
        }
        walk(&self.nodes, self.root)
    }
}
