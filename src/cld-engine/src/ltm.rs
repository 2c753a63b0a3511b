// Copyright 2025 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Feedback loop detection and classification for causal loop diagrams.

use std::collections::{HashMap, HashSet};

use smallvec::SmallVec;

use crate::datamodel::{Link, LinkPolarity};
use crate::model::Model;

/// Loop polarity (Reinforcing or Balancing)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopPolarity {
    Reinforcing, // R loop - even number of negative links
    Balancing,   // B loop - odd number of negative links
    Unknown,     // a cycle edge has no backing link
}

/// Represents a feedback loop.  Derived on demand from the model; never
/// stored or mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Loop {
    pub id: String,
    /// The cycle's node ids in order, smallest-indexed node first; the edge
    /// from the last node back to the first is implicit.
    pub nodes: Vec<String>,
    pub polarity: LoopPolarity,
}

impl Loop {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Format the loop as a string showing the variable path
    pub fn format_path(&self) -> String {
        if self.nodes.is_empty() {
            return String::new();
        }

        let mut path: Vec<&str> = self.nodes.iter().map(|n| n.as_str()).collect();
        path.push(path[0]);
        path.join(" -> ")
    }
}

/// Graph representation for loop detection: node indices in insertion
/// order, adjacency in link insertion order.  Index order is what makes
/// enumeration (and therefore loop ids) deterministic.
pub struct CausalGraph {
    node_ids: Vec<String>,
    edges: Vec<SmallVec<[usize; 4]>>,
}

/// One in-progress DFS vertex: which neighbor to try next, and whether a
/// cycle closed anywhere at or below it.
struct Frame {
    node: usize,
    next: usize,
    closed: bool,
}

impl CausalGraph {
    pub fn from_model(model: &Model) -> CausalGraph {
        let index: HashMap<&str, usize> = model
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.as_str(), i))
            .collect();

        let mut edges: Vec<SmallVec<[usize; 4]>> = vec![SmallVec::new(); model.nodes.len()];
        for link in &model.links {
            // links with missing endpoints can't exist through the model
            // API; skip them rather than panic if one sneaks in
            let (Some(&from), Some(&to)) =
                (index.get(link.from.as_str()), index.get(link.to.as_str()))
            else {
                continue;
            };
            edges[from].push(to);
        }

        CausalGraph {
            node_ids: model.nodes.iter().map(|n| n.id.clone()).collect(),
            edges,
        }
    }

    /// Find all elementary circuits using Johnson's algorithm, with the
    /// recursion replaced by an explicit frame stack so pathological graphs
    /// can't exhaust the call stack.  Exponential in the worst case, which
    /// is inherent to simple-cycle enumeration and fine at diagram scale.
    pub fn find_cycles(&self) -> Vec<Vec<usize>> {
        let n = self.edges.len();
        let mut cycles: Vec<Vec<usize>> = Vec::new();

        for start in 0..n {
            // each pass explores the subgraph of nodes at or after `start`,
            // so every cycle is discovered rooted at its smallest index
            let mut blocked = vec![false; n];
            let mut b_sets: Vec<SmallVec<[usize; 4]>> = vec![SmallVec::new(); n];
            let mut path: Vec<usize> = vec![start];
            let mut stack: Vec<Frame> = vec![Frame {
                node: start,
                next: 0,
                closed: false,
            }];
            blocked[start] = true;

            while let Some(frame) = stack.last_mut() {
                let v = frame.node;
                if frame.next < self.edges[v].len() {
                    let w = self.edges[v][frame.next];
                    frame.next += 1;
                    if w < start {
                        continue;
                    }
                    if w == start {
                        // a length-1 path back to start would be a self
                        // link, which the model rejects
                        if path.len() > 1 {
                            cycles.push(path.clone());
                            frame.closed = true;
                        }
                    } else if !blocked[w] {
                        blocked[w] = true;
                        path.push(w);
                        stack.push(Frame {
                            node: w,
                            next: 0,
                            closed: false,
                        });
                    }
                } else {
                    let closed = frame.closed;
                    stack.pop();
                    path.pop();
                    if closed {
                        unblock(v, &mut blocked, &mut b_sets);
                    } else {
                        // v stays blocked until some neighbor on a future
                        // cycle unblocks it
                        for &w in &self.edges[v] {
                            if w < start {
                                continue;
                            }
                            if !b_sets[w].contains(&v) {
                                b_sets[w].push(v);
                            }
                        }
                    }
                    if let Some(parent) = stack.last_mut() {
                        parent.closed |= closed;
                    }
                }
            }
        }

        dedup_rotations(cycles)
    }
}

fn unblock(v: usize, blocked: &mut [bool], b_sets: &mut [SmallVec<[usize; 4]>]) {
    let mut worklist: SmallVec<[usize; 16]> = SmallVec::new();
    worklist.push(v);
    while let Some(u) = worklist.pop() {
        if blocked[u] {
            blocked[u] = false;
            worklist.extend(b_sets[u].drain(..));
        }
    }
}

/// Rotate a cycle so its smallest node index comes first; rotations of the
/// same cycle all map to the same sequence.
fn normalize_rotation(cycle: &[usize]) -> Vec<usize> {
    let Some(min_pos) = cycle
        .iter()
        .enumerate()
        .min_by_key(|&(_, &ix)| ix)
        .map(|(pos, _)| pos)
    else {
        return Vec::new();
    };

    let mut normalized = Vec::with_capacity(cycle.len());
    normalized.extend_from_slice(&cycle[min_pos..]);
    normalized.extend_from_slice(&cycle[..min_pos]);
    normalized
}

/// Remove cycles that are rotations of one another, keeping discovery
/// order.  Distinct cycles over the same node set (e.g. both directions of
/// a 3-cycle) are preserved.
fn dedup_rotations(cycles: Vec<Vec<usize>>) -> Vec<Vec<usize>> {
    let mut seen: HashSet<Vec<usize>> = HashSet::new();
    let mut unique = Vec::with_capacity(cycles.len());

    for cycle in cycles {
        let normalized = normalize_rotation(&cycle);
        if seen.insert(normalized.clone()) {
            unique.push(normalized);
        }
    }

    unique
}

/// Multiply edge signs around the cycle; a missing link marks the loop
/// Unknown rather than crashing.
fn classify_cycle(model: &Model, nodes: &[String]) -> LoopPolarity {
    let mut negatives = 0usize;
    for i in 0..nodes.len() {
        let from = &nodes[i];
        let to = &nodes[(i + 1) % nodes.len()];
        match model.get_link_between(from, to) {
            Some(link) => {
                if link.polarity == LinkPolarity::Negative {
                    negatives += 1;
                }
            }
            None => return LoopPolarity::Unknown,
        }
    }

    // even number of negative links = Reinforcing
    // odd number of negative links = Balancing
    if negatives % 2 == 0 {
        LoopPolarity::Reinforcing
    } else {
        LoopPolarity::Balancing
    }
}

/// Detect and classify every feedback loop in the model.  Ids are assigned
/// in discovery order (`L1`, `L2`, ...), which is deterministic because
/// enumeration follows node and link insertion order; an id is stable
/// across recomputation so long as the set of cycles is unchanged.
pub fn detect_loops(model: &Model) -> Vec<Loop> {
    let graph = CausalGraph::from_model(model);
    let cycles = graph.find_cycles();

    cycles
        .iter()
        .enumerate()
        .map(|(i, cycle)| {
            let nodes: Vec<String> = cycle
                .iter()
                .map(|&ix| graph.node_ids[ix].clone())
                .collect();
            let polarity = classify_cycle(model, &nodes);
            Loop {
                id: format!("L{}", i + 1),
                nodes,
                polarity,
            }
        })
        .collect()
}

/// Whether the link is one of the loop's edges (including the implicit
/// closing edge).  O(loop length); used for highlight state.
pub fn is_link_in_loop(link: &Link, loop_item: &Loop) -> bool {
    let n = loop_item.nodes.len();
    (0..n).any(|i| loop_item.nodes[i] == link.from && loop_item.nodes[(i + 1) % n] == link.to)
}
