// Copyright 2025 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Undo/redo as full-state snapshot stacks.  Each snapshot owns deep copies
//! of the model's nodes and links so later in-place edits can never corrupt
//! history.  O(state size) per step, which is fine at diagram scale.

use crate::datamodel::{Link, Node};
use crate::model::Model;

#[derive(Debug, Clone, PartialEq)]
struct Snapshot {
    nodes: Vec<Node>,
    links: Vec<Link>,
}

impl Snapshot {
    fn of(model: &Model) -> Snapshot {
        Snapshot {
            nodes: model.nodes.clone(),
            links: model.links.clone(),
        }
    }

    fn restore(self, model: &mut Model) {
        model.nodes = self.nodes;
        model.links = self.links;
    }
}

#[derive(Debug, Default)]
pub struct History {
    undo: Vec<Snapshot>,
    redo: Vec<Snapshot>,
}

impl History {
    pub fn new() -> History {
        Default::default()
    }

    /// Record the state as it is right now.  Call immediately before a
    /// mutation; any new edit invalidates the redo stack.
    pub fn snapshot(&mut self, model: &Model) {
        self.undo.push(Snapshot::of(model));
        self.redo.clear();
    }

    /// Restore the most recent snapshot.  Returns false (and leaves the
    /// model untouched) when there is nothing to undo.
    pub fn undo(&mut self, model: &mut Model) -> bool {
        match self.undo.pop() {
            Some(snapshot) => {
                self.redo.push(Snapshot::of(model));
                snapshot.restore(model);
                true
            }
            None => false,
        }
    }

    /// Mirror of `undo`.
    pub fn redo(&mut self, model: &mut Model) -> bool {
        match self.redo.pop() {
            Some(snapshot) => {
                self.undo.push(Snapshot::of(model));
                snapshot.restore(model);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
