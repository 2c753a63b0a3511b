// Copyright 2025 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Pointer interaction as an explicit state machine.  State goes in and
//! comes back out of `step` alongside an optional edit op, so the whole
//! flow is testable without a UI harness and nothing lives in ambient
//! mutable fields.

use crate::datamodel::{Link, LinkPolarity};
use crate::diagram::clamp_curvature;
use crate::diagram::common::{Point, is_zero, square};
use crate::diagram::constants::{DEFAULT_CURVATURE, MIN_CURVATURE};
use crate::model::Model;
use crate::patch::PatchOp;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    /// The link tool is armed and waiting for a target node.
    PendingLinkFrom(String),
    DraggingNode(String),
    DraggingCurvature(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Arm the link tool with a source node.
    StartLink(String),
    PointerDownOnNode(String),
    PointerDownOnHandle(String),
    PointerMoved(Point),
    PointerUpOnNode(String),
    PointerUp(Point),
    Cancel,
}

/// The next state, plus the edit (if any) this event produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: InteractionState,
    pub op: Option<PatchOp>,
}

fn stay(state: InteractionState) -> Transition {
    Transition { state, op: None }
}

fn idle() -> Transition {
    stay(InteractionState::Idle)
}

fn emit(state: InteractionState, op: PatchOp) -> Transition {
    Transition {
        state,
        op: Some(op),
    }
}

/// The curvature a pointer drag implies: the signed perpendicular offset of
/// the pointer from the link's chord, clamped into drawable range.
pub fn curvature_from_drag(from: Point, to: Point, pointer: Point) -> f64 {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let chord = (square(dx) + square(dy)).sqrt();
    if is_zero(chord) {
        return MIN_CURVATURE;
    }

    let mid_x = (from.x + to.x) / 2.0;
    let mid_y = (from.y + to.y) / 2.0;
    // projection onto the chord's left-hand perpendicular, matching the
    // control-point construction
    let offset = (pointer.x - mid_x) * (-dy / chord) + (pointer.y - mid_y) * (dx / chord);
    clamp_curvature(offset, from, to)
}

fn next_link_id(model: &Model) -> String {
    let mut n = model.links.len() + 1;
    while model.get_link(&format!("l{n}")).is_some() {
        n += 1;
    }
    format!("l{n}")
}

pub fn step(state: InteractionState, event: Event, model: &Model) -> Transition {
    use InteractionState::*;

    match (state, event) {
        (_, Event::Cancel) => idle(),

        (Idle, Event::StartLink(id)) => stay(PendingLinkFrom(id)),
        (Idle, Event::PointerDownOnNode(id)) => stay(DraggingNode(id)),
        (Idle, Event::PointerDownOnHandle(id)) => stay(DraggingCurvature(id)),

        (PendingLinkFrom(from), Event::PointerUpOnNode(to)) => {
            // the model re-checks these invariants; bailing here just
            // avoids emitting an op that is known to fail
            if from == to || model.get_link_between(&from, &to).is_some() {
                return idle();
            }
            let link = Link {
                id: next_link_id(model),
                from,
                to,
                polarity: LinkPolarity::Positive,
                color: "black".to_string(),
                curvature: DEFAULT_CURVATURE,
            };
            emit(Idle, PatchOp::AddLink(link))
        }
        (PendingLinkFrom(_), Event::PointerUp(_)) => idle(),

        (DraggingNode(id), Event::PointerMoved(p)) => emit(
            DraggingNode(id.clone()),
            PatchOp::MoveNode { id, x: p.x, y: p.y },
        ),
        (DraggingNode(_), Event::PointerUp(_) | Event::PointerUpOnNode(_)) => idle(),

        (DraggingCurvature(id), Event::PointerMoved(p)) => {
            let Some(link) = model.get_link(&id) else {
                return idle();
            };
            let (Some(from), Some(to)) = (model.get_node(&link.from), model.get_node(&link.to))
            else {
                return idle();
            };
            let curvature = curvature_from_drag(
                Point {
                    x: from.x,
                    y: from.y,
                },
                Point { x: to.x, y: to.y },
                p,
            );
            emit(
                DraggingCurvature(id.clone()),
                PatchOp::SetLinkCurvature { id, curvature },
            )
        }
        (DraggingCurvature(_), Event::PointerUp(_) | Event::PointerUpOnNode(_)) => idle(),

        // anything else leaves the state untouched
        (state, _) => stay(state),
    }
}
