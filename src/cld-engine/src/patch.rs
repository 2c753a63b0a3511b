// Copyright 2025 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Edit operations applied atomically: each op runs against a staged clone
//! of the model and commits only on success, snapshotting the pre-mutation
//! state to history.  A failed op leaves both the model and history
//! untouched.

use crate::common::Result;
use crate::datamodel::{Link, LinkPolarity, Node};
use crate::diagram::clamp_curvature;
use crate::diagram::common::Point;
use crate::history::History;
use crate::model::Model;
use crate::model_err;

#[derive(Debug, Clone, PartialEq)]
pub enum PatchOp {
    AddNode(Node),
    MoveNode { id: String, x: f64, y: f64 },
    SetNodeLabel { id: String, label: String },
    SetNodeColor { id: String, color: String },
    RemoveNode { id: String },
    AddLink(Link),
    SetLinkPolarity { id: String, polarity: LinkPolarity },
    SetLinkCurvature { id: String, curvature: f64 },
    SetLinkColor { id: String, color: String },
    RemoveLink { id: String },
}

pub fn apply(model: &mut Model, history: &mut History, op: PatchOp) -> Result<()> {
    let mut staged = model.clone();
    apply_op(&mut staged, op)?;

    history.snapshot(model);
    *model = staged;
    Ok(())
}

/// The chord endpoints for a link, for curvature clamping.
fn link_endpoints(model: &Model, link: &Link) -> Result<(Point, Point)> {
    let Some(from) = model.get_node(&link.from) else {
        return model_err!(DoesNotExist, link.from.clone());
    };
    let Some(to) = model.get_node(&link.to) else {
        return model_err!(DoesNotExist, link.to.clone());
    };
    Ok((
        Point {
            x: from.x,
            y: from.y,
        },
        Point { x: to.x, y: to.y },
    ))
}

fn apply_op(model: &mut Model, op: PatchOp) -> Result<()> {
    match op {
        PatchOp::AddNode(node) => model.add_node(node),
        PatchOp::MoveNode { id, x, y } => model.move_node(&id, x, y),
        PatchOp::SetNodeLabel { id, label } => model.set_node_label(&id, &label),
        PatchOp::SetNodeColor { id, color } => model.set_node_color(&id, &color),
        PatchOp::RemoveNode { id } => model.remove_node(&id),
        PatchOp::AddLink(mut link) => {
            // a degenerate (straight or over-bowed) construction is clamped
            // into range rather than stored and rejected at render time
            if model.get_node(&link.from).is_some() && model.get_node(&link.to).is_some() {
                let (from, to) = link_endpoints(model, &link)?;
                link.curvature = clamp_curvature(link.curvature, from, to);
            }
            model.add_link(link)
        }
        PatchOp::SetLinkPolarity { id, polarity } => model.set_link_polarity(&id, polarity),
        PatchOp::SetLinkCurvature { id, curvature } => {
            let Some(link) = model.get_link(&id) else {
                return model_err!(DoesNotExist, id);
            };
            let (from, to) = link_endpoints(model, link)?;
            let clamped = clamp_curvature(curvature, from, to);
            model.set_link_curvature(&id, clamped)
        }
        PatchOp::SetLinkColor { id, color } => model.set_link_color(&id, &color),
        PatchOp::RemoveLink { id } => model.remove_link(&id),
    }
}
