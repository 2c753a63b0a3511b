// Copyright 2025 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Engine for causal loop diagrams: a signed directed graph of variables,
//! feedback loop detection and classification, and the circular-arc
//! connector geometry used to draw links between node label footprints.

#![forbid(unsafe_code)]

pub mod common;
pub mod datamodel;
pub mod diagram;
pub mod history;
pub mod interaction;
pub mod ltm;
pub mod model;
pub mod patch;
#[cfg(test)]
mod testutils;

pub use self::common::{Error, ErrorCode, ErrorKind, Result};
pub use self::datamodel::{Link, LinkPolarity, Node};
pub use self::diagram::common::{Circle, Ellipse, Point};
pub use self::diagram::{ConnectorPath, circle_from_points, clamp_curvature, compute_connector_path};
pub use self::history::History;
pub use self::ltm::{Loop, LoopPolarity, detect_loops, is_link_in_loop};
pub use self::model::Model;
pub use self::patch::{PatchOp, apply};
