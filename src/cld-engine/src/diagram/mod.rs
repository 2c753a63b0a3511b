// Copyright 2025 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

pub mod common;
mod connector;
pub mod constants;

pub use connector::{
    ConnectorPath, circle_from_points, clamp_curvature, compute_connector_path,
};
