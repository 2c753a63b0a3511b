// Copyright 2025 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

/// Angular steps when marching an arc for footprint crossings.
pub const ARC_SAMPLE_STEPS: usize = 128;
/// Bisection passes refining a bracketed boundary crossing.
pub const BOUNDARY_REFINE_ITERS: usize = 8;
/// Pushes trimmed endpoints just past the footprint edge so the stroke
/// visibly clears the shape.
pub const BOUNDARY_CLEARANCE: f64 = 0.5;

/// Segments in the sampled polyline handed to hit-testing and rendering.
pub const POLYLINE_SEGMENTS: usize = 40;

/// Below this magnitude a nearly-straight arc reads as ambiguous.
pub const MIN_CURVATURE: f64 = 2.0;
/// Keeps the circle-fit determinant safely away from zero.
pub const CURVATURE_MARGIN: f64 = 0.5;
/// Curvature given to newly created links.
pub const DEFAULT_CURVATURE: f64 = 20.0;

/// Fraction along the trimmed span where the polarity glyph sits.
pub const GLYPH_ARC_POSITION: f64 = 0.8;
/// Pixels the glyph is offset from the stroke, along the outward normal.
pub const GLYPH_OFFSET: f64 = 8.0;
