// Copyright 2025 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Passive data types for causal loop diagrams.  Invariants (no self links,
//! at most one link per ordered node pair) are enforced at the model
//! boundary, not here.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Polarity of a causal link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkPolarity {
    Positive, // increase in 'from' causes increase in 'to'
    Negative, // increase in 'from' causes decrease in 'to'
}

impl LinkPolarity {
    /// The multiplicative sign used when classifying loops.
    pub fn sign(&self) -> i32 {
        match self {
            LinkPolarity::Positive => 1,
            LinkPolarity::Negative => -1,
        }
    }

    pub fn toggled(&self) -> LinkPolarity {
        match self {
            LinkPolarity::Positive => LinkPolarity::Negative,
            LinkPolarity::Negative => LinkPolarity::Positive,
        }
    }
}

impl fmt::Display for LinkPolarity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let glyph = match self {
            LinkPolarity::Positive => "+",
            LinkPolarity::Negative => "-",
        };
        write!(f, "{glyph}")
    }
}

/// A variable in the diagram, placed on the 2-D surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub x: f64,
    pub y: f64,
    /// May contain newlines; measurement/wrapping happens in the renderer.
    pub label: String,
    pub color: String,
}

/// A signed causal influence between two distinct nodes, drawn as a
/// circular arc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub id: String,
    pub from: String,
    pub to: String,
    pub polarity: LinkPolarity,
    pub color: String,
    /// Signed perpendicular offset of the arc's construction control point
    /// from the chord midpoint; the sign selects which side the arc bows to.
    pub curvature: f64,
}

impl Link {
    /// Which side of the chord the arc bows to, as ±1.0.
    pub fn curvature_sign(&self) -> f64 {
        if self.curvature < 0.0 { -1.0 } else { 1.0 }
    }
}
