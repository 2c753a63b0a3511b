// Copyright 2025 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use crate::datamodel::{Link, LinkPolarity, Node};
use crate::model::Model;

pub(crate) fn x_node(id: &str, x: f64, y: f64) -> Node {
    Node {
        id: id.to_string(),
        x,
        y,
        label: id.to_string(),
        color: "black".to_string(),
    }
}

pub(crate) fn x_link(id: &str, from: &str, to: &str, polarity: LinkPolarity) -> Link {
    Link {
        id: id.to_string(),
        from: from.to_string(),
        to: to.to_string(),
        polarity,
        color: "black".to_string(),
        curvature: 20.0,
    }
}

pub(crate) fn x_model(nodes: &[Node], links: Vec<Link>) -> Model {
    let mut model = Model::new();
    for node in nodes {
        model.add_node(node.clone()).unwrap();
    }
    for link in links {
        model.add_link(link).unwrap();
    }
    model
}
