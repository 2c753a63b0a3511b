// Copyright 2025 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The diagram model: the single source of truth for nodes and links.
//! All mutation goes through methods here so the structural invariants
//! (unique ids, no self links, one link per ordered pair) hold everywhere
//! downstream.

use serde::{Deserialize, Serialize};

use crate::common::Result;
use crate::datamodel::{Link, LinkPolarity, Node};
use crate::model_err;

/// Nodes and links are kept in insertion order; loop enumeration depends on
/// that order being stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

impl Model {
    pub fn new() -> Model {
        Default::default()
    }

    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn get_node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn get_link(&self, id: &str) -> Option<&Link> {
        self.links.iter().find(|l| l.id == id)
    }

    fn get_link_mut(&mut self, id: &str) -> Option<&mut Link> {
        self.links.iter_mut().find(|l| l.id == id)
    }

    /// The link for the ordered pair (from, to), if one exists.
    pub fn get_link_between(&self, from: &str, to: &str) -> Option<&Link> {
        self.links.iter().find(|l| l.from == from && l.to == to)
    }

    pub fn add_node(&mut self, node: Node) -> Result<()> {
        if self.get_node(&node.id).is_some() {
            return model_err!(DuplicateNode, node.id);
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Removes the node and every link touching it.
    pub fn remove_node(&mut self, id: &str) -> Result<()> {
        if self.get_node(id).is_none() {
            return model_err!(DoesNotExist, id.to_string());
        }
        self.nodes.retain(|n| n.id != id);
        self.links.retain(|l| l.from != id && l.to != id);
        Ok(())
    }

    pub fn move_node(&mut self, id: &str, x: f64, y: f64) -> Result<()> {
        let Some(node) = self.get_node_mut(id) else {
            return model_err!(DoesNotExist, id.to_string());
        };
        node.x = x;
        node.y = y;
        Ok(())
    }

    pub fn set_node_label(&mut self, id: &str, label: &str) -> Result<()> {
        let Some(node) = self.get_node_mut(id) else {
            return model_err!(DoesNotExist, id.to_string());
        };
        node.label = label.to_string();
        Ok(())
    }

    pub fn set_node_color(&mut self, id: &str, color: &str) -> Result<()> {
        let Some(node) = self.get_node_mut(id) else {
            return model_err!(DoesNotExist, id.to_string());
        };
        node.color = color.to_string();
        Ok(())
    }

    pub fn add_link(&mut self, link: Link) -> Result<()> {
        if link.from == link.to {
            return model_err!(SelfLink, link.from);
        }
        if self.get_node(&link.from).is_none() {
            return model_err!(DoesNotExist, link.from);
        }
        if self.get_node(&link.to).is_none() {
            return model_err!(DoesNotExist, link.to);
        }
        if self.get_link_between(&link.from, &link.to).is_some() {
            return model_err!(DuplicateLink, format!("{} -> {}", link.from, link.to));
        }
        if self.get_link(&link.id).is_some() {
            return model_err!(DuplicateLink, link.id);
        }
        self.links.push(link);
        Ok(())
    }

    pub fn remove_link(&mut self, id: &str) -> Result<()> {
        if self.get_link(id).is_none() {
            return model_err!(DoesNotExist, id.to_string());
        }
        self.links.retain(|l| l.id != id);
        Ok(())
    }

    pub fn set_link_polarity(&mut self, id: &str, polarity: LinkPolarity) -> Result<()> {
        let Some(link) = self.get_link_mut(id) else {
            return model_err!(DoesNotExist, id.to_string());
        };
        link.polarity = polarity;
        Ok(())
    }

    /// Stores the curvature verbatim; interactive callers clamp first (see
    /// `patch` and `interaction`).
    pub fn set_link_curvature(&mut self, id: &str, curvature: f64) -> Result<()> {
        let Some(link) = self.get_link_mut(id) else {
            return model_err!(DoesNotExist, id.to_string());
        };
        link.curvature = curvature;
        Ok(())
    }

    pub fn set_link_color(&mut self, id: &str, color: &str) -> Result<()> {
        let Some(link) = self.get_link_mut(id) else {
            return model_err!(DoesNotExist, id.to_string());
        };
        link.color = color.to_string();
        Ok(())
    }
}
