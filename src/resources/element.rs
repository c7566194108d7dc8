//! Display element abstraction.
//!
//! The sprite core only needs a handful of element operations: set id and
//! class, write CSS-like style properties, toggle `draggable`, append to a
//! parent and remove itself. [`Document`] creates elements; [`DisplayElement`]
//! is the handle a sprite owns.
//!
//! [`VirtualDocument`] / [`VirtualElement`] are the in-memory implementation
//! used by the demo binary and the tests. A browser host would implement the
//! same traits over its own node type.

use std::collections::BTreeMap;

use crate::error::{Result, SpriteError};

/// Structural node kind. Only `Element` nodes may be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
}

pub trait DisplayElement {
    fn kind(&self) -> NodeKind;
    fn id(&self) -> &str;
    fn set_id(&mut self, id: &str);
    fn set_class_name(&mut self, class_name: &str);
    fn set_style(&mut self, property: &str, value: &str);
    fn style(&self, property: &str) -> Option<&str>;
    fn set_draggable(&mut self, draggable: bool);
    /// Append `child` under this node.
    fn append_child(&mut self, child: &mut Self);
    /// Detach this node from its parent.
    fn remove(&mut self);
}

pub trait Document {
    type Element: DisplayElement;

    fn create_element(&mut self, tag: &str) -> Result<Self::Element>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct VirtualElement {
    pub tag: String,
    pub kind: NodeKind,
    pub id: String,
    pub class_name: String,
    pub styles: BTreeMap<String, String>,
    pub draggable: bool,
    pub parent: Option<String>,
    pub children: Vec<String>,
    /// Number of times `remove` was called.
    pub removals: u32,
}

impl VirtualElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            kind: NodeKind::Element,
            id: String::new(),
            class_name: String::new(),
            styles: BTreeMap::new(),
            draggable: true,
            parent: None,
            children: Vec::new(),
            removals: 0,
        }
    }

    pub fn text() -> Self {
        Self {
            kind: NodeKind::Text,
            ..Self::new("#text")
        }
    }

    pub fn is_attached(&self) -> bool {
        self.parent.is_some()
    }
}

impl DisplayElement for VirtualElement {
    fn kind(&self) -> NodeKind {
        self.kind
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: &str) {
        self.id = id.to_string();
    }

    fn set_class_name(&mut self, class_name: &str) {
        self.class_name = class_name.to_string();
    }

    fn set_style(&mut self, property: &str, value: &str) {
        self.styles.insert(property.to_string(), value.to_string());
    }

    fn style(&self, property: &str) -> Option<&str> {
        self.styles.get(property).map(String::as_str)
    }

    fn set_draggable(&mut self, draggable: bool) {
        self.draggable = draggable;
    }

    fn append_child(&mut self, child: &mut Self) {
        child.parent = Some(self.id.clone());
        self.children.push(child.id.clone());
    }

    fn remove(&mut self) {
        self.parent = None;
        self.removals += 1;
    }
}

/// Factory for [`VirtualElement`]s.
#[derive(Debug, Clone, Default)]
pub struct VirtualDocument {
    created: usize,
    fail_creation: bool,
}

impl VirtualDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// A document whose element creation always fails.
    pub fn failing() -> Self {
        Self {
            created: 0,
            fail_creation: true,
        }
    }

    pub fn created(&self) -> usize {
        self.created
    }
}

impl Document for VirtualDocument {
    type Element = VirtualElement;

    fn create_element(&mut self, tag: &str) -> Result<VirtualElement> {
        if self.fail_creation {
            return Err(SpriteError::ElementCreation(format!(
                "document refused to create <{tag}>"
            )));
        }
        self.created += 1;
        Ok(VirtualElement::new(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_remove() {
        let mut parent = VirtualElement::new("div");
        parent.set_id("stage");
        let mut child = VirtualElement::new("div");
        child.set_id("hero");

        parent.append_child(&mut child);
        assert_eq!(child.parent.as_deref(), Some("stage"));
        assert_eq!(parent.children, vec!["hero".to_string()]);

        child.remove();
        assert!(!child.is_attached());
        assert_eq!(child.removals, 1);
    }

    #[test]
    fn test_style_roundtrip() {
        let mut el = VirtualElement::new("div");
        el.set_style("width", "32px");
        assert_eq!(el.style("width"), Some("32px"));
        assert_eq!(el.style("height"), None);
    }

    #[test]
    fn test_failing_document() {
        let mut doc = VirtualDocument::failing();
        assert!(matches!(
            doc.create_element("div"),
            Err(SpriteError::ElementCreation(_))
        ));
        assert_eq!(doc.created(), 0);
    }
}
