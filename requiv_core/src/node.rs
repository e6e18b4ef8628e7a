use requiv_common::ValueType;
use std::sync::Arc;

/// Identifier used for the root of a comparison in failure messages
pub const DEFAULT_ROOT_IDENTIFIER: &str = "subject";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Root of the graph, carrying the identifier used in messages
    Root(String),
    Member(String),
    Index(usize),
}

/// A position in the object graph being compared.
///
/// Nodes form a singly linked chain towards the root. A child node is derived
/// from its parent for the duration of one recursion frame and dropped when
/// that frame returns.
#[derive(Debug, Clone)]
pub struct Node {
    segment: PathSegment,
    declared_type: ValueType,
    depth: usize,
    parent: Option<Arc<Node>>,
}

impl Node {
    pub fn root(identifier: impl Into<String>, declared_type: ValueType) -> Arc<Node> {
        Arc::new(Node {
            segment: PathSegment::Root(identifier.into()),
            declared_type,
            depth: 0,
            parent: None,
        })
    }

    pub fn member(parent: &Arc<Node>, name: impl Into<String>, declared_type: ValueType) -> Arc<Node> {
        Self::child(parent, PathSegment::Member(name.into()), declared_type)
    }

    pub fn element(parent: &Arc<Node>, index: usize, declared_type: ValueType) -> Arc<Node> {
        Self::child(parent, PathSegment::Index(index), declared_type)
    }

    fn child(parent: &Arc<Node>, segment: PathSegment, declared_type: ValueType) -> Arc<Node> {
        Arc::new(Node {
            segment,
            declared_type,
            depth: parent.depth + 1,
            parent: Some(Arc::clone(parent)),
        })
    }

    pub fn segment(&self) -> &PathSegment {
        &self.segment
    }

    pub fn declared_type(&self) -> &ValueType {
        &self.declared_type
    }

    /// Number of steps below the root
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn parent(&self) -> Option<&Arc<Node>> {
        self.parent.as_ref()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    fn root_identifier(&self) -> &str {
        let mut current = self;
        while let Some(parent) = &current.parent {
            current = parent.as_ref();
        }
        match &current.segment {
            PathSegment::Root(identifier) => identifier,
            _ => DEFAULT_ROOT_IDENTIFIER,
        }
    }

    /// Path relative to the root, e.g. `Address.City` or `Items[2].Name`.
    /// Empty for the root itself.
    pub fn path(&self) -> String {
        let mut segments = Vec::with_capacity(self.depth);
        let mut current = Some(self);
        while let Some(node) = current {
            segments.push(&node.segment);
            current = node.parent.as_deref();
        }

        let mut path = String::new();
        for segment in segments.into_iter().rev() {
            match segment {
                PathSegment::Root(_) => {}
                PathSegment::Member(name) => {
                    if !path.is_empty() {
                        path.push('.');
                    }
                    path.push_str(name);
                }
                PathSegment::Index(index) => {
                    path.push('[');
                    path.push_str(&index.to_string());
                    path.push(']');
                }
            }
        }
        path
    }

    /// Fully qualified description used in messages, e.g. `subject.Address.City`
    pub fn description(&self) -> String {
        let identifier = self.root_identifier();
        let path = self.path();
        if path.is_empty() {
            identifier.to_string()
        } else if path.starts_with('[') {
            format!("{}{}", identifier, path)
        } else {
            format!("{}.{}", identifier, path)
        }
    }
}
