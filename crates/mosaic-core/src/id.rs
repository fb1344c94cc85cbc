use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

pub const ID_SEPARATOR: char = '.';

/// Identity of a rendered element across passes.
///
/// Positional ids are built bottom-up: a leaf starts at the root id and every
/// ancestor prefixes its child segment, giving paths like `"2.0.1"`. A fixed id
/// ignores ancestor segments, so the element keeps its identity when it moves
/// between siblings or parents.
///
/// Equality and hashing look at the path only.
#[derive(Clone)]
pub struct NodeId {
    path: Rc<str>,
    fixed: bool,
}

impl NodeId {
    pub fn root() -> Self {
        Self {
            path: Rc::from(""),
            fixed: false,
        }
    }

    pub fn new(path: impl AsRef<str>) -> Self {
        Self {
            path: Rc::from(path.as_ref()),
            fixed: false,
        }
    }

    pub fn fixed(name: impl AsRef<str>) -> Self {
        Self {
            path: Rc::from(name.as_ref()),
            fixed: true,
        }
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// This id as seen from a parent that places it under `segment`.
    pub fn under(&self, segment: impl fmt::Display) -> NodeId {
        if self.fixed {
            return self.clone();
        }
        let path = if self.path.is_empty() {
            segment.to_string()
        } else {
            format!("{segment}{ID_SEPARATOR}{}", self.path)
        };
        NodeId {
            path: Rc::from(path),
            fixed: false,
        }
    }

    /// Re-roots this id below a fixed name, keeping the inner path.
    pub fn pinned(&self, name: &str) -> NodeId {
        let path = if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{name}{ID_SEPARATOR}{}", self.path)
        };
        NodeId {
            path: Rc::from(path),
            fixed: true,
        }
    }
}

impl PartialEq for NodeId {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for NodeId {}

impl Hash for NodeId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fixed {
            write!(f, "NodeId(#{})", self.path)
        } else {
            write!(f, "NodeId({})", self.path)
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId::new(s)
    }
}
