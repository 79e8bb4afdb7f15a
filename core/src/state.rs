//! # State: Graph Node Identity
//!
//! A `State` names a point in the negotiation graph: a value type plus an
//! optional content-type tag. States carry no behavior; they exist to be
//! compared and hashed.
//!
//! ## Design Philosophy
//!
//! * **Types = Nodes**: two States built at different sites for the same type
//!   and tag are the same node.
//! * **Tags narrow**: `String` and `String[application/json]` are distinct nodes.

use serde::{Serialize, Serializer};
use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Dynamically typed value flowing through a conversion pipeline.
pub type Value = Box<dyn Any + Send>;

/// Stable identity of a Rust type.
///
/// Equality and hashing use the `TypeId` only; the name is kept for display.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    pub fn of<T: Any + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Full path of the type, as reported by `std::any::type_name`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Final path segment of the type name (e.g. `String` for `alloc::string::String`).
    pub fn short_name(&self) -> &'static str {
        short_type_name(self.name)
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl Serialize for TypeKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name)
    }
}

/// Strips module paths while keeping generic arguments readable,
/// e.g. `alloc::vec::Vec<u8>` becomes `Vec<u8>`.
fn short_type_name(full: &'static str) -> &'static str {
    let head = full.split('<').next().unwrap_or(full);
    match head.rfind("::") {
        Some(idx) => &full[idx + 2..],
        None => full,
    }
}

/// Identity of a negotiation graph node.
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
pub struct State {
    #[serde(rename = "type")]
    type_key: TypeKey,
    content_type: Option<Arc<str>>,
}

impl State {
    pub fn new(type_key: TypeKey, content_type: Option<&str>) -> Self {
        Self {
            type_key,
            content_type: content_type.map(Arc::from),
        }
    }

    /// Untagged State for `T`.
    pub fn of<T: Any + ?Sized>() -> Self {
        Self::new(TypeKey::of::<T>(), None)
    }

    /// Returns a copy of this State tagged with `content_type`.
    pub fn with_content_type(&self, content_type: impl AsRef<str>) -> Self {
        Self {
            type_key: self.type_key,
            content_type: Some(Arc::from(content_type.as_ref())),
        }
    }

    /// Returns a copy of this State with the content-type tag removed.
    pub fn untagged(&self) -> Self {
        Self {
            type_key: self.type_key,
            content_type: None,
        }
    }

    pub fn type_key(&self) -> TypeKey {
        self.type_key
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn is_tagged(&self) -> bool {
        self.content_type.is_some()
    }

    /// Whether `value` is an instance of this State's type.
    pub fn accepts(&self, value: &(dyn Any + Send)) -> bool {
        value.type_id() == self.type_key.id()
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.content_type {
            Some(ct) => write!(f, "{}[{}]", self.type_key, ct),
            None => write!(f, "{}", self.type_key),
        }
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
