//! Identifier newtypes for sources, products and tasks.
//!
//! All three are plain strings in the input sheets. Keeping them as distinct
//! types stops a product id from being passed where a source id is expected.
//! Each implements `Borrow<str>` so maps keyed by an id can be queried with `&str`.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

entity_id!(
    /// Identifier of a source system (`source_systems` entry in the product sheet).
    SourceId
);
entity_id!(
    /// Identifier of a product (`id_product` in the product sheet).
    ProductId
);
entity_id!(
    /// Identifier of a migration task.
    TaskId
);
