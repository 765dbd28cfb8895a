use serde::Serialize;

/// A roster entry, keyed by its normalized identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Student {
    pub identifier: String,
    pub display_name: String,
}
