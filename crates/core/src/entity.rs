//! Records that are addressed by a stable identifier.

use std::hash::Hash;

/// A record whose identity survives changes to its other fields.
pub trait Entity {
    type Id: Clone + Eq + Hash + std::fmt::Debug;

    fn id(&self) -> &Self::Id;

    /// Whether this record is the one addressed by `id`.
    fn is_identified_by(&self, id: &Self::Id) -> bool {
        self.id() == id
    }
}
