//! Strongly typed, zero-cost identifier wrappers.
//!
//! Every id is a dense index: agents are numbered in placement order and
//! nodes/edges in network load order, so per-agent and per-node state lives
//! in plain `Vec`s indexed with `.index()`.  External identifiers (OSM ids,
//! CSV ids) never leave the loaders; see `RoadNetwork::external_id`.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID" (the inner type's maximum).
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Sequential index of a simulated agent, assigned in placement order.
    pub struct AgentId(u32);
}

typed_id! {
    /// Index of a road-network node.  Dense: `0 .. node_count`.
    pub struct NodeId(u32);
}

typed_id! {
    /// Index of a directed road-network edge (one of possibly several
    /// parallel edges between the same pair of nodes).
    pub struct EdgeId(u32);
}
