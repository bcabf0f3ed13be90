//! Opaque identifiers for fires, actors and parent structures
//!
//! Every identifier is a `u32` newtype so a fire id can never be passed where
//! an actor id is expected. Hosts (and the FFI layer) convert with
//! [`FireId::new`] / [`FireId::get`] and friends.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[repr(transparent)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Wrap a raw host identifier
            #[inline]
            #[must_use]
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            /// Raw value for crossing the host boundary
            #[inline]
            #[must_use]
            pub const fn get(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self(raw)
            }
        }
    };
}

define_id!(
    /// Identifier of a live fire, assigned by `FireWorld` at ignition
    FireId,
    "fire"
);

define_id!(
    /// Identifier of an actor that can stand in a fire (usually the player)
    ActorId,
    "actor"
);

define_id!(
    /// Identifier of the structure a fire is attached to (a tree)
    StructureId,
    "structure"
);
