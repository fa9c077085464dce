//! Strongly typed string identifiers.
//!
//! The simulator addresses every entity by an opaque string id (`"tls_159"`,
//! `"-4021#1_0"`, `"veh_17"`).  Wrapping each kind in its own newtype keeps a
//! lane id from being passed where a signal id is expected.  All ids are
//! `Ord + Hash` so they can key `BTreeSet`s and `HashMap`s directly.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Generate a typed id wrapper around a `String`.
macro_rules! string_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
        #[serde(transparent)]
        $vis struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[inline(always)]
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
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id! {
    /// A road lane, e.g. `"edge12_0"`.  Controlled by zero or more signals.
    pub struct LaneId;
}

string_id! {
    /// A traffic-light control point, e.g. `"tls_159"`.
    pub struct SignalId;
}

string_id! {
    /// A vehicle currently present in the simulation.
    pub struct VehicleId;
}
