//! `tsc-policy` - concrete [`Policy`][tsc_traffic::Policy] implementations.
//!
//! | Type                 | Behaviour                                                  |
//! |----------------------|------------------------------------------------------------|
//! | [`FixedCyclePolicy`] | Fixed-time baseline; every agent cycles phases in lockstep |
//! | [`LinearPolicy`]     | `W · obs + b` per agent; argmax or softmax sample          |

pub mod error;
pub mod fixed;
pub mod linear;

#[cfg(test)]
mod tests;

pub use error::{PolicyError, PolicyResult};
pub use fixed::FixedCyclePolicy;
pub use linear::{LinearArtifact, LinearPolicy, argmax};
