//! Arithmetic in the negacyclic ring `Z_q[X]/(X^N + 1)`.
//!
//! [RingParameters] fix `N`, `q` and the NTT tables once per session;
//! [RingElement] values are tagged at the type level with the
//! representation they are held in.

mod element;
mod parameters;

pub use element::{Coefficient, Domain, Evaluation, Representation, RingElement};
pub use parameters::{ParmsID, RingParameters};
