//! Provide various utility functions and structs.
//! 
//! The utility objects in this submodule are not documented.
//! Use at your own risk.
#![allow(missing_docs)]

mod basic;
pub(crate) mod dwthandler;
mod gaussian;
pub(crate) mod hash;
mod number_theory;
mod ntt;
mod uintsmallmod;
mod random_generator;

// gather utilities in this module
pub use basic::*;
pub use ntt::*;
pub use number_theory::*;
pub use uintsmallmod::*;
pub use gaussian::DiscreteGaussian;
pub use random_generator::{BlakeRNGFactory, BlakeRNG, PRNGSeed};
