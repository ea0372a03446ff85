//! Directory artifacts: the weights plus a manifest binding the `evaluate` and
//! `train` entry points to fixed tensor signatures.

mod signature;
mod artifact;

pub use signature::*;
pub use artifact::*;
