pub mod features;
pub mod policy;

pub use features::*;
pub use policy::*;
