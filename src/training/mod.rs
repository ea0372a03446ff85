mod batch;
mod dataset;
mod trainer;

pub use batch::*;
pub use dataset::*;
pub use trainer::*;
