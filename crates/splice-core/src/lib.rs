pub mod enzyme;
pub mod feature;
pub mod operations;
pub mod search;
pub mod sequence;

pub use enzyme::*;
pub use feature::*;
pub use sequence::*;
