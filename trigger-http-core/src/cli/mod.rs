mod normalize;

pub use normalize::*;
