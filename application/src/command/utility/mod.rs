pub mod math;
pub mod support;
