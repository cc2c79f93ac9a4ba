mod tracing;

pub use crate::tracing::init;
