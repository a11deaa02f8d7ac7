pub mod cache;
pub mod core;
pub mod margin;
pub mod metrics;
pub mod pricing;
pub mod range;
pub mod types;
