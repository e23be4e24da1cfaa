pub mod allowance;
pub mod locator;
pub mod timeline;
