pub mod batch;
pub mod template;
