pub mod association;
pub mod subscription;
