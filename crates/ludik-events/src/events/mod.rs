//! Concrete event payloads.

pub mod directory;
pub mod subscription;
