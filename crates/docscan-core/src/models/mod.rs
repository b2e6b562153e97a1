//! Data models shared between the library and its front ends.

pub mod config;
pub mod document;
