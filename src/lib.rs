// Main library entry point for FlowCraft.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;
