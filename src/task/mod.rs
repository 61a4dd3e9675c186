//! Task implementations

pub mod park_assist;
