//! Core configuration shared by the library and the node binary

pub mod config;
