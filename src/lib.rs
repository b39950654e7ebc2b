pub mod commands;
pub mod config;
pub mod media;
pub mod parser;
pub mod patterns;
pub mod rename;
