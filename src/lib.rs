pub mod config;
pub mod core;
pub mod export;
pub mod generation;
pub mod llm;
