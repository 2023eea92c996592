//! Minimal OCR web front end: upload an image, get its text back as JSON.

pub mod config;
pub mod engine;
pub mod engines;
pub mod error;
pub mod gateway;
pub mod invoker;
pub mod profile;
pub mod server;
