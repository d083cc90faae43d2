//! FWeb - hand-rolled HTTP/1.1 engine
//!
//! Core library for header parsing, request framing and keep-alive handling.

pub mod app;
pub mod config;
pub mod http;
pub mod server;
