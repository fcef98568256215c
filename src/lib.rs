//! h2c - minimal HTTP/2 over cleartext server
//!
//! This crate accepts plaintext HTTP/1.1 connections, upgrades them in place
//! to HTTP/2 (`Upgrade: h2c`) and answers simple GET/POST requests through a
//! route table.

pub mod http;
pub mod net;
