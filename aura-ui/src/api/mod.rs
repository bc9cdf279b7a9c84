//! API access and browser storage

pub mod client;

pub use client::*;
