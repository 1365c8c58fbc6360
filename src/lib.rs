// src/lib.rs

//! bookfetch library: catalog search and book downloads.

pub mod error;
pub mod models;
pub mod services;
pub mod utils;
