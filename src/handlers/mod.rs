//! HTTP handlers

pub mod page;
