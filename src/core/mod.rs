//! Core module - Configuration

pub mod config;
