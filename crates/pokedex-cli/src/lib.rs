//! Pokedex CLI library - testable functions and modules
//!
//! This library provides the HTTP service for the Pokedex card classifier,
//! organized into modules for routing, configuration, startup and rendering.

pub mod api;
pub mod config;
pub mod lifecycle;
pub mod logging;
pub mod pages;
