//! skywatch - terminal weather client built on tui-dispatch
//!
//! The library exposes the app's modules so the binary and the tests share
//! one reducer, one API client and one set of components.

pub mod action;
pub mod api;
pub mod components;
pub mod config;
pub mod effect;
pub mod presentation;
pub mod reducer;
pub mod state;
pub mod telemetry;
