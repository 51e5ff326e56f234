#![cfg_attr(not(test), no_std)]

//! Screen navigation, region-cached rendering, and debounced input dispatch
//! for a handheld CNC pendant.

pub mod app;
pub mod cache;
pub mod command;
pub mod input;
pub mod selection;
pub mod settings;
pub mod surface;
pub mod telemetry;
pub mod ui;
