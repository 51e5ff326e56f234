#![cfg_attr(not(test), no_std)]

//! RGB565 off-screen buffers for the 240x320 pendant panel.

extern crate alloc;

pub mod panel;
mod sprite;

#[cfg(feature = "embedded-graphics")]
mod graphics;

pub use sprite::{AllocError, Sprite};
