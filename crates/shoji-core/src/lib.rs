#![forbid(unsafe_code)]

//! Core types for the shoji terminal toolkit.
//!
//! # Role in shoji
//! `shoji-core` holds everything below the render kernel: the normalized
//! key model, declarative panel geometry, the fixed color-pair palette,
//! the toolkit error taxonomy, the RAII terminal session guard, and the
//! selectable background-task primitive used by the cancellable bridge.
//!
//! Nothing in this crate touches a compositing surface; widgets live in
//! `shoji-widgets` and the cell/buffer kernel in `shoji-render`.

pub mod error;
pub mod geometry;
pub mod keys;
pub mod session;
pub mod style;

// The self-pipe task primitive needs anonymous pipes and poll(2).
#[cfg(unix)]
pub mod task;
