#![forbid(unsafe_code)]

//! Render kernel: cells, buffers, the surface compositor, and backends.
//!
//! # Role in shoji
//! Widgets paint [`cell::Cell`]s into per-surface [`buffer::Buffer`]s;
//! the [`compositor::Compositor`] stacks those surfaces in z-order and
//! composes them into one screen-sized frame; a [`backend::Backend`]
//! diffs that frame against the previous one and emits minimal terminal
//! output. The [`screen::Screen`] handle ties the three together and is
//! the context object every widget is constructed against; there is no
//! ambient global terminal handle.

pub mod backend;
pub mod buffer;
pub mod cell;
pub mod compositor;
pub mod screen;
