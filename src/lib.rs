//! Pointer-reactive dot field: a jittered grid of dots pushed away from the
//! cursor by damped springs, pulsing in opacity, redrawn every frame.

pub mod app;
pub mod config;
pub mod driver;
pub mod error;
pub mod gpu;
pub mod simulation;
