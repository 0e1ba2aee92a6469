//! Terminal presentation layer: input parsing, rendering and the app loop
//! state.

pub mod app;
pub mod input;
pub mod render;
