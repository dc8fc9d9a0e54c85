//! Platform abstraction layer
//!
//! The simulation only consumes polled input state; event capture lives in
//! whatever host drives the engine.

pub mod input;
