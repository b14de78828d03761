//! Event Handling Module
//!
//! Translates terminal key events into changes of the browser state.
//!
//! # Module Organization
//!
//! - **`keys`**: Keyboard input processing and navigation logic

pub mod keys;
