//! Host terminal input handling.
//!
//! - **keymapper**: Keyboard events to the byte encoding the editor ingests

pub mod keymapper;

pub use keymapper::*;
