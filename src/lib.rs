//! serline - a line-editing engine for character consoles
//!
//! serline turns the raw byte stream a person types into a terminal
//! emulator (usually over a UART) into an edited command line. It echoes
//! input, keeps the visible line in sync with the buffer using a handful
//! of ANSI sequences, and on Enter splits the line into arguments for a
//! command callback.
//!
//! # Features
//!
//! - **Fixed storage**: Line and argument storage allocated once up front
//! - **Editing keys**: Backspace/Delete, Ctrl+U, Ctrl+K
//! - **Cursor keys**: Arrows, Home/End and their Ctrl+A/B/E/F equivalents
//! - **Tokenizing**: Whitespace-separated arguments, capped in count
//!
//! # Example
//!
//! ```
//! use serline::core::{Args, Console, Session};
//!
//! #[derive(Default)]
//! struct Uart {
//!     tx: Vec<u8>,
//!     last: Vec<String>,
//! }
//!
//! impl Console for Uart {
//!     fn write_char(&mut self, byte: u8) {
//!         self.tx.push(byte);
//!     }
//!     fn write_str(&mut self, bytes: &[u8]) {
//!         self.tx.extend_from_slice(bytes);
//!     }
//!     fn execute(&mut self, args: &Args<'_>) {
//!         self.last = args.to_vec();
//!     }
//! }
//!
//! let mut session = Session::with_defaults(Uart::default());
//! session.show_prompt();
//! session.ingest_all(b"led on\r");
//! assert_eq!(session.console().last, ["led", "on"]);
//! ```
//!
//! # Keys
//!
//! | Key | Bytes | Action |
//! |-----|-------|--------|
//! | Enter | `\r` or `\n` | Submit line |
//! | Backspace | `0x08` or `0x7F` | Delete before cursor |
//! | Delete | `ESC [ 3 ~` | Delete at cursor |
//! | Left / Right | `ESC [ D` / `ESC [ C`, Ctrl+B / Ctrl+F | Move cursor |
//! | Home / End | `ESC [ 1 ~` / `ESC [ 4 ~`, Ctrl+A / Ctrl+E | Line start / end |
//! | Ctrl+U | `0x15` | Delete to line start |
//! | Ctrl+K | `0x0B` | Delete to line end |

pub mod commands;
pub mod config;
pub mod core;
pub mod ui;

pub use crate::commands::{CommandTable, Flow};
pub use crate::config::{Config, EditorConfig};
pub use crate::core::{Args, Console, Session};
