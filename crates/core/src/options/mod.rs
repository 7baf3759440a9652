//! Declarative ffmpeg options and their compilation into argument lists.
//!
//! An [`Options`] value is a plain bag of optional parameters. Each parameter
//! is described by a [`FieldDescriptor`] carrying its flag, [`Shape`] and
//! [`Scope`]. [`compile`] walks the descriptors in declaration order and
//! serializes the populated ones:
//!
//! | Shape | Emitted tokens |
//! |---|---|
//! | `Flag` | the flag, only when `true` |
//! | `Text`, `Int`, `UInt` | flag, value |
//! | `List` | flag, element (per element) |
//! | `Pairs` | flag, `key:value` (per entry) |
//! | `Extra` | key, value (per entry) |
//!
//! # Example
//!
//! ```
//! use transcoder_core::options::{Options, Scope};
//!
//! let options = Options {
//!     inputs: vec!["in.mkv".to_string()],
//!     video_codec: Some("libx264".to_string()),
//!     overwrite: Some(true),
//!     ..Default::default()
//! };
//!
//! assert_eq!(options.compile(Scope::Input), ["-i", "in.mkv"]);
//! assert_eq!(options.compile_all(), ["-i", "in.mkv", "-c:v", "libx264", "-y"]);
//! ```

mod compile;
mod field;
mod schema;

pub use compile::{compile, compile_all};
pub use field::{FieldDescriptor, FieldValue, Scope, Shape};
pub use schema::{Options, FIELDS};
