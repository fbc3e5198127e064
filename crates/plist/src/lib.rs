//! # darwin-plist
//!
//! Decoding of Apple XML property lists into Rust types.
//!
//! Decoding happens in two stages:
//!
//! - **Value building**: the [`xml`] module streams the document with
//!   `quick-xml` and builds a [`Value`] tree for the element inside `<plist>`.
//! - **Binding**: the [`de`] module walks that tree with a `serde`
//!   deserializer, assigning each dictionary entry to the struct field whose
//!   resolved key matches it.
//!
//! ## Field Binding
//!
//! A field binds to the key given by `#[serde(rename = "...")]`, or to its
//! own name when no rename is present. Keys are compared exactly. Dictionary
//! keys with no matching field are ignored. A field with no matching key is
//! filled the way serde fills any missing field: `Option` fields become
//! `None`, and fields covered by `#[serde(default)]` (on the field or on the
//! whole struct) take their default. Any other missing field is an error.
//!
//! | plist element | Rust destination |
//! |---------------|------------------|
//! | `<string>` | `String`, `char`, unit enum variants by name |
//! | `<integer>` | any integer (truncating), `f32`, `f64` |
//! | `<real>` | `f32`, `f64` |
//! | `<true/>`, `<false/>` | `bool` |
//! | `<data>` | `Vec<u8>` |
//! | `<date>` | `String` (RFC 3339), `chrono::DateTime<Utc>` |
//! | `<array>` | `Vec<T>`, tuples, arrays |
//! | `<dict>` | structs, `HashMap`/`BTreeMap` with string keys |
//!
//! ## Examples
//!
//! ```rust
//! use serde::Deserialize;
//!
//! #[derive(Debug, Default, Deserialize)]
//! struct ExcludeKey {
//!     #[serde(rename = "type")]
//!     kind: i64,
//!     #[serde(rename = "text")]
//!     text: String,
//! }
//!
//! #[derive(Debug, Default, Deserialize)]
//! struct Exclude {
//!     #[serde(rename = "excludes")]
//!     excludes: Vec<ExcludeKey>,
//! }
//!
//! #[derive(Debug, Default, Deserialize)]
//! #[serde(default)]
//! struct Bucket {
//!     #[serde(rename = "BucketName")]
//!     name: String,
//!     #[serde(rename = "Excludes")]
//!     excludes: Exclude,
//!     #[serde(rename = "Disabled")]
//!     disabled: bool,
//! }
//!
//! let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
//! <plist version="1.0">
//! <dict>
//!     <key>BucketName</key>
//!     <string>rsc</string>
//!     <key>Excludes</key>
//!     <dict>
//!         <key>excludes</key>
//!         <array>
//!             <dict>
//!                 <key>type</key><integer>2</integer>
//!                 <key>text</key><string>.unison.</string>
//!             </dict>
//!         </array>
//!     </dict>
//! </dict>
//! </plist>"#;
//!
//! let bucket: Bucket = darwin_plist::from_str(xml)?;
//! assert_eq!(bucket.name, "rsc");
//! assert_eq!(bucket.excludes.excludes[0].kind, 2);
//! assert_eq!(bucket.excludes.excludes[0].text, ".unison.");
//! assert!(!bucket.disabled);
//! # Ok::<(), darwin_plist::PlistError>(())
//! ```

pub mod de;
mod decode;
pub mod error;
pub mod json;
pub mod options;
pub mod value;
pub mod xml;

pub use de::ValueDeserializer;
pub use decode::{
    from_reader, from_reader_with_options, from_slice, from_slice_with_options, from_str,
    from_value, from_value_with_options, unmarshal,
};
pub use error::{ErrorKind, PlistError, Result};
pub use options::DecodeOptions;
pub use value::{Dictionary, Value, ValueKind};
