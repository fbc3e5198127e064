//! Reading Apple XML property lists into a [`Value`](crate::Value) tree.
//!
//! The reader streams quick-xml events and builds a value tree for the single
//! element nested inside `<plist>`. A leading XML declaration, `<!DOCTYPE>`,
//! comments and processing instructions are skipped.
//!
//! ## Element Mapping
//!
//! | Element | Value | Notes |
//! |---------|-------|-------|
//! | `<string>` | `Value::String` | text runs concatenated, nested tags dropped |
//! | `<integer>` | `Value::Integer` | base-10 `i64` |
//! | `<real>` | `Value::Real` | `f64`, accepts `nan` and `inf` |
//! | `<true/>`, `<false/>` | `Value::Boolean` | must be empty |
//! | `<data>` | `Value::Data` | base64, whitespace ignored |
//! | `<date>` | `Value::Date` | RFC 3339, normalised to UTC |
//! | `<array>` | `Value::Array` | order preserved |
//! | `<dict>` | `Value::Dictionary` | `<key>`/value pairs, last duplicate wins |
//!
//! Any other element in value position is rejected.
//!
//! ## Examples
//!
//! ```
//! use darwin_plist::xml::value_from_str;
//!
//! let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
//! <!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
//! <plist version="1.0">
//!   <dict>
//!     <key>BucketName</key>
//!     <string>rsc</string>
//!   </dict>
//! </plist>"#;
//! let value = value_from_str(xml)?;
//! assert_eq!(value.get("BucketName").and_then(|v| v.as_str()), Some("rsc"));
//! # Ok::<(), darwin_plist::PlistError>(())
//! ```

mod reader;
mod utils;

pub use reader::{
    value_from_reader, value_from_reader_with_options, value_from_slice,
    value_from_slice_with_options, value_from_str,
};
