//! Entry points that read a document and bind it into a destination type.

use std::io::BufRead;

use serde::de::DeserializeOwned;

use crate::de::ValueDeserializer;
use crate::error::Result;
use crate::options::DecodeOptions;
use crate::value::Value;
use crate::xml;

/// Decodes `data` into `destination`.
///
/// The document is read and bound in full before `destination` is written,
/// so on error it keeps its previous contents. On success `destination` is
/// replaced, not merged: a field whose key is absent takes the value serde
/// gives it (its `#[serde(default)]`), not the value it held before the call.
///
/// # Examples
///
/// ```rust
/// use serde::Deserialize;
///
/// #[derive(Default, Deserialize)]
/// #[serde(default)]
/// struct Bucket {
///     #[serde(rename = "BucketName")]
///     name: String,
///     #[serde(rename = "Enabled")]
///     enabled: bool,
/// }
///
/// let xml = br#"<plist version="1.0"><dict>
///     <key>BucketName</key><string>rsc</string>
///     <key>Enabled</key><true/>
/// </dict></plist>"#;
///
/// let mut bucket = Bucket::default();
/// darwin_plist::unmarshal(xml, &mut bucket)?;
/// assert_eq!(bucket.name, "rsc");
/// assert!(bucket.enabled);
/// # Ok::<(), darwin_plist::PlistError>(())
/// ```
pub fn unmarshal<T>(data: &[u8], destination: &mut T) -> Result<()>
where
    T: DeserializeOwned,
{
    *destination = from_slice(data)?;
    Ok(())
}

/// Decodes a plist document held in memory.
pub fn from_slice<T>(data: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    from_slice_with_options(data, &DecodeOptions::default())
}

pub fn from_slice_with_options<T>(data: &[u8], options: &DecodeOptions) -> Result<T>
where
    T: DeserializeOwned,
{
    let value = xml::value_from_slice_with_options(data, options)?;
    from_value_with_options(value, options)
}

pub fn from_str<T>(xml: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_slice(xml.as_bytes())
}

/// Decodes a plist document from a buffered reader.
pub fn from_reader<R, T>(reader: R) -> Result<T>
where
    R: BufRead,
    T: DeserializeOwned,
{
    from_reader_with_options(reader, &DecodeOptions::default())
}

pub fn from_reader_with_options<R, T>(reader: R, options: &DecodeOptions) -> Result<T>
where
    R: BufRead,
    T: DeserializeOwned,
{
    let value = xml::value_from_reader_with_options(reader, options)?;
    from_value_with_options(value, options)
}

/// Binds an already decoded [`Value`] tree.
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: DeserializeOwned,
{
    from_value_with_options(value, &DecodeOptions::default())
}

pub fn from_value_with_options<T>(value: Value, options: &DecodeOptions) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(ValueDeserializer::with_options(value, *options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Deserialize)]
    #[serde(default)]
    struct Flags {
        #[serde(rename = "Enabled")]
        enabled: bool,
        #[serde(rename = "Count")]
        count: i32,
    }

    #[test]
    fn test_unmarshal_keeps_destination_on_error() {
        let mut flags = Flags {
            enabled: true,
            count: 9,
        };
        let err = unmarshal(
            b"<plist><dict><key>Count</key><string>nine</string></dict></plist>",
            &mut flags,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(
            flags,
            Flags {
                enabled: true,
                count: 9
            }
        );
    }

    #[test]
    fn test_from_reader() -> Result<()> {
        let xml = "<plist><dict><key>Enabled</key><true/></dict></plist>";
        let flags: Flags = from_reader(std::io::Cursor::new(xml))?;
        assert_eq!(
            flags,
            Flags {
                enabled: true,
                count: 0
            }
        );
        Ok(())
    }

    #[test]
    fn test_unmarshal_replaces_instead_of_merging() -> Result<()> {
        let mut flags = Flags {
            enabled: false,
            count: 9,
        };
        unmarshal(
            b"<plist><dict><key>Enabled</key><true/></dict></plist>",
            &mut flags,
        )?;
        assert_eq!(
            flags,
            Flags {
                enabled: true,
                count: 0
            }
        );
        Ok(())
    }

    #[test]
    fn test_missing_field_without_default_is_reported() {
        #[derive(Debug, Deserialize)]
        struct Strict {
            #[serde(rename = "Count")]
            #[allow(dead_code)]
            count: i32,
        }

        let err = from_slice_with_options::<Strict>(
            b"<plist><dict><key>Enabled</key><false/></dict></plist>",
            &DecodeOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Custom);
        assert_eq!(err.to_string(), "missing field `Count`");
    }
}
