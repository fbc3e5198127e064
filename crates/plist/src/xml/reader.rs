//! Builds a [`Value`] tree from quick-xml events.
//!
//! The builder walks the event stream once. Whitespace, comments and
//! processing instructions between elements are insignificant; everything
//! else must fit the plist grammar.

use std::io::BufRead;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::{debug, trace};

use super::utils::{
    KEY_ELEMENT, PLIST_ELEMENT, compact_base64, is_whitespace_text, resolve_entity, strip_bom,
};
use crate::error::{PlistError, Result};
use crate::options::DecodeOptions;
use crate::value::{Dictionary, Value};

/// Decode a plist document from bytes into its value tree.
///
/// # Examples
///
/// ```
/// use darwin_plist::xml::value_from_slice;
///
/// let xml = br#"<plist version="1.0"><array><integer>1</integer></array></plist>"#;
/// let value = value_from_slice(xml)?;
/// assert_eq!(value.as_array().map(|items| items.len()), Some(1));
/// # Ok::<(), darwin_plist::PlistError>(())
/// ```
pub fn value_from_slice(data: &[u8]) -> Result<Value> {
    value_from_slice_with_options(data, &DecodeOptions::default())
}

/// Decode a plist document from bytes with explicit options.
pub fn value_from_slice_with_options(data: &[u8], options: &DecodeOptions) -> Result<Value> {
    value_from_reader_with_options(strip_bom(data), options)
}

/// Decode a plist document from a string into its value tree.
pub fn value_from_str(xml: &str) -> Result<Value> {
    value_from_slice(xml.as_bytes())
}

/// Decode a plist document from a buffered reader into its value tree.
pub fn value_from_reader<R: BufRead>(reader: R) -> Result<Value> {
    value_from_reader_with_options(reader, &DecodeOptions::default())
}

/// Decode a plist document from a buffered reader with explicit options.
pub fn value_from_reader_with_options<R: BufRead>(
    reader: R,
    options: &DecodeOptions,
) -> Result<Value> {
    ValueBuilder::new(Reader::from_reader(reader), options).read_document()
}

/// An element boundary inside a container.
enum Node {
    /// A start tag, or a self-closing tag when the flag is set.
    Open(BytesStart<'static>, bool),
    Close,
}

/// Reads plist elements from a quick-xml reader.
struct ValueBuilder<R: BufRead> {
    reader: Reader<R>,
    /// Buffer for reading events
    buf: Vec<u8>,
    max_depth: usize,
    /// Number of value elements currently open
    depth: usize,
}

impl<R: BufRead> ValueBuilder<R> {
    fn new(reader: Reader<R>, options: &DecodeOptions) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            max_depth: options.max_depth,
            depth: 0,
        }
    }

    fn next_event(&mut self) -> Result<Event<'static>> {
        self.buf.clear();
        match self.reader.read_event_into(&mut self.buf) {
            Ok(event) => Ok(event.into_owned()),
            Err(source) => Err(PlistError::Xml {
                position: self.reader.buffer_position() as u64,
                source,
            }),
        }
    }

    /// Reads `<plist>`, its single value, and the end of the document.
    fn read_document(mut self) -> Result<Value> {
        loop {
            match self.next_event()? {
                Event::Start(start) => {
                    let name = element_name(&start);
                    if name != PLIST_ELEMENT {
                        return Err(PlistError::MalformedDocument(format!(
                            "expected <plist> root element, found <{}>",
                            name
                        )));
                    }
                    break;
                }
                Event::Empty(start) => {
                    let name = element_name(&start);
                    return Err(PlistError::MalformedDocument(if name == PLIST_ELEMENT {
                        "<plist> contains no value".to_string()
                    } else {
                        format!("expected <plist> root element, found <{}>", name)
                    }));
                }
                Event::Decl(_) | Event::DocType(_) | Event::Comment(_) | Event::PI(_) => {
                    trace!("skipping prolog event");
                    continue;
                }
                Event::Text(text) if is_whitespace_text(&text) => continue,
                Event::Eof => {
                    return Err(PlistError::MalformedDocument(
                        "document has no root element".to_string(),
                    ));
                }
                _ => {
                    return Err(PlistError::MalformedDocument(
                        "unexpected content before <plist>".to_string(),
                    ));
                }
            }
        }

        let root = match self.next_significant("<plist>")? {
            Node::Open(start, empty) => self.read_element(start, empty)?,
            Node::Close => {
                return Err(PlistError::MalformedDocument(
                    "<plist> contains no value".to_string(),
                ));
            }
        };
        debug!(root = %root.kind(), "decoded plist root");

        if let Node::Open(..) = self.next_significant("<plist>")? {
            return Err(PlistError::MalformedDocument(
                "<plist> must contain exactly one value".to_string(),
            ));
        }

        loop {
            match self.next_event()? {
                Event::Eof => return Ok(root),
                Event::Comment(_) | Event::PI(_) => continue,
                Event::Text(text) if is_whitespace_text(&text) => continue,
                _ => {
                    return Err(PlistError::MalformedDocument(
                        "unexpected content after </plist>".to_string(),
                    ));
                }
            }
        }
    }

    /// Returns the next element boundary, skipping insignificant events.
    fn next_significant(&mut self, context: &str) -> Result<Node> {
        loop {
            match self.next_event()? {
                Event::Start(start) => return Ok(Node::Open(start, false)),
                Event::Empty(start) => return Ok(Node::Open(start, true)),
                Event::End(_) => return Ok(Node::Close),
                Event::Text(text) if is_whitespace_text(&text) => continue,
                Event::Comment(_) | Event::PI(_) => continue,
                Event::Text(text) => {
                    return Err(PlistError::MalformedDocument(format!(
                        "unexpected text {:?} inside {}",
                        String::from_utf8_lossy(&text).trim(),
                        context
                    )));
                }
                Event::Eof => {
                    return Err(PlistError::MalformedDocument(format!(
                        "unexpected end of document inside {}",
                        context
                    )));
                }
                _ => {
                    return Err(PlistError::MalformedDocument(format!(
                        "unexpected content inside {}",
                        context
                    )));
                }
            }
        }
    }

    /// Builds the value for an element whose start (or empty) event was just read.
    fn read_element(&mut self, start: BytesStart<'static>, empty: bool) -> Result<Value> {
        let name = element_name(&start);

        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(PlistError::MalformedDocument(format!(
                "nesting exceeds maximum depth of {}",
                self.max_depth
            )));
        }

        let value = match name.as_str() {
            "string" => Value::String(self.read_text(empty)?),
            "integer" => {
                let text = self.read_text(empty)?;
                let n = text
                    .trim()
                    .parse::<i64>()
                    .map_err(|e| PlistError::parse("integer", &text, e))?;
                Value::Integer(n)
            }
            "real" => {
                let text = self.read_text(empty)?;
                let x = text
                    .trim()
                    .parse::<f64>()
                    .map_err(|e| PlistError::parse("real", &text, e))?;
                Value::Real(x)
            }
            "true" | "false" => {
                let text = self.read_text(empty)?;
                if !text.trim().is_empty() {
                    return Err(PlistError::MalformedDocument(format!(
                        "<{}> must be empty",
                        name
                    )));
                }
                Value::Boolean(name == "true")
            }
            "data" => {
                let text = self.read_text(empty)?;
                let bytes = STANDARD
                    .decode(compact_base64(&text))
                    .map_err(|e| PlistError::parse("data", &text, e))?;
                Value::Data(bytes)
            }
            "date" => {
                let text = self.read_text(empty)?;
                let date = DateTime::parse_from_rfc3339(text.trim())
                    .map_err(|e| PlistError::parse("date", &text, e))?;
                Value::Date(date.with_timezone(&Utc))
            }
            "array" => Value::Array(self.read_array(empty)?),
            "dict" => Value::Dictionary(self.read_dict(empty)?),
            _ => return Err(PlistError::UnsupportedElement { name }),
        };

        self.depth -= 1;
        Ok(value)
    }

    fn read_array(&mut self, empty: bool) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        if empty {
            return Ok(items);
        }
        loop {
            match self.next_significant("<array>")? {
                Node::Close => return Ok(items),
                Node::Open(start, empty) => items.push(self.read_element(start, empty)?),
            }
        }
    }

    fn read_dict(&mut self, empty: bool) -> Result<Dictionary> {
        let mut dict = Dictionary::new();
        if empty {
            return Ok(dict);
        }
        loop {
            let key = match self.next_significant("<dict>")? {
                Node::Close => return Ok(dict),
                Node::Open(start, empty) if element_name(&start) == KEY_ELEMENT => {
                    self.read_text(empty)?
                }
                Node::Open(start, _) => {
                    return Err(PlistError::MalformedDictPairing(format!(
                        "expected <key>, found <{}>",
                        element_name(&start)
                    )));
                }
            };

            let value = match self.next_significant("<dict>")? {
                Node::Open(start, empty) if element_name(&start) != KEY_ELEMENT => {
                    self.read_element(start, empty)?
                }
                _ => {
                    return Err(PlistError::MalformedDictPairing(format!(
                        "key {:?} has no value",
                        key
                    )));
                }
            };

            if dict.insert(key.clone(), value).is_some() {
                trace!(key = %key, "duplicate dict key, keeping last value");
            }
        }
    }

    /// Collects the text content of the current element up to its end tag.
    ///
    /// Nested elements are dropped but their text is kept, so
    /// `<string>foo<br/>baz</string>` reads as `foobaz`.
    fn read_text(&mut self, empty: bool) -> Result<String> {
        let mut text = String::new();
        if empty {
            return Ok(text);
        }
        let mut nested = 0usize;
        loop {
            match self.next_event()? {
                Event::Text(raw) => text.push_str(utf8(&raw)?),
                Event::CData(raw) => text.push_str(utf8(&raw)?),
                Event::GeneralRef(reference) => {
                    let name = utf8(&reference)?;
                    let resolved = resolve_entity(name).ok_or_else(|| {
                        PlistError::MalformedDocument(format!("unknown entity &{};", name))
                    })?;
                    text.push_str(&resolved);
                }
                Event::Start(_) => nested += 1,
                Event::Empty(_) => {}
                Event::End(_) => {
                    if nested == 0 {
                        return Ok(text);
                    }
                    nested -= 1;
                }
                Event::Comment(_) | Event::PI(_) => continue,
                Event::Eof => {
                    return Err(PlistError::MalformedDocument(
                        "unexpected end of document inside text element".to_string(),
                    ));
                }
                Event::Decl(_) | Event::DocType(_) => {
                    return Err(PlistError::MalformedDocument(
                        "unexpected declaration inside text element".to_string(),
                    ));
                }
            }
        }
    }
}

fn element_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.name().as_ref()).to_string()
}

fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes)
        .map_err(|e| PlistError::MalformedDocument(format!("invalid UTF-8: {}", e)))
}
