//! Utility functions and constants for reading plist XML.

use quick_xml::escape::resolve_predefined_entity;

/// Name of the document root element.
pub const PLIST_ELEMENT: &str = "plist";

/// Name of the element carrying a dictionary key.
pub const KEY_ELEMENT: &str = "key";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Checks if raw text consists only of XML whitespace.
pub fn is_whitespace_text(text: &[u8]) -> bool {
    text.iter().all(|b| matches!(b, b' ' | b'\n' | b'\r' | b'\t'))
}

/// Strips a leading UTF-8 byte order mark.
pub fn strip_bom(data: &[u8]) -> &[u8] {
    data.strip_prefix(UTF8_BOM).unwrap_or(data)
}

/// Resolves the name of an entity reference (the text between `&` and `;`).
///
/// Handles the five predefined XML entities and decimal/hexadecimal
/// character references. Returns `None` for anything else.
pub fn resolve_entity(name: &str) -> Option<String> {
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix('x').or_else(|| number.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse::<u32>().ok()?,
        };
        return char::from_u32(code).map(String::from);
    }
    resolve_predefined_entity(name).map(str::to_string)
}

/// Removes ASCII whitespace from the body of a `<data>` element.
pub fn compact_base64(text: &str) -> String {
    text.chars().filter(|c| !c.is_ascii_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_whitespace_text() {
        assert!(is_whitespace_text(b""));
        assert!(is_whitespace_text(b" \n\t\r "));
        assert!(!is_whitespace_text(b"  x "));
    }

    #[test]
    fn test_strip_bom() {
        assert_eq!(strip_bom(b"\xEF\xBB\xBF<plist/>"), b"<plist/>");
        assert_eq!(strip_bom(b"<plist/>"), b"<plist/>");
    }

    #[test]
    fn test_resolve_entity() {
        assert_eq!(resolve_entity("amp").as_deref(), Some("&"));
        assert_eq!(resolve_entity("lt").as_deref(), Some("<"));
        assert_eq!(resolve_entity("apos").as_deref(), Some("'"));
        assert_eq!(resolve_entity("#65").as_deref(), Some("A"));
        assert_eq!(resolve_entity("#x263A").as_deref(), Some("\u{263A}"));
        assert_eq!(resolve_entity("nbsp"), None);
        assert_eq!(resolve_entity("#xD800"), None);
        assert_eq!(resolve_entity("#zz"), None);
    }

    #[test]
    fn test_compact_base64() {
        assert_eq!(compact_base64("\n\tAAEC\n  Aw==\n"), "AAECAw==");
    }
}
