//! XML property list parser.
//!
//! Reads the Apple `plist` DTD with a `quick-xml` pull reader. The root
//! `<plist>` element wraps at most one value; an empty root yields `Null`.
//! Booleans become integers 0/1 and dates become seconds since
//! 2001-01-01T00:00:00Z.

use crate::{date, MAX_NESTING};
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use plistab_core::{Error, PlistMap, Result, Value};
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use std::fmt;
use std::str;

const FORMAT: &str = "XML";

/// `<data>` payloads are wrapped at arbitrary columns and not always padded.
const BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Element names of the property list vocabulary.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Tag {
    Plist,
    Dict,
    Key,
    Array,
    String,
    Integer,
    Real,
    True,
    False,
    Date,
    Data,
    Other(String),
}

impl Tag {
    fn from_name(name: &[u8]) -> Self {
        match name {
            b"plist" => Tag::Plist,
            b"dict" => Tag::Dict,
            b"key" => Tag::Key,
            b"array" => Tag::Array,
            b"string" => Tag::String,
            b"integer" => Tag::Integer,
            b"real" => Tag::Real,
            b"true" => Tag::True,
            b"false" => Tag::False,
            b"date" => Tag::Date,
            b"data" => Tag::Data,
            other => Tag::Other(String::from_utf8_lossy(other).into_owned()),
        }
    }

    fn name(&self) -> &str {
        match self {
            Tag::Plist => "plist",
            Tag::Dict => "dict",
            Tag::Key => "key",
            Tag::Array => "array",
            Tag::String => "string",
            Tag::Integer => "integer",
            Tag::Real => "real",
            Tag::True => "true",
            Tag::False => "false",
            Tag::Date => "date",
            Tag::Data => "data",
            Tag::Other(name) => name,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.name())
    }
}

/// Structural events, with whitespace, comments and the prolog skipped.
enum Node {
    /// An opening tag; `true` for a self-closing one.
    Open(Tag, bool),
    Close(Tag),
    Eof,
}

/// Parses an XML property list into a value tree.
pub fn parse(bytes: &[u8]) -> Result<Value> {
    XmlParser::new(bytes).parse()
}

struct XmlParser<'a> {
    reader: Reader<&'a [u8]>,
    /// Open `<dict>` and `<array>` elements.
    depth: usize,
}

impl<'a> XmlParser<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        let mut reader = Reader::from_reader(bytes);
        reader.config_mut().check_end_names = true;
        Self { reader, depth: 0 }
    }

    fn parse(mut self) -> Result<Value> {
        let empty = match self.next_node()? {
            Node::Open(Tag::Plist, empty) => empty,
            Node::Open(tag, _) => return Err(self.error(format!("expected <plist>, found {}", tag))),
            Node::Close(tag) => return Err(self.error(format!("unexpected closing {}", tag))),
            Node::Eof => return Err(self.error("no <plist> element")),
        };

        let value = if empty {
            Value::Null
        } else {
            match self.next_node()? {
                Node::Close(Tag::Plist) => Value::Null,
                Node::Open(tag, empty) => {
                    let value = self.parse_value(tag, empty)?;
                    self.expect_close(&Tag::Plist)?;
                    value
                }
                Node::Close(tag) => return Err(self.error(format!("unexpected closing {}", tag))),
                Node::Eof => return Err(self.error("unexpected end of document")),
            }
        };

        match self.next_node()? {
            Node::Eof => Ok(value),
            _ => Err(self.error("content after </plist>")),
        }
    }

    fn parse_value(&mut self, tag: Tag, empty: bool) -> Result<Value> {
        match tag {
            Tag::Dict | Tag::Array => {
                if self.depth >= MAX_NESTING {
                    return Err(self.error("nesting too deep"));
                }
                self.depth += 1;
                let value = if tag == Tag::Dict {
                    self.parse_dict(empty)
                } else {
                    self.parse_array(empty)
                };
                self.depth -= 1;
                value
            }
            Tag::String => Ok(Value::text(self.read_text(&tag, empty)?)),
            Tag::Integer => {
                let text = self.read_text(&tag, empty)?;
                parse_integer(&text)
                    .map(Value::integer)
                    .ok_or_else(|| self.error(format!("invalid integer '{}'", text.trim())))
            }
            Tag::Real => {
                let text = self.read_text(&tag, empty)?;
                text.trim()
                    .parse::<f64>()
                    .map(Value::real)
                    .map_err(|_| self.error(format!("invalid real '{}'", text.trim())))
            }
            Tag::True | Tag::False => {
                let text = self.read_text(&tag, empty)?;
                if !text.trim().is_empty() {
                    return Err(self.error(format!("{} must be empty", tag)));
                }
                Ok(Value::boolean(tag == Tag::True))
            }
            Tag::Date => {
                let text = self.read_text(&tag, empty)?;
                date::parse_iso8601(&text)
                    .map(Value::real)
                    .ok_or_else(|| self.error(format!("invalid date '{}'", text.trim())))
            }
            Tag::Data => {
                let text = self.read_text(&tag, empty)?;
                let compact: Vec<u8> = text.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
                BASE64
                    .decode(&compact)
                    .map(Value::blob)
                    .map_err(|err| self.error(format!("invalid base64 data: {}", err)))
            }
            Tag::Key => Err(self.error("<key> outside of <dict>")),
            Tag::Plist => Err(self.error("nested <plist>")),
            Tag::Other(_) => Err(self.error(format!("unknown element {}", tag))),
        }
    }

    fn parse_dict(&mut self, empty: bool) -> Result<Value> {
        let mut map = PlistMap::new();
        if empty {
            return Ok(Value::map(map));
        }
        loop {
            match self.next_node()? {
                Node::Close(Tag::Dict) => return Ok(Value::map(map)),
                Node::Open(Tag::Key, key_empty) => {
                    let key = self.read_text(&Tag::Key, key_empty)?;
                    let value = match self.next_node()? {
                        Node::Open(tag, empty) if tag != Tag::Key => self.parse_value(tag, empty)?,
                        _ => return Err(self.error(format!("key '{}' has no value", key))),
                    };
                    map.insert(key, value);
                }
                Node::Open(tag, _) => {
                    return Err(self.error(format!("expected <key> in <dict>, found {}", tag)))
                }
                Node::Close(tag) => return Err(self.error(format!("unexpected closing {}", tag))),
                Node::Eof => return Err(self.error("unexpected end of document in <dict>")),
            }
        }
    }

    fn parse_array(&mut self, empty: bool) -> Result<Value> {
        let mut items = Vec::new();
        if empty {
            return Ok(Value::list(items));
        }
        loop {
            match self.next_node()? {
                Node::Close(Tag::Array) => return Ok(Value::list(items)),
                Node::Open(tag, empty) => items.push(self.parse_value(tag, empty)?),
                Node::Close(tag) => return Err(self.error(format!("unexpected closing {}", tag))),
                Node::Eof => return Err(self.error("unexpected end of document in <array>")),
            }
        }
    }

    /// Reads the character content of a leaf element up to its closing tag.
    fn read_text(&mut self, tag: &Tag, empty: bool) -> Result<String> {
        let mut text = String::new();
        if empty {
            return Ok(text);
        }
        loop {
            match self.event()? {
                Event::Text(e) => text.push_str(self.utf8(&e)?),
                Event::CData(e) => text.push_str(self.utf8(&e)?),
                Event::GeneralRef(e) => {
                    let name = self.utf8(&e)?;
                    let resolved = resolve_reference(name)
                        .ok_or_else(|| self.error(format!("unknown entity '&{};'", name)))?;
                    text.push_str(&resolved);
                }
                Event::End(e) => {
                    let closing = Tag::from_name(e.name().as_ref());
                    if closing == *tag {
                        return Ok(text);
                    }
                    return Err(self.error(format!("unexpected closing {} in {}", closing, tag)));
                }
                Event::Start(e) | Event::Empty(e) => {
                    let inner = Tag::from_name(e.name().as_ref());
                    return Err(self.error(format!("unexpected {} in {}", inner, tag)));
                }
                Event::Eof => return Err(self.error(format!("unexpected end of document in {}", tag))),
                _ => {}
            }
        }
    }

    fn expect_close(&mut self, tag: &Tag) -> Result<()> {
        match self.next_node()? {
            Node::Close(closing) if closing == *tag => Ok(()),
            Node::Open(extra, _) => Err(self.error(format!("unexpected {} in {}", extra, tag))),
            _ => Err(self.error(format!("expected closing {}", tag))),
        }
    }

    fn next_node(&mut self) -> Result<Node> {
        loop {
            match self.event()? {
                Event::Start(e) => return Ok(Node::Open(Tag::from_name(e.name().as_ref()), false)),
                Event::Empty(e) => return Ok(Node::Open(Tag::from_name(e.name().as_ref()), true)),
                Event::End(e) => return Ok(Node::Close(Tag::from_name(e.name().as_ref()))),
                Event::Text(e) => {
                    if !e.iter().all(u8::is_ascii_whitespace) {
                        return Err(self.error("unexpected text between elements"));
                    }
                }
                Event::CData(_) | Event::GeneralRef(_) => {
                    return Err(self.error("unexpected text between elements"))
                }
                Event::Eof => return Ok(Node::Eof),
                _ => {}
            }
        }
    }

    fn event(&mut self) -> Result<Event<'a>> {
        match self.reader.read_event() {
            Ok(event) => Ok(event),
            Err(err) => Err(self.error(err.to_string())),
        }
    }

    fn utf8<'b>(&self, bytes: &'b [u8]) -> Result<&'b str> {
        str::from_utf8(bytes).map_err(|err| self.error(format!("invalid UTF-8: {}", err)))
    }

    fn error(&self, message: impl fmt::Display) -> Error {
        Error::parse(
            FORMAT,
            format!("{} (at byte {})", message, self.reader.buffer_position()),
        )
    }
}

/// Resolves the body of `&name;`, either a character reference or one of the
/// five predefined entities.
fn resolve_reference(name: &str) -> Option<String> {
    if let Some(code) = name.strip_prefix('#') {
        let scalar = match code.strip_prefix('x').or_else(|| code.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => code.parse::<u32>().ok()?,
        };
        return char::from_u32(scalar).map(String::from);
    }
    resolve_predefined_entity(name).map(String::from)
}

/// Parses a decimal or `0x` hexadecimal integer with an optional sign.
///
/// Magnitudes above `i64::MAX` wrap, matching how 16-byte binary integers
/// are read.
fn parse_integer(text: &str) -> Option<i64> {
    let text = text.trim();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    if digits.starts_with(['+', '-']) {
        return None;
    }
    let magnitude = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok()?,
        None => digits.parse::<u64>().ok()?,
    };
    if negative {
        if magnitude > i64::MAX as u64 + 1 {
            return None;
        }
        Some((magnitude as i64).wrapping_neg())
    } else {
        Some(magnitude as i64)
    }
}
