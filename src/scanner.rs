//! Lenient HTML tokenizer.
//!
//! Splits markup into text, tags and comments without ever failing. A `<`
//! that does not open a well-formed tag comes back as text, an unterminated
//! comment runs to the end of input, and the content of `<script>` and
//! `<style>` is returned untouched as raw text.

use crate::model::Attributes;
use memchr::memchr;
use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

/// Elements whose content is not markup.
const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

/// Elements that never have content or a closing tag.
const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Check if an element is void.
pub fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// A lexical unit of markup.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    /// Character data, entities still encoded
    Text(&'a str),

    /// Content of a raw-text element
    RawText(&'a str),

    /// A start tag
    StartTag(StartTag<'a>),

    /// An end tag
    EndTag {
        /// Lowercase tag name
        name: String,
        /// Tag as written
        raw: &'a str,
    },

    /// A comment, doctype or processing instruction
    Comment(&'a str),
}

impl<'a> Token<'a> {
    /// The token exactly as it appeared in the input.
    pub fn raw(&self) -> &'a str {
        match self {
            Token::Text(s) | Token::RawText(s) | Token::Comment(s) => s,
            Token::StartTag(tag) => tag.raw,
            Token::EndTag { raw, .. } => raw,
        }
    }
}

/// A parsed start tag.
#[derive(Debug, Clone, PartialEq)]
pub struct StartTag<'a> {
    /// Lowercase tag name
    pub name: String,

    /// Attributes with entity-decoded values
    pub attributes: Attributes,

    /// Written as `<name ... />`
    pub self_closing: bool,

    /// Tag as written
    pub raw: &'a str,
}

/// Iterator over the tokens of a markup string.
pub struct Scanner<'a> {
    input: &'a str,
    pos: usize,
    raw_text_until: Option<String>,
}

impl<'a> Scanner<'a> {
    /// Create a scanner over the given markup.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            raw_text_until: None,
        }
    }

    fn scan_markup(&mut self) -> Option<Token<'a>> {
        let input = self.input;
        let bytes = input.as_bytes();
        let start = self.pos;
        let rest = &input[start..];

        if rest.starts_with("<!--") {
            let end = rest[4..]
                .find("-->")
                .map_or(input.len(), |i| start + 4 + i + 3);
            self.pos = end;
            return Some(Token::Comment(&input[start..end]));
        }

        if rest.starts_with("<!") || rest.starts_with("<?") {
            let end = memchr(b'>', rest.as_bytes()).map_or(input.len(), |i| start + i + 1);
            self.pos = end;
            return Some(Token::Comment(&input[start..end]));
        }

        if rest.starts_with("</") {
            let name_start = start + 2;
            let name_len = tag_name_len(&bytes[name_start..]);
            if name_len == 0 {
                return None;
            }
            let name_end = name_start + name_len;
            let gt = name_end + memchr(b'>', &bytes[name_end..])?;
            self.pos = gt + 1;
            return Some(Token::EndTag {
                name: input[name_start..name_end].to_ascii_lowercase(),
                raw: &input[start..=gt],
            });
        }

        let name_start = start + 1;
        let name_len = tag_name_len(&bytes[name_start..]);
        if name_len == 0 {
            return None;
        }
        let name_end = name_start + name_len;
        let gt = find_tag_end(bytes, name_end)?;
        let inner = &input[name_end..gt];
        let self_closing = inner.trim_end().ends_with('/');
        let name = input[name_start..name_end].to_ascii_lowercase();

        if !self_closing && RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
            self.raw_text_until = Some(name.clone());
        }

        self.pos = gt + 1;
        Some(Token::StartTag(StartTag {
            name,
            attributes: parse_attributes(inner),
            self_closing,
            raw: &input[start..=gt],
        }))
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let input = self.input;
        if self.pos >= input.len() {
            return None;
        }

        if let Some(name) = self.raw_text_until.take() {
            let end = find_end_tag(input, self.pos, &name).unwrap_or(input.len());
            if end > self.pos {
                let text = &input[self.pos..end];
                self.pos = end;
                return Some(Token::RawText(text));
            }
        }

        let bytes = input.as_bytes();
        if bytes[self.pos] != b'<' {
            let end = memchr(b'<', &bytes[self.pos..]).map_or(input.len(), |i| self.pos + i);
            let text = &input[self.pos..end];
            self.pos = end;
            return Some(Token::Text(text));
        }

        if let Some(token) = self.scan_markup() {
            return Some(token);
        }

        // Stray '<'
        let start = self.pos;
        self.pos += 1;
        Some(Token::Text(&input[start..self.pos]))
    }
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':' | b'.')
}

// Length of a tag name at the start of `bytes`; names must start with a letter.
fn tag_name_len(bytes: &[u8]) -> usize {
    match bytes.first() {
        Some(b) if b.is_ascii_alphabetic() => {
            bytes.iter().take_while(|b| is_name_byte(**b)).count()
        }
        _ => 0,
    }
}

// Position of the '>' closing a tag, skipping quoted attribute values.
fn find_tag_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (i, &b) in bytes.iter().enumerate().skip(from) {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'>' => return Some(i),
            None => {}
        }
    }
    None
}

// Offset of the `</name` that ends a raw-text element.
fn find_end_tag(input: &str, from: usize, name: &str) -> Option<usize> {
    let bytes = input.as_bytes();
    let mut i = from;
    while let Some(offset) = memchr(b'<', &bytes[i..]) {
        let at = i + offset;
        let name_start = at + 2;
        let name_end = name_start + name.len();
        if bytes.get(at + 1) == Some(&b'/')
            && name_end <= bytes.len()
            && bytes[name_start..name_end].eq_ignore_ascii_case(name.as_bytes())
            && !bytes.get(name_end).is_some_and(|b| is_name_byte(*b))
        {
            return Some(at);
        }
        i = at + 1;
    }
    None
}

fn attribute_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"([^\s"'<>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+)))?"#)
            .expect("attribute pattern is valid")
    })
}

/// Parse the attribute section of a start tag.
pub fn parse_attributes(source: &str) -> Attributes {
    let mut attributes = Attributes::new();
    for caps in attribute_regex().captures_iter(source) {
        let Some(name) = caps.get(1) else { continue };
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map_or("", |m| m.as_str());
        attributes.insert(name.as_str(), decode_entities(value));
    }
    attributes
}

/// Decode character references in text or attribute values.
///
/// Unknown named references are kept literally.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    let bytes = text.as_bytes();
    let Some(first) = memchr(b'&', bytes) else {
        return Cow::Borrowed(text);
    };

    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..first]);
    let mut pos = first;

    while pos < text.len() {
        match memchr(b'&', &bytes[pos..]) {
            Some(offset) => {
                let amp = pos + offset;
                out.push_str(&text[pos..amp]);
                match decode_reference(&text[amp + 1..]) {
                    Some((c, consumed)) => {
                        out.push(c);
                        pos = amp + 1 + consumed;
                    }
                    None => {
                        out.push('&');
                        pos = amp + 1;
                    }
                }
            }
            None => {
                out.push_str(&text[pos..]);
                break;
            }
        }
    }

    Cow::Owned(out)
}

// Decode the reference following '&'; returns the character and bytes consumed.
fn decode_reference(rest: &str) -> Option<(char, usize)> {
    let bytes = rest.as_bytes();

    if bytes.first() == Some(&b'#') {
        let (radix, digits_start) = match bytes.get(1) {
            Some(b'x') | Some(b'X') => (16, 2),
            _ => (10, 1),
        };
        let digits = bytes[digits_start..]
            .iter()
            .take_while(|b| (**b as char).is_digit(radix))
            .count();
        if digits == 0 {
            return None;
        }
        let end = digits_start + digits;
        let value = u32::from_str_radix(&rest[digits_start..end], radix).unwrap_or(u32::MAX);
        let c = match value {
            0 => '\u{FFFD}',
            v => char::from_u32(v).unwrap_or('\u{FFFD}'),
        };
        let consumed = if bytes.get(end) == Some(&b';') { end + 1 } else { end };
        return Some((c, consumed));
    }

    let name_len = bytes
        .iter()
        .take(32)
        .take_while(|b| b.is_ascii_alphanumeric())
        .count();
    if name_len == 0 {
        return None;
    }
    let name = &rest[..name_len];
    let terminated = bytes.get(name_len) == Some(&b';');
    let c = named_entity(name)?;

    if terminated {
        Some((c, name_len + 1))
    } else if matches!(name, "amp" | "lt" | "gt" | "quot" | "nbsp") {
        // Legacy references that browsers accept without ';'
        Some((c, name_len))
    } else {
        None
    }
}

fn named_entity(name: &str) -> Option<char> {
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{A0}',
        "shy" => '\u{AD}',
        "copy" => '©',
        "reg" => '®',
        "trade" => '™',
        "deg" => '°',
        "plusmn" => '±',
        "times" => '×',
        "divide" => '÷',
        "middot" => '·',
        "bull" => '•',
        "hellip" => '…',
        "ndash" => '–',
        "mdash" => '—',
        "lsquo" => '‘',
        "rsquo" => '’',
        "sbquo" => '‚',
        "ldquo" => '“',
        "rdquo" => '”',
        "bdquo" => '„',
        "laquo" => '«',
        "raquo" => '»',
        "iexcl" => '¡',
        "iquest" => '¿',
        "sect" => '§',
        "para" => '¶',
        "cent" => '¢',
        "pound" => '£',
        "yen" => '¥',
        "euro" => '€',
        "larr" => '←',
        "rarr" => '→',
        "uarr" => '↑',
        "darr" => '↓',
        "ensp" => '\u{2002}',
        "emsp" => '\u{2003}',
        "thinsp" => '\u{2009}',
        "zwnj" => '\u{200C}',
        "zwj" => '\u{200D}',
        _ => return None,
    };
    Some(c)
}

/// Escape text for inclusion in markup.
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
