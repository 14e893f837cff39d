//! Turns input files into token sequences.
//!
//! Text is split by line, word or character. XML is read with quick-xml's
//! streaming API into [`XmlToken`]s: start and end elements, attributes
//! right after their start element, whitespace-normalised text, and
//! comments and processing instructions kept verbatim.

use std::error::Error;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use clap::ValueEnum;
use diffx::XmlToken;
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

type Result<T> = std::result::Result<T, Box<dyn Error>>;

/// How input files are split into tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Granularity {
    Line,
    Word,
    Char,
    Xml,
}

/// Splits `text` into string tokens. `Granularity::Xml` is handled by
/// [`xml_file`] instead and yields lines here.
pub fn text(text: &str, granularity: Granularity) -> Vec<String> {
    match granularity {
        Granularity::Line | Granularity::Xml => text.lines().map(String::from).collect(),
        Granularity::Word => text.split_whitespace().map(String::from).collect(),
        Granularity::Char => text.chars().map(String::from).collect(),
    }
}

pub fn xml_file<P: AsRef<Path>>(path: P) -> Result<Vec<XmlToken>> {
    let file = File::open(path)?;
    let mut reader = Reader::from_reader(BufReader::new(file));
    configure(&mut reader);
    read_tokens(&mut reader)
}

#[cfg(test)]
fn xml_str(xml: &str) -> Result<Vec<XmlToken>> {
    let mut reader = Reader::from_str(xml);
    configure(&mut reader);
    read_tokens(&mut reader)
}

fn configure<R>(reader: &mut Reader<R>) {
    // whitespace is normalised by the tokenizer
    reader.config_mut().trim_text_start = false;
    reader.config_mut().trim_text_end = false;
}

fn read_tokens<R: BufRead>(reader: &mut Reader<R>) -> Result<Vec<XmlToken>> {
    let mut tokens = Vec::new();
    let mut text = String::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                flush_text(&mut text, &mut tokens);
                let name = push_start(e, reader, &mut tokens)?;
                tracing::trace!(%name, "start element");
            }
            Event::Empty(ref e) => {
                flush_text(&mut text, &mut tokens);
                let name = push_start(e, reader, &mut tokens)?;
                tokens.push(XmlToken::end(name));
            }
            Event::End(ref e) => {
                flush_text(&mut text, &mut tokens);
                let name = reader.decoder().decode(e.name().as_ref())?.to_string();
                tokens.push(XmlToken::end(name));
            }
            Event::Text(e) => {
                let raw = std::str::from_utf8(e.as_ref())?;
                text.push_str(&unescape(raw)?);
            }
            Event::CData(e) => {
                text.push_str(&String::from_utf8_lossy(e.as_ref()));
            }
            Event::GeneralRef(e) => {
                let name = reader.decoder().decode(e.as_ref())?;
                if let Some(ch) = e.resolve_char_ref()? {
                    text.push(ch);
                } else if let Some(value) = resolve_predefined_entity(&name) {
                    text.push_str(value);
                } else {
                    text.push('&');
                    text.push_str(&name);
                    text.push(';');
                }
            }
            Event::Comment(e) => {
                flush_text(&mut text, &mut tokens);
                let comment = String::from_utf8_lossy(e.as_ref());
                tokens.push(XmlToken::Other(format!("<!--{}-->", comment)));
            }
            Event::PI(e) => {
                flush_text(&mut text, &mut tokens);
                let instruction = String::from_utf8_lossy(e.as_ref());
                tokens.push(XmlToken::Other(format!("<?{}?>", instruction)));
            }
            Event::Decl(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
        buf.clear();
    }
    flush_text(&mut text, &mut tokens);
    Ok(tokens)
}

/// Pushes the start element and its attributes, returning the element name.
fn push_start<R>(e: &BytesStart, reader: &Reader<R>, tokens: &mut Vec<XmlToken>) -> Result<String> {
    let name = reader.decoder().decode(e.name().as_ref())?.to_string();
    tokens.push(XmlToken::start(name.as_str()));
    for attribute in e.attributes() {
        let attribute = attribute?;
        let key = reader.decoder().decode(attribute.key.as_ref())?.to_string();
        let value = attribute.unescape_value()?.to_string();
        tokens.push(XmlToken::attribute(key, value));
    }
    Ok(name)
}

/// Emits the pending text as one token if it has any non-whitespace content.
fn flush_text(text: &mut String, tokens: &mut Vec<XmlToken>) {
    if let Some(normalized) = normalize_whitespace(text) {
        tokens.push(XmlToken::Text(normalized));
    }
    text.clear();
}

/// Collapses whitespace runs to one space and trims both ends.
fn normalize_whitespace(text: &str) -> Option<String> {
    let mut result = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !result.is_empty() {
            result.push(' ');
        }
        result.push_str(word);
    }
    if result.is_empty() {
        None
    } else {
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_granularity() {
        let input = "one two\nthree";
        assert_eq!(text(input, Granularity::Line), vec!["one two", "three"]);
        assert_eq!(text(input, Granularity::Word), vec!["one", "two", "three"]);
        assert_eq!(text("ab", Granularity::Char), vec!["a", "b"]);
    }

    #[test]
    fn test_xml_tokens() {
        let tokens = xml_str(r#"<?xml version="1.0"?><doc id="1"><p>Hello   <b>big</b>
            world</p><br/><!-- note --></doc>"#)
        .unwrap();
        assert_eq!(
            tokens,
            vec![
                XmlToken::start("doc"),
                XmlToken::attribute("id", "1"),
                XmlToken::start("p"),
                XmlToken::text("Hello"),
                XmlToken::start("b"),
                XmlToken::text("big"),
                XmlToken::end("b"),
                XmlToken::text("world"),
                XmlToken::end("p"),
                XmlToken::start("br"),
                XmlToken::end("br"),
                XmlToken::Other("<!-- note -->".to_string()),
                XmlToken::end("doc"),
            ]
        );
    }

    #[test]
    fn test_entities() {
        let tokens = xml_str("<a>x &amp; y &#65;</a>").unwrap();
        assert_eq!(tokens[1], XmlToken::text("x & y A"));
    }

    #[test]
    fn test_malformed() {
        assert!(xml_str("<a><b></a>").is_err());
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a \n\t b "), Some("a b".to_string()));
        assert_eq!(normalize_whitespace(" \n "), None);
    }
}
