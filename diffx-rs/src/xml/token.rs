//! Structured tokens.
//!
//! The structural layer only needs to know what kind of token it is looking
//! at and whether an end marker closes a given start marker. Any token type
//! can take part by implementing [`StructuredToken`]; [`XmlToken`] is the
//! ready-made implementation used by the command line tool.

use std::fmt;

/// Structural role of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    StartElement,
    EndElement,
    Attribute,
    Text,
    Other,
}

/// A token that may open or close a nesting level.
pub trait StructuredToken {
    fn kind(&self) -> TokenKind;

    /// Returns true if `self` is the end marker for the start marker `start`.
    fn closes(&self, start: &Self) -> bool;

    fn is_start(&self) -> bool {
        self.kind() == TokenKind::StartElement
    }

    fn is_end(&self) -> bool {
        self.kind() == TokenKind::EndElement
    }

    fn is_attribute(&self) -> bool {
        self.kind() == TokenKind::Attribute
    }
}

/// An XML token as produced by a streaming tokenizer.
///
/// Attributes follow their start element, before any child content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum XmlToken {
    StartElement {
        name: String,
        namespace: Option<String>,
    },
    EndElement {
        name: String,
        namespace: Option<String>,
    },
    Attribute {
        name: String,
        value: String,
        namespace: Option<String>,
    },
    Text(String),
    /// Comments, processing instructions and anything else kept verbatim.
    Other(String),
}

impl XmlToken {
    pub fn start(name: impl Into<String>) -> Self {
        XmlToken::StartElement {
            name: name.into(),
            namespace: None,
        }
    }

    pub fn end(name: impl Into<String>) -> Self {
        XmlToken::EndElement {
            name: name.into(),
            namespace: None,
        }
    }

    pub fn attribute(name: impl Into<String>, value: impl Into<String>) -> Self {
        XmlToken::Attribute {
            name: name.into(),
            value: value.into(),
            namespace: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        XmlToken::Text(text.into())
    }

    /// Same token in the given namespace. Text and other tokens are unchanged.
    pub fn in_namespace(self, uri: impl Into<String>) -> Self {
        let uri = Some(uri.into());
        match self {
            XmlToken::StartElement { name, .. } => XmlToken::StartElement {
                name,
                namespace: uri,
            },
            XmlToken::EndElement { name, .. } => XmlToken::EndElement {
                name,
                namespace: uri,
            },
            XmlToken::Attribute { name, value, .. } => XmlToken::Attribute {
                name,
                value,
                namespace: uri,
            },
            other => other,
        }
    }

    /// Local name of an element or attribute.
    pub fn name(&self) -> Option<&str> {
        match self {
            XmlToken::StartElement { name, .. }
            | XmlToken::EndElement { name, .. }
            | XmlToken::Attribute { name, .. } => Some(name),
            XmlToken::Text(_) | XmlToken::Other(_) => None,
        }
    }
}

impl XmlToken {
    /// Equality that ignores ASCII case in text and attribute values.
    ///
    /// Names are still compared exactly so that nesting is unaffected.
    pub fn eq_ignore_ascii_case(&self, other: &XmlToken) -> bool {
        match (self, other) {
            (XmlToken::Text(a), XmlToken::Text(b)) | (XmlToken::Other(a), XmlToken::Other(b)) => {
                a.eq_ignore_ascii_case(b)
            }
            (
                XmlToken::Attribute {
                    name,
                    value,
                    namespace,
                },
                XmlToken::Attribute {
                    name: other_name,
                    value: other_value,
                    namespace: other_namespace,
                },
            ) => {
                name == other_name
                    && namespace == other_namespace
                    && value.eq_ignore_ascii_case(other_value)
            }
            _ => self == other,
        }
    }
}

impl StructuredToken for XmlToken {
    fn kind(&self) -> TokenKind {
        match self {
            XmlToken::StartElement { .. } => TokenKind::StartElement,
            XmlToken::EndElement { .. } => TokenKind::EndElement,
            XmlToken::Attribute { .. } => TokenKind::Attribute,
            XmlToken::Text(_) => TokenKind::Text,
            XmlToken::Other(_) => TokenKind::Other,
        }
    }

    fn closes(&self, start: &Self) -> bool {
        match (self, start) {
            (
                XmlToken::EndElement { name, namespace },
                XmlToken::StartElement {
                    name: open,
                    namespace: open_namespace,
                },
            ) => name == open && namespace == open_namespace,
            _ => false,
        }
    }
}

impl fmt::Display for XmlToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XmlToken::StartElement { name, .. } => write!(f, "<{}>", name),
            XmlToken::EndElement { name, .. } => write!(f, "</{}>", name),
            XmlToken::Attribute { name, value, .. } => write!(f, "@{}={}", name, value),
            XmlToken::Text(text) => f.write_str(text),
            XmlToken::Other(text) => f.write_str(text),
        }
    }
}
