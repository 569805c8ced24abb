//! Minimal XML reader for packed netlist files.
//!
//! Handles the subset the packer writes: an optional `<?xml ...?>`
//! declaration, comments, `<!DOCTYPE>`, CDATA, elements with single- or
//! double-quoted attributes, self-closing tags, text content, and the five
//! predefined entities plus numeric character references. Namespaces and
//! processing instructions inside the document are not interpreted.

use std::fmt;

/// An XML syntax error at a byte offset of the input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at byte {offset}")]
pub struct XmlError {
    /// Byte offset where the problem was detected.
    pub offset: usize,
    /// What went wrong.
    pub message: String,
}

impl XmlError {
    fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

/// An element with its attributes, child elements and concatenated text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// Tag name.
    pub name: String,
    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,
    /// Child elements in document order.
    pub children: Vec<Element>,
    /// All character data directly inside this element, entities decoded.
    pub text: String,
    /// Byte offset of the `<` opening this element.
    pub offset: usize,
}

impl Element {
    /// Returns the value of an attribute.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the first child element with the given tag.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Iterates over the child elements with the given tag.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.name)?;
        for (key, value) in &self.attributes {
            write!(f, " {key}=\"{value}\"")?;
        }
        write!(f, ">")
    }
}

/// Parses a whole document and returns its root element.
pub fn parse_document(src: &str) -> Result<Element, XmlError> {
    Reader { src, pos: 0 }.document()
}

struct Reader<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Reader<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    /// Advances past the next occurrence of `terminator`.
    fn skip_past(&mut self, terminator: &str, what: &str) -> Result<&'a str, XmlError> {
        let start = self.pos;
        match self.rest().find(terminator) {
            Some(idx) => {
                let skipped = &self.src[start..start + idx];
                self.pos = start + idx + terminator.len();
                Ok(skipped)
            }
            None => Err(XmlError::new(start, format!("unterminated {what}"))),
        }
    }

    fn skip_whitespace(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.src.len() - trimmed.len();
    }

    fn name(&mut self) -> Result<&'a str, XmlError> {
        let rest = self.rest();
        let len = rest
            .find(|c: char| c.is_whitespace() || matches!(c, '/' | '>' | '=' | '<'))
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(XmlError::new(self.pos, "expected a name"));
        }
        self.pos += len;
        Ok(&rest[..len])
    }

    fn document(mut self) -> Result<Element, XmlError> {
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let text_start = self.pos;
            let text_len = self.rest().find('<').unwrap_or(self.rest().len());
            let raw = &self.src[text_start..text_start + text_len];
            self.pos += text_len;
            match stack.last_mut() {
                Some(open) => open.text.push_str(&decode_entities(raw, text_start)?),
                None if !raw.trim().is_empty() => {
                    return Err(XmlError::new(text_start, "text outside the root element"));
                }
                None => {}
            }

            if self.eof() {
                break;
            }
            let rest = self.rest();
            if rest.starts_with("<?") {
                self.skip_past("?>", "processing instruction")?;
            } else if rest.starts_with("<!--") {
                self.skip_past("-->", "comment")?;
            } else if rest.starts_with("<![CDATA[") {
                let at = self.pos;
                self.pos += "<![CDATA[".len();
                let data = self.skip_past("]]>", "CDATA section")?;
                match stack.last_mut() {
                    Some(open) => open.text.push_str(data),
                    None => return Err(XmlError::new(at, "CDATA outside the root element")),
                }
            } else if rest.starts_with("<!") {
                self.skip_past(">", "declaration")?;
            } else if rest.starts_with("</") {
                let at = self.pos;
                self.pos += 2;
                let name = self.name()?;
                self.skip_whitespace();
                if !self.rest().starts_with('>') {
                    return Err(XmlError::new(self.pos, "expected `>`"));
                }
                self.pos += 1;
                let element = match stack.pop() {
                    Some(element) if element.name == name => element,
                    Some(element) => {
                        return Err(XmlError::new(
                            at,
                            format!("`</{name}>` closes `<{}>`", element.name),
                        ))
                    }
                    None => return Err(XmlError::new(at, format!("unmatched `</{name}>`"))),
                };
                attach(&mut stack, &mut root, element)?;
            } else {
                let (element, self_closing) = self.start_tag()?;
                if self_closing {
                    attach(&mut stack, &mut root, element)?;
                } else {
                    stack.push(element);
                }
            }
        }

        if let Some(open) = stack.last() {
            return Err(XmlError::new(
                open.offset,
                format!("`<{}>` is never closed", open.name),
            ));
        }
        root.ok_or_else(|| XmlError::new(0, "document has no root element"))
    }

    fn start_tag(&mut self) -> Result<(Element, bool), XmlError> {
        let offset = self.pos;
        self.pos += 1;
        let name = self.name()?;
        let mut element = Element {
            name: name.to_string(),
            offset,
            ..Element::default()
        };

        loop {
            self.skip_whitespace();
            let rest = self.rest();
            if rest.starts_with("/>") {
                self.pos += 2;
                return Ok((element, true));
            }
            if rest.starts_with('>') {
                self.pos += 1;
                return Ok((element, false));
            }
            if rest.is_empty() {
                return Err(XmlError::new(offset, format!("unterminated `<{name}>` tag")));
            }

            let key = self.name()?;
            self.skip_whitespace();
            if !self.rest().starts_with('=') {
                return Err(XmlError::new(
                    self.pos,
                    format!("expected `=` after attribute `{key}`"),
                ));
            }
            self.pos += 1;
            self.skip_whitespace();
            let quote = match self.rest().chars().next() {
                Some(q @ ('"' | '\'')) => q,
                _ => {
                    return Err(XmlError::new(
                        self.pos,
                        format!("attribute `{key}` value must be quoted"),
                    ))
                }
            };
            self.pos += 1;
            let value_start = self.pos;
            let len = self
                .rest()
                .find(quote)
                .ok_or_else(|| XmlError::new(value_start, "unterminated attribute value"))?;
            let raw = &self.src[value_start..value_start + len];
            self.pos += len + 1;
            element
                .attributes
                .push((key.to_string(), decode_entities(raw, value_start)?));
        }
    }
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), XmlError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_some() => {
            return Err(XmlError::new(element.offset, "more than one root element"));
        }
        None => *root = Some(element),
    }
    Ok(())
}

/// Replaces entity and character references in `raw`, which starts at byte
/// `offset` of the document.
fn decode_entities(raw: &str, offset: usize) -> Result<String, XmlError> {
    if !raw.contains('&') {
        return Ok(raw.to_string());
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let at = offset + (raw.len() - rest.len()) + amp;
        let after = &rest[amp + 1..];
        let semi = after
            .find(';')
            .ok_or_else(|| XmlError::new(at, "unterminated entity reference"))?;
        let entity = &after[..semi];
        let decoded = match entity {
            "lt" => '<',
            "gt" => '>',
            "amp" => '&',
            "quot" => '"',
            "apos" => '\'',
            _ => {
                let code = if let Some(hex) = entity.strip_prefix("#x") {
                    u32::from_str_radix(hex, 16).ok()
                } else if let Some(dec) = entity.strip_prefix('#') {
                    dec.parse().ok()
                } else {
                    None
                };
                code.and_then(char::from_u32)
                    .ok_or_else(|| XmlError::new(at, format!("unknown entity `&{entity};`")))?
            }
        };
        out.push(decoded);
        rest = &after[semi + 1..];
    }
    out.push_str(rest);
    Ok(out)
}
