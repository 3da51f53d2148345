use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::foundation::error::{FcpxError, FcpxResult};

/// Ordered XML element tree.
///
/// Attributes keep insertion order so output is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct XmlElement {
    /// Tag name.
    pub name: String,
    /// Attributes in render order.
    pub attrs: Vec<(String, String)>,
    /// Child elements in render order.
    pub children: Vec<XmlElement>,
    /// Text content, rendered before children.
    pub text: Option<String>,
}

impl XmlElement {
    /// Element with no attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Append an attribute.
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((key.into(), value.into()));
        self
    }

    /// Append an attribute only when `value` is present.
    pub fn opt_attr(self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(v) => self.attr(key, v),
            None => self,
        }
    }

    /// Append a child element.
    pub fn child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    /// Append child elements.
    pub fn children(mut self, children: impl IntoIterator<Item = XmlElement>) -> Self {
        self.children.extend(children);
        self
    }

    /// Set the text content.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Value of attribute `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Direct children named `name`.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// First direct child named `name`.
    pub fn first_child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Depth-first pre-order walk over this element and every descendant.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a XmlElement)) {
        f(self);
        for c in &self.children {
            c.walk(f);
        }
    }
}

/// Render `root` with two-space indentation and no XML declaration.
pub fn write_pretty(root: &XmlElement) -> FcpxResult<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    write_element(&mut writer, root)?;
    String::from_utf8(writer.into_inner())
        .map_err(|e| FcpxError::serde(format!("writer produced invalid UTF-8: {e}")))
}

fn write_element(writer: &mut Writer<Vec<u8>>, el: &XmlElement) -> FcpxResult<()> {
    let start = BytesStart::new(el.name.as_str())
        .with_attributes(el.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str())));

    if el.children.is_empty() && el.text.is_none() {
        return emit(writer, Event::Empty(start), &el.name);
    }

    emit(writer, Event::Start(start), &el.name)?;
    if let Some(text) = &el.text {
        emit(writer, Event::Text(BytesText::new(text)), &el.name)?;
    }
    for c in &el.children {
        write_element(writer, c)?;
    }
    emit(writer, Event::End(BytesEnd::new(el.name.as_str())), &el.name)
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>, name: &str) -> FcpxResult<()> {
    writer
        .write_event(event)
        .map_err(|e| FcpxError::serde(format!("write <{name}>: {e}")))
}

/// Parse `xml` into an element tree.
///
/// Declarations, doctypes, comments and processing instructions are skipped;
/// whitespace-only text is dropped. Any well-formedness problem is returned as
/// a human-readable message.
pub fn parse(xml: &str) -> Result<XmlElement, String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| format!("at byte {}: {e}", reader.buffer_position()))?;
        match event {
            Event::Start(e) => stack.push(element_from(&e)?),
            Event::Empty(e) => {
                let el = element_from(&e)?;
                attach(&mut stack, &mut root, el)?;
            }
            Event::End(e) => {
                let el = stack.pop().ok_or_else(|| {
                    format!(
                        "unexpected closing tag </{}>",
                        String::from_utf8_lossy(e.name().as_ref())
                    )
                })?;
                attach(&mut stack, &mut root, el)?;
            }
            Event::Text(t) => {
                let text = t.unescape().map_err(|e| format!("bad text content: {e}"))?;
                if text.trim().is_empty() {
                    continue;
                }
                match stack.last_mut() {
                    Some(top) => top.text.get_or_insert_with(String::new).push_str(&text),
                    None => return Err(format!("text outside the root element: '{}'", text.trim())),
                }
            }
            Event::CData(c) => {
                if let Some(top) = stack.last_mut() {
                    let text = String::from_utf8_lossy(&c).into_owned();
                    top.text.get_or_insert_with(String::new).push_str(&text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(format!("unclosed element <{}>", open.name));
    }
    root.ok_or_else(|| "document has no root element".to_owned())
}

fn element_from(e: &BytesStart<'_>) -> Result<XmlElement, String> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut el = XmlElement::new(name);
    for attr in e.attributes() {
        let attr = attr.map_err(|err| format!("bad attribute on <{}>: {err}", el.name))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| format!("bad value for {key} on <{}>: {err}", el.name))?
            .into_owned();
        el.attrs.push((key, value));
    }
    Ok(el)
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, el: XmlElement) -> Result<(), String> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(el);
        return Ok(());
    }
    if root.is_some() {
        return Err(format!("second root element <{}>", el.name));
    }
    *root = Some(el);
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/serialize/xml.rs"]
mod tests;
