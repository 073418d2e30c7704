//! Element and shadow root handles, plus locating.

use std::rc::Rc;

use serde_json::{json, Value};

use crate::command;
use crate::error::{Error, ErrorKind, Result};
use crate::protocol::{Dialect, SHADOW_ROOT_KEY};
use crate::wire::{Endpoint, OptionsCell, Wire};

/// The closed set of locator strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    CssSelector,
    LinkText,
    PartialLinkText,
    TagName,
    XPath,
    // legacy compatibility strategies
    ClassName,
    Id,
    Name,
}

impl Strategy {
    /// The wire spelling sent in `using`.
    #[must_use]
    pub fn as_wire(self) -> &'static str {
        match self {
            Self::CssSelector => "css selector",
            Self::LinkText => "link text",
            Self::PartialLinkText => "partial link text",
            Self::TagName => "tag name",
            Self::XPath => "xpath",
            Self::ClassName => "class name",
            Self::Id => "id",
            Self::Name => "name",
        }
    }

    /// Accepts the wire spelling and the underscore spelling. Anything
    /// else is rejected here, before any network call.
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "css selector" | "css_selector" => Ok(Self::CssSelector),
            "link text" | "link_text" => Ok(Self::LinkText),
            "partial link text" | "partial_link_text" => Ok(Self::PartialLinkText),
            "tag name" | "tag_name" => Ok(Self::TagName),
            "xpath" => Ok(Self::XPath),
            "class name" | "class_name" => Ok(Self::ClassName),
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            _ => Err(Error::UnknownLocatorStrategy(name.to_owned())),
        }
    }
}

impl core::fmt::Display for Strategy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// A `{using, value}` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    pub using: Strategy,
    pub value: String,
}

impl Locator {
    pub fn new(using: Strategy, value: impl Into<String>) -> Self {
        Self {
            using,
            value: value.into(),
        }
    }

    pub(crate) fn to_body(&self) -> Value {
        json!({"using": self.using.as_wire(), "value": self.value})
    }
}

impl<V: Into<String>> From<(Strategy, V)> for Locator {
    fn from((using, value): (Strategy, V)) -> Self {
        Self::new(using, value)
    }
}

/// Resources that can locate child elements: sessions, elements and shadow
/// roots. Children are scoped under `<container>/element/<id>`.
pub trait Locate {
    /// Locates the first matching element.
    ///
    /// Zero matches surface as a no-such-element error carrying the
    /// locator in its message; the underlying kind semantics are
    /// preserved.
    fn find_element(&self, locator: impl Into<Locator>) -> Result<Element>;

    /// Locates all matching elements; zero matches yield an empty vec.
    fn find_elements(&self, locator: impl Into<Locator>) -> Result<Vec<Element>>;
}

macro_rules! impl_locate {
    ($ty:ty) => {
        impl Locate for $ty {
            fn find_element(&self, locator: impl Into<Locator>) -> Result<Element> {
                find_one(&self.endpoint, &self.session_url, &locator.into())
            }

            fn find_elements(&self, locator: impl Into<Locator>) -> Result<Vec<Element>> {
                find_many(&self.endpoint, &self.session_url, &locator.into())
            }
        }
    };
}

impl_locate!(Element);
impl_locate!(ShadowRoot);

pub(crate) fn find_one(
    endpoint: &Endpoint,
    session_url: &str,
    locator: &Locator,
) -> Result<Element> {
    let value = endpoint
        .invoke("element", Some(locator.to_body()))
        .map_err(|err| match err {
            Error::Protocol {
                kind: ErrorKind::NoSuchElement,
                message,
            } => Error::NoSuchElement {
                using: locator.using.as_wire().to_owned(),
                value: locator.value.clone(),
                message,
            },
            other => other,
        })?;
    make_element(endpoint, session_url, &value)
}

pub(crate) fn find_many(
    endpoint: &Endpoint,
    session_url: &str,
    locator: &Locator,
) -> Result<Vec<Element>> {
    let value = endpoint.invoke("elements", Some(locator.to_body()))?;
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .iter()
            .map(|item| make_element(endpoint, session_url, item))
            .collect(),
        other => Err(Error::UnexpectedResponse(other.to_string())),
    }
}

/// Builds an element handle from a raw value carrying the era-specific
/// identifier key, scoped under the given container.
pub(crate) fn make_element(
    container: &Endpoint,
    session_url: &str,
    value: &Value,
) -> Result<Element> {
    let key = container.dialect.element_key();
    let id = value
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| Error::UnexpectedResponse(value.to_string()))?;
    Ok(Element::from_parts(
        Rc::clone(&container.wire),
        container.dialect,
        &container.url,
        session_url,
        id,
        Rc::clone(&container.options),
    ))
}

/// A server-side handle to one DOM node.
///
/// Value-like: cloning clones the handle, and equality is a server-side
/// question answered by [`Element::equals`], not a client-side one.
#[derive(Clone)]
pub struct Element {
    pub(crate) endpoint: Endpoint,
    pub(crate) session_url: String,
    id: String,
}

impl core::fmt::Debug for Element {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Element")
            .field("url", &self.endpoint.url)
            .field("id", &self.id)
            .finish()
    }
}

impl Element {
    pub(crate) fn from_parts(
        wire: Rc<Wire>,
        dialect: Dialect,
        container_url: &str,
        session_url: &str,
        id: &str,
        options: OptionsCell,
    ) -> Self {
        Self {
            endpoint: Endpoint {
                wire,
                url: format!("{container_url}/element/{id}"),
                dialect,
                commands: &command::ELEMENT,
                options,
            },
            session_url: session_url.to_owned(),
            id: id.to_owned(),
        }
    }

    /// The opaque server-assigned identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Dispatches any command from the element command table.
    pub fn invoke(&self, name: &str, body: Option<Value>) -> Result<Value> {
        self.endpoint.invoke(name, body)
    }

    pub fn click(&self) -> Result<()> {
        self.invoke("click", None).map(drop)
    }

    pub fn submit(&self) -> Result<()> {
        self.invoke("submit", None).map(drop)
    }

    pub fn clear(&self) -> Result<()> {
        self.invoke("clear", None).map(drop)
    }

    /// Types into the element. Sends both the W3C `text` form and the
    /// legacy `value` array so either era of server accepts it.
    pub fn send_keys(&self, keys: &str) -> Result<()> {
        let chars: Vec<String> = keys.chars().map(String::from).collect();
        self.invoke("value", Some(json!({"text": keys, "value": chars})))
            .map(drop)
    }

    pub fn text(&self) -> Result<String> {
        expect_string(self.invoke("text", None)?)
    }

    pub fn tag_name(&self) -> Result<String> {
        expect_string(self.invoke("name", None)?)
    }

    /// `None` when the attribute is absent.
    pub fn attribute(&self, name: &str) -> Result<Option<String>> {
        expect_optional_string(self.invoke("attribute", Some(json!(name)))?)
    }

    pub fn property(&self, name: &str) -> Result<Value> {
        self.invoke("property", Some(json!(name)))
    }

    pub fn css_value(&self, property: &str) -> Result<String> {
        expect_string(self.invoke("css", Some(json!(property)))?)
    }

    pub fn selected(&self) -> Result<bool> {
        expect_bool(self.invoke("selected", None)?)
    }

    pub fn enabled(&self) -> Result<bool> {
        expect_bool(self.invoke("enabled", None)?)
    }

    pub fn displayed(&self) -> Result<bool> {
        expect_bool(self.invoke("displayed", None)?)
    }

    pub fn rect(&self) -> Result<Value> {
        self.invoke("rect", None)
    }

    /// Base64-encoded PNG.
    pub fn screenshot(&self) -> Result<String> {
        expect_string(self.invoke("screenshot", None)?)
    }

    /// Server-side identity comparison.
    pub fn equals(&self, other: &Element) -> Result<bool> {
        expect_bool(self.invoke("equals", Some(json!(other.id)))?)
    }

    /// The element's shadow root, scoped under `<sessionUrl>/shadow/<id>`.
    pub fn shadow_root(&self) -> Result<ShadowRoot> {
        let value = self.invoke("shadow", None)?;
        let id = value
            .get(SHADOW_ROOT_KEY)
            .and_then(Value::as_str)
            .ok_or_else(|| Error::UnexpectedResponse(value.to_string()))?;
        Ok(ShadowRoot {
            endpoint: Endpoint {
                wire: Rc::clone(&self.endpoint.wire),
                url: format!("{}/shadow/{id}", self.session_url),
                dialect: self.endpoint.dialect,
                commands: &command::SHADOW_ROOT,
                options: Rc::clone(&self.endpoint.options),
            },
            session_url: self.session_url.clone(),
            id: id.to_owned(),
        })
    }
}

/// A server-side handle to a shadow DOM attachment point.
#[derive(Clone)]
pub struct ShadowRoot {
    pub(crate) endpoint: Endpoint,
    pub(crate) session_url: String,
    id: String,
}

impl core::fmt::Debug for ShadowRoot {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ShadowRoot")
            .field("url", &self.endpoint.url)
            .field("id", &self.id)
            .finish()
    }
}

impl ShadowRoot {
    pub(crate) fn from_parts(
        wire: Rc<Wire>,
        dialect: Dialect,
        session_url: &str,
        id: &str,
        options: OptionsCell,
    ) -> Self {
        Self {
            endpoint: Endpoint {
                wire,
                url: format!("{session_url}/shadow/{id}"),
                dialect,
                commands: &command::SHADOW_ROOT,
                options,
            },
            session_url: session_url.to_owned(),
            id: id.to_owned(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn invoke(&self, name: &str, body: Option<Value>) -> Result<Value> {
        self.endpoint.invoke(name, body)
    }
}

pub(crate) fn expect_string(value: Value) -> Result<String> {
    match value {
        Value::String(text) => Ok(text),
        other => Err(Error::UnexpectedResponse(other.to_string())),
    }
}

fn expect_optional_string(value: Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text)),
        other => Err(Error::UnexpectedResponse(other.to_string())),
    }
}

pub(crate) fn expect_bool(value: Value) -> Result<bool> {
    match value {
        Value::Bool(flag) => Ok(flag),
        other => Err(Error::UnexpectedResponse(other.to_string())),
    }
}
