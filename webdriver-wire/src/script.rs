//! Script execution: argument serialization and result rehydration.
//!
//! Arguments and results are arbitrarily nested trees. On the way out,
//! element and shadow root handles become their protocol identifier
//! objects; on the way back, any object carrying a well-known identifier
//! key becomes a fresh handle scoped under the session. Ordinary objects
//! pass through untouched in both directions.

use std::collections::BTreeMap;
use std::rc::Rc;

use serde_json::{json, Map, Value};

use crate::command::Verb;
use crate::element::{Element, ShadowRoot};
use crate::error::Result;
use crate::protocol::{Dialect, SHADOW_ROOT_KEY};
use crate::wire::{OptionsCell, Wire};

/// One argument to a script.
#[derive(Debug, Clone)]
pub enum ScriptArg {
    Json(Value),
    Element(Element),
    Shadow(ShadowRoot),
    Array(Vec<ScriptArg>),
    Object(BTreeMap<String, ScriptArg>),
}

impl ScriptArg {
    fn encode(&self, dialect: Dialect) -> Value {
        match self {
            Self::Json(value) => value.clone(),
            Self::Element(element) => json!({dialect.element_key(): element.id()}),
            Self::Shadow(shadow) => json!({SHADOW_ROOT_KEY: shadow.id()}),
            Self::Array(items) => {
                Value::Array(items.iter().map(|item| item.encode(dialect)).collect())
            }
            Self::Object(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(key, item)| (key.clone(), item.encode(dialect)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for ScriptArg {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<Element> for ScriptArg {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl From<ShadowRoot> for ScriptArg {
    fn from(shadow: ShadowRoot) -> Self {
        Self::Shadow(shadow)
    }
}

/// A script result with element references rehydrated.
#[derive(Debug)]
pub enum ScriptValue {
    Json(Value),
    Element(Element),
    Shadow(ShadowRoot),
    Array(Vec<ScriptValue>),
    Object(BTreeMap<String, ScriptValue>),
}

impl ScriptValue {
    /// The plain JSON leaf, if this is one.
    #[must_use]
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    /// The element handle, if this is one.
    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }
}

/// The script-execution resource of one session.
pub struct Execute {
    wire: Rc<Wire>,
    session_url: String,
    dialect: Dialect,
    options: OptionsCell,
}

impl Execute {
    pub(crate) fn new(
        wire: Rc<Wire>,
        session_url: String,
        dialect: Dialect,
        options: OptionsCell,
    ) -> Self {
        Self {
            wire,
            session_url,
            dialect,
            options,
        }
    }

    /// Executes a script synchronously in the page.
    pub fn sync(&self, script: &str, args: &[ScriptArg]) -> Result<ScriptValue> {
        let command = match self.dialect {
            Dialect::Legacy => "execute",
            Dialect::W3c => "execute/sync",
        };
        self.run(command, script, args)
    }

    /// Executes a script that signals completion via its final callback
    /// argument.
    pub fn r#async(&self, script: &str, args: &[ScriptArg]) -> Result<ScriptValue> {
        let command = match self.dialect {
            Dialect::Legacy => "execute_async",
            Dialect::W3c => "execute/async",
        };
        self.run(command, script, args)
    }

    fn run(&self, command: &str, script: &str, args: &[ScriptArg]) -> Result<ScriptValue> {
        let args: Vec<Value> = args.iter().map(|arg| arg.encode(self.dialect)).collect();
        let options = self.options.borrow_mut().take().unwrap_or_default();
        let reply = self.wire.call(
            &self.session_url,
            Verb::Post,
            command,
            Some(json!({"script": script, "args": args})),
            options,
        )?;
        Ok(self.decode(reply.value))
    }

    fn decode(&self, value: Value) -> ScriptValue {
        match value {
            Value::Array(items) => {
                ScriptValue::Array(items.into_iter().map(|item| self.decode(item)).collect())
            }
            Value::Object(map) => self.decode_object(map),
            leaf => ScriptValue::Json(leaf),
        }
    }

    fn decode_object(&self, map: Map<String, Value>) -> ScriptValue {
        if let Some(id) = map.get(self.dialect.element_key()).and_then(Value::as_str) {
            return ScriptValue::Element(Element::from_parts(
                Rc::clone(&self.wire),
                self.dialect,
                &self.session_url,
                &self.session_url,
                id,
                Rc::clone(&self.options),
            ));
        }
        if self.dialect == Dialect::W3c {
            if let Some(id) = map.get(SHADOW_ROOT_KEY).and_then(Value::as_str) {
                return ScriptValue::Shadow(ShadowRoot::from_parts(
                    Rc::clone(&self.wire),
                    self.dialect,
                    &self.session_url,
                    id,
                    Rc::clone(&self.options),
                ));
            }
        }
        ScriptValue::Object(
            map.into_iter()
                .map(|(key, item)| (key, self.decode(item)))
                .collect(),
        )
    }
}
