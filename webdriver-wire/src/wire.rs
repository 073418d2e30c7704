//! The choke point every command flows through: URL construction, body
//! validation, the HTTP exchange, and envelope interpretation.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::command::{CommandSet, Verb};
use crate::error::{snippet, Error, ErrorKind, Result};
use crate::protocol::{Dialect, LEGACY_SESSION_ID_KEY};
use crate::transport::{CallOptions, Transport};

/// Interpreted response envelope.
#[derive(Debug)]
pub(crate) struct Reply {
    pub value: Value,
    pub session_id: Option<String>,
    pub effective_url: String,
    /// Era implied by the envelope shape: `status` present means legacy.
    /// Only meaningful on session creation; stored there once.
    pub dialect: Dialect,
}

/// Owns the transport; every command round trip flows through it.
pub(crate) struct Wire {
    transport: Box<dyn Transport>,
}

impl Wire {
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Issues one command round trip against `base_url` and interprets the
    /// envelope.
    ///
    /// A scalar body becomes a path segment instead of a JSON payload; a
    /// structured body is only legal with POST and anything else fails
    /// before any network I/O.
    pub fn call(
        &self,
        base_url: &str,
        verb: Verb,
        command: &str,
        body: Option<Value>,
        options: CallOptions,
    ) -> Result<Reply> {
        let mut url = base_url.to_owned();
        if !command.is_empty() {
            url.push('/');
            url.push_str(command);
        }
        let body = match body {
            Some(Value::String(segment)) => {
                url.push('/');
                url.push_str(&segment);
                None
            }
            Some(scalar @ (Value::Number(_) | Value::Bool(_))) => {
                url.push('/');
                url.push_str(&scalar.to_string());
                None
            }
            Some(structured @ (Value::Array(_) | Value::Object(_))) => {
                if verb != Verb::Post {
                    return Err(Error::NoParametersExpected {
                        command: command.to_owned(),
                        verb: verb.as_str(),
                    });
                }
                Some(structured)
            }
            Some(Value::Null) | None => None,
        };

        tracing::debug!(%verb, %url, has_body = body.is_some(), "issuing command");
        let exchange = self.transport.execute(verb, &url, body.as_ref(), &options)?;
        tracing::trace!(body = %exchange.body, "raw response");

        interpret(&exchange.body, exchange.status, exchange.effective_url)
    }
}

/// Interprets one raw response per the envelope rules.
fn interpret(raw: &str, status: u16, effective_url: String) -> Result<Reply> {
    // 4xx bodies are plaintext per the protocol, never parsed as JSON
    if (400..=499).contains(&status) {
        return Err(Error::HttpStatus {
            status,
            body: snippet(raw),
        });
    }
    if raw.is_empty() {
        return Ok(Reply {
            value: Value::Null,
            session_id: None,
            effective_url,
            dialect: Dialect::W3c,
        });
    }
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let parsed: Value =
        serde_path_to_error::deserialize(&mut deserializer).map_err(|source| {
            Error::InvalidJsonPayload {
                body: snippet(raw),
                source,
            }
        })?;
    let Value::Object(envelope) = parsed else {
        return Err(Error::UnexpectedResponse(snippet(raw)));
    };

    match envelope.get("status") {
        Some(status_field) => {
            let code = status_field.as_i64().unwrap_or(i64::MIN);
            if code != 0 {
                return Err(protocol_error(
                    ErrorKind::from_legacy_status(code),
                    envelope.get("value"),
                ));
            }
            Ok(success(envelope, effective_url, Dialect::Legacy))
        }
        None => {
            if let Some(code) = envelope
                .get("value")
                .and_then(|value| value.get("error"))
                .and_then(Value::as_str)
            {
                return Err(protocol_error(
                    ErrorKind::from_w3c(code),
                    envelope.get("value"),
                ));
            }
            // legacy and transitional envelopes always carry `status`;
            // anything else alongside `value`/`sessionId` is not a valid
            // success shape
            if envelope
                .keys()
                .any(|key| key != "value" && key != "sessionId")
            {
                return Err(Error::UnexpectedResponse(snippet(raw)));
            }
            Ok(success(envelope, effective_url, Dialect::W3c))
        }
    }
}

fn protocol_error(kind: ErrorKind, value: Option<&Value>) -> Error {
    let message = value
        .and_then(|value| value.get("message"))
        .and_then(Value::as_str)
        .map_or_else(|| kind.default_message().to_owned(), ToOwned::to_owned);
    Error::Protocol { kind, message }
}

fn success(mut envelope: Map<String, Value>, effective_url: String, dialect: Dialect) -> Reply {
    let value = envelope.remove("value").unwrap_or(Value::Null);
    let session_id = envelope
        .get("sessionId")
        .and_then(Value::as_str)
        .or_else(|| value.get("sessionId").and_then(Value::as_str))
        .or_else(|| value.get(LEGACY_SESSION_ID_KEY).and_then(Value::as_str))
        .map(ToOwned::to_owned);
    Reply {
        value,
        session_id,
        effective_url,
        dialect,
    }
}

/// One-shot call options staged for a session's next command. One cell per
/// session, shared by every resource derived from it; sibling sessions
/// never see each other's staged options.
pub(crate) type OptionsCell = Rc<RefCell<Option<CallOptions>>>;

/// One addressable server-side resource: a base URL, the dialect it
/// speaks, and its command table. Shared by every resource type.
#[derive(Clone)]
pub(crate) struct Endpoint {
    pub wire: Rc<Wire>,
    pub url: String,
    pub dialect: Dialect,
    pub commands: &'static CommandSet,
    pub options: OptionsCell,
}

impl Endpoint {
    /// Stages options consumed by exactly the next command on this
    /// session's endpoints.
    pub fn stage_options(&self, options: CallOptions) {
        *self.options.borrow_mut() = Some(options);
    }

    /// Takes the staged options, cleared before the exchange regardless of
    /// outcome.
    pub fn take_options(&self) -> CallOptions {
        self.options.borrow_mut().take().unwrap_or_default()
    }

    /// Resolves `name` against the command table and issues the command.
    pub fn invoke(&self, name: &str, body: Option<Value>) -> Result<Value> {
        let (verb, command) = self.commands.resolve(name)?;
        let options = self.take_options();
        Ok(self
            .wire
            .call(&self.url, verb, &command, body, options)?
            .value)
    }

    pub fn derived(&self, suffix: &str, commands: &'static CommandSet) -> Self {
        Self {
            wire: Rc::clone(&self.wire),
            url: format!("{}/{suffix}", self.url),
            dialect: self.dialect,
            commands,
            options: Rc::clone(&self.options),
        }
    }
}
