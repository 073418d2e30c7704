//! The root driver resource.

use std::rc::Rc;

use serde_json::{json, Value};

use crate::command::Verb;
use crate::error::Result;
use crate::protocol::Dialect;
use crate::session::Session;
use crate::transport::{CallOptions, HttpTransport, Transport};
use crate::wire::Wire;

/// A handle to a remote WebDriver server (Selenium, chromedriver,
/// geckodriver) rooted at `<serverRoot>`.
pub struct WebDriver {
    wire: Rc<Wire>,
    url: String,
}

impl WebDriver {
    /// Connects over the default blocking HTTP transport.
    pub fn new(server_url: &str) -> Result<Self> {
        let transport = HttpTransport::new()?;
        Ok(Self::with_transport(server_url, transport))
    }

    /// Uses a caller-supplied transport (tests, instrumentation).
    pub fn with_transport(server_url: &str, transport: impl Transport + 'static) -> Self {
        Self {
            wire: Rc::new(Wire::new(Box::new(transport))),
            url: server_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Creates a session, negotiating capabilities.
    ///
    /// Both the legacy `desiredCapabilities` and the W3C
    /// `capabilities.alwaysMatch` forms are sent so either era of server
    /// accepts the request. The response decides the dialect: an envelope
    /// carrying `status` is legacy, anything else is W3C. The session URL
    /// comes from the extracted session id, falling back to the
    /// transport's effective URL for redirect-based legacy creation.
    pub fn session(&self, capabilities: &Value) -> Result<Session> {
        let body = json!({
            "desiredCapabilities": capabilities,
            "capabilities": {"alwaysMatch": capabilities},
        });
        let reply = self.wire.call(
            &self.url,
            Verb::Post,
            "session",
            Some(body),
            CallOptions::default(),
        )?;

        let url = reply.session_id.as_ref().map_or_else(
            || reply.effective_url.trim_end_matches('/').to_owned(),
            |id| format!("{}/session/{id}", self.url),
        );
        let id = reply.session_id.clone().unwrap_or_else(|| {
            url.rsplit('/').next().unwrap_or_default().to_owned()
        });
        // redirect-based creation (no id anywhere in the envelope) only
        // ever existed in the legacy era
        let dialect = if reply.session_id.is_some() {
            reply.dialect
        } else {
            Dialect::Legacy
        };
        let capabilities = match dialect {
            // legacy creation returns the capabilities as the value
            Dialect::Legacy => match &reply.value {
                Value::Object(_) => Some(reply.value.clone()),
                _ => None,
            },
            Dialect::W3c => reply.value.get("capabilities").cloned(),
        };
        tracing::debug!(session = %id, ?dialect, "session created");
        Ok(Session::new(
            Rc::clone(&self.wire),
            url,
            id,
            dialect,
            capabilities,
        ))
    }
}
