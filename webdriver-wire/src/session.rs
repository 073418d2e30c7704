//! The session resource: root of a working context.

use std::cell::OnceCell;
use std::rc::Rc;

use serde_json::{json, Value};

use crate::command::{self, Verb};
use crate::element::{self, Element, Locate, Locator};
use crate::error::Result;
use crate::feature::{Feature, StorageKind};
use crate::input::Actions;
use crate::protocol::Dialect;
use crate::script::Execute;
use crate::transport::CallOptions;
use crate::wire::{Endpoint, OptionsCell, Wire};

/// A server-side handle to one browser instance under automation.
///
/// Created by [`crate::webdriver::WebDriver::session`]; destroyed by an
/// explicit [`Session::close`]. Commands issued after close are not
/// guarded client-side and surface whatever the server returns for an
/// invalid session id.
pub struct Session {
    pub(crate) endpoint: Endpoint,
    id: String,
    /// Write-once, read-many; seeded from the creation response when the
    /// server sent capabilities, else fetched at most once.
    capabilities: OnceCell<Value>,
}

impl core::fmt::Debug for Session {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session")
            .field("url", &self.endpoint.url)
            .field("id", &self.id)
            .field("dialect", &self.endpoint.dialect)
            .finish()
    }
}

impl Session {
    pub(crate) fn new(
        wire: Rc<Wire>,
        url: String,
        id: String,
        dialect: Dialect,
        capabilities: Option<Value>,
    ) -> Self {
        let cell = OnceCell::new();
        if let Some(capabilities) = capabilities {
            let _ = cell.set(capabilities);
        }
        Self {
            endpoint: Endpoint {
                wire,
                url,
                dialect,
                commands: &command::SESSION,
                options: OptionsCell::default(),
            },
            id,
            capabilities: cell,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.endpoint.dialect
    }

    /// Dispatches any command from the session command table.
    pub fn invoke(&self, name: &str, body: Option<Value>) -> Result<Value> {
        self.endpoint.invoke(name, body)
    }

    /// Stages one-shot transport options consumed by exactly the next
    /// command on this session or its derived resources, successful or
    /// not. Sibling sessions are unaffected.
    pub fn next_call_options(&self, options: CallOptions) {
        self.endpoint.stage_options(options);
    }

    /// The session's capabilities, fetched lazily at most once when the
    /// creation response did not carry them.
    pub fn capabilities(&self) -> Result<&Value> {
        match self.capabilities.get() {
            Some(capabilities) => Ok(capabilities),
            None => {
                let reply = self.endpoint.wire.call(
                    &self.endpoint.url,
                    Verb::Get,
                    "",
                    None,
                    self.endpoint.take_options(),
                )?;
                Ok(self.capabilities.get_or_init(|| reply.value))
            }
        }
    }

    /// Ends the session. Terminal; the handle is consumed.
    pub fn close(self) -> Result<()> {
        self.endpoint
            .wire
            .call(
                &self.endpoint.url,
                Verb::Delete,
                "",
                None,
                self.endpoint.take_options(),
            )
            .map(drop)
    }

    pub fn go(&self, url: &str) -> Result<()> {
        self.invoke("posturl", Some(json!({"url": url}))).map(drop)
    }

    pub fn current_url(&self) -> Result<String> {
        element::expect_string(self.invoke("url", None)?)
    }

    pub fn title(&self) -> Result<String> {
        element::expect_string(self.invoke("title", None)?)
    }

    pub fn source(&self) -> Result<String> {
        element::expect_string(self.invoke("source", None)?)
    }

    /// Base64-encoded PNG.
    pub fn screenshot(&self) -> Result<String> {
        element::expect_string(self.invoke("screenshot", None)?)
    }

    pub fn back(&self) -> Result<()> {
        self.invoke("back", None).map(drop)
    }

    pub fn forward(&self) -> Result<()> {
        self.invoke("forward", None).map(drop)
    }

    pub fn refresh(&self) -> Result<()> {
        self.invoke("refresh", None).map(drop)
    }

    /// The element that currently has focus.
    ///
    /// Legacy servers route this as POST only; W3C servers as GET only.
    pub fn active_element(&self) -> Result<Element> {
        let name = match self.dialect() {
            Dialect::Legacy => "element/active",
            Dialect::W3c => "getelement/active",
        };
        let value = self.invoke(name, None)?;
        element::make_element(&self.endpoint, &self.endpoint.url, &value)
    }

    // Derived resources, all scoped under the session URL and speaking
    // the session's dialect.

    #[must_use]
    pub fn window(&self) -> Feature {
        Feature::new(self.endpoint.derived("window", &command::WINDOW))
    }

    #[must_use]
    pub fn frame(&self) -> Feature {
        Feature::new(self.endpoint.derived("frame", &command::FRAME))
    }

    #[must_use]
    pub fn alert(&self) -> Feature {
        Feature::new(self.endpoint.derived("alert", &command::ALERT))
    }

    #[must_use]
    pub fn timeouts(&self) -> Feature {
        Feature::new(self.endpoint.derived("timeouts", &command::TIMEOUTS))
    }

    #[must_use]
    pub fn ime(&self) -> Feature {
        Feature::new(self.endpoint.derived("ime", &command::IME))
    }

    #[must_use]
    pub fn touch(&self) -> Feature {
        Feature::new(self.endpoint.derived("touch", &command::TOUCH))
    }

    /// One parametrized storage type covers both areas.
    #[must_use]
    pub fn storage(&self, kind: StorageKind) -> Feature {
        Feature::new(self.endpoint.derived(kind.suffix(), &command::STORAGE))
    }

    #[must_use]
    pub fn application_cache(&self) -> Feature {
        Feature::new(
            self.endpoint
                .derived("application_cache", &command::APPLICATION_CACHE),
        )
    }

    #[must_use]
    pub fn log(&self) -> Feature {
        Feature::new(self.endpoint.derived("log", &command::LOG))
    }

    #[must_use]
    pub fn execute(&self) -> Execute {
        Execute::new(
            Rc::clone(&self.endpoint.wire),
            self.endpoint.url.clone(),
            self.endpoint.dialect,
            Rc::clone(&self.endpoint.options),
        )
    }

    /// A fresh action batch owned by the caller.
    #[must_use]
    pub fn actions(&self) -> Actions {
        Actions::new(self.endpoint.clone())
    }
}

impl Locate for Session {
    fn find_element(&self, locator: impl Into<Locator>) -> Result<Element> {
        element::find_one(&self.endpoint, &self.endpoint.url, &locator.into())
    }

    fn find_elements(&self, locator: impl Into<Locator>) -> Result<Vec<Element>> {
        element::find_many(&self.endpoint, &self.endpoint.url, &locator.into())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::rc::Rc;

    use serde_json::{json, Value};

    use super::Session;
    use crate::command::Verb;
    use crate::protocol::{Dialect, W3C_ELEMENT_KEY};
    use crate::transport::mock::{MockTransport, SharedMock};
    use crate::transport::CallOptions;
    use crate::wire::Wire;

    fn session_with(dialect: Dialect, capabilities: Option<Value>) -> (Session, Rc<MockTransport>) {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let mock = Rc::new(MockTransport::new());
        let wire = Rc::new(Wire::new(Box::new(SharedMock(Rc::clone(&mock)))));
        let session = Session::new(
            wire,
            "http://s/session/sid".to_owned(),
            "sid".to_owned(),
            dialect,
            capabilities,
        );
        (session, mock)
    }

    pub(crate) fn w3c_session() -> (Session, Rc<MockTransport>) {
        session_with(Dialect::W3c, None)
    }

    pub(crate) fn legacy_session() -> (Session, Rc<MockTransport>) {
        session_with(Dialect::Legacy, None)
    }

    #[test]
    fn capabilities_are_fetched_lazily_at_most_once() {
        let (session, mock) = legacy_session();
        mock.reply_json(r#"{"status": 0, "value": {"browserName": "firefox"}}"#);
        let first = session.capabilities().unwrap().clone();
        let second = session.capabilities().unwrap().clone();
        assert_eq!(first, json!({"browserName": "firefox"}));
        assert_eq!(first, second);
        assert_eq!(mock.request_count(), 1);
        let requests = mock.requests.borrow();
        assert_eq!(requests[0].verb, Verb::Get);
        assert_eq!(requests[0].url, "http://s/session/sid");
    }

    #[test]
    fn seeded_capabilities_skip_the_fetch() {
        let (session, mock) =
            session_with(Dialect::W3c, Some(json!({"browserName": "chrome"})));
        assert_eq!(
            session.capabilities().unwrap(),
            &json!({"browserName": "chrome"})
        );
        assert_eq!(mock.request_count(), 0);
    }

    #[test]
    fn close_issues_delete_on_the_session_url() {
        let (session, mock) = w3c_session();
        mock.reply_json(r#"{"value": null}"#);
        session.close().unwrap();
        let requests = mock.requests.borrow();
        assert_eq!(requests[0].verb, Verb::Delete);
        assert_eq!(requests[0].url, "http://s/session/sid");
    }

    #[test]
    fn go_posts_the_url_command() {
        let (session, mock) = w3c_session();
        mock.reply_json(r#"{"value": null}"#);
        session.go("https://example.org").unwrap();
        let requests = mock.requests.borrow();
        assert_eq!(requests[0].verb, Verb::Post);
        assert_eq!(requests[0].url, "http://s/session/sid/url");
        assert_eq!(
            requests[0].body.as_deref(),
            Some(r#"{"url":"https://example.org"}"#)
        );
    }

    #[test]
    fn staged_options_are_forwarded_once() {
        let (session, mock) = w3c_session();
        mock.reply_json(r#"{"value": "t"}"#);
        mock.reply_json(r#"{"value": "t"}"#);
        session.next_call_options(CallOptions {
            timeout: Some(std::time::Duration::from_millis(250)),
        });
        session.title().unwrap();
        session.title().unwrap();
        let requests = mock.requests.borrow();
        assert_eq!(
            requests[0].timeout,
            Some(std::time::Duration::from_millis(250))
        );
        assert_eq!(requests[1].timeout, None);
    }

    #[test]
    fn active_element_verb_follows_the_dialect() {
        let (session, mock) = w3c_session();
        mock.reply_json(&format!(
            r#"{{"value": {{"{W3C_ELEMENT_KEY}": "focused"}}}}"#
        ));
        let element = session.active_element().unwrap();
        assert_eq!(element.id(), "focused");
        {
            let requests = mock.requests.borrow();
            assert_eq!(requests[0].verb, Verb::Get);
            assert_eq!(requests[0].url, "http://s/session/sid/element/active");
        }

        let (session, mock) = legacy_session();
        mock.reply_json(r#"{"status": 0, "value": {"ELEMENT": "focused"}}"#);
        session.active_element().unwrap();
        let requests = mock.requests.borrow();
        assert_eq!(requests[0].verb, Verb::Post);
        assert_eq!(requests[0].url, "http://s/session/sid/element/active");
    }

    #[test]
    fn derived_features_are_scoped_under_the_session() {
        let (session, mock) = w3c_session();
        mock.reply_json(r#"{"value": null}"#);
        session.window().invoke("maximize", None).unwrap();
        let requests = mock.requests.borrow();
        assert_eq!(requests[0].url, "http://s/session/sid/window/maximize");
        assert_eq!(requests[0].verb, Verb::Post);
    }
}
