//! Client for the WebDriver wire protocol, speaking both the legacy
//! [JSON Wire Protocol](https://www.selenium.dev/documentation/legacy/json_wire_protocol/)
//! and the [W3C WebDriver standard](https://www.w3.org/TR/webdriver2/)
//! against a remote automation server (Selenium, chromedriver,
//! geckodriver).
//!
//! Commands are blocking call-and-return: each issues exactly one HTTP
//! round trip. The protocol era is negotiated once per session and
//! propagated to every derived resource. This is a faithful low-level
//! protocol binding, not an automation framework: no waiting, no retries.

pub mod command;
pub mod element;
pub mod error;
pub mod feature;
pub mod input;
pub mod protocol;
pub mod script;
pub mod session;
pub mod transport;
pub mod webdriver;
mod wire;

pub use element::{Element, Locate, Locator, ShadowRoot, Strategy};
pub use error::{Error, ErrorKind, Result};
pub use feature::{Feature, StorageKind};
pub use input::{Actions, SourceKind, Tick};
pub use protocol::Dialect;
pub use script::{Execute, ScriptArg, ScriptValue};
pub use session::Session;
pub use transport::{CallOptions, HttpTransport, Transport};
pub use webdriver::WebDriver;
