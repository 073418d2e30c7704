//! Protocol eras and the identifier constants servers match on.

use serde::{Deserialize, Serialize};

/// Which generation of the wire protocol a session speaks.
///
/// Decided once, at session creation, from the shape of the server's
/// response, and propagated to every resource derived from that session.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// The JSON Wire Protocol: numeric status codes, `ELEMENT` keys.
    /// <https://www.selenium.dev/documentation/legacy/json_wire_protocol/>
    Legacy,
    /// <https://www.w3.org/TR/webdriver2/>
    W3c,
}

/// Element identifier key in legacy responses.
pub const LEGACY_ELEMENT_KEY: &str = "ELEMENT";

/// <https://www.w3.org/TR/webdriver2/#elements>
pub const W3C_ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// <https://www.w3.org/TR/webdriver2/#shadow-root>
pub const SHADOW_ROOT_KEY: &str = "shadow-6066-11e4-a52e-4f735466cecf";

/// <https://www.w3.org/TR/webdriver2/#dfn-windowproxy-reference-object>
pub const WINDOW_KEY: &str = "window-fcc6-11e5-b4f8-330a88ab9d7f";

/// <https://www.w3.org/TR/webdriver2/#dfn-windowproxy-reference-object>
pub const FRAME_KEY: &str = "frame-075b-4da1-b6ba-e579c2d3230a";

/// Key under which legacy servers embed the session id in a response value.
pub(crate) const LEGACY_SESSION_ID_KEY: &str = "webdriver.remote.sessionid";

impl Dialect {
    /// The key a server of this era uses to tag element references.
    #[must_use]
    pub fn element_key(self) -> &'static str {
        match self {
            Self::Legacy => LEGACY_ELEMENT_KEY,
            Self::W3c => W3C_ELEMENT_KEY,
        }
    }
}
