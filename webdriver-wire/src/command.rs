//! Static command tables and verb resolution.
//!
//! The table of command names to allowed HTTP verbs is the real protocol
//! artifact; dispatch is a lookup. The first verb listed for a command is
//! its implicit default. Commands removed from the protocol stay in a
//! separate obsolete list so invoking them fails with "obsolete command"
//! rather than "unknown command".

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
    Delete,
}

impl Verb {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

impl core::fmt::Display for Verb {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

use Verb::{Delete, Get, Post};

type Entry = (&'static str, &'static [Verb]);

#[derive(Debug)]
pub struct CommandSet {
    pub commands: &'static [Entry],
    pub obsolete: &'static [&'static str],
}

impl CommandSet {
    fn entry(&self, name: &str) -> Option<&'static [Verb]> {
        self.commands
            .iter()
            .find(|(command, _)| *command == name)
            .map(|(_, verbs)| *verbs)
    }

    fn is_obsolete(&self, name: &str) -> bool {
        self.obsolete.contains(&name)
    }

    /// Resolves an invocation name to `(verb, command)`.
    ///
    /// A bare table hit uses the command's first listed verb. Otherwise a
    /// `get`/`post`/`delete` prefix (optionally followed by `_`) names the
    /// verb explicitly and the lower-cased remainder names the command; an
    /// explicit verb matching a command's single allowed verb is accepted.
    pub fn resolve(&self, name: &str) -> Result<(Verb, String)> {
        let bare = name.to_ascii_lowercase();
        if let Some(verbs) = self.entry(&bare) {
            return Ok((verbs[0], bare));
        }
        for (prefix, verb) in [("get", Get), ("post", Post), ("delete", Delete)] {
            let Some(rest) = bare.strip_prefix(prefix) else {
                continue;
            };
            let command = rest.trim_start_matches('_');
            if command.is_empty() {
                continue;
            }
            if let Some(verbs) = self.entry(command) {
                if !verbs.contains(&verb) {
                    return Err(Error::InvalidCommandVerb {
                        command: command.to_owned(),
                        verb: verb.as_str(),
                    });
                }
                return Ok((verb, command.to_owned()));
            }
            if self.is_obsolete(command) {
                return Err(Error::ObsoleteCommand(command.to_owned()));
            }
        }
        if self.is_obsolete(&bare) {
            return Err(Error::ObsoleteCommand(bare));
        }
        Err(Error::UnknownCommand(bare))
    }
}

/// Session-scoped commands.
/// <https://www.selenium.dev/documentation/legacy/json_wire_protocol/#command-reference>
pub static SESSION: CommandSet = CommandSet {
    commands: &[
        ("url", &[Get, Post]),
        ("forward", &[Post]),
        ("back", &[Post]),
        ("refresh", &[Post]),
        ("title", &[Get]),
        ("source", &[Get]),
        ("screenshot", &[Get]),
        ("window_handle", &[Get]),
        ("window_handles", &[Get]),
        ("window", &[Post, Delete]),
        ("frame", &[Post]),
        ("cookie", &[Get, Post, Delete]),
        ("element", &[Post]),
        ("elements", &[Post]),
        ("element/active", &[Post, Get]),
        ("keys", &[Post]),
        ("moveto", &[Post]),
        ("click", &[Post]),
        ("buttondown", &[Post]),
        ("buttonup", &[Post]),
        ("doubleclick", &[Post]),
        ("timeouts", &[Post, Get]),
        ("orientation", &[Get, Post]),
        ("alert_text", &[Get, Post]),
        ("accept_alert", &[Post]),
        ("dismiss_alert", &[Post]),
        ("local_storage", &[Get, Post, Delete]),
        ("session_storage", &[Get, Post, Delete]),
        ("location", &[Get, Post]),
        ("log", &[Post]),
        ("log/types", &[Get]),
        ("actions", &[Post, Delete]),
    ],
    obsolete: &["speed", "alert", "visible", "modifier"],
};

pub static ELEMENT: CommandSet = CommandSet {
    commands: &[
        ("click", &[Post]),
        ("submit", &[Post]),
        ("clear", &[Post]),
        ("value", &[Post]),
        ("text", &[Get]),
        ("name", &[Get]),
        ("selected", &[Get]),
        ("enabled", &[Get]),
        ("displayed", &[Get]),
        ("attribute", &[Get]),
        ("property", &[Get]),
        ("css", &[Get]),
        ("rect", &[Get]),
        ("size", &[Get]),
        ("location", &[Get]),
        ("location_in_view", &[Get]),
        ("equals", &[Get]),
        ("screenshot", &[Get]),
        ("element", &[Post]),
        ("elements", &[Post]),
        ("shadow", &[Get]),
    ],
    obsolete: &["toggle", "hover", "drag", "select"],
};

pub static SHADOW_ROOT: CommandSet = CommandSet {
    commands: &[("element", &[Post]), ("elements", &[Post])],
    obsolete: &[],
};

pub static WINDOW: CommandSet = CommandSet {
    commands: &[
        ("size", &[Get, Post]),
        ("position", &[Get, Post]),
        ("rect", &[Get, Post]),
        ("maximize", &[Post]),
        ("minimize", &[Post]),
        ("fullscreen", &[Post]),
        ("new", &[Post]),
        ("handles", &[Get]),
    ],
    obsolete: &["restore"],
};

pub static FRAME: CommandSet = CommandSet {
    commands: &[("parent", &[Post])],
    obsolete: &[],
};

pub static ALERT: CommandSet = CommandSet {
    commands: &[
        ("accept", &[Post]),
        ("dismiss", &[Post]),
        ("text", &[Get, Post]),
    ],
    obsolete: &[],
};

pub static TIMEOUTS: CommandSet = CommandSet {
    commands: &[("async_script", &[Post]), ("implicit_wait", &[Post])],
    obsolete: &[],
};

pub static IME: CommandSet = CommandSet {
    commands: &[
        ("available_engines", &[Get]),
        ("active_engine", &[Get]),
        ("activated", &[Get]),
        ("activate", &[Post]),
        ("deactivate", &[Post]),
    ],
    obsolete: &[],
};

pub static TOUCH: CommandSet = CommandSet {
    commands: &[
        ("click", &[Post]),
        ("down", &[Post]),
        ("up", &[Post]),
        ("move", &[Post]),
        ("scroll", &[Post]),
        ("doubleclick", &[Post]),
        ("longclick", &[Post]),
        ("flick", &[Post]),
    ],
    obsolete: &[],
};

pub static STORAGE: CommandSet = CommandSet {
    commands: &[("key", &[Get, Delete]), ("size", &[Get])],
    obsolete: &[],
};

pub static APPLICATION_CACHE: CommandSet = CommandSet {
    commands: &[("status", &[Get])],
    obsolete: &[],
};

pub static LOG: CommandSet = CommandSet {
    commands: &[("types", &[Get])],
    obsolete: &[],
};
