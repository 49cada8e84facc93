use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// HTTP methods a DPoP proof may be bound to
///
/// Specified in [RFC 9110 Section 9: HTTP Semantics][1]
///
/// [1]: https://www.rfc-editor.org/rfc/rfc9110.html#section-9
#[derive(Debug, Copy, Clone, Serialize, Deserialize, Eq, PartialEq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Htm {
    /// HTTP GET method
    Get,
    /// HTTP POST method
    Post,
    /// HTTP PUT method
    Put,
    /// HTTP DELETE method
    Delete,
    /// HTTP PATCH method
    Patch,
    /// HTTP HEAD method
    Head,
    /// HTTP OPTIONS method
    Options,
    /// HTTP TRACE method
    Trace,
    /// HTTP CONNECT method
    Connect,
}

impl Htm {
    /// Every method
    pub const ALL: [Self; 9] = [
        Self::Get,
        Self::Post,
        Self::Put,
        Self::Delete,
        Self::Patch,
        Self::Head,
        Self::Options,
        Self::Trace,
        Self::Connect,
    ];

    /// Method as sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Trace => "TRACE",
            Self::Connect => "CONNECT",
        }
    }
}

impl Display for Htm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Htm {
    type Error = RustyDpopError;

    fn try_from(value: &str) -> RustyDpopResult<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == value)
            .ok_or_else(|| DpopCause::IncorrectHttpTarget.into())
    }
}

impl std::str::FromStr for Htm {
    type Err = RustyDpopError;

    fn from_str(s: &str) -> RustyDpopResult<Self> {
        s.try_into()
    }
}
