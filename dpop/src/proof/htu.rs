use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// The HTTP request URI without query and fragment parts
///
/// Specified in [RFC 9449 Section 4.2][1]
///
/// [1]: https://www.rfc-editor.org/rfc/rfc9449.html#section-4.2
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Htu(url::Url);

impl Htu {
    /// Serialized URI
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<url::Url> for Htu {
    fn from(mut uri: url::Url) -> Self {
        uri.set_query(None);
        uri.set_fragment(None);
        Self(uri)
    }
}

impl From<&url::Url> for Htu {
    fn from(uri: &url::Url) -> Self {
        uri.clone().into()
    }
}

impl TryFrom<&str> for Htu {
    type Error = RustyDpopError;

    fn try_from(u: &str) -> RustyDpopResult<Self> {
        let uri = url::Url::parse(u).map_err(|_| DpopCause::IncorrectHttpTarget)?;
        Ok(uri.into())
    }
}

impl Display for Htu {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
