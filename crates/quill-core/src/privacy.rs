//! Visibility section and privacy settings

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Visibility tier selector of the remote service.
///
/// `Default` publishes with the service's default visibility; `Restricted`
/// requires an explicit follow-up settings call carrying a [`Privacy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Section {
    /// Default (public) tier, no follow-up call
    #[default]
    Default,
    /// Restricted tier configured via `/note/set`
    Restricted,
}

impl Section {
    /// Numeric code used on the wire
    pub fn code(self) -> u8 {
        match self {
            Section::Default => 0,
            Section::Restricted => 1,
        }
    }
}

/// Privacy of a published note.
///
/// Rule fields only exist on [`Privacy::Rule`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "rule", rename_all = "lowercase")]
pub enum Privacy {
    /// Visible to anyone
    #[default]
    Public,
    /// Visible to the owner only
    Private,
    /// Public subject to sharing/expiry rules
    Rule {
        /// Disallow sharing
        #[serde(rename = "noShare", default)]
        no_share: bool,
        /// Epoch seconds after which the note turns private; `0` means never
        #[serde(rename = "expireAt", default)]
        expire_at: i64,
    },
}

impl Privacy {
    /// Name of the privacy type as written on the wire
    pub fn kind(&self) -> &'static str {
        match self {
            Privacy::Public => "public",
            Privacy::Private => "private",
            Privacy::Rule { .. } => "rule",
        }
    }
}

impl fmt::Display for Privacy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

impl FromStr for Privacy {
    type Err = String;

    /// Parses the privacy type name. `rule` yields default rule fields.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(Privacy::Public),
            "private" => Ok(Privacy::Private),
            "rule" => Ok(Privacy::Rule {
                no_share: false,
                expire_at: 0,
            }),
            other => Err(format!("unknown privacy type: {other}")),
        }
    }
}

/// Section plus privacy, as chosen for one publish.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisibilitySettings {
    /// Visibility tier
    pub section: Section,
    /// Privacy applied when `section` is [`Section::Restricted`]
    pub privacy: Privacy,
}

impl VisibilitySettings {
    /// Restricted section with the given privacy
    pub fn restricted(privacy: Privacy) -> Self {
        Self {
            section: Section::Restricted,
            privacy,
        }
    }

    /// Whether a follow-up visibility call is needed
    pub fn needs_follow_up(&self) -> bool {
        self.section == Section::Restricted
    }
}
