//! Emoji tokens and role names.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// A rejected emoji or role name input.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid {}: {}", what, reason)]
pub struct TokenError {
    /// What was being parsed ("emoji", "role name")
    pub what: &'static str,
    /// Why it was rejected
    pub reason: String,
}

impl TokenError {
    fn new(what: &'static str, reason: impl Into<String>) -> Self {
        Self {
            what,
            reason: reason.into(),
        }
    }
}

/// A reaction emoji, used as the mapping key.
///
/// Unicode emoji are stored verbatim. Custom server emoji are stored as
/// `name:id`, or `a:name:id` when animated. Custom emoji are identified by
/// id alone: the name and the animated flag only affect display, so an emoji
/// renamed on the server still matches its mapping key.
///
/// # Examples
///
/// ```
/// use reactrole_core::Emoji;
///
/// let check = Emoji::parse(" ✅ ").unwrap();
/// assert_eq!(check.as_str(), "✅");
///
/// let party = Emoji::parse("<a:party:123456>").unwrap();
/// assert_eq!(party.as_str(), "a:party:123456");
/// assert_eq!(party.custom_parts(), Some(("party", 123456)));
/// assert_eq!(party.markup(), "<a:party:123456>");
/// assert_eq!(party, Emoji::custom("renamed", 123456));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, derive_more::Display)]
#[serde(try_from = "String", into = "String")]
#[display("{}", _0)]
pub struct Emoji(String);

/// What two emoji are compared by.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Identity<'a> {
    Unicode(&'a str),
    Custom(u64),
}

impl Emoji {
    /// Parse user input or a stored key into a normalised token.
    ///
    /// Accepts unicode emoji, `<:name:id>`, `<a:name:id>`, `name:id` and
    /// `a:name:id`.
    pub fn parse(input: &str) -> Result<Self, TokenError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(TokenError::new("emoji", "must not be empty"));
        }

        if let Some(inner) = trimmed.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
            let (animated, inner) = match inner.strip_prefix("a:") {
                Some(rest) => (true, rest),
                None => (
                    false,
                    inner.strip_prefix(':').ok_or_else(|| {
                        TokenError::new("emoji", format!("unrecognised markup {trimmed}"))
                    })?,
                ),
            };
            let (name, id) = inner
                .rsplit_once(':')
                .ok_or_else(|| TokenError::new("emoji", format!("missing id in {trimmed}")))?;
            let id: u64 = id
                .parse()
                .map_err(|_| TokenError::new("emoji", format!("bad id in {trimmed}")))?;
            if name.is_empty() {
                return Err(TokenError::new("emoji", format!("missing name in {trimmed}")));
            }
            return Ok(Self::build(name, id, animated));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Token for a unicode emoji, kept verbatim.
    pub fn unicode(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Token for a custom server emoji.
    pub fn custom(name: &str, id: u64) -> Self {
        Self::build(name, id, false)
    }

    /// Token for an animated custom server emoji.
    pub fn animated(name: &str, id: u64) -> Self {
        Self::build(name, id, true)
    }

    fn build(name: &str, id: u64, animated: bool) -> Self {
        if animated {
            Self(format!("a:{name}:{id}"))
        } else {
            Self(format!("{name}:{id}"))
        }
    }

    /// The token as stored.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name and id when the token names a custom emoji.
    pub fn custom_parts(&self) -> Option<(&str, u64)> {
        let (name, id) = self.0.rsplit_once(':')?;
        let id = id.parse().ok()?;
        let name = match name.strip_prefix("a:") {
            Some(rest) if !rest.is_empty() => rest,
            _ => name,
        };
        if name.is_empty() {
            return None;
        }
        Some((name, id))
    }

    /// Whether the custom emoji is animated.
    pub fn is_animated(&self) -> bool {
        self.custom_parts().is_some()
            && self.0.strip_prefix("a:").is_some_and(|rest| rest.contains(':'))
    }

    /// Text that renders as the emoji inside a Discord message.
    pub fn markup(&self) -> String {
        match self.custom_parts() {
            Some((name, id)) if self.is_animated() => format!("<a:{name}:{id}>"),
            Some((name, id)) => format!("<:{name}:{id}>"),
            None => self.0.clone(),
        }
    }

    fn identity(&self) -> Identity<'_> {
        match self.custom_parts() {
            Some((_, id)) => Identity::Custom(id),
            None => Identity::Unicode(&self.0),
        }
    }
}

impl PartialEq for Emoji {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Emoji {}

impl Hash for Emoji {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl PartialOrd for Emoji {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Emoji {
    fn cmp(&self, other: &Self) -> Ordering {
        self.identity().cmp(&other.identity())
    }
}

impl TryFrom<String> for Emoji {
    type Error = TokenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Emoji> for String {
    fn from(emoji: Emoji) -> Self {
        emoji.0
    }
}

/// Name of a server role.
///
/// Names are compared exactly; the first role carrying the name wins.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(transparent)]
#[display("{}", _0)]
pub struct RoleName(String);

impl RoleName {
    /// Validate a role name typed by an administrator.
    pub fn parse(input: &str) -> Result<Self, TokenError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(TokenError::new("role name", "must not be empty"));
        }
        if trimmed.chars().count() > 100 {
            return Err(TokenError::new("role name", "must be at most 100 characters"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Wrap a name without validation, e.g. one reported by the platform.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for RoleName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}
