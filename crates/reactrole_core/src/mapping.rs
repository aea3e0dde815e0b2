//! Ordered emoji-to-role mapping.

use crate::{Emoji, RoleName};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Per-server mapping from emoji to role name.
///
/// Insertion order is preserved and decides the order of the rendered role
/// list. Each emoji appears at most once; overwriting a key keeps its slot.
/// Serialises as a JSON object whose keys keep that order.
///
/// # Examples
///
/// ```
/// use reactrole_core::{Emoji, RoleMapping, RoleName};
///
/// let mut mapping = RoleMapping::new();
/// mapping.insert(Emoji::unicode("✅"), RoleName::new("Verified"));
/// mapping.insert(Emoji::unicode("🎮"), RoleName::new("Gamer"));
/// mapping.insert(Emoji::unicode("✅"), RoleName::new("Member"));
///
/// let order: Vec<_> = mapping.emojis().map(|e| e.as_str()).collect();
/// assert_eq!(order, vec!["✅", "🎮"]);
/// assert_eq!(mapping.get(&Emoji::unicode("✅")), Some(&RoleName::new("Member")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleMapping {
    entries: Vec<(Emoji, RoleName)>,
}

impl RoleMapping {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of mapped emoji.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no emoji is mapped.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Role mapped to an emoji.
    pub fn get(&self, emoji: &Emoji) -> Option<&RoleName> {
        self.entries
            .iter()
            .find(|(key, _)| key == emoji)
            .map(|(_, role)| role)
    }

    /// Whether the emoji is a key.
    pub fn contains(&self, emoji: &Emoji) -> bool {
        self.get(emoji).is_some()
    }

    /// Insert or overwrite, returning the previous role.
    ///
    /// An overwrite keeps the entry's position and takes the new key's
    /// spelling, so a renamed custom emoji displays under its current name.
    pub fn insert(&mut self, emoji: Emoji, role: RoleName) -> Option<RoleName> {
        match self.entries.iter_mut().find(|(key, _)| *key == emoji) {
            Some((key, existing)) => {
                *key = emoji;
                Some(std::mem::replace(existing, role))
            }
            None => {
                self.entries.push((emoji, role));
                None
            }
        }
    }

    /// Remove an emoji, returning its role.
    pub fn remove(&mut self, emoji: &Emoji) -> Option<RoleName> {
        let index = self.entries.iter().position(|(key, _)| key == emoji)?;
        Some(self.entries.remove(index).1)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Emoji, &RoleName)> {
        self.entries.iter().map(|(emoji, role)| (emoji, role))
    }

    /// Keys in insertion order.
    pub fn emojis(&self) -> impl Iterator<Item = &Emoji> {
        self.entries.iter().map(|(emoji, _)| emoji)
    }
}

impl FromIterator<(Emoji, RoleName)> for RoleMapping {
    fn from_iter<I: IntoIterator<Item = (Emoji, RoleName)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (emoji, role) in iter {
            mapping.insert(emoji, role);
        }
        mapping
    }
}

impl Serialize for RoleMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (emoji, role) in &self.entries {
            map.serialize_entry(emoji, role)?;
        }
        map.end()
    }
}

struct RoleMappingVisitor;

impl<'de> Visitor<'de> for RoleMappingVisitor {
    type Value = RoleMapping;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map of emoji to role name")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RoleMapping, A::Error> {
        let mut mapping = RoleMapping::new();
        while let Some((emoji, role)) = access.next_entry::<Emoji, RoleName>()? {
            mapping.insert(emoji, role);
        }
        Ok(mapping)
    }
}

impl<'de> Deserialize<'de> for RoleMapping {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RoleMappingVisitor)
    }
}
