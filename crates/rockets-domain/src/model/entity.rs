//! Entity - What every stored object has in common
//!
//! Every entity carries an opaque storage identity and an optional
//! Wikipedia link. Neither takes part in equality: entities compare by
//! their business key, so two in-memory copies of the same rocket are
//! the same rocket whatever storage id they were loaded with.

use std::fmt;
use std::hash::Hash;

use serde::Serialize;
use uuid::Uuid;

use super::error::ValidationError;

/// Substring every wikilink must contain
pub const WIKIPEDIA_HOST: &str = "en.wikipedia.org";

/// Opaque identity assigned by storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EntityId(Uuid);

impl EntityId {
    /// Fresh random identity, used by stores on first save
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kinds of entity a repository can hand out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EntityKind {
    Rocket,
    Launch,
    LaunchServiceProvider,
    User,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rocket => "rocket",
            Self::Launch => "launch",
            Self::LaunchServiceProvider => "launch_service_provider",
            Self::User => "user",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A link to an English Wikipedia article
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Wikilink(String);

impl Wikilink {
    pub fn parse(link: impl Into<String>) -> Result<Self, ValidationError> {
        let link = link.into();
        if !link.contains(WIKIPEDIA_HOST) {
            return Err(ValidationError::invalid(
                "wikilink",
                format!("'{}' is not a {} URL", link, WIKIPEDIA_HOST),
            ));
        }
        Ok(Self(link))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Storage identity and wikilink, embedded in every entity
#[derive(Debug, Clone, Default, Serialize)]
pub struct EntityMeta {
    pub(crate) id: Option<EntityId>,
    pub(crate) wikilink: Option<Wikilink>,
}

/// Behaviour shared by Rocket, LaunchServiceProvider, Launch and User
pub trait Entity: Clone {
    /// Which snapshot this entity lives in
    const KIND: EntityKind;

    /// Business-key value object; drives `Eq` and `Hash`
    type Key: Clone + Eq + Hash + Ord + fmt::Debug;

    fn key(&self) -> Self::Key;

    fn meta(&self) -> &EntityMeta;

    fn meta_mut(&mut self) -> &mut EntityMeta;

    fn id(&self) -> Option<EntityId> {
        self.meta().id
    }

    /// Record the identity handed out by storage
    fn assign_id(&mut self, id: EntityId) {
        self.meta_mut().id = Some(id);
    }

    fn wikilink(&self) -> Option<&str> {
        self.meta().wikilink.as_ref().map(Wikilink::as_str)
    }

    fn set_wikilink(&mut self, link: impl Into<String>) -> Result<(), ValidationError> {
        let link = Wikilink::parse(link)?;
        self.meta_mut().wikilink = Some(link);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wikilink_requires_wikipedia_host() {
        let link = Wikilink::parse("https://en.wikipedia.org/wiki/Falcon_9").unwrap();
        assert_eq!(link.as_str(), "https://en.wikipedia.org/wiki/Falcon_9");

        let err = Wikilink::parse("https://www.google.com").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { field: "wikilink", .. }));
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        assert_ne!(EntityId::generate(), EntityId::generate());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(EntityKind::LaunchServiceProvider.to_string(), "launch_service_provider");
    }
}
