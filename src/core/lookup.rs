//! Resolves a user-supplied identifier into an id or a slug lookup.

use regex::Regex;
use std::sync::OnceLock;
use uuid::Uuid;

static UUID_RE: OnceLock<Regex> = OnceLock::new();

fn uuid_regex() -> &'static Regex {
    UUID_RE.get_or_init(|| {
        Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
            .unwrap_or_else(|error| panic!("uuid regex failed to compile: {error}"))
    })
}

/// How a single category or location should be looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKey {
    /// The input was a well-formed UUID
    Id(Uuid),
    /// Anything else is treated as a slug
    Slug(String),
}

impl NodeKey {
    /// Classifies `input` as a UUID or a slug.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if uuid_regex().is_match(trimmed) {
            if let Ok(id) = Uuid::parse_str(trimmed) {
                return Self::Id(id);
            }
        }
        Self::Slug(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_input_resolves_to_id() {
        let id = Uuid::new_v4();
        assert_eq!(NodeKey::parse(&id.to_string()), NodeKey::Id(id));
        assert_eq!(
            NodeKey::parse(&id.to_string().to_uppercase()),
            NodeKey::Id(id)
        );
    }

    #[test]
    fn test_other_input_resolves_to_slug() {
        assert_eq!(NodeKey::parse("zagreb"), NodeKey::Slug("zagreb".to_string()));
        // Simple (unhyphenated) form is not the canonical format
        let simple = Uuid::new_v4().simple().to_string();
        assert_eq!(NodeKey::parse(&simple), NodeKey::Slug(simple.clone()));
        assert_eq!(
            NodeKey::parse("1234-not-a-uuid"),
            NodeKey::Slug("1234-not-a-uuid".to_string())
        );
    }
}
