//! Route pattern parsing.
//!
//! # Responsibilities
//! - Parse `/users/:id/*rest` style templates into segments
//! - Reject malformed templates at registration time
//! - Join group prefixes with route patterns
//!
//! # Design Decisions
//! - Literal matching is case-sensitive
//! - Empty segments are dropped, so `/a//b/` and `/a/b` are the same pattern
//! - Catch-all is only allowed as the last segment
//! - No regex: a segment is a literal, a `:name` or a `*name`

use std::fmt;

use crate::error::RouteError;

/// One piece of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Must match the path segment exactly.
    Literal(String),
    /// `:name`: matches any single non-empty segment.
    Param(String),
    /// `*name`: matches every remaining segment (at least one).
    CatchAll(String),
}

impl Segment {
    /// Name bound by this segment, if any.
    pub fn binding(&self) -> Option<&str> {
        match self {
            Segment::Literal(_) => None,
            Segment::Param(name) | Segment::CatchAll(name) => Some(name),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Literal(s) => write!(f, "{}", s),
            Segment::Param(name) => write!(f, ":{}", name),
            Segment::CatchAll(name) => write!(f, "*{}", name),
        }
    }
}

/// A parsed route template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Pattern {
    segments: Vec<Segment>,
}

impl Pattern {
    /// The root pattern `/`.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a template such as `/get-UrlParams/:name/:age`.
    pub fn parse(raw: &str) -> Result<Self, RouteError> {
        let invalid = |reason| RouteError::InvalidPattern {
            pattern: raw.to_string(),
            reason,
        };

        let mut segments = Vec::new();
        for part in raw.split('/').filter(|s| !s.is_empty()) {
            if matches!(segments.last(), Some(Segment::CatchAll(_))) {
                return Err(invalid("catch-all must be the last segment"));
            }
            let segment = if let Some(name) = part.strip_prefix(':') {
                if name.is_empty() {
                    return Err(invalid("parameter name is empty"));
                }
                Segment::Param(name.to_string())
            } else if let Some(name) = part.strip_prefix('*') {
                if name.is_empty() {
                    return Err(invalid("catch-all name is empty"));
                }
                Segment::CatchAll(name.to_string())
            } else {
                Segment::Literal(part.to_string())
            };
            segments.push(segment);
        }

        let pattern = Self { segments };
        pattern.check_bindings().map_err(invalid)?;
        Ok(pattern)
    }

    /// Concatenate `self` (a group prefix) with `suffix`.
    pub fn join(&self, suffix: &Pattern) -> Result<Self, RouteError> {
        let joined = Self {
            segments: self
                .segments
                .iter()
                .chain(suffix.segments.iter())
                .cloned()
                .collect(),
        };
        let invalid = |reason| RouteError::InvalidPattern {
            pattern: joined.to_string(),
            reason,
        };
        if self
            .segments
            .iter()
            .any(|s| matches!(s, Segment::CatchAll(_)))
            && !suffix.segments.is_empty()
        {
            return Err(invalid("catch-all must be the last segment"));
        }
        joined.check_bindings().map_err(invalid)?;
        Ok(joined)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Names bound by this pattern, in order.
    pub fn bindings(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(Segment::binding)
    }

    fn check_bindings(&self) -> Result<(), &'static str> {
        let names: Vec<&str> = self.bindings().collect();
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err("parameter name used twice");
            }
        }
        Ok(())
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "/");
        }
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_segments() {
        let pattern = Pattern::parse("/get-UrlParams/:name/:age").unwrap();
        assert_eq!(
            pattern.segments(),
            &[
                Segment::Literal("get-UrlParams".into()),
                Segment::Param("name".into()),
                Segment::Param("age".into()),
            ]
        );
        assert_eq!(pattern.bindings().collect::<Vec<_>>(), vec!["name", "age"]);
        assert_eq!(pattern.to_string(), "/get-UrlParams/:name/:age");
    }

    #[test]
    fn test_empty_segments_dropped() {
        assert_eq!(Pattern::parse("//ping/").unwrap(), Pattern::parse("/ping").unwrap());
        assert_eq!(Pattern::parse("/").unwrap(), Pattern::root());
        assert_eq!(Pattern::root().to_string(), "/");
    }

    #[test]
    fn test_invalid_patterns() {
        for raw in ["/me/:", "/files/*", "/files/*path/more", "/a/:id/:id"] {
            assert!(
                matches!(Pattern::parse(raw), Err(RouteError::InvalidPattern { .. })),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_join_prefix() {
        let prefix = Pattern::parse("/admin").unwrap();
        let route = Pattern::parse("/me/:id").unwrap();
        assert_eq!(prefix.join(&route).unwrap().to_string(), "/admin/me/:id");

        let root = Pattern::root();
        assert_eq!(root.join(&route).unwrap(), route);
    }

    #[test]
    fn test_join_rejects_conflicts() {
        let prefix = Pattern::parse("/users/:id").unwrap();
        let route = Pattern::parse("/posts/:id").unwrap();
        assert!(prefix.join(&route).is_err());

        let catch_all = Pattern::parse("/static/*path").unwrap();
        assert!(catch_all.join(&Pattern::parse("/x").unwrap()).is_err());
    }
}
