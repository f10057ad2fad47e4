// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Route access policy.
//!
//! An ordered table of `(path pattern, requirement)` rules, loaded once at
//! startup and evaluated first-match against each request's context.
//!
//! ## Pattern syntax
//!
//! Patterns are `/`-separated segments (empty segments ignored):
//!
//! - `**` matches zero or more segments
//! - `*` matches exactly one segment
//! - `v*`, `*.json` glob within a single segment
//! - anything else matches a segment exactly (case-sensitive)
//!
//! ## Unmatched paths
//!
//! A path no rule matches is treated as [`Requirement::AuthenticatedOnly`].
//! The fallback is never public.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::context::RequestContext;
use super::roles;

#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("rule {index}: empty path pattern")]
    EmptyPattern { index: usize },

    #[error("rule {index}: role requirement is empty")]
    EmptyRole { index: usize },

    #[error("rule {index}: role `{role}` must not start with `{prefix}`", prefix = roles::ROLE_PREFIX)]
    PrefixedRole { index: usize, role: String },

    #[error("rule {index}: `role` access needs a `role` field")]
    MissingRole { index: usize },

    #[error("failed to read rules file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid rules file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// `**`
    AnyDepth,
    /// `*`
    Any,
    /// Segment glob containing `*`
    Glob(String),
    Literal(String),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        match raw {
            "**" => Segment::AnyDepth,
            "*" => Segment::Any,
            s if s.contains('*') => Segment::Glob(s.to_string()),
            s => Segment::Literal(s.to_string()),
        }
    }

    fn matches(&self, segment: &str) -> bool {
        match self {
            Segment::AnyDepth | Segment::Any => true,
            Segment::Glob(glob) => glob_match(glob, segment),
            Segment::Literal(lit) => lit == segment,
        }
    }
}

/// `*` matches any run of characters within one segment.
fn glob_match(glob: &str, text: &str) -> bool {
    let mut parts = glob.split('*');
    let first = parts.next().unwrap_or_default();
    let Some(mut rest) = text.strip_prefix(first) else {
        return false;
    };
    let mut pieces: Vec<&str> = parts.collect();
    let last = pieces.pop().unwrap_or_default();
    for piece in pieces {
        match rest.find(piece) {
            Some(at) => rest = &rest[at + piece.len()..],
            None => return false,
        }
    }
    rest.len() >= last.len() && rest.ends_with(last)
}

/// Compiled path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Self {
        Self {
            source: pattern.to_string(),
            segments: split_path(pattern).map(Segment::parse).collect(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, path: &str) -> bool {
        let path: Vec<&str> = split_path(path).collect();
        match_segments(&self.segments, &path)
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn match_segments(pattern: &[Segment], path: &[&str]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((Segment::AnyDepth, rest)) => {
            (0..=path.len()).any(|skip| match_segments(rest, &path[skip..]))
        }
        Some((segment, rest)) => match path.split_first() {
            Some((head, tail)) => segment.matches(head) && match_segments(rest, tail),
            None => false,
        },
    }
}

/// What a rule demands of the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    Public,
    AuthenticatedOnly,
    /// Role name without the `ROLE_` prefix.
    RequiresRole(String),
}

impl Requirement {
    fn decide(&self, ctx: &RequestContext) -> Decision {
        match (self, ctx.principal()) {
            (Requirement::Public, _) => Decision::Allowed,
            (_, None) => Decision::Denied(Denial::Unauthenticated),
            (Requirement::AuthenticatedOnly, Some(_)) => Decision::Allowed,
            (Requirement::RequiresRole(role), Some(principal)) => {
                if principal.has_role(role) {
                    Decision::Allowed
                } else {
                    Decision::Denied(Denial::Forbidden { role: role.clone() })
                }
            }
        }
    }
}

/// One entry of the policy table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRule {
    pub pattern: PathPattern,
    pub requirement: Requirement,
}

impl AccessRule {
    pub fn public(pattern: &str) -> Self {
        Self::new(pattern, Requirement::Public)
    }

    pub fn authenticated(pattern: &str) -> Self {
        Self::new(pattern, Requirement::AuthenticatedOnly)
    }

    pub fn role(pattern: &str, role: &str) -> Self {
        Self::new(pattern, Requirement::RequiresRole(role.to_string()))
    }

    pub fn new(pattern: &str, requirement: Requirement) -> Self {
        Self {
            pattern: PathPattern::parse(pattern),
            requirement,
        }
    }
}

/// Why a request was denied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    /// No identity was resolved for the request.
    Unauthenticated,
    /// An identity was resolved but lacks `role`.
    Forbidden { role: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied(Denial),
}

/// Access kind as written in a rules file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessKind {
    Public,
    Authenticated,
    Role,
}

/// Rule as written in a rules file.
///
/// ```json
/// [
///   { "path": "/api/auth/login", "access": "public" },
///   { "path": "/api/admin/**", "access": "role", "role": "ADMIN" },
///   { "path": "/**", "access": "authenticated" }
/// ]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    pub path: String,
    pub access: AccessKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Ordered, immutable rule table.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    rules: Vec<AccessRule>,
}

impl AccessPolicy {
    /// Build a policy, validating every rule.
    pub fn new(rules: Vec<AccessRule>) -> Result<Self, PolicyError> {
        for (index, rule) in rules.iter().enumerate() {
            if rule.pattern.as_str().trim().is_empty() {
                return Err(PolicyError::EmptyPattern { index });
            }
            if let Requirement::RequiresRole(role) = &rule.requirement {
                if role.is_empty() {
                    return Err(PolicyError::EmptyRole { index });
                }
                if roles::is_prefixed(role) {
                    return Err(PolicyError::PrefixedRole {
                        index,
                        role: role.clone(),
                    });
                }
            }
        }
        Ok(Self { rules })
    }

    pub fn from_configs(configs: Vec<RuleConfig>) -> Result<Self, PolicyError> {
        let rules = configs
            .into_iter()
            .enumerate()
            .map(|(index, config)| -> Result<AccessRule, PolicyError> {
                let requirement = match config.access {
                    AccessKind::Public => Requirement::Public,
                    AccessKind::Authenticated => Requirement::AuthenticatedOnly,
                    AccessKind::Role => {
                        let role = config.role.ok_or(PolicyError::MissingRole { index })?;
                        Requirement::RequiresRole(role)
                    }
                };
                Ok(AccessRule::new(&config.path, requirement))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(rules)
    }

    /// Load a JSON array of [`RuleConfig`]s.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let raw = std::fs::read_to_string(path)?;
        let configs: Vec<RuleConfig> = serde_json::from_str(&raw)?;
        Self::from_configs(configs)
    }

    /// Built-in table protecting the bundled routes.
    pub fn default_rules() -> Vec<AccessRule> {
        vec![
            AccessRule::public("/api/auth/login"),
            AccessRule::public("/hello"),
            AccessRule::public("/health"),
            AccessRule::public("/docs/**"),
            AccessRule::public("/api-doc/**"),
            AccessRule::public("/api/posts/public/**"),
            AccessRule::role("/api/admin/hello-user", "USER"),
            AccessRule::role("/api/admin/**", "ADMIN"),
            AccessRule::authenticated("/**"),
        ]
    }

    pub fn rules(&self) -> &[AccessRule] {
        &self.rules
    }

    /// First rule whose pattern matches `path`.
    pub fn matching_rule(&self, path: &str) -> Option<&AccessRule> {
        self.rules.iter().find(|rule| rule.pattern.matches(path))
    }

    /// Decide whether the request for `path` may proceed.
    pub fn evaluate(&self, path: &str, ctx: &RequestContext) -> Decision {
        match self.matching_rule(path) {
            Some(rule) => rule.requirement.decide(ctx),
            None => Requirement::AuthenticatedOnly.decide(ctx),
        }
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            rules: Self::default_rules(),
        }
    }
}
