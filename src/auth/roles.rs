// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Role naming convention.
//!
//! Stored user roles and rule requirements are compared as *authorities*:
//! the role name carrying the fixed `ROLE_` prefix. A user stored with role
//! `ADMIN` or `ROLE_ADMIN` holds the authority `ROLE_ADMIN`, which satisfies
//! a rule requiring role `ADMIN`.

/// Prefix marking a role authority.
pub const ROLE_PREFIX: &str = "ROLE_";

/// Authority string for a role name, adding the prefix when missing.
pub fn authority(role: &str) -> String {
    if role.starts_with(ROLE_PREFIX) {
        role.to_string()
    } else {
        format!("{ROLE_PREFIX}{role}")
    }
}

/// Whether a role name already carries the authority prefix.
pub fn is_prefixed(role: &str) -> bool {
    role.starts_with(ROLE_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authority_adds_prefix() {
        assert_eq!(authority("ADMIN"), "ROLE_ADMIN");
        assert_eq!(authority("USER"), "ROLE_USER");
    }

    #[test]
    fn authority_keeps_existing_prefix() {
        assert_eq!(authority("ROLE_ADMIN"), "ROLE_ADMIN");
    }

    #[test]
    fn authority_is_case_sensitive() {
        assert_eq!(authority("admin"), "ROLE_admin");
        assert_eq!(authority("role_admin"), "ROLE_role_admin");
        assert!(!is_prefixed("role_admin"));
    }
}
