//! Caller identity model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role granted to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("admin") {
            Ok(Role::Admin)
        } else {
            Err(format!("Unknown role: {}", s))
        }
    }
}

/// Authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub roles: Vec<Role>,
}

impl Principal {
    pub fn new(user_id: Uuid, roles: Vec<Role>) -> Self {
        Self { user_id, roles }
    }

    /// Principal holding the Admin role.
    pub fn admin(user_id: Uuid) -> Self {
        Self::new(user_id, vec![Role::Admin])
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    /// Builds a principal from role names, skipping unknown ones.
    pub fn from_role_names<I, S>(user_id: Uuid, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let roles = names
            .into_iter()
            .filter_map(|name| name.as_ref().parse().ok())
            .collect();
        Self::new(user_id, roles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_is_case_insensitive() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert!("editor".parse::<Role>().is_err());
    }

    #[test]
    fn test_principal_from_role_names_skips_unknown() {
        let principal = Principal::from_role_names(Uuid::nil(), ["Admin", "Auditor"]);
        assert!(principal.is_admin());
        assert_eq!(principal.roles.len(), 1);
    }

    #[test]
    fn test_principal_without_roles_is_not_admin() {
        let principal = Principal::new(Uuid::new_v4(), vec![]);
        assert!(!principal.is_admin());
    }
}
