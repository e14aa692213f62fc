//! Signing roles of a debt order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A party that must consent to a debt order by signing its commitment hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Debtor,
    Creditor,
    Underwriter,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Debtor, Role::Creditor, Role::Underwriter];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Debtor => "debtor",
            Role::Creditor => "creditor",
            Role::Underwriter => "underwriter",
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
        match s.trim().to_ascii_lowercase().as_str() {
            "debtor" => Ok(Role::Debtor),
            "creditor" => Ok(Role::Creditor),
            "underwriter" => Ok(Role::Underwriter),
            other => Err(format!(
                "unknown role '{}', expected debtor, creditor or underwriter",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_display_and_parse() {
        for role in Role::ALL {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
        assert_eq!(" Underwriter ".parse::<Role>().unwrap(), Role::Underwriter);
        assert!("relayer".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde() {
        let json = serde_json::to_string(&Role::Creditor).unwrap();
        assert_eq!(json, "\"creditor\"");
    }
}
