/*
    permission.rs - Conversation permission bits

    A participant holds any subset of three independent bits:
    - MEMBER (0b001)
    - ADMIN  (0b010)
    - OWNER  (0b100)

    Bits combine with `|` and are toggled with `^`. Values are always masked
    to the defined bits.
*/

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor};
use std::str::FromStr;

/// Permission bit set held by a conversation participant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission(u8);

impl Permission {
    pub const NONE: Permission = Permission(0);
    pub const MEMBER: Permission = Permission(0b001);
    pub const ADMIN: Permission = Permission(0b010);
    pub const OWNER: Permission = Permission(0b100);
    pub const ALL: Permission = Permission(0b111);

    /// Build from raw bits, rejecting anything outside the defined bits
    pub fn from_bits(bits: u8) -> Option<Self> {
        if bits & !Self::ALL.0 == 0 {
            Some(Permission(bits))
        } else {
            None
        }
    }

    /// Build from raw bits, dropping undefined bits
    pub fn from_bits_truncate(bits: u8) -> Self {
        Permission(bits & Self::ALL.0)
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// True when every bit of `other` is set in `self`
    pub fn contains(&self, other: Permission) -> bool {
        self.0 & other.0 == other.0
    }

    /// True when `self` and `other` share at least one bit
    pub fn intersects(&self, other: Permission) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_member(&self) -> bool {
        self.contains(Self::MEMBER)
    }

    pub fn is_admin(&self) -> bool {
        self.contains(Self::ADMIN)
    }

    pub fn is_owner(&self) -> bool {
        self.contains(Self::OWNER)
    }

    /// Name of the highest role held, for display
    pub fn role_label(&self) -> &'static str {
        if self.is_owner() {
            "owner"
        } else if self.is_admin() {
            "admin"
        } else if self.is_member() {
            "member"
        } else {
            "none"
        }
    }
}

impl BitXor for Permission {
    type Output = Permission;

    fn bitxor(self, rhs: Permission) -> Permission {
        Permission((self.0 ^ rhs.0) & Self::ALL.0)
    }
}

impl BitOr for Permission {
    type Output = Permission;

    fn bitor(self, rhs: Permission) -> Permission {
        Permission((self.0 | rhs.0) & Self::ALL.0)
    }
}

impl BitAnd for Permission {
    type Output = Permission;

    fn bitand(self, rhs: Permission) -> Permission {
        Permission(self.0 & rhs.0)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#05b}", self.0)
    }
}

/// Error returned when parsing an unknown role name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown permission role: {0}")]
pub struct ParsePermissionError(pub String);

impl FromStr for Permission {
    type Err = ParsePermissionError;

    /// Parses a single role name (`member`, `admin`, `owner`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "member" => Ok(Permission::MEMBER),
            "admin" => Ok(Permission::ADMIN),
            "owner" => Ok(Permission::OWNER),
            _ => Err(ParsePermissionError(s.to_string())),
        }
    }
}
