use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter};

use crate::error::MmrError;

/// The five lane/function archetypes. Declaration order is the tie-break order
/// used by role assignment.
///
/// Names are parsed through [`Role::try_from`], so an unknown name in a
/// configuration document is reported as [`MmrError::UnknownRole`].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, Display, AsRefStr)]
#[serde(rename_all = "snake_case", try_from = "String")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    Carry,
    Mid,
    Offlane,
    SoftSupport,
    HardSupport
}

pub const ROLE_COUNT: usize = 5;

impl Role {
    /// Supports are expected to trade farm for vision and utility.
    pub fn is_support(&self) -> bool {
        matches!(self, Role::SoftSupport | Role::HardSupport)
    }
}

impl TryFrom<&str> for Role {
    type Error = MmrError;

    fn try_from(v: &str) -> Result<Self, Self::Error> {
        Role::iter()
            .find(|role| role.as_ref() == v)
            .ok_or_else(|| MmrError::UnknownRole(v.to_string()))
    }
}

impl TryFrom<String> for Role {
    type Error = MmrError;

    fn try_from(v: String) -> Result<Self, Self::Error> {
        Role::try_from(v.as_str())
    }
}
