use serde_repr::{Deserialize_repr, Serialize_repr};

#[derive(Deserialize_repr, Serialize_repr, Debug, Eq, PartialEq, Copy, Clone, Hash)]
#[repr(u8)]
pub enum TeamSide {
    A = 1,
    B = 2
}

impl TeamSide {
    pub fn opponent(&self) -> TeamSide {
        match self {
            TeamSide::A => TeamSide::B,
            TeamSide::B => TeamSide::A
        }
    }
}
