use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};

/// Flat role ladder. `Driver` and `Admin` may write; only `Admin` administers.
#[derive(
    EnumString,
    VariantArray,
    Display,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    User,
    Driver,
    Admin,
}

impl Role {
    pub fn can_write(&self) -> bool {
        matches!(self, Self::Driver | Self::Admin)
    }

    pub fn is_admin(&self) -> bool {
        *self == Self::Admin
    }
}
