//! Generation preferences
//!
//! The gender/season/occasion tuple sent with every generation request and
//! snapshotted into saved outfits as their context.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Men,
    Women,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    #[default]
    Winter,
    Summer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Occasion {
    #[default]
    Casual,
    Formal,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Men, Gender::Women];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Men => "men",
            Self::Women => "women",
        }
    }
}

impl Season {
    pub const ALL: [Season; 2] = [Season::Winter, Season::Summer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Winter => "winter",
            Self::Summer => "summer",
        }
    }
}

impl Occasion {
    pub const ALL: [Occasion; 2] = [Occasion::Casual, Occasion::Formal];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Casual => "casual",
            Self::Formal => "formal",
        }
    }
}

macro_rules! wire_enum {
    ($ty:ident, $field:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_lowercase();
                Self::ALL
                    .into_iter()
                    .find(|v| v.as_str() == wanted)
                    .ok_or_else(|| DomainError::InvalidValue {
                        field: $field,
                        value: s.to_string(),
                    })
            }
        }
    };
}

wire_enum!(Gender, "gender");
wire_enum!(Season, "season");
wire_enum!(Occasion, "occasion");

/// Which preference a user is changing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceField {
    Gender,
    Season,
    Occasion,
}

impl FromStr for PreferenceField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gender" => Ok(Self::Gender),
            "season" => Ok(Self::Season),
            "occasion" => Ok(Self::Occasion),
            other => Err(DomainError::UnknownField(other.to_string())),
        }
    }
}

/// The preference tuple driving outfit generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Preferences {
    pub gender: Gender,
    pub season: Season,
    pub occasion: Occasion,
}

impl Preferences {
    pub fn new(gender: Gender, season: Season, occasion: Occasion) -> Self {
        Self {
            gender,
            season,
            occasion,
        }
    }

    /// Assign one field from its wire string
    ///
    /// Nothing changes when the value is not one of the field's options.
    pub fn set(&mut self, field: PreferenceField, value: &str) -> Result<(), DomainError> {
        match field {
            PreferenceField::Gender => self.gender = value.parse()?,
            PreferenceField::Season => self.season = value.parse()?,
            PreferenceField::Occasion => self.occasion = value.parse()?,
        }
        Ok(())
    }

    /// Every valid combination, in a stable order
    pub fn all() -> impl Iterator<Item = Preferences> {
        Gender::ALL.into_iter().flat_map(|g| {
            Season::ALL
                .into_iter()
                .flat_map(move |s| Occasion::ALL.into_iter().map(move |o| Preferences::new(g, s, o)))
        })
    }
}

impl fmt::Display for Preferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} · {} · {}", self.gender, self.season, self.occasion)
    }
}
