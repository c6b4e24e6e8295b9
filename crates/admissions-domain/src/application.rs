//! Application domain enums.
//!
//! Wire and storage format is SCREAMING_SNAKE_CASE (`"DRAFT"`, `"MALE"`).
//! Parsing is case-insensitive because the wizard sends lowercase values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {field} value: {value}")]
pub struct UnknownVariant {
    pub field: &'static str,
    pub value: String,
}

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $($variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let upper = s.trim().to_ascii_uppercase();
                match upper.as_str() {
                    $($wire => Ok(Self::$variant),)+
                    _ => Err(UnknownVariant {
                        field: $field,
                        value: s.to_owned(),
                    }),
                }
            }
        }
    };
}

string_enum! {
    /// Lifecycle state of an application. `Submitted` is terminal.
    ApplicationStatus, "status" {
        Draft => "DRAFT",
        Submitted => "SUBMITTED",
    }
}

impl ApplicationStatus {
    /// Whether moving from `self` to `next` is allowed.
    ///
    /// Staying in the same state is always allowed; the only edge is
    /// `Draft -> Submitted`.
    pub fn can_transition_to(self, next: ApplicationStatus) -> bool {
        self == next || (self == Self::Draft && next == Self::Submitted)
    }
}

string_enum! {
    Gender, "gender" {
        Male => "MALE",
        Female => "FEMALE",
        Other => "OTHER",
    }
}

string_enum! {
    /// Highest completed level of education.
    EducationLevel, "highestEducation" {
        Bece => "BECE",
        Wassce => "WASSCE",
        Hnd => "HND",
        Diploma => "DIPLOMA",
        Degree => "DEGREE",
        Other => "OTHER",
    }
}

string_enum! {
    ProgramType, "programType" {
        Foundational => "FOUNDATIONAL",
        Diploma => "DIPLOMA",
        Degree => "DEGREE",
    }
}
