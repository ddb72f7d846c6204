use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Fuel grade, the second half of a history lookup key.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    Deserialize,
    Serialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    #[default]
    #[display("regular")]
    Regular,

    #[display("premium")]
    Premium,

    #[display("diesel")]
    Diesel,
}

impl Grade {
    pub const ALL: [Self; 3] = [Self::Regular, Self::Premium, Self::Diesel];
}

impl FromStr for Grade {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|grade| grade.to_string().eq_ignore_ascii_case(value))
            .ok_or_else(|| anyhow!("unknown grade `{value}`"))
    }
}
