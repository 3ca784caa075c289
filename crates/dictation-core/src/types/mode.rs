// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;

/// One side of a word pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// The base-language word.
    Primary,
    /// The translation.
    Secondary,
}

/// Which member of a pair is spoken, and which one the user has to type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DrillMode {
    /// Plain dictation: hear the word, type the same word.
    #[default]
    PrimaryOnly,
    /// Hear the base-language word, type its translation.
    PrimaryToSecondary,
    /// Hear the translation, type the base-language word.
    SecondaryToPrimary,
}

impl DrillMode {
    pub fn spoken_side(self) -> Side {
        match self {
            DrillMode::PrimaryOnly | DrillMode::PrimaryToSecondary => Side::Primary,
            DrillMode::SecondaryToPrimary => Side::Secondary,
        }
    }

    pub fn expected_side(self) -> Side {
        match self {
            DrillMode::PrimaryOnly | DrillMode::SecondaryToPrimary => Side::Primary,
            DrillMode::PrimaryToSecondary => Side::Secondary,
        }
    }

    /// Whether every pair must carry a translation in this mode.
    pub fn needs_translation(self) -> bool {
        !matches!(self, DrillMode::PrimaryOnly)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DrillMode::PrimaryOnly => "primary_only",
            DrillMode::PrimaryToSecondary => "primary_to_secondary",
            DrillMode::SecondaryToPrimary => "secondary_to_primary",
        }
    }
}

impl Display for DrillMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DrillMode {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "primary_only" | "ru_only" => Ok(DrillMode::PrimaryOnly),
            "primary_to_secondary" | "ru_to_en" => Ok(DrillMode::PrimaryToSecondary),
            "secondary_to_primary" | "en_to_ru" => Ok(DrillMode::SecondaryToPrimary),
            _ => Err(ErrorReport::validation(format!("unknown drill mode: '{s}'"))),
        }
    }
}

impl TryFrom<String> for DrillMode {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DrillMode> for String {
    fn from(mode: DrillMode) -> String {
        mode.as_str().to_string()
    }
}
