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

use crate::types::mode::Side;

/// A base-language word, optionally paired with its translation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WordPair {
    primary: String,
    secondary: Option<String>,
}

impl WordPair {
    /// A pair for plain dictation, with no translation.
    pub fn single(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: None,
        }
    }

    pub fn translated(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: Some(secondary.into()),
        }
    }

    pub fn primary(&self) -> &str {
        &self.primary
    }

    pub fn secondary(&self) -> Option<&str> {
        self.secondary.as_deref()
    }

    pub fn side(&self, side: Side) -> Option<&str> {
        match side {
            Side::Primary => Some(self.primary()),
            Side::Secondary => self.secondary(),
        }
    }
}

/// A dictionary row as it comes out of the word store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DictionaryEntry {
    pub russian: String,
    pub english: Option<String>,
}
