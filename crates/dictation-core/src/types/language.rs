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

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::types::mode::Side;

/// Language codes handed to the speech synthesizer for each side of a pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Languages {
    pub primary: String,
    pub secondary: String,
}

impl Languages {
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }

    pub fn code(&self, side: Side) -> &str {
        match side {
            Side::Primary => &self.primary,
            Side::Secondary => &self.secondary,
        }
    }

    /// Accept only the configured codes. Language codes end up in file names.
    pub fn validate<'a>(&self, code: &'a str) -> Fallible<&'a str> {
        if code == self.primary || code == self.secondary {
            Ok(code)
        } else {
            Err(ErrorReport::validation(format!(
                "unsupported language: '{code}'"
            )))
        }
    }
}

impl Default for Languages {
    fn default() -> Self {
        Self::new("ru", "en")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        let languages = Languages::default();
        assert_eq!(languages.validate("ru"), Ok("ru"));
        assert_eq!(languages.validate("en"), Ok("en"));
        assert!(languages.validate("../etc").is_err());
    }

    #[test]
    fn test_code() {
        let languages = Languages::new("uk", "de");
        assert_eq!(languages.code(Side::Primary), "uk");
        assert_eq!(languages.code(Side::Secondary), "de");
    }
}
