// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Benchmark selection patterns.

use crate::BenchError;
use regex::Regex;

/// The pattern that selects every benchmark.
pub const ALL: &str = "all";

/// A compiled selection filter.
///
/// `"all"` selects everything. Anything else is a regular expression that
/// must match the *whole* benchmark name: `CONV` selects only `CONV`,
/// `.*CONV.*` selects every name containing it.
#[derive(Debug, Clone, Default)]
pub enum Pattern {
    #[default]
    All,
    Regex(Regex),
}

impl Pattern {
    /// Compiles `pattern`.
    pub fn parse(pattern: &str) -> Result<Self, BenchError> {
        if pattern == ALL {
            return Ok(Pattern::All);
        }
        Regex::new(&format!("^(?:{pattern})$"))
            .map(Pattern::Regex)
            .map_err(|source| BenchError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    /// Returns `true` if `name` is selected.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Pattern::All => true,
            Pattern::Regex(re) => re.is_match(name),
        }
    }
}
