// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Integer-coded tuning enums.
//!
//! Hosts receive these as plain integers (command-line flags, embedding
//! APIs). `TryFrom<i32>` is the only way in from an integer, so an
//! out-of-range value is always an [`ConfigError::InvalidArgument`].

use crate::ConfigError;
use std::fmt;

/// GPU performance hint passed to the compute context on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GpuPerfHint {
    #[default]
    Default = 0,
    Low = 1,
    Normal = 2,
    High = 3,
}

/// GPU queue priority hint passed to the compute context on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GpuPriorityHint {
    #[default]
    Default = 0,
    Low = 1,
    Normal = 2,
    High = 3,
}

/// Which cores CPU pool workers should run on.
///
/// On big.LITTLE parts `HighPerformance` selects the fastest cluster and
/// `BatterySave` the most efficient one. `Default` leaves placement to the
/// OS scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CpuPowerPolicy {
    #[default]
    Default = 0,
    HighPerformance = 1,
    BatterySave = 2,
}

macro_rules! int_coded {
    ($ty:ident, $what:literal, $($val:literal => $var:ident),+ $(,)?) => {
        impl TryFrom<i32> for $ty {
            type Error = ConfigError;

            fn try_from(value: i32) -> Result<Self, ConfigError> {
                match value {
                    $($val => Ok($ty::$var),)+
                    other => Err(ConfigError::InvalidArgument(format!(
                        concat!("unknown ", $what, " {}; expected one of {:?}"),
                        other,
                        [$($val),+],
                    ))),
                }
            }
        }

        impl From<$ty> for i32 {
            fn from(value: $ty) -> i32 {
                value as i32
            }
        }
    };
}

int_coded!(GpuPerfHint, "GPU perf hint", 0 => Default, 1 => Low, 2 => Normal, 3 => High);
int_coded!(GpuPriorityHint, "GPU priority hint", 0 => Default, 1 => Low, 2 => Normal, 3 => High);
int_coded!(CpuPowerPolicy, "CPU power option", 0 => Default, 1 => HighPerformance, 2 => BatterySave);

impl fmt::Display for GpuPerfHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GpuPerfHint::Default => "default",
            GpuPerfHint::Low => "low",
            GpuPerfHint::Normal => "normal",
            GpuPerfHint::High => "high",
        })
    }
}

impl fmt::Display for GpuPriorityHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GpuPriorityHint::Default => "default",
            GpuPriorityHint::Low => "low",
            GpuPriorityHint::Normal => "normal",
            GpuPriorityHint::High => "high",
        })
    }
}

impl fmt::Display for CpuPowerPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CpuPowerPolicy::Default => "default",
            CpuPowerPolicy::HighPerformance => "high-performance",
            CpuPowerPolicy::BatterySave => "battery-save",
        })
    }
}
