//! Version tags shared across the model, material and texture formats

use std::fmt;
use std::str::FromStr;

use crate::error::DataError;

/// Version stamped at the start of xmodel, xmodelpart and xmodelsurf files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub enum ModelVersion {
    /// Call of Duty and United Offensive
    V14,
    /// Call of Duty 2
    V20,
    /// Call of Duty 4 and World at War
    V25,
}

impl ModelVersion {
    pub fn version_number(self) -> u16 {
        match self {
            Self::V14 => 0x0E,
            Self::V20 => 0x14,
            Self::V25 => 0x19,
        }
    }

    pub fn from_version_number(version: u16) -> Result<Self, DataError> {
        match version {
            0x0E => Ok(Self::V14),
            0x14 => Ok(Self::V20),
            0x19 => Ok(Self::V25),
            other => Err(DataError::UnsupportedModelVersion(other)),
        }
    }
}

impl TryFrom<u16> for ModelVersion {
    type Error = DataError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::from_version_number(value)
    }
}

impl fmt::Display for ModelVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.version_number())
    }
}

/// Game a set of assets was shipped with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub enum Game {
    /// Call of Duty and United Offensive
    Cod1,
    #[default]
    Cod2,
    Cod4,
    /// World at War
    Cod5,
}

impl Game {
    pub fn model_version(self) -> ModelVersion {
        match self {
            Self::Cod1 => ModelVersion::V14,
            Self::Cod2 => ModelVersion::V20,
            Self::Cod4 | Self::Cod5 => ModelVersion::V25,
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Cod1 => "cod1",
            Self::Cod2 => "cod2",
            Self::Cod4 => "cod4",
            Self::Cod5 => "cod5",
        };
        f.write_str(name)
    }
}

impl FromStr for Game {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cod1" | "cod" | "coduo" => Ok(Self::Cod1),
            "cod2" => Ok(Self::Cod2),
            "cod4" => Ok(Self::Cod4),
            "cod5" | "waw" => Ok(Self::Cod5),
            _ => Err(DataError::UnknownGame(s.to_string())),
        }
    }
}

/// Model category, encoded in the last character of an xmodelpart name
/// (`'0'` to `'4'`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub enum ModelType {
    #[default]
    Rigid,
    Animated,
    Viewmodel,
    Playerbody,
    Viewhands,
}

impl ModelType {
    /// Anything without a recognized suffix is treated as rigid.
    pub fn from_part_name(name: &str) -> Self {
        match name.chars().last() {
            Some('1') => Self::Animated,
            Some('2') => Self::Viewmodel,
            Some('3') => Self::Playerbody,
            Some('4') => Self::Viewhands,
            _ => Self::Rigid,
        }
    }

    pub fn is_viewhands(self) -> bool {
        self == Self::Viewhands
    }
}
