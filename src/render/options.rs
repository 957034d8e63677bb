//! Capability and quality selectors.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Optional rendering features that can be toggled at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Depth fog over terrain and the lower sky.
    Fog,
    /// Water below a height threshold that reflects the sky.
    ReflectionMap,
    /// Half-pixel vertical resampling of the finished frame.
    Smooth,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Fog => "fog",
            Capability::ReflectionMap => "reflection-map",
            Capability::Smooth => "smooth",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fog" => Ok(Capability::Fog),
            "reflection-map" => Ok(Capability::ReflectionMap),
            "smooth" => Ok(Capability::Smooth),
            _ => Err(Error::UnknownCapability(s.to_string())),
        }
    }
}

/// Column sampling density.
///
/// Lower quality casts a ray every few columns and widens each span to cover
/// the columns in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quality {
    /// One ray every four columns.
    Low,
    /// One ray every two columns.
    #[default]
    Medium,
    /// One ray per column.
    High,
}

impl Quality {
    /// Distance in columns between cast rays.
    #[inline]
    pub fn stride(&self) -> usize {
        match self {
            Quality::Low => 4,
            Quality::Medium => 2,
            Quality::High => 1,
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quality::Low => write!(f, "low"),
            Quality::Medium => write!(f, "medium"),
            Quality::High => write!(f, "high"),
        }
    }
}

impl FromStr for Quality {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Quality::Low),
            "medium" => Ok(Quality::Medium),
            "high" => Ok(Quality::High),
            _ => Err(Error::UnknownQuality(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_names_round_trip() {
        for capability in [Capability::Fog, Capability::ReflectionMap, Capability::Smooth] {
            assert_eq!(capability.to_string().parse::<Capability>().unwrap(), capability);
        }
    }

    #[test]
    fn unknown_capability_is_rejected() {
        for name in ["", "Fog", "reflection", "water", "smooth "] {
            assert!(matches!(
                name.parse::<Capability>(),
                Err(Error::UnknownCapability(_))
            ));
        }
    }

    #[test]
    fn quality_strides() {
        assert_eq!("low".parse::<Quality>().unwrap().stride(), 4);
        assert_eq!("medium".parse::<Quality>().unwrap().stride(), 2);
        assert_eq!("high".parse::<Quality>().unwrap().stride(), 1);
        assert_eq!(Quality::default(), Quality::Medium);
        assert!(matches!(
            "ultra".parse::<Quality>(),
            Err(Error::UnknownQuality(_))
        ));
    }
}
