//! String-valued enums shared by the API, the planner and the store.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

macro_rules! string_enum {
    ($ty:ident, $what:literal, { $($variant:ident => $s:literal),+ $(,)? }) => {
        impl $ty {
            /// All variants, in declaration order.
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            /// Wire and storage representation.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $s),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s {
                    $($s => Ok($ty::$variant),)+
                    other => Err(Error::validation(format!(
                        concat!("Unknown ", $what, ": {}"),
                        other
                    ))),
                }
            }
        }
    };
}

/// Kind of obstacle geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleType {
    /// Axis-aligned rectangle given by centre and size.
    #[default]
    Rectangle,
    /// Circle given by centre and radius.
    Circle,
    /// Simple polygon given by its vertices.
    Polygon,
}

string_enum!(ObstacleType, "obstacle type", {
    Rectangle => "rectangle",
    Circle => "circle",
    Polygon => "polygon",
});

/// Execution status of a trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrajectoryStatus {
    /// Planned but not yet sent to the robot.
    Planned,
    /// Currently being executed.
    Executing,
    /// Planning (or execution) finished.
    #[default]
    Completed,
    /// Planning or execution failed.
    Failed,
}

string_enum!(TrajectoryStatus, "trajectory status", {
    Planned => "planned",
    Executing => "executing",
    Completed => "completed",
    Failed => "failed",
});

/// How the robot moves into a trajectory point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionType {
    /// Straight feed move with the tool engaged.
    #[default]
    Linear,
    /// Circular interpolation.
    Arc,
    /// Repositioning move with the tool off.
    Rapid,
}

string_enum!(MotionType, "motion type", {
    Linear => "linear",
    Arc => "arc",
    Rapid => "rapid",
});

/// Coverage pattern used to plan a trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Back-and-forth horizontal rows.
    #[default]
    Boustrophedon,
    /// Concentric rings around the wall centre.
    Spiral,
    /// Alternating 45° diagonals.
    Zigzag,
}

string_enum!(Algorithm, "algorithm", {
    Boustrophedon => "boustrophedon",
    Spiral => "spiral",
    Zigzag => "zigzag",
});

/// Human-facing description of an [`Algorithm`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmInfo {
    /// Wire name (`boustrophedon`, ...)
    pub name: String,
    /// Title for UIs
    pub display_name: String,
    /// One-sentence description of the motion
    pub description: String,
    /// Situations where the pattern works well
    pub best_for: String,
}

impl Algorithm {
    /// Name with the first letter upper-cased, used in trajectory names.
    pub fn capitalized(&self) -> String {
        let s = self.as_str();
        let mut chars = s.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Descriptive metadata for listing endpoints.
    pub fn info(&self) -> AlgorithmInfo {
        let (display_name, description, best_for) = match self {
            Algorithm::Boustrophedon => (
                "Boustrophedon",
                "Back-and-forth horizontal passes, alternating direction on every row",
                "Rectangular walls with few obstacles; most uniform finish",
            ),
            Algorithm::Spiral => (
                "Spiral",
                "Concentric rings expanding outwards from the wall centre",
                "Square walls and finishes that should start at a focal point",
            ),
            Algorithm::Zigzag => (
                "Zigzag",
                "Diagonal passes at 45 degrees alternating up and down",
                "Wide walls where diagonal strokes hide lap marks",
            ),
        };
        AlgorithmInfo {
            name: self.as_str().to_string(),
            display_name: display_name.to_string(),
            description: description.to_string(),
            best_for: best_for.to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(
            serde_json::to_string(&ObstacleType::Circle).unwrap(),
            "\"circle\""
        );
        assert_eq!(
            serde_json::from_str::<Algorithm>("\"zigzag\"").unwrap(),
            Algorithm::Zigzag
        );
        assert_eq!(MotionType::Rapid.to_string(), "rapid");
        assert_eq!(TrajectoryStatus::default(), TrajectoryStatus::Completed);
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        let err = "hexagon".parse::<ObstacleType>().unwrap_err();
        assert!(err.to_string().contains("Unknown obstacle type: hexagon"));
        assert!("spiral".parse::<Algorithm>().is_ok());
    }

    #[test]
    fn test_algorithm_capitalized() {
        assert_eq!(Algorithm::Boustrophedon.capitalized(), "Boustrophedon");
        assert_eq!(Algorithm::Spiral.capitalized(), "Spiral");
    }

    #[test]
    fn test_algorithm_info_covers_all() {
        assert_eq!(Algorithm::ALL.len(), 3);
        for algorithm in Algorithm::ALL {
            let info = algorithm.info();
            assert_eq!(info.name, algorithm.as_str());
            assert!(!info.description.is_empty());
        }
    }
}
