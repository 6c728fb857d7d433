use serde::{Deserialize, Serialize};

use crate::{
    ConfigError,
    core::{Point2D, Rect},
};

use super::robot::RobotPose;

/// Sensor angles relative to the robot's facing, clockwise positive.
///
/// Slot order: front, front-right, right, back-right, back, back-left, left, front-left.
pub const DEFAULT_SENSOR_ANGLES: [f64; 8] = [0.0, 45.0, 90.0, 135.0, 180.0, 225.0, 270.0, 315.0];

pub const DEFAULT_MAX_SENSOR_DISTANCE: f64 = 100.0;

pub const DEFAULT_ROBOT_SIZE: f64 = 25.0;

/// Ray-cast distance sensor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Ordered sensor angles; readings are returned in this order.
    pub angles: Vec<f64>,
    /// Ray length, also reported when a ray hits nothing.
    pub max_distance: f64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            angles: DEFAULT_SENSOR_ANGLES.to_vec(),
            max_distance: DEFAULT_MAX_SENSOR_DISTANCE,
        }
    }
}

/// What happens to an objective once a robot eats it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(rename_all = "snake_case")]
pub enum ObjectivePolicy {
    /// The objective stays where it is.
    #[default]
    Stay,
    /// The objective jumps to a random position clear of obstacles.
    Relocate,
}

/// Complete description of an arena: geometry, sensors and the spawn point.
///
/// Loaded from JSON by the CLI; every field has a default so partial files work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub width: f64,
    pub height: f64,
    /// Diameter of every robot.
    pub robot_size: f64,
    pub sensor: SensorConfig,
    /// Robots sense each other with their rays and block each other's moves.
    pub robots_see_each_other: bool,
    pub objective_policy: ObjectivePolicy,
    /// Seed for objective relocation.
    pub relocation_seed: u64,
    pub obstacles: Vec<Rect>,
    pub objectives: Vec<Rect>,
    pub spawn: RobotPose,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 700.0,
            height: 600.0,
            robot_size: DEFAULT_ROBOT_SIZE,
            sensor: SensorConfig::default(),
            robots_see_each_other: false,
            objective_policy: ObjectivePolicy::Stay,
            relocation_seed: 0,
            obstacles: vec![],
            objectives: vec![Rect::new(Point2D::new(620.0, 40.0), 25.0, 25.0)],
            spawn: RobotPose::new(Point2D::new(20.0, 560.0), 0.0),
        }
    }
}

impl ArenaConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Self {
            width,
            height,
            robot_size,
            sensor,
            spawn,
            ..
        } = self;

        if *width <= 0.0 || *height <= 0.0 {
            return Err(ConfigError::ArenaSize {
                width: *width,
                height: *height,
            });
        }
        if *robot_size <= 0.0 {
            return Err(ConfigError::RobotSize { size: *robot_size });
        }
        if sensor.angles.is_empty() {
            return Err(ConfigError::NoSensorAngles);
        }
        if sensor.max_distance <= 0.0 {
            return Err(ConfigError::SensorRange {
                distance: sensor.max_distance,
            });
        }

        let Point2D { x, y } = spawn.pos();
        let inside = x >= 0.0 && y >= 0.0 && x + robot_size <= *width && y + robot_size <= *height;
        if !inside {
            return Err(ConfigError::SpawnOutside { x, y });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(ArenaConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "width": 300.0,
            "height": 200.0,
            "objective_policy": "relocate",
            "obstacles": [{ "pos": { "x": 50.0, "y": 50.0 }, "width": 10.0, "height": 20.0 }],
            "spawn": { "pos": { "x": 10.0, "y": 10.0 }, "direction": 90.0 }
        }"#;
        let config: ArenaConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.width, 300.0);
        assert_eq!(config.robot_size, DEFAULT_ROBOT_SIZE);
        assert_eq!(config.sensor.angles, DEFAULT_SENSOR_ANGLES.to_vec());
        assert!(config.objective_policy.is_relocate());
        assert_eq!(config.obstacles.len(), 1);
        assert_eq!(config.spawn.direction(), 90.0);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = ArenaConfig {
            robot_size: 0.0,
            ..ArenaConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::RobotSize { size: 0.0 }));

        let config = ArenaConfig {
            sensor: SensorConfig {
                angles: vec![],
                ..SensorConfig::default()
            },
            ..ArenaConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoSensorAngles));

        let config = ArenaConfig {
            spawn: RobotPose::new(Point2D::new(690.0, 10.0), 0.0),
            ..ArenaConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SpawnOutside { .. })
        ));
    }

    #[test]
    fn test_sample_map_is_valid() {
        let json = include_str!("../../../../maps/default.json");
        let config: ArenaConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.obstacles.len(), 4);
        assert_eq!(config.objectives.len(), 1);
        assert_eq!(config.validate(), Ok(()));
    }
}
