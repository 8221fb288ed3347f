use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ObstacleType;
use crate::Result;
use crate::geometry::ObstacleShape;

/// A wall surface to be finished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    /// Database id
    pub id: i64,
    /// Stable external identifier
    pub uuid: String,
    /// Operator-facing name
    pub name: String,
    /// Width in metres
    pub width: f64,
    /// Height in metres
    pub height: f64,
    /// Robot-frame x of the wall's bottom-left corner
    pub origin_x: f64,
    /// Robot-frame y of the wall's bottom-left corner
    pub origin_y: f64,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: Option<DateTime<Utc>>,
    /// Obstacles mounted on the wall
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
}

impl Wall {
    /// Typed shapes of every obstacle on the wall.
    pub fn obstacle_shapes(&self) -> Result<Vec<ObstacleShape>> {
        self.obstacles.iter().map(Obstacle::shape).collect()
    }

    /// Wall surface in square metres.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// An area of the wall the tool must avoid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Database id
    pub id: i64,
    /// Owning wall
    pub wall_id: i64,
    /// Operator-facing name ("Window", "Socket", ...)
    pub name: String,
    /// Geometry kind
    pub obstacle_type: ObstacleType,
    /// Geometry payload, shape depends on `obstacle_type`
    pub geometry_data: Value,
    /// Bounding box left edge
    pub min_x: f64,
    /// Bounding box bottom edge
    pub min_y: f64,
    /// Bounding box right edge
    pub max_x: f64,
    /// Bounding box top edge
    pub max_y: f64,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Obstacle {
    /// Parses the stored payload into a typed shape.
    pub fn shape(&self) -> Result<ObstacleShape> {
        ObstacleShape::parse(self.obstacle_type, &self.geometry_data)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wall_with(obstacles: Vec<Obstacle>) -> Wall {
        Wall {
            id: 1,
            uuid: "f2a4a1d6-2b0c-4c52-9b84-0f0f1c1e0a11".to_string(),
            name: "North wall".to_string(),
            width: 5.0,
            height: 3.0,
            origin_x: 0.0,
            origin_y: 0.0,
            created_at: Utc::now(),
            updated_at: None,
            obstacles,
        }
    }

    fn obstacle(kind: ObstacleType, data: Value) -> Obstacle {
        Obstacle {
            id: 7,
            wall_id: 1,
            name: "Window".to_string(),
            obstacle_type: kind,
            geometry_data: data,
            min_x: 0.0,
            min_y: 0.0,
            max_x: 0.0,
            max_y: 0.0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_wall_area() {
        assert_eq!(wall_with(vec![]).area(), 15.0);
    }

    #[test]
    fn test_obstacle_shapes() {
        let wall = wall_with(vec![
            obstacle(
                ObstacleType::Rectangle,
                json!({"center_x": 2.5, "center_y": 1.5, "width": 0.5, "height": 0.5}),
            ),
            obstacle(
                ObstacleType::Circle,
                json!({"center_x": 1.0, "center_y": 1.0, "radius": 0.1}),
            ),
        ]);
        let shapes = wall.obstacle_shapes().unwrap();
        assert_eq!(shapes.len(), 2);
        assert_eq!(shapes[1].kind(), ObstacleType::Circle);
    }

    #[test]
    fn test_obstacle_shapes_reports_corrupt_payload() {
        let wall = wall_with(vec![obstacle(ObstacleType::Circle, json!({"width": 1.0}))]);
        assert!(wall.obstacle_shapes().is_err());
    }

    #[test]
    fn test_wall_serializes_obstacles_field() {
        let json = serde_json::to_value(wall_with(vec![])).unwrap();
        assert_eq!(json["obstacles"], json!([]));
        assert_eq!(json["updated_at"], Value::Null);
    }
}
