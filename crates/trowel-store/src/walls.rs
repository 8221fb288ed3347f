//! Wall and obstacle operations.

use std::collections::HashMap;

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite};
use trowel_core::geometry::ObstacleShape;
use trowel_core::model::{Obstacle, ObstacleCreate, Wall, WallCreate, WallUpdate};
use uuid::Uuid;

use crate::rows::{OBSTACLE_COLUMNS, ObstacleRow, WALL_COLUMNS, WallRow, convert_all};
use crate::{Error, Result, Store};

/// Default page size for wall listings.
pub const DEFAULT_WALL_LIMIT: i64 = 100;

/// Paging and search for [`Store::list_walls`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WallQuery {
    /// Rows to skip
    pub skip: i64,
    /// Maximum rows returned
    pub limit: i64,
    /// Case-insensitive substring of the name
    pub search: Option<String>,
}

impl Default for WallQuery {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_WALL_LIMIT,
            search: None,
        }
    }
}

/// `%term%` with LIKE wildcards in `term` escaped by `\`.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

impl Store {
    /// Inserts a wall and returns it (with no obstacles).
    pub async fn create_wall(&self, input: &WallCreate) -> Result<Wall> {
        let row: WallRow = sqlx::query_as(&format!(
            "INSERT INTO walls (uuid, name, width, height, origin_x, origin_y, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING {WALL_COLUMNS}"
        ))
        .bind(Uuid::new_v4().to_string())
        .bind(&input.name)
        .bind(input.width)
        .bind(input.height)
        .bind(input.origin_x)
        .bind(input.origin_y)
        .bind(Utc::now())
        .fetch_one(self.pool())
        .await?;
        tracing::info!(wall_id = row.id, name = %row.name, "wall created");
        Ok(row.into_wall(Vec::new()))
    }

    /// Walls newest first, each with its obstacles.
    pub async fn list_walls(&self, query: &WallQuery) -> Result<Vec<Wall>> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {WALL_COLUMNS} FROM walls"));
        if let Some(term) = query.search.as_deref().filter(|t| !t.is_empty()) {
            builder
                .push(" WHERE name LIKE ")
                .push_bind(like_pattern(term))
                .push(" ESCAPE '\\'");
        }
        builder
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(query.limit)
            .push(" OFFSET ")
            .push_bind(query.skip);

        let rows: Vec<WallRow> = builder.build_query_as().fetch_all(self.pool()).await?;
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut obstacles = self.obstacles_for_walls(&ids).await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let own = obstacles.remove(&row.id).unwrap_or_default();
                row.into_wall(own)
            })
            .collect())
    }

    /// One wall with its obstacles.
    pub async fn get_wall(&self, wall_id: i64) -> Result<Wall> {
        let row = self.wall_row(wall_id).await?;
        let obstacles = self.obstacle_rows(wall_id).await?;
        Ok(row.into_wall(obstacles))
    }

    /// Applies the fields present in `update` and stamps `updated_at`.
    pub async fn update_wall(&self, wall_id: i64, update: &WallUpdate) -> Result<Wall> {
        let current = self.wall_row(wall_id).await?;
        if !update.is_empty() {
            sqlx::query(
                "UPDATE walls
                 SET name = ?, width = ?, height = ?, origin_x = ?, origin_y = ?, updated_at = ?
                 WHERE id = ?",
            )
            .bind(update.name.as_deref().unwrap_or(&current.name))
            .bind(update.width.unwrap_or(current.width))
            .bind(update.height.unwrap_or(current.height))
            .bind(update.origin_x.unwrap_or(current.origin_x))
            .bind(update.origin_y.unwrap_or(current.origin_y))
            .bind(Utc::now())
            .bind(wall_id)
            .execute(self.pool())
            .await?;
            tracing::info!(wall_id, "wall updated");
        }
        self.get_wall(wall_id).await
    }

    /// Deletes a wall with its obstacles, trajectories and points.
    pub async fn delete_wall(&self, wall_id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM walls WHERE id = ?")
            .bind(wall_id)
            .execute(self.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::not_found("Wall", wall_id));
        }
        tracing::info!(wall_id, "wall deleted");
        Ok(())
    }

    /// Validates the geometry against the wall and stores the obstacle with
    /// its bounding box.
    pub async fn create_obstacle(&self, wall_id: i64, input: &ObstacleCreate) -> Result<Obstacle> {
        let wall = self.wall_row(wall_id).await?;
        let shape = ObstacleShape::parse(input.obstacle_type, &input.geometry_data)?;
        shape.validate_within(wall.width, wall.height)?;
        let bounds = shape.bounds();

        let row: ObstacleRow = sqlx::query_as(&format!(
            "INSERT INTO obstacles
                (wall_id, name, obstacle_type, min_x, min_y, max_x, max_y, geometry_data, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING {OBSTACLE_COLUMNS}"
        ))
        .bind(wall_id)
        .bind(&input.name)
        .bind(shape.kind().as_str())
        .bind(bounds.min_x)
        .bind(bounds.min_y)
        .bind(bounds.max_x)
        .bind(bounds.max_y)
        .bind(shape.geometry_data().to_string())
        .bind(Utc::now())
        .fetch_one(self.pool())
        .await?;
        tracing::info!(
            wall_id,
            obstacle_id = row.id,
            kind = %shape.kind(),
            "obstacle created"
        );
        Obstacle::try_from(row)
    }

    /// Obstacles of an existing wall, oldest first.
    pub async fn list_obstacles(&self, wall_id: i64) -> Result<Vec<Obstacle>> {
        self.wall_row(wall_id).await?;
        self.obstacle_rows(wall_id).await
    }

    /// Deletes an obstacle that belongs to `wall_id`.
    pub async fn delete_obstacle(&self, wall_id: i64, obstacle_id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM obstacles WHERE id = ? AND wall_id = ?")
            .bind(obstacle_id)
            .bind(wall_id)
            .execute(self.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::not_found("Obstacle", obstacle_id));
        }
        tracing::info!(wall_id, obstacle_id, "obstacle deleted");
        Ok(())
    }

    async fn wall_row(&self, wall_id: i64) -> Result<WallRow> {
        sqlx::query_as(&format!("SELECT {WALL_COLUMNS} FROM walls WHERE id = ?"))
            .bind(wall_id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| Error::not_found("Wall", wall_id))
    }

    async fn obstacle_rows(&self, wall_id: i64) -> Result<Vec<Obstacle>> {
        let rows: Vec<ObstacleRow> = sqlx::query_as(&format!(
            "SELECT {OBSTACLE_COLUMNS} FROM obstacles WHERE wall_id = ? ORDER BY id"
        ))
        .bind(wall_id)
        .fetch_all(self.pool())
        .await?;
        convert_all(rows)
    }

    async fn obstacles_for_walls(&self, wall_ids: &[i64]) -> Result<HashMap<i64, Vec<Obstacle>>> {
        let mut grouped: HashMap<i64, Vec<Obstacle>> = HashMap::new();
        if wall_ids.is_empty() {
            return Ok(grouped);
        }
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {OBSTACLE_COLUMNS} FROM obstacles WHERE wall_id IN ("
        ));
        let mut separated = builder.separated(", ");
        for id in wall_ids {
            separated.push_bind(*id);
        }
        builder.push(") ORDER BY id");

        let rows: Vec<ObstacleRow> = builder.build_query_as().fetch_all(self.pool()).await?;
        for obstacle in convert_all::<_, Obstacle>(rows)? {
            grouped.entry(obstacle.wall_id).or_default().push(obstacle);
        }
        Ok(grouped)
    }
}
