//! Command implementations.

use anyhow::Context;
use serde_json::json;
use trowel_api::{PlanningService, Server, shutdown_signal};
use trowel_core::config::TrowelConfig;
use trowel_core::model::{
    ObstacleCreate, ObstacleType, PlanningResult, TrajectoryPlanRequest, Wall, WallCreate,
};
use trowel_planner::Planner;
use trowel_store::{Store, StoreCounts};

use crate::cli::{Cli, Command};
use crate::config_handlers::handle_config_command;
use crate::logging::init_logging;

/// Side of the square sample wall, metres.
pub const SAMPLE_WALL_SIZE: f64 = 5.0;

/// Side of the sample window, metres.
pub const SAMPLE_WINDOW_SIZE: f64 = 0.25;

/// Runs the parsed command line.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Config { action } => Ok(handle_config_command(config_path, action)?),
        Command::Serve { host, port } => {
            let mut config = prepare(config_path)?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config).await
        }
        Command::Migrate => {
            let config = prepare(config_path)?;
            let counts = migrate(&config).await?;
            println!("Database schema is up to date at {}", config.database.url);
            println!("{}", serde_json::to_string_pretty(&counts)?);
            Ok(())
        }
        Command::Sample => {
            let config = prepare(config_path)?;
            let store = Store::open(&config.database).await?;
            let wall = seed_sample(&store).await;
            store.close().await;
            println!("{}", serde_json::to_string_pretty(&wall?)?);
            Ok(())
        }
        Command::Plan {
            wall_id,
            algorithm,
            robot_width,
            overlap,
            resolution,
        } => {
            let request = TrajectoryPlanRequest {
                robot_width,
                overlap_percentage: overlap,
                resolution,
                ..TrajectoryPlanRequest::for_wall(wall_id, algorithm)
            };
            let config = prepare(config_path)?;
            let store = Store::open(&config.database).await?;
            let result = plan(&store, &config, &request).await;
            store.close().await;
            println!("{}", serde_json::to_string_pretty(&result?)?);
            Ok(())
        }
    }
}

/// Loads the configuration and installs logging for it.
fn prepare(config_path: Option<&str>) -> anyhow::Result<TrowelConfig> {
    let config = TrowelConfig::load(config_path).context("loading configuration")?;
    init_logging(&config.logging)?;
    Ok(config)
}

async fn serve(config: TrowelConfig) -> anyhow::Result<()> {
    tracing::info!(
        address = %config.server.bind_address(),
        debug = config.server.debug,
        "starting Wall Finishing Robot Control System"
    );
    let server = Server::open(config).await.context("opening database")?;
    server.run(shutdown_signal()).await?;
    tracing::info!("server stopped");
    Ok(())
}

/// Creates the schema, runs migrations and reports row counts.
pub async fn migrate(config: &TrowelConfig) -> anyhow::Result<StoreCounts> {
    let store = Store::open(&config.database).await?;
    let counts = store.counts().await?;
    store.close().await;
    Ok(counts)
}

/// Stores the reference wall: 5 m x 5 m with a centred 0.25 m window.
pub async fn seed_sample(store: &Store) -> anyhow::Result<Wall> {
    let wall = store
        .create_wall(&WallCreate {
            name: "Sample Wall".to_string(),
            width: SAMPLE_WALL_SIZE,
            height: SAMPLE_WALL_SIZE,
            origin_x: 0.0,
            origin_y: 0.0,
        })
        .await?;
    let centre = SAMPLE_WALL_SIZE / 2.0;
    store
        .create_obstacle(
            wall.id,
            &ObstacleCreate {
                name: "Window".to_string(),
                obstacle_type: ObstacleType::Rectangle,
                geometry_data: json!({
                    "center_x": centre,
                    "center_y": centre,
                    "width": SAMPLE_WINDOW_SIZE,
                    "height": SAMPLE_WINDOW_SIZE,
                }),
            },
        )
        .await?;
    tracing::info!(wall_id = wall.id, "sample wall created");
    Ok(store.get_wall(wall.id).await?)
}

/// Plans `request` against `store` without the HTTP layer.
pub async fn plan(
    store: &Store,
    config: &TrowelConfig,
    request: &TrajectoryPlanRequest,
) -> anyhow::Result<PlanningResult> {
    let service = PlanningService::new(
        store.clone(),
        Planner::from_config(&config.planning),
        config.planning.clone(),
    );
    service
        .plan(request)
        .await
        .with_context(|| format!("planning wall {}", request.wall_id))
}
