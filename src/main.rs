use glam::DVec3;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use log::warn;
use once_cell::sync::Lazy;
use sectorspace::address;
use sectorspace::position::{to_light_years, travel_time};
use sectorspace::{Area, Position, Shape, SpaceConfig, SpatialTransform, ZoomTier};
use serde::{Deserialize, Serialize};

static CONFIG: Lazy<SpaceConfig> = Lazy::new(|| match SpaceConfig::from_env() {
    Ok(config) => config,
    Err(err) => {
        warn!("Falling back to default space config: {err}");
        SpaceConfig::default()
    }
});

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum EngineRequest {
    Distance {
        from: Position,
        to: Position,
    },
    TravelTime {
        from: Position,
        to: Position,
        speed: f64,
    },
    Encode {
        position: Position,
        index: i32,
    },
    Decode {
        token: String,
    },
    ToRender {
        tier: ZoomTier,
        world_origin: Position,
        position: Position,
    },
    ToWorld {
        tier: ZoomTier,
        world_origin: Position,
        render_point: DVec3,
    },
    Contains {
        origin: Position,
        area: Shape,
        positions: Vec<Position>,
    },
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum EngineResponse {
    Distance {
        universe_units: f64,
        light_years: f64,
    },
    TravelTime {
        time: f64,
    },
    Encode {
        token: String,
    },
    Decode {
        position: Position,
        index: i32,
    },
    ToRender {
        render_point: DVec3,
        visible: bool,
    },
    ToWorld {
        position: Position,
    },
    Contains {
        results: Vec<ContainsResult>,
    },
    Error {
        message: String,
    },
}

#[derive(Debug, Serialize)]
struct ContainsResult {
    index: usize,
    contains: bool,
    metric: f64,
}

fn error(message: impl ToString) -> EngineResponse {
    EngineResponse::Error {
        message: message.to_string(),
    }
}

fn respond(req: EngineRequest, config: &SpaceConfig) -> EngineResponse {
    match req {
        EngineRequest::Distance { from, to } => {
            let universe_units = from.distance(&to);
            EngineResponse::Distance {
                universe_units,
                light_years: to_light_years(universe_units),
            }
        }
        EngineRequest::TravelTime { from, to, speed } => match travel_time(&from, &to, speed) {
            Ok(time) => EngineResponse::TravelTime { time },
            Err(err) => error(err),
        },
        EngineRequest::Encode { position, index } => match address::try_encode(&position, index) {
            Ok(token) => EngineResponse::Encode { token },
            Err(err) => error(err),
        },
        EngineRequest::Decode { token } => match address::try_decode(&token) {
            Ok(decoded) => EngineResponse::Decode {
                position: decoded.position,
                index: decoded.index,
            },
            Err(err) => error(err),
        },
        EngineRequest::ToRender {
            tier,
            world_origin,
            position,
        } => match SpatialTransform::for_tier(tier, world_origin, config) {
            Ok(transform) => EngineResponse::ToRender {
                render_point: transform.to_render_space(&position),
                visible: transform.is_visible(&position),
            },
            Err(err) => error(err),
        },
        EngineRequest::ToWorld {
            tier,
            world_origin,
            render_point,
        } => match SpatialTransform::for_tier(tier, world_origin, config) {
            Ok(transform) => EngineResponse::ToWorld {
                position: transform.to_world_space(render_point),
            },
            Err(err) => error(err),
        },
        EngineRequest::Contains {
            origin,
            area,
            positions,
        } => {
            let area = match Area::new(origin, area) {
                Ok(area) => area,
                Err(err) => return error(err),
            };
            let results = positions
                .iter()
                .enumerate()
                .map(|(index, p)| {
                    let proximity = area.proximity(p);
                    ContainsResult {
                        index,
                        contains: proximity.contains,
                        metric: proximity.metric,
                    }
                })
                .collect();
            EngineResponse::Contains { results }
        }
    }
}

async fn handler(event: LambdaEvent<EngineRequest>) -> Result<EngineResponse, Error> {
    Ok(respond(event.payload, &CONFIG))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    let func = service_fn(handler);
    lambda_runtime::run(func).await
}
