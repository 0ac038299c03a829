//! HTTP routes and the shared routing state behind them

use std::{collections::HashMap, path::PathBuf, sync::Arc, time::Duration};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};
use geojson::Geometry;
use rayon::prelude::*;
use roadnet_core::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Map;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

use crate::error::{ApiError, ServerError};

/// Read-only graphs, one per served mode, each annotated for its mode
pub struct AppState {
    graphs: HashMap<Mode, RoadGraph>,
}

impl AppState {
    /// Loads every graph in parallel and annotates it for its mode
    pub fn load(paths: &[(Mode, PathBuf)], table: &SpeedTable) -> Result<Self, ServerError> {
        let graphs = paths
            .par_iter()
            .map(|(mode, path)| -> Result<(Mode, RoadGraph), ServerError> {
                let graph = load_road_graph(path)?;
                info!(
                    %mode,
                    nodes = graph.node_count(),
                    edges = graph.edge_count(),
                    "Graph loaded"
                );
                Ok((*mode, graph))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_graphs(graphs, table))
    }

    pub fn from_graphs(graphs: impl IntoIterator<Item = (Mode, RoadGraph)>, table: &SpeedTable) -> Self {
        let graphs = graphs
            .into_iter()
            .map(|(mode, mut graph)| {
                annotate(&mut graph, mode, table);
                (mode, graph)
            })
            .collect();
        Self { graphs }
    }

    pub fn modes(&self) -> Vec<Mode> {
        let mut modes: Vec<_> = self.graphs.keys().copied().collect();
        modes.sort();
        modes
    }

    fn route(&self, query: &RouteQuery) -> Result<RouteResponse, ApiError> {
        let graph = self
            .graphs
            .get(&query.mode)
            .ok_or(ApiError::UnknownMode(query.mode))?;

        for (lat, lon) in [(query.from_lat, query.from_lon), (query.to_lat, query.to_lon)] {
            if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                return Err(ApiError::InvalidCoordinate { lat, lon });
            }
        }

        let origin = nearest_node(graph, query.from_lat, query.from_lon)?;
        let destination = nearest_node(graph, query.to_lat, query.to_lon)?;
        let weight = match query.weight {
            RouteWeight::Distance => Weight::Length,
            RouteWeight::Time => Weight::TravelTime(query.mode),
        };

        let path = shortest_path(graph, origin, destination, &weight)?;
        let feature = path.to_geojson(graph, Map::new())?;

        Ok(RouteResponse {
            mode: query.mode,
            weight: query.weight,
            origin,
            destination,
            total_cost: path.total_cost,
            route: path.nodes,
            geometry: feature.geometry,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteWeight {
    /// Meters
    #[default]
    Distance,
    /// Seconds for the requested mode
    Time,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteQuery {
    pub mode: Mode,
    pub from_lat: f64,
    pub from_lon: f64,
    pub to_lat: f64,
    pub to_lon: f64,
    #[serde(default)]
    pub weight: RouteWeight,
}

#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub mode: Mode,
    pub weight: RouteWeight,
    pub origin: NodeId,
    pub destination: NodeId,
    pub route: Vec<NodeId>,
    pub total_cost: f64,
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    modes: Vec<Mode>,
}

pub fn router(state: Arc<AppState>, request_timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/route", get(route))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        modes: state.modes(),
    })
}

async fn route(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RouteQuery>,
) -> Result<Json<RouteResponse>, ApiError> {
    // Searches are CPU bound
    let response = tokio::task::spawn_blocking(move || state.route(&query)).await??;
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::Request,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        let mut drive = RoadGraph::new();
        drive.add_node(1, 37.5600, 126.9300).unwrap();
        drive.add_node(2, 37.5610, 126.9310).unwrap();
        drive.add_node(3, 37.5590, 126.9310).unwrap();
        drive.add_node(4, 37.5600, 126.9320).unwrap();
        drive.add_node(9, 38.0000, 127.5000).unwrap();
        for (u, v, length, class) in [
            (1, 2, 140.0, "residential"),
            (2, 4, 140.0, "residential"),
            (1, 3, 160.0, "primary"),
            (3, 4, 160.0, "primary"),
        ] {
            drive
                .add_edge(u, v, EdgeAttributes::new(length).with_road_class(class))
                .unwrap();
        }

        let state = AppState::from_graphs(
            [(Mode::Drive, drive), (Mode::Walk, RoadGraph::new())],
            &SpeedTable::default(),
        );
        router(Arc::new(state), Duration::from_secs(5))
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn health_lists_modes() {
        let (status, body) = get_json("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["modes"], serde_json::json!(["drive", "walk"]));
    }

    #[tokio::test]
    async fn routes_by_distance_and_time() {
        let base = "/route?mode=drive&from_lat=37.56&from_lon=126.93&to_lat=37.56&to_lon=126.932";

        let (status, body) = get_json(base).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["weight"], "distance");
        assert_eq!(body["route"], serde_json::json!([1, 2, 4]));
        assert_eq!(body["total_cost"], 280.0);
        assert_eq!(body["geometry"]["type"], "LineString");

        let (status, body) = get_json(&format!("{base}&weight=time")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["route"], serde_json::json!([1, 3, 4]));
        assert_eq!((body["origin"].as_i64(), body["destination"].as_i64()), (Some(1), Some(4)));
    }

    #[tokio::test]
    async fn unreachable_destination_is_not_found() {
        let (status, body) =
            get_json("/route?mode=drive&from_lat=37.56&from_lon=126.93&to_lat=38&to_lon=127.5").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("9"));
    }

    #[tokio::test]
    async fn empty_graph_is_unprocessable() {
        let (status, _) =
            get_json("/route?mode=walk&from_lat=37.56&from_lon=126.93&to_lat=37.56&to_lon=126.932").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn bad_requests() {
        let (status, _) =
            get_json("/route?mode=bike&from_lat=37.56&from_lon=126.93&to_lat=37.56&to_lon=126.932").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) =
            get_json("/route?mode=tram&from_lat=37.56&from_lon=126.93&to_lat=37.56&to_lon=126.932").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get_json(
            "/route?mode=drive&from_lat=37.56&from_lon=126.93&to_lat=37.56&to_lon=126.932&weight=fuel",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) =
            get_json("/route?mode=drive&from_lat=137.56&from_lon=126.93&to_lat=37.56&to_lon=126.932").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
