use geo::Point;
use geojson::{Feature, Geometry, Value as GeoJsonValue};
use serde_json::{Map, Value, json};

use super::path::RoutePath;
use crate::{Error, model::RoadGraph};

impl RoutePath {
    /// Converts the route to a `GeoJSON` `Feature`.
    ///
    /// The geometry is a `LineString` through the route's nodes, or a
    /// `Point` for a single-node route. `properties` are extended with
    /// `total_cost` and `nodes`.
    pub fn to_geojson(
        &self,
        graph: &RoadGraph,
        mut properties: Map<String, Value>,
    ) -> Result<Feature, Error> {
        let line = self.line_string(graph)?;
        let geometry = match line.0.as_slice() {
            [single] => Geometry::new(GeoJsonValue::from(&Point::from(*single))),
            _ => Geometry::new(GeoJsonValue::from(&line)),
        };

        properties.insert("total_cost".to_string(), json!(self.total_cost));
        properties.insert("nodes".to_string(), json!(self.nodes));

        let value = json!({
            "type": "Feature",
            "geometry": geometry,
            "properties": properties,
        });

        Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EdgeAttributes;
    use crate::routing::{Weight, shortest_path};

    #[test]
    fn feature_carries_route_and_cost() {
        let mut graph = RoadGraph::new();
        graph.add_node(1, 37.56, 126.93).unwrap();
        graph.add_node(2, 37.57, 126.94).unwrap();
        graph.add_edge(1, 2, EdgeAttributes::new(1400.0)).unwrap();

        let path = shortest_path(&graph, 1, 2, &Weight::Length).unwrap();
        let mut properties = Map::new();
        properties.insert("mode".to_string(), json!("walk"));
        let feature = path.to_geojson(&graph, properties).unwrap();

        let value = serde_json::to_value(&feature).unwrap();
        assert_eq!(value["geometry"]["type"], "LineString");
        assert_eq!(value["geometry"]["coordinates"][0][0], 126.93);
        assert_eq!(value["properties"]["total_cost"], 1400.0);
        assert_eq!(value["properties"]["mode"], "walk");
        assert_eq!(value["properties"]["nodes"], json!([1, 2]));
    }

    #[test]
    fn single_node_route_is_a_point() {
        let mut graph = RoadGraph::new();
        graph.add_node(1, 37.56, 126.93).unwrap();
        let path = shortest_path(&graph, 1, 1, &Weight::Length).unwrap();
        let value = serde_json::to_value(path.to_geojson(&graph, Map::new()).unwrap()).unwrap();
        assert_eq!(value["geometry"]["type"], "Point");
    }
}
