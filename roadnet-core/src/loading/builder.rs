use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use log::{debug, info};

use super::raw_types::{NodeLinkDocument, NodeLinkEdge};
use crate::{
    Error,
    model::{EdgeAttributes, RoadGraph},
};

/// Loads a road graph from a node-link JSON file
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if the
/// document references unknown or duplicate nodes.
pub fn load_road_graph(path: impl AsRef<Path>) -> Result<RoadGraph, Error> {
    let path = path.as_ref();
    info!("Loading road graph: {}", path.display());

    let file = File::open(path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to open file '{}': {}", path.display(), e),
        )
    })?;
    road_graph_from_reader(BufReader::new(file))
}

/// Reads a node-link JSON document from `reader` and builds the graph
///
/// # Errors
///
/// See [`load_road_graph`].
pub fn road_graph_from_reader<R: Read>(reader: R) -> Result<RoadGraph, Error> {
    let document: NodeLinkDocument = serde_json::from_reader(reader)?;
    build_road_graph(document)
}

/// Builds the graph from an already parsed document. Links of an
/// undirected document are inserted in both directions.
///
/// # Errors
///
/// [`Error::DuplicateNode`], [`Error::InvalidNodeReference`] or
/// [`Error::InvalidData`] for inconsistent documents.
pub fn build_road_graph(document: NodeLinkDocument) -> Result<RoadGraph, Error> {
    let edge_capacity = document.links.len() * if document.directed { 1 } else { 2 };
    let mut graph = RoadGraph::with_capacity(document.nodes.len(), edge_capacity);

    for node in &document.nodes {
        graph.add_node(node.id, node.y, node.x)?;
    }

    for link in document.links {
        let (source, target, key) = (link.source, link.target, link.key);
        let attributes = edge_attributes(link);
        // A self-loop is its own reverse
        let reverse = (!document.directed && source != target).then(|| attributes.clone());

        match key {
            Some(key) => graph.add_edge_with_key(source, target, key, attributes)?,
            None => {
                graph.add_edge(source, target, attributes)?;
            }
        }
        if let Some(attributes) = reverse {
            graph.add_edge(target, source, attributes)?;
        }
    }

    info!(
        "Road graph built with {} nodes and {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    if let Some(bbox) = graph.bounding_box() {
        debug!(
            "Road graph extent: ({:.5}, {:.5}) - ({:.5}, {:.5})",
            bbox.min().y,
            bbox.min().x,
            bbox.max().y,
            bbox.max().x
        );
    }

    Ok(graph)
}

fn edge_attributes(link: NodeLinkEdge) -> EdgeAttributes {
    EdgeAttributes {
        length_m: link.length,
        max_speed: link.maxspeed.map(Into::into),
        road_class: link.highway.map(Into::into),
        extra: link
            .extra
            .into_iter()
            .filter_map(|(name, value)| value.as_f64().map(|number| (name, number)))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AttributeValue, Mode, SpeedTable};

    const DOCUMENT: &str = r#"{
        "directed": true,
        "multigraph": true,
        "graph": {"crs": "epsg:4326"},
        "nodes": [
            {"id": 10, "x": 126.9386, "y": 37.5658, "street_count": 3},
            {"id": 11, "x": 126.9390, "y": 37.5661},
            {"id": 12, "lon": 126.9400, "lat": 37.5670}
        ],
        "links": [
            {"source": 10, "target": 11, "key": 0, "length": 45.2,
             "maxspeed": ["50", "30"], "highway": "primary", "lanes": "2", "grade": 0.02},
            {"source": 10, "target": 11, "key": 1, "length": 47.0, "highway": ["service", "residential"]},
            {"source": 11, "target": 12, "length": 120.0, "maxspeed": 30, "oneway": false}
        ]
    }"#;

    #[test]
    fn parses_node_link_document() {
        let graph = road_graph_from_reader(DOCUMENT.as_bytes()).unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.node(12).unwrap().lat(), 37.5670);

        let mut edges: Vec<_> = graph.edges_between(10, 11).unwrap().collect();
        edges.sort_by_key(|edge| edge.key);
        assert_eq!(edges[0].max_speed, Some(AttributeValue::from(vec!["50", "30"])));
        assert_eq!(edges[0].attribute("grade"), Some(0.02));
        assert_eq!(edges[0].attribute("lanes"), None);
        assert_eq!(edges[1].key, 1);
        assert_eq!(
            edges[1].road_class.as_ref().and_then(AttributeValue::first),
            Some("service")
        );

        let last = graph.edges_between(11, 12).unwrap().next().unwrap();
        assert_eq!(last.max_speed, Some(AttributeValue::from("30")));
    }

    #[test]
    fn numeric_maxspeed_resolves() {
        let mut graph = road_graph_from_reader(DOCUMENT.as_bytes()).unwrap();
        crate::annotate(&mut graph, Mode::Drive, &SpeedTable::default());
        let last = graph.edges_between(11, 12).unwrap().next().unwrap();
        assert_eq!(last.travel_time_s(Mode::Drive), Some(14.4));
    }

    #[test]
    fn undirected_links_go_both_ways() {
        let document = r#"{
            "directed": false,
            "nodes": [{"id": 1, "x": 0.0, "y": 0.0}, {"id": 2, "x": 0.001, "y": 0.0}],
            "edges": [{"source": 1, "target": 2, "length": 111.0}]
        }"#;
        let graph = road_graph_from_reader(document.as_bytes()).unwrap();
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.edges_between(2, 1).unwrap().count(), 1);
    }

    #[test]
    fn undirected_self_loops_keep_their_keys() {
        let document = r#"{
            "directed": false,
            "nodes": [{"id": 1, "x": 0.0, "y": 0.0}],
            "links": [
                {"source": 1, "target": 1, "key": 0, "length": 20.0},
                {"source": 1, "target": 1, "key": 1, "length": 30.0}
            ]
        }"#;
        let graph = road_graph_from_reader(document.as_bytes()).unwrap();
        assert_eq!(graph.edge_count(), 2);

        let mut keys: Vec<_> = graph.edges_between(1, 1).unwrap().map(|e| e.key).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec![0, 1]);
    }

    #[test]
    fn dangling_link_is_rejected() {
        let document = r#"{
            "nodes": [{"id": 1, "x": 0.0, "y": 0.0}],
            "links": [{"source": 1, "target": 2}]
        }"#;
        assert!(matches!(
            road_graph_from_reader(document.as_bytes()),
            Err(Error::InvalidNodeReference(2))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            load_road_graph("/nonexistent/graph.json"),
            Err(Error::IoError(_))
        ));
    }
}
