mod search;
mod state;

pub(crate) use search::{SearchTree, dijkstra};
