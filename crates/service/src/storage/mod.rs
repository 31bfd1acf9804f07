pub mod json_map_store;

pub use json_map_store::JsonMapStore;
