pub mod bundle;
pub mod csv_source;
pub mod projected;
pub mod topology;

pub use bundle::parse_bundle;
pub use csv_source::{TabularDataset, TabularRow};
pub use projected::parse_projected;
pub use topology::{decode_topology, GeometryFeature};
