pub mod bounding_box;
pub mod nominatim;
pub mod resolver;
