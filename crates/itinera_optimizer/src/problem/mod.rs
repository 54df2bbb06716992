pub mod location;
pub mod meters;
