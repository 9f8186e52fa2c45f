mod resource;

pub use resource::{FieldKind, ParsedField, ParsedResource, parse};
