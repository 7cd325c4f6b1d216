//! Signature traces: segment types and JSON decoding

mod decode;
pub mod segment;

pub use decode::{decode_trace, strip_slashes};
pub use segment::{BoundingSize, LineSegment, SignatureTrace};
