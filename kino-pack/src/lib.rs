//! Kino content containers.
//!
//! Every built entry is shipped as one binary file: a kind-specific header
//! followed by the opaque asset bundle produced by the engine's asset
//! compiler. All integers are little-endian; strings and blobs carry a
//! 4-byte length prefix.
//!
//! | Layout | Used by                     | Opens with                 |
//! |--------|-----------------------------|----------------------------|
//! | Pack   | `.knpp`, `.knco`            | `b"knco"`                  |
//! | Garage | `.kngarage`                 | `0x00DEDEDE` (`i32`)       |
//! | Map    | `.knmap`                    | length-prefixed ASCII banner |
//!
//! The header carries the author's platform ids (pack layout) or name
//! (garage and map layouts) so the game server can attribute content.

mod codec;
mod container;
mod error;
mod header;

pub use container::{Container, ContainerWriter, WriteMode, detect_layout};
pub use error::{PackError, PackResult};
pub use header::{
    ContainerHeader, GARAGE_MAGIC, GarageHeader, Layout, MAP_BANNER, MapHeader, PACK_MAGIC,
    PackHeader, RESERVED,
};
