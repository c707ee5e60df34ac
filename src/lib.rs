//! # rasterkit
//!
//! A small raster image transform engine. Load an image from bytes or a file,
//! resize, crop, sharpen or place other images onto it, then encode it as
//! JPEG, PNG, GIF, WEBP or BMP.
//!
//! # Architecture
//!
//! Everything that touches pixels lives under [`imaging`], split so the
//! geometry can be tested without decoding a single image:
//!
//! ```text
//! bytes ─▶ format (sniff) ─▶ codec::decode ─▶ PixelBuffer
//!                                               │
//!            calculations (pure geometry) ─▶ filters / compositor
//!                                               │
//! bytes ◀─ codec::encode ◀──────────────────────┘
//! ```
//!
//! [`imaging::ImageDocument`] is the façade most callers want. It owns one
//! buffer and exposes the operations as chainable methods.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Format registry, geometry, pixel buffer, filters, compositor, codecs, document façade |
//! | [`config`] | `rasterkit.toml` loading, validation and merging over stock defaults |
//! | [`batch`] | Parallel resize of a whole directory tree |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Inverted 7-bit Alpha
//!
//! Colors carry alpha as 0 (opaque) to 127 (fully transparent). Placement
//! opacity tables and blank-canvas defaults are all expressed in that range;
//! conversion to straight 8-bit alpha happens only at the codec boundary.
//!
//! ## Pure-Rust Codecs
//!
//! Decoding and encoding go through the `image` crate with only the five
//! supported formats compiled in. No system libraries, so the binary runs
//! anywhere it builds.
//!
//! ## Documents Share Nothing
//!
//! Each [`imaging::ImageDocument`] exclusively owns its pixels and `Clone` is
//! a deep copy. Documents are `Send`, which is what lets [`batch`] fan work
//! out over a rayon pool without locks.

pub mod batch;
pub mod config;
pub mod imaging;
pub mod output;
