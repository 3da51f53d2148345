//! Typed FCPXML entity model.
//!
//! Every constructor validates its own invariants against a [`crate::Profile`],
//! so a tree built only through constructors serializes to an importable file.

pub(crate) mod animation;
pub(crate) mod library;
pub(crate) mod resources;
pub(crate) mod timeline;
