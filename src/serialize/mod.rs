//! Element tree, pretty writer and the FCPXML lowering.

pub(crate) mod fcpxml;
pub(crate) mod xml;
