//! Frame-accurate rational time values.

pub(crate) mod clock;
