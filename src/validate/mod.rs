//! Post-write checks over a rendered file.
//!
//! Checks are diagnostic: a failed report never deletes or rewrites the file.

pub(crate) mod checks;
