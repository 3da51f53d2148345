//! Document assembly: skeleton creation, media attach and spine placement.

pub(crate) mod media;
pub(crate) mod session;
