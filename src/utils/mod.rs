//! Small helpers shared by the routers and the generator.

pub mod mime;
pub mod url;
