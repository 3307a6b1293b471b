//! CLI command implementations

pub(crate) mod discover;
pub(crate) mod extract;
pub(crate) mod ls;
pub(crate) mod resolve;
