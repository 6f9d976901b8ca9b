pub(crate) mod fetch;
pub(crate) mod image;
pub(crate) mod loader;
