pub(crate) mod composite;
pub(crate) mod context;
pub(crate) mod cpu;
pub(crate) mod renderer;
pub(crate) mod sync;
pub(crate) mod text;
