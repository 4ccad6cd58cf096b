pub(crate) mod hooks;
pub(crate) mod player;
pub(crate) mod scheduler;
