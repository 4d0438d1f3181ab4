pub(crate) mod gesture;
pub(crate) mod keyboard;
pub(crate) mod listener;
pub(crate) mod pointer;
