pub(crate) mod help;
pub(crate) mod sync;
