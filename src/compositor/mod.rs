pub(crate) mod debounce;
pub(crate) mod drag;
pub(crate) mod editor;
