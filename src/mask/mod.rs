pub(crate) mod ants;
pub(crate) mod editor;
pub(crate) mod path;
pub(crate) mod raster;
