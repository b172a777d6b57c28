pub(crate) mod port;
pub(crate) mod raster;
pub(crate) mod recorder;
pub(crate) mod svg;
