pub(crate) mod bitmap;
pub(crate) mod cache;
pub(crate) mod raster;
