pub(crate) mod batch;
pub(crate) mod canvas;
pub(crate) mod composite;
pub(crate) mod placeholder;
pub(crate) mod raster;
