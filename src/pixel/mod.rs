pub(crate) mod color;
pub(crate) mod pm_float;
