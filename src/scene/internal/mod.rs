pub(crate) mod lights;
pub(crate) mod rendering;
pub(crate) mod transforms;
