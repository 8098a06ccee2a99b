pub(crate) mod lattice;
pub(crate) mod pattern;
