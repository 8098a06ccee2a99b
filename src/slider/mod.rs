pub(crate) mod cuts;
pub(crate) mod machine;
pub(crate) mod view;
