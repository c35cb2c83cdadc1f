pub mod funcs;
pub mod usages;
pub mod vars;
