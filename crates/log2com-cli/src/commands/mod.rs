pub mod bonds;
pub mod convert;
pub mod defaults;
