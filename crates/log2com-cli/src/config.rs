mod builder;
mod defaults;
mod file;

pub use builder::build_config;
pub use defaults::DefaultsConfig;
