mod context;

pub use context::BootstrappingContext;
