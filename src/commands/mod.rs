pub mod context;
pub mod insights;
pub mod profile;
pub mod reflections;
pub mod settings;
pub mod stats;
pub mod trades;

pub use context::AppContext;
pub use insights::*;
pub use profile::*;
pub use reflections::*;
pub use settings::*;
pub use stats::*;
pub use trades::*;
