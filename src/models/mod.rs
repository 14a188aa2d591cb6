pub mod profile;
pub mod reflection;
pub mod settings;
pub mod trade;

pub use profile::*;
pub use reflection::*;
pub use settings::*;
pub use trade::*;
