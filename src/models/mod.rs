pub mod advisory;
pub mod energy;
pub mod environment;
pub mod location;
pub mod reading;
pub mod simulation;

pub use advisory::*;
pub use energy::*;
pub use environment::*;
pub use location::*;
pub use reading::*;
pub use simulation::*;
