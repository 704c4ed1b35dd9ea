mod frame;
mod telemetry;
mod trajectory;
mod vessel;

pub use frame::*;
pub use telemetry::*;
pub use trajectory::*;
pub use vessel::*;
