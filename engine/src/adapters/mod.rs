mod annotation_detector;
mod file_frame_source;
mod log_display;
mod scan_delay;
mod trajectory_recorder;

pub use annotation_detector::*;
pub use file_frame_source::*;
pub use log_display::*;
pub use scan_delay::*;
pub use trajectory_recorder::*;
