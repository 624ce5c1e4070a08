// Wed Jan 15 2026 - Alex

pub mod banner;
pub mod progress;

pub use banner::Banner;
pub use progress::ScanProgress;
