pub mod bank;
pub mod bar;
pub mod financials;
pub mod signal;

pub use bank::*;
pub use bar::*;
pub use financials::*;
pub use signal::*;
