mod access;
mod bookings;
mod dashboard;
mod guests;
mod reports;

pub use access::*;
pub use bookings::*;
pub use dashboard::*;
pub use guests::*;
pub use reports::*;
