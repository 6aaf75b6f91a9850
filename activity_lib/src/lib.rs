pub mod lenient;
pub mod session;
pub mod weather;
