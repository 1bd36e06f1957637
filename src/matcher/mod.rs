pub mod capture;
pub mod fill;
pub mod identity;
