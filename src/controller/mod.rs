pub mod popup;
pub mod status;
