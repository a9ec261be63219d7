pub mod auth;
pub mod blog;
pub mod category;
pub mod image;
pub mod scrolling;
