pub mod blog_post;
pub mod image;
pub mod image_category;
pub mod scrolling_image;
pub mod user;
