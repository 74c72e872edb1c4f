mod aabb;
mod color;

pub use aabb::Aabb;
pub use color::parse_color;
