pub mod cppm;
pub mod ppm;
