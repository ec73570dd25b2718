pub mod animation;
pub mod frame;
pub mod geometry;
pub mod input;
pub mod mask;
pub mod time;
pub mod timer;
