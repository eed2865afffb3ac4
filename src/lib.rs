pub mod feedback_api;
pub mod geometry_utils;
pub mod landmarks;
pub mod provider_config;
pub mod remote_provider;
pub mod systems;
pub mod tether_interface;

pub type Point2D = (f32, f32);
