pub mod resources;
pub mod voice_clone;
