pub mod resource_set;

pub use resource_set::{ArtifactKind, ResourceSet, TemporaryArtifact};
