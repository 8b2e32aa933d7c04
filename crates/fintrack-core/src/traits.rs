//! Core traits shared across layers.

/// Trait for entities with a unique identifier.
pub trait Entity<ID> {
    /// Returns the entity's unique identifier.
    fn id(&self) -> &ID;
}

/// Marker trait for service layer components.
///
/// Services contain business logic and orchestrate operations
/// across multiple repositories and external services.
pub trait Service: Send + Sync {}
