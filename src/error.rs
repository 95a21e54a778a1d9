use thiserror::Error;

/// Top-level error type for mesh generation.
#[derive(Debug, Error)]
pub enum MeshgenError {
    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Errors related to the mesh container and its structure.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("invalid mesh: {0}")]
    InvalidMesh(String),
}

/// Errors related to builder input.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("operation failed: {0}")]
    Failed(String),
}

/// Errors raised while writing a mesh to external storage.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported element with {nodes} nodes in a {dim}D mesh")]
    UnsupportedElement { dim: u8, nodes: usize },

    #[error(transparent)]
    Mesh(#[from] MeshError),
}

/// Convenience type alias for results using [`MeshgenError`].
pub type Result<T, E = MeshgenError> = std::result::Result<T, E>;
