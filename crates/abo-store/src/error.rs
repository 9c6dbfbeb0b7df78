use std::path::PathBuf;

/// Errors surfaced by the subscriber store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("cannot open database at `{path}`")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
