//! File exporters over the subscriber store.
//!
//! Every writer queries its row set, streams lines through a
//! [`std::io::BufWriter`] and reports I/O failures as contextual
//! [`anyhow`] errors. File handles are plain RAII values, so they are
//! released on every exit path.

pub mod csv;
pub mod email;
pub mod resubscribe;
pub mod routing;
