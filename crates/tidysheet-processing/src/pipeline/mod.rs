//! Pipeline module.
//!
//! Ties decoding, cleaning, projection and encoding together behind a
//! per-file [`FileSession`], with [`Workspace`] handling multi-file uploads.

mod session;
mod workspace;

pub use session::FileSession;
pub use workspace::{IngestOutcome, Workspace};
