//! Environment loading
//!
//! A `.env` file in the working directory is read before arguments are
//! parsed, so `DATABASE_URL` may live there. Variables already set in the
//! process environment win.

use std::path::PathBuf;

/// Load `.env` if present; returns the file that was read.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}
