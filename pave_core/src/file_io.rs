//! # File I/O Module
//!
//! Session persistence and report output:
//! - **Atomic saves**: write to `.tmp`, sync, rename over the target
//! - **Version validation**: reject session files from an incompatible schema
//!
//! ## File Format
//!
//! Sessions are saved as `.pvd` files containing pretty-printed JSON.
//!
//! ## Example
//!
//! ```rust,no_run
//! use pave_core::file_io::{load_session, save_session};
//! use pave_core::session::Session;
//! use std::path::Path;
//!
//! let session = Session::new();
//! let path = Path::new("design.pvd");
//!
//! save_session(&session, path).unwrap();
//! let loaded = load_session(path).unwrap();
//! assert_eq!(loaded.meta.id, session.meta.id);
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::errors::{PaveError, PaveResult};
use crate::session::{Session, SCHEMA_VERSION};

/// Save a session with an atomic write.
///
/// # Returns
///
/// * `Ok(())` - File written and renamed into place
/// * `Err(PaveError::SerializationError)` - Session could not be encoded
/// * `Err(PaveError::FileError)` - I/O error
pub fn save_session(session: &Session, path: &Path) -> PaveResult<()> {
    let json = serde_json::to_string_pretty(session).map_err(|e| PaveError::SerializationError {
        reason: e.to_string(),
    })?;
    write_bytes_atomic(json.as_bytes(), path)?;
    info!("Session {} saved to {}", session.meta.id, path.display());
    Ok(())
}

/// Write bytes to `path` through a sibling `.tmp` file.
///
/// The target is either left untouched or fully replaced.
pub fn write_bytes_atomic(bytes: &[u8], path: &Path) -> PaveResult<()> {
    let tmp_path = tmp_path_for(path);

    {
        let mut file = File::create(&tmp_path)
            .map_err(|e| PaveError::file_error("create temp", tmp_path.display().to_string(), e.to_string()))?;

        file.write_all(bytes)
            .map_err(|e| PaveError::file_error("write temp", tmp_path.display().to_string(), e.to_string()))?;

        file.sync_all()
            .map_err(|e| PaveError::file_error("sync temp", tmp_path.display().to_string(), e.to_string()))?;
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        PaveError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Load a session from a file.
///
/// # Returns
///
/// * `Ok(Session)` - Successfully loaded session
/// * `Err(PaveError::VersionMismatch)` - File version is incompatible
/// * `Err(PaveError::SerializationError)` - Invalid JSON
/// * `Err(PaveError::FileError)` - I/O error
pub fn load_session(path: &Path) -> PaveResult<Session> {
    let mut file = File::open(path)
        .map_err(|e| PaveError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| PaveError::file_error("read", path.display().to_string(), e.to_string()))?;

    let session: Session = serde_json::from_str(&contents).map_err(|e| PaveError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })?;

    validate_version(&session.meta.version)?;

    info!("Session {} loaded from {}", session.meta.id, path.display());
    Ok(session)
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

/// Check a file's schema version against [`SCHEMA_VERSION`].
///
/// Major versions must match. While the schema is 0.x, a file with a newer
/// minor version is also rejected.
fn validate_version(file_version: &str) -> PaveResult<()> {
    let mismatch = || PaveError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file_parts: Vec<u32> = file_version.split('.').filter_map(|p| p.parse().ok()).collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION.split('.').filter_map(|p| p.parse().ok()).collect();

    let (Some(file_major), Some(current_major)) = (file_parts.first(), current_parts.first()) else {
        return Err(mismatch());
    };
    if file_major != current_major {
        return Err(mismatch());
    }

    if *current_major == 0 {
        if let (Some(file_minor), Some(current_minor)) = (file_parts.get(1), current_parts.get(1)) {
            if file_minor > current_minor {
                return Err(mismatch());
            }
        }
    }

    Ok(())
}
