//! Durable client identity.
//!
//! Each install carries an opaque identifier used as the sender key on
//! every outbound message and for self/other classification of inbound
//! ones. It is not a credential; it only needs to be stable and
//! unlikely to collide on a LAN.
//!
//! The identifier is two concatenated pseudo-random base-36 fragments,
//! persisted as a single line in the user data directory. Retrieval
//! never fails: storage problems are logged and degrade to a fresh
//! in-memory identity for the session.

use std::path::{Path, PathBuf};

use rand::Rng;

const IDENTITY_FILE: &str = "identity";
const FRAGMENT_LEN: usize = 13;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Default identity file location, under the platform data directory.
pub fn default_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("dropwire").join(IDENTITY_FILE))
}

/// Retrieve the durable client identity, creating it on first use.
///
/// Uses [`default_path`]; when no data directory can be resolved the
/// identity is generated fresh and held in memory only.
pub fn load_or_create() -> String {
    match default_path() {
        Some(path) => load_or_create_at(&path),
        None => {
            tracing::warn!("no data directory available, using session-only identity");
            generate()
        },
    }
}

/// Retrieve or create the identity stored at `path`.
pub fn load_or_create_at(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(existing) => {
            let trimmed = existing.trim();
            if !trimmed.is_empty() {
                return trimmed.to_owned();
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {},
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read identity file");
        },
    }

    let id = generate();
    if let Err(e) = persist(path, &id) {
        tracing::warn!(
            path = %path.display(),
            error = %e,
            "failed to persist identity, continuing with session-only identity"
        );
    }
    id
}

fn persist(path: &Path, id: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, id)
}

/// Generate a new identity: two independent base-36 fragments.
fn generate() -> String {
    let mut rng = rand::rng();
    let mut id = base36_fragment(&mut rng);
    id.push_str(&base36_fragment(&mut rng));
    id
}

fn base36_fragment<R: Rng>(rng: &mut R) -> String {
    (0..FRAGMENT_LEN).map(|_| char::from(BASE36[rng.random_range(0..BASE36.len())])).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retrieval_is_stable_within_a_storage_root() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("identity");

        let first = load_or_create_at(&path);
        let second = load_or_create_at(&path);

        assert_eq!(first, second);
    }

    #[test]
    fn cleared_storage_yields_a_different_identity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("identity");

        let first = load_or_create_at(&path);
        std::fs::remove_file(&path).unwrap();
        let second = load_or_create_at(&path);

        assert_ne!(first, second);
    }

    #[test]
    fn identity_is_two_base36_fragments() {
        let id = generate();
        assert_eq!(id.len(), FRAGMENT_LEN * 2);
        assert!(id.bytes().all(|b| BASE36.contains(&b)));
    }

    #[test]
    fn unwritable_path_still_yields_an_identity() {
        let id = load_or_create_at(Path::new("/proc/does-not-exist/identity"));
        assert_eq!(id.len(), FRAGMENT_LEN * 2);
    }

    #[test]
    fn whitespace_only_file_is_regenerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("identity");
        std::fs::write(&path, "  \n").unwrap();

        let id = load_or_create_at(&path);
        assert!(!id.trim().is_empty());
    }
}
