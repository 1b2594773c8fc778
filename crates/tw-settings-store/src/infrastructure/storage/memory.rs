//! In-memory filesystem for tests.
//!
//! Allows tests to run the full store without touching disk, to inspect
//! every artifact afterwards, and to inject one-shot faults that mimic a
//! failing flash part or a power cut in the middle of a commit.

use std::collections::{BTreeMap, VecDeque};
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::Filesystem;

/// A failure the next matching operation will exhibit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    /// The next `write` fails and leaves the file untouched.
    FailWrite,
    /// The next `write` reports success but stores only this many bytes.
    ShortWrite(usize),
    /// The next `rename` fails and leaves both files as they were, as if
    /// power was lost just before the replace.
    FailRename,
    /// Like [`FailRename`](Fault::FailRename), but only for the next rename
    /// whose target is this name.
    FailRenameInto(String),
    /// The next `read` fails with an I/O error other than "not found".
    FailRead,
}

#[derive(Debug, Default)]
struct MemoryState {
    files: BTreeMap<String, Vec<u8>>,
    faults: VecDeque<Fault>,
    renames: Vec<(String, String)>,
}

impl MemoryState {
    fn take_fault(&mut self, matches: impl Fn(&Fault) -> bool) -> Option<Fault> {
        let idx = self.faults.iter().position(matches)?;
        self.faults.remove(idx)
    }
}

/// A shared, cloneable in-memory [`Filesystem`].
///
/// Clones see the same files, so a test can hand one clone to the store and
/// keep another to inspect or corrupt artifacts.
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    inner: Arc<Mutex<MemoryState>>,
}

fn not_found(name: &str) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("{name}: no such file"))
}

fn injected(op: &str) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("injected {op} failure"))
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queues a one-shot fault.
    pub fn inject(&self, fault: Fault) {
        self.state().faults.push_back(fault);
    }

    /// Places a file directly, bypassing faults.
    pub fn put(&self, name: &str, data: impl Into<Vec<u8>>) {
        self.state().files.insert(name.to_string(), data.into());
    }

    pub fn file(&self, name: &str) -> Option<Vec<u8>> {
        self.state().files.get(name).cloned()
    }

    pub fn file_text(&self, name: &str) -> Option<String> {
        self.file(name)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn names(&self) -> Vec<String> {
        self.state().files.keys().cloned().collect()
    }

    /// Number of successful renames whose target was `name`.
    pub fn renames_into(&self, name: &str) -> usize {
        self.state()
            .renames
            .iter()
            .filter(|(_, to)| to == name)
            .count()
    }
}

impl Filesystem for MemoryFs {
    fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        let mut state = self.state();
        if state.take_fault(|f| *f == Fault::FailRead).is_some() {
            return Err(injected("read"));
        }
        state.files.get(name).cloned().ok_or_else(|| not_found(name))
    }

    fn write(&self, name: &str, data: &[u8]) -> io::Result<()> {
        let mut state = self.state();
        match state.take_fault(|f| matches!(f, Fault::FailWrite | Fault::ShortWrite(_))) {
            Some(Fault::FailWrite) => Err(injected("write")),
            Some(Fault::ShortWrite(n)) => {
                let kept = data[..n.min(data.len())].to_vec();
                state.files.insert(name.to_string(), kept);
                Ok(())
            }
            _ => {
                state.files.insert(name.to_string(), data.to_vec());
                Ok(())
            }
        }
    }

    fn append(&self, name: &str, data: &[u8]) -> io::Result<()> {
        self.state()
            .files
            .entry(name.to_string())
            .or_default()
            .extend_from_slice(data);
        Ok(())
    }

    fn size(&self, name: &str) -> io::Result<u64> {
        self.state()
            .files
            .get(name)
            .map(|f| f.len() as u64)
            .ok_or_else(|| not_found(name))
    }

    fn rename(&self, from: &str, to: &str) -> io::Result<()> {
        let mut state = self.state();
        let hit = state.take_fault(|f| match f {
            Fault::FailRename => true,
            Fault::FailRenameInto(target) => target == to,
            _ => false,
        });
        if hit.is_some() {
            return Err(injected("rename"));
        }
        let data = state.files.remove(from).ok_or_else(|| not_found(from))?;
        state.files.insert(to.to_string(), data);
        state.renames.push((from.to_string(), to.to_string()));
        Ok(())
    }

    fn remove(&self, name: &str) -> io::Result<()> {
        self.state()
            .files
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| not_found(name))
    }

    fn list(&self) -> io::Result<Vec<String>> {
        Ok(self.names())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_files() {
        let fs = MemoryFs::new();
        let handle = fs.clone();
        fs.write("a", b"1").unwrap();
        assert_eq!(handle.file("a"), Some(b"1".to_vec()));
    }

    #[test]
    fn test_fail_rename_leaves_both_files() {
        // Arrange
        let fs = MemoryFs::new();
        fs.put("primary", "old");
        fs.put("staging", "new");
        fs.inject(Fault::FailRename);

        // Act
        let result = fs.rename("staging", "primary");

        // Assert
        assert!(result.is_err());
        assert_eq!(fs.file_text("primary").as_deref(), Some("old"));
        assert_eq!(fs.file_text("staging").as_deref(), Some("new"));
        assert_eq!(fs.renames_into("primary"), 0);
    }

    #[test]
    fn test_targeted_rename_fault_skips_other_targets() {
        // Arrange
        let fs = MemoryFs::new();
        fs.put("a", "1");
        fs.put("b", "2");
        fs.inject(Fault::FailRenameInto("primary".to_string()));

        // Act
        let other = fs.rename("a", "backup");
        let targeted = fs.rename("b", "primary");

        // Assert
        assert!(other.is_ok());
        assert!(targeted.is_err());
        assert_eq!(fs.file_text("b").as_deref(), Some("2"));
        assert!(fs.file("primary").is_none());
    }

    #[test]
    fn test_faults_are_one_shot() {
        let fs = MemoryFs::new();
        fs.inject(Fault::FailWrite);
        assert!(fs.write("a", b"1").is_err());
        assert!(fs.write("a", b"1").is_ok());
    }

    #[test]
    fn test_short_write_keeps_prefix_and_reports_success() {
        let fs = MemoryFs::new();
        fs.inject(Fault::ShortWrite(3));
        fs.write("a", b"abcdef").unwrap();
        assert_eq!(fs.size("a").unwrap(), 3);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let fs = MemoryFs::new();
        assert_eq!(fs.read("nope").unwrap_err().kind(), io::ErrorKind::NotFound);
        assert!(!fs.exists("nope"));
    }
}
