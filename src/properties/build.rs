use std::fmt;
use std::path::{Path, PathBuf};

/// One execution of a job, identified by its storage directory
///
/// Builds are stored as `<job>/builds/<number>`, so the parent of a build's
/// storage directory is shared by every build of the same job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRecord {
    /// Directory holding this build's stored metadata
    storage_dir: PathBuf,
}

impl BuildRecord {
    /// Creates a record for an existing storage directory
    pub fn new(storage_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage_dir: storage_dir.into(),
        }
    }

    /// Creates the record for build `number` of `job` under `jobs_root`
    ///
    /// # Example
    ///
    /// ```rust
    /// use scanstage::BuildRecord;
    /// use std::path::Path;
    ///
    /// let build = BuildRecord::for_job("/var/jenkins/jobs", "app", 42);
    /// assert_eq!(build.storage_dir(), Path::new("/var/jenkins/jobs/app/builds/42"));
    /// assert_eq!(build.builds_dir(), Some(Path::new("/var/jenkins/jobs/app/builds")));
    /// ```
    pub fn for_job(jobs_root: impl AsRef<Path>, job: &str, number: u64) -> Self {
        Self::new(
            jobs_root
                .as_ref()
                .join(job)
                .join("builds")
                .join(number.to_string()),
        )
    }

    /// This build's own storage directory
    #[must_use]
    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    /// The directory holding all builds of the job
    #[must_use]
    pub fn builds_dir(&self) -> Option<&Path> {
        self.storage_dir
            .parent()
            .map(|p| if p.as_os_str().is_empty() { Path::new(".") } else { p })
    }
}

impl fmt::Display for BuildRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.storage_dir.display())
    }
}
