use super::{BuildRecord, Properties};
use crate::errors::PropertiesError;
use crate::infrastructure::BuildLog;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Default name of the handoff file
pub const PROPERTIES_FILE_NAME: &str = "veracode.properties";

/// Header comment written at the top of the handoff file
const HEADER: &str = "Veracode";

/// Reads and writes the properties handoff file of a job
///
/// The file sits next to the job's build directories, not inside one, so a
/// value written by one build is visible to the next build of the same job.
/// Reading consumes the file. Nothing serializes access: two builds of the
/// same job running at once can interleave their writes and reads.
#[derive(Debug, Clone)]
pub struct PropertiesStore {
    file_name: String,
}

impl PropertiesStore {
    /// Creates a store using `file_name` for the handoff file
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    /// Location of the handoff file for `build`
    ///
    /// # Errors
    ///
    /// Returns [`PropertiesError::NoJobDirectory`] if the build's storage
    /// directory has no parent.
    pub fn path_for(&self, build: &BuildRecord) -> Result<PathBuf, PropertiesError> {
        build
            .builds_dir()
            .map(|dir| dir.join(&self.file_name))
            .ok_or_else(|| PropertiesError::NoJobDirectory {
                path: build.storage_dir().to_path_buf(),
            })
    }

    /// Writes `properties`, replacing any existing file
    ///
    /// Failures are also printed to `log`.
    ///
    /// # Errors
    ///
    /// Returns [`PropertiesError`] if the file cannot be created or written.
    pub fn write(
        &self,
        build: &BuildRecord,
        properties: &Properties,
        log: &mut dyn BuildLog,
    ) -> Result<(), PropertiesError> {
        let result = self.path_for(build).and_then(|path| {
            Self::write_file(&path, properties)
                .map_err(|e| PropertiesError::from_io(&path, e))
                .map(|()| path)
        });

        match result {
            Ok(path) => {
                tracing::debug!(path = %path.display(), entries = properties.len(), "Wrote build properties");
                Ok(())
            }
            Err(e) => {
                report(log, &e);
                Err(e)
            }
        }
    }

    fn write_file(path: &Path, properties: &Properties) -> std::io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        properties.store(&mut writer, Some(HEADER))?;
        writer.flush()
    }

    /// Reads and consumes the handoff file
    ///
    /// Returns `None` if there is no file or it cannot be read; read failures
    /// are printed to `log`. The file is deleted afterwards in every case.
    pub fn read(&self, build: &BuildRecord, log: &mut dyn BuildLog) -> Option<Properties> {
        match self.try_read(build, log) {
            Ok(properties) => properties,
            Err(e) => {
                report(log, &e);
                None
            }
        }
    }

    /// Reads and consumes the handoff file, returning the failure cause
    ///
    /// `Ok(None)` means there was no file. The file is deleted afterwards
    /// whether or not reading succeeded; deletion failures go to `log`.
    ///
    /// # Errors
    ///
    /// Returns [`PropertiesError`] if the file exists but cannot be read or parsed.
    pub fn try_read(
        &self,
        build: &BuildRecord,
        log: &mut dyn BuildLog,
    ) -> Result<Option<Properties>, PropertiesError> {
        let path = self.path_for(build)?;
        let _consume = ConsumeGuard { path: &path, log };

        if !path.exists() {
            tracing::debug!(path = %path.display(), "No build properties to read");
            return Ok(None);
        }

        let bytes = fs::read(&path).map_err(|e| PropertiesError::from_io(&path, e))?;
        let properties = Properties::from_latin1(&bytes)?;
        tracing::debug!(path = %path.display(), entries = properties.len(), "Read build properties");
        Ok(Some(properties))
    }

    /// Deletes the handoff file
    ///
    /// A missing file counts as deleted. Failures are also printed to `log`.
    ///
    /// # Errors
    ///
    /// Returns [`PropertiesError`] if the file exists but cannot be removed.
    pub fn delete(&self, build: &BuildRecord, log: &mut dyn BuildLog) -> Result<(), PropertiesError> {
        let result = self
            .path_for(build)
            .and_then(|path| remove_if_present(&path));
        if let Err(e) = &result {
            report(log, e);
        }
        result
    }

    /// Name of the handoff file
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

impl Default for PropertiesStore {
    fn default() -> Self {
        Self::new(PROPERTIES_FILE_NAME)
    }
}

fn remove_if_present(path: &Path) -> Result<(), PropertiesError> {
    match fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "Deleted build properties");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(PropertiesError::from_io(path, e)),
    }
}

fn report(log: &mut dyn BuildLog, err: &PropertiesError) {
    tracing::error!(error = %err, "Build properties operation failed");
    log.println(&format!("\n\n{err}"));
}

/// Deletes the handoff file when a read finishes, however it finishes
struct ConsumeGuard<'a> {
    path: &'a Path,
    log: &'a mut dyn BuildLog,
}

impl Drop for ConsumeGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = remove_if_present(self.path) {
            report(self.log, &e);
        }
    }
}
