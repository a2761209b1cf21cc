use std::fs::Metadata;
use std::io::Read;
use std::path::PathBuf;

#[cfg(test)]
use mockall::automock;

/// Sentinel template path meaning "read standard input".
pub const STDIN_SENTINEL: &str = "-";

/// Where a comment body template is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    Stdin,
    File(PathBuf),
}

impl TemplateSource {
    /// An empty path reads standard input too, which is how piped input without `--template` is consumed.
    pub fn from_flag(path: &str) -> Self {
        if path.is_empty() || path == STDIN_SENTINEL {
            TemplateSource::Stdin
        } else {
            TemplateSource::File(PathBuf::from(path))
        }
    }
}

/// Access to piped input and template files.
#[cfg_attr(test, automock)]
pub trait InputSource {
    /// Whether standard input is a pipe or a non-empty redirected file.
    fn stdin_has_data(&self) -> bool;
    fn read(&self, source: &TemplateSource) -> std::io::Result<String>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StdInput;

impl InputSource for StdInput {
    #[cfg(unix)]
    fn stdin_has_data(&self) -> bool {
        use std::os::fd::AsFd;

        let metadata = std::io::stdin()
            .as_fd()
            .try_clone_to_owned()
            .and_then(|fd| std::fs::File::from(fd).metadata());
        match metadata {
            Ok(metadata) => has_data(&metadata),
            Err(e) => {
                log::warn!("Failed to inspect standard input: {}", e);
                false
            }
        }
    }

    #[cfg(not(unix))]
    fn stdin_has_data(&self) -> bool {
        use std::io::IsTerminal;
        !std::io::stdin().is_terminal()
    }

    fn read(&self, source: &TemplateSource) -> std::io::Result<String> {
        match source {
            TemplateSource::Stdin => {
                log::debug!("Reading comment body from standard input");
                let mut content = String::new();
                std::io::stdin().lock().read_to_string(&mut content)?;
                Ok(content)
            }
            TemplateSource::File(path) => {
                log::debug!("Reading comment body from {}", path.display());
                std::fs::read_to_string(path)
            }
        }
    }
}

/// A named pipe or a non-empty file counts as data. Terminals and empty
/// devices such as `/dev/null` do not.
#[cfg_attr(not(unix), allow(dead_code))]
fn has_data(metadata: &Metadata) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::FileTypeExt;
        if metadata.file_type().is_fifo() {
            return true;
        }
    }
    metadata.len() > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_template_source_from_flag() {
        assert_eq!(TemplateSource::from_flag(""), TemplateSource::Stdin);
        assert_eq!(TemplateSource::from_flag("-"), TemplateSource::Stdin);
        assert_eq!(
            TemplateSource::from_flag("notes/body.md"),
            TemplateSource::File(PathBuf::from("notes/body.md"))
        );
    }

    #[test]
    fn test_read_file_exact_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("body.tmpl");
        fs::write(&path, "line one\n\nline two\n").unwrap();

        let content = StdInput.read(&TemplateSource::File(path)).unwrap();
        assert_eq!(content, "line one\n\nline two\n");
    }

    #[test]
    fn test_has_data_for_files() {
        let dir = TempDir::new().unwrap();
        let empty = dir.path().join("empty");
        let filled = dir.path().join("filled");
        fs::write(&empty, "").unwrap();
        fs::write(&filled, "body").unwrap();

        assert!(!has_data(&fs::metadata(&empty).unwrap()));
        assert!(has_data(&fs::metadata(&filled).unwrap()));
    }

    #[cfg(unix)]
    #[test]
    fn test_has_data_for_pipe_and_dev_null() {
        use std::os::fd::OwnedFd;
        use std::process::{Command, Stdio};

        assert!(!has_data(&fs::metadata("/dev/null").unwrap()));

        let mut child = Command::new("true")
            .stdout(Stdio::piped())
            .spawn()
            .unwrap();
        let stdout = child.stdout.take().unwrap();
        let pipe = fs::File::from(OwnedFd::from(stdout));
        assert!(has_data(&pipe.metadata().unwrap()));
        child.wait().unwrap();
    }

    #[test]
    fn test_read_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let result = StdInput.read(&TemplateSource::File(dir.path().join("missing.tmpl")));
        assert_eq!(result.unwrap_err().kind(), std::io::ErrorKind::NotFound);
    }
}
