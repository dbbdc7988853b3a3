//! Tesseract process client implementation.

use std::io::ErrorKind;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};

use crate::tsv::TsvPage;
use crate::{Error, Result, TESSERACT_TARGET, TsConfig};

/// Markers tesseract prints when trained data for a language is missing.
const MISSING_LANGUAGE_MARKERS: [&str; 2] = ["Failed loading language", "Error opening data file"];

/// Runs the `tesseract` binary, one process per image.
///
/// The child process is killed when the returned future is dropped, so an
/// outer timeout stops the work as well as the wait.
#[derive(Debug, Clone)]
pub struct TsClient {
    config: TsConfig,
}

impl TsClient {
    /// Create a new client with the given configuration.
    pub fn new(config: TsConfig) -> Self {
        tracing::debug!(
            target: TESSERACT_TARGET,
            binary = %config.binary().display(),
            tessdata_prefix = ?config.tessdata_prefix(),
            "Tesseract client initialized"
        );

        Self { config }
    }

    /// Get a reference to the client configuration.
    pub fn config(&self) -> &TsConfig {
        &self.config
    }

    fn command(&self) -> Command {
        let mut command = Command::new(self.config.binary());
        if let Some(prefix) = self.config.tessdata_prefix() {
            command.env("TESSDATA_PREFIX", prefix);
        }
        command.kill_on_drop(true);
        command
    }

    fn spawn(&self, command: &mut Command) -> Result<Child> {
        command.spawn().map_err(|source| Error::Spawn {
            binary: self.config.binary().display().to_string(),
            source,
        })
    }

    /// Recognize text in an encoded image.
    ///
    /// Every line tesseract writes to stderr is passed to `on_stderr` as it
    /// arrives.
    pub async fn recognize(
        &self,
        image: &[u8],
        language: &str,
        mut on_stderr: impl FnMut(&str) + Send,
    ) -> Result<TsvPage> {
        let mut command = self.command();
        command
            .args(self.config.recognize_args(language))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = self.spawn(&mut command)?;
        let (Some(mut stdin), Some(mut stdout), Some(stderr)) =
            (child.stdin.take(), child.stdout.take(), child.stderr.take())
        else {
            return Err(Error::Io(std::io::Error::other("process pipes unavailable")));
        };

        let write = async move {
            // Tesseract may exit before reading everything; its exit status
            // carries the real error.
            match stdin.write_all(image).await {
                Err(e) if e.kind() != ErrorKind::BrokenPipe => return Err(e),
                _ => {}
            }
            drop(stdin);
            Ok::<_, std::io::Error>(())
        };

        let read_stdout = async move {
            let mut output = String::new();
            stdout.read_to_string(&mut output).await?;
            Ok::<_, std::io::Error>(output)
        };

        let read_stderr = async {
            let mut lines = BufReader::new(stderr).lines();
            let mut captured = Vec::new();
            while let Some(line) = lines.next_line().await? {
                let line = line.trim().to_owned();
                if !line.is_empty() {
                    on_stderr(&line);
                    captured.push(line);
                }
            }
            Ok::<_, std::io::Error>(captured)
        };

        let ((), output, stderr) = tokio::try_join!(write, read_stdout, read_stderr)?;
        let status = child.wait().await?;

        if !status.success() {
            let stderr = stderr.join("\n");
            tracing::warn!(
                target: TESSERACT_TARGET,
                code = ?status.code(),
                language = language,
                stderr = %stderr,
                "Tesseract exited unsuccessfully"
            );

            if MISSING_LANGUAGE_MARKERS.iter().any(|m| stderr.contains(m)) {
                return Err(Error::MissingLanguage {
                    language: language.to_owned(),
                });
            }
            return Err(Error::Exit {
                code: status.code(),
                stderr,
            });
        }

        TsvPage::parse(&output)
    }

    /// Run `tesseract --version` and return the first line of its output.
    pub async fn version(&self) -> Result<String> {
        let mut command = self.command();
        command
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let output = self.spawn(&mut command)?.wait_with_output().await?;
        if !output.status.success() {
            return Err(Error::Exit {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        // Older releases print the version banner to stderr.
        let text = if output.stdout.is_empty() {
            output.stderr
        } else {
            output.stdout
        };

        Ok(String::from_utf8_lossy(&text)
            .lines()
            .next()
            .unwrap_or_default()
            .trim()
            .to_owned())
    }
}

#[cfg(all(test, unix))]
pub(crate) mod tests {
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};
    use std::sync::OnceLock;

    use tempfile::TempDir;

    use super::*;

    /// Shell scripts standing in for the tesseract binary.
    ///
    /// All scripts are written once, before any test spawns a process, so
    /// no child can inherit a script's write handle.
    pub(crate) struct FakeBinaries {
        dir: TempDir,
    }

    impl FakeBinaries {
        pub(crate) fn path(&self, name: &str) -> PathBuf {
            self.dir.path().join(name)
        }
    }

    const SCRIPTS: [(&str, &str); 4] = [
        (
            "ok",
            "#!/bin/sh\n\
             cat > /dev/null\n\
             echo 'Estimating resolution as 300' >&2\n\
             printf 'level\\tpage_num\\tblock_num\\tpar_num\\tline_num\\tword_num\\tleft\\ttop\\twidth\\theight\\tconf\\ttext\\n'\n\
             printf '5\\t1\\t1\\t1\\t1\\t1\\t0\\t0\\t10\\t10\\t90\\thello\\n'\n\
             printf '5\\t1\\t1\\t1\\t1\\t2\\t0\\t0\\t10\\t10\\t70\\t%s\\n' \"$4\"\n",
        ),
        (
            "nolang",
            "#!/bin/sh\n\
             echo \"Error opening data file /usr/share/tessdata/$4.traineddata\" >&2\n\
             echo \"Failed loading language '$4'\" >&2\n\
             exit 1\n",
        ),
        ("crash", "#!/bin/sh\ncat > /dev/null\necho 'segfault' >&2\nexit 139\n"),
        (
            "version",
            "#!/bin/sh\necho 'tesseract 5.3.0'\necho ' leptonica-1.82.0'\n",
        ),
    ];

    pub(crate) fn fake_binaries() -> &'static FakeBinaries {
        static BINARIES: OnceLock<FakeBinaries> = OnceLock::new();
        BINARIES.get_or_init(|| {
            let dir = tempfile::tempdir().unwrap();
            for (name, body) in SCRIPTS {
                let path = dir.path().join(name);
                std::fs::write(&path, body).unwrap();
                std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            }
            FakeBinaries { dir }
        })
    }

    fn client(binary: &Path) -> TsClient {
        TsClient::new(TsConfig::new(binary))
    }

    #[tokio::test]
    async fn test_recognize_parses_tsv() {
        let bins = fake_binaries();
        let mut stderr = Vec::new();

        let page = client(&bins.path("ok"))
            .recognize(b"image bytes", "deu", |line| stderr.push(line.to_owned()))
            .await
            .unwrap();

        assert_eq!(page.text(), "hello deu");
        assert_eq!(page.confidence(), 80.0);
        assert_eq!(stderr, ["Estimating resolution as 300"]);
    }

    #[tokio::test]
    async fn test_missing_language() {
        let bins = fake_binaries();
        let error = client(&bins.path("nolang"))
            .recognize(b"image bytes", "xyz", |_| {})
            .await
            .unwrap_err();

        assert!(matches!(error, Error::MissingLanguage { ref language } if language == "xyz"));
    }

    #[tokio::test]
    async fn test_nonzero_exit() {
        let bins = fake_binaries();
        let error = client(&bins.path("crash"))
            .recognize(b"image bytes", "eng", |_| {})
            .await
            .unwrap_err();

        assert!(matches!(error, Error::Exit { code: Some(139), .. }));
    }

    #[tokio::test]
    async fn test_missing_binary() {
        let bins = fake_binaries();
        let error = client(&bins.path("does-not-exist"))
            .recognize(b"image bytes", "eng", |_| {})
            .await
            .unwrap_err();

        assert!(matches!(error, Error::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_version() {
        let bins = fake_binaries();
        let version = client(&bins.path("version")).version().await.unwrap();
        assert_eq!(version, "tesseract 5.3.0");
    }
}
