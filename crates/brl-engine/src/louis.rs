// liblouis n'est pas lié : ce module lance `lou_translate` via subprocess
// (std::process::Command), comme ffmpeg ailleurs.
// Prérequis : `lou_translate` accessible dans PATH (paquet liblouis-bin),
// ou chemin explicite dans [engine].program.
//
// Protocole :
//   - `lou_translate --forward|--backward <tables>` lit stdin ligne à ligne
//   - une ligne de sortie par ligne d'entrée sur stdout
//   - code de sortie non nul si une table ne compile pas (message sur stderr)

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use brl_core::config::BrailleConfig;
use brl_core::error::EngineError;
use brl_core::traits::{BrailleEngine, Direction};

/// Environment variable liblouis reads its table search path from.
pub const TABLE_PATH_VAR: &str = "LOUIS_TABLEPATH";

/// liblouis through its `lou_translate` command-line tool.
///
/// One process per call, awaited to completion. No timeout: a hung engine
/// hangs the caller.
///
/// # Example
/// ```no_run
/// use brl_core::traits::{BrailleEngine, Direction};
/// use brl_engine::LouTranslate;
/// let engine = LouTranslate::new("lou_translate").with_table_dir("tables");
/// let out = engine.translate("hello", "unicode.dis,en-us-g1.ctb", Direction::Forward).unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct LouTranslate {
    program: PathBuf,
    table_dir: Option<PathBuf>,
}

impl LouTranslate {
    /// Engine running `program` with liblouis' default table path.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            table_dir: None,
        }
    }

    /// Export `dir` as `LOUIS_TABLEPATH` to every engine process.
    #[must_use]
    pub fn with_table_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.table_dir = Some(dir.into());
        self
    }

    /// Engine described by the `[engine]` section.
    #[must_use]
    pub fn from_config(config: &BrailleConfig) -> Self {
        let engine = Self::new(&config.engine_program);
        match &config.table_dir {
            Some(dir) => engine.with_table_dir(dir),
            None => engine,
        }
    }

    /// Program launched for each call.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// First line of `lou_translate --version`, to check the engine is reachable.
    ///
    /// # Errors
    /// [`EngineError::Spawn`] if the program cannot be started,
    /// [`EngineError::Unavailable`] on a non-zero exit.
    pub fn version(&self) -> Result<String, EngineError> {
        let output = self
            .command()
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| self.spawn_error(source))?;
        if !output.status.success() {
            return Err(EngineError::Unavailable {
                program: self.program.display().to_string(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        let text = String::from_utf8(output.stdout)?;
        Ok(text.lines().next().unwrap_or_default().trim().to_string())
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        if let Some(dir) = &self.table_dir {
            cmd.env(TABLE_PATH_VAR, dir);
        }
        cmd
    }

    fn spawn_error(&self, source: std::io::Error) -> EngineError {
        EngineError::Spawn {
            program: self.program.display().to_string(),
            source,
        }
    }
}

impl BrailleEngine for LouTranslate {
    fn translate(
        &self,
        input: &str,
        table: &str,
        direction: Direction,
    ) -> Result<String, EngineError> {
        let flag = match direction {
            Direction::Forward => "--forward",
            Direction::Backward => "--backward",
        };

        let mut child = self
            .command()
            .args([flag, table])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| self.spawn_error(source))?;

        log::debug!(
            "{} {flag} {table} ({} octets)",
            self.program.display(),
            input.len()
        );

        // stdin est écrit depuis un thread : le moteur peut remplir stdout
        // avant d'avoir tout lu.
        let mut payload = input.as_bytes().to_vec();
        if !input.ends_with('\n') {
            payload.push(b'\n');
        }
        let writer = child.stdin.take().map(|mut stdin| {
            thread::spawn(move || stdin.write_all(&payload))
        });

        let output = child.wait_with_output()?;

        if let Some(handle) = writer {
            match handle.join() {
                Ok(Err(e)) if e.kind() != std::io::ErrorKind::BrokenPipe => {
                    return Err(EngineError::Io(e));
                }
                // BrokenPipe: the engine quit early, its exit status says why.
                _ => {}
            }
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !output.status.success() {
            return Err(EngineError::Failed {
                table: table.to_string(),
                code: output.status.code(),
                stderr,
            });
        }
        if !stderr.is_empty() {
            log::warn!("lou_translate ({table}) : {stderr}");
        }

        let mut text = String::from_utf8(output.stdout)?;
        if text.ends_with('\n') {
            text.pop();
            if text.ends_with('\r') {
                text.pop();
            }
        }

        if text.is_empty() && !input.trim().is_empty() {
            return Err(EngineError::EmptyOutput {
                table: table.to_string(),
            });
        }
        Ok(text)
    }

    fn name(&self) -> &'static str {
        "lou_translate"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_is_a_spawn_error() {
        let engine = LouTranslate::new("/nonexistent/bin/lou_translate");
        let err = engine
            .translate("hello", "en-us-g1.ctb", Direction::Forward)
            .unwrap_err();
        assert!(matches!(err, EngineError::Spawn { .. }));
        assert!(!err.is_table_failure());
        assert!(matches!(engine.version(), Err(EngineError::Spawn { .. })));
    }

    #[test]
    fn from_config_carries_table_dir() {
        let config = BrailleConfig {
            table_dir: Some(PathBuf::from("/opt/louis/tables")),
            ..BrailleConfig::default()
        };
        let engine = LouTranslate::from_config(&config);
        assert_eq!(engine.program(), Path::new("lou_translate"));
        assert_eq!(
            engine.table_dir.as_deref(),
            Some(Path::new("/opt/louis/tables"))
        );
    }

    /// Stub `lou_translate` scripts. All scripts are written before the
    /// first spawn so no test forks while a script is still open for writing.
    #[cfg(unix)]
    #[test]
    fn stub_engine_protocol() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let write = |name: &str, body: &str| {
            let path = dir.path().join(name);
            std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        };
        let echo_args = write("echo_args", r#"printf '%s|%s|' "$1" "$2"; cat"#);
        let failing = write("failing", "echo 'Cannot compile table' >&2; exit 3");
        let silent = write("silent", "cat >/dev/null");
        let table_path = write("table_path", r#"cat >/dev/null; printf '%s\n' "$LOUIS_TABLEPATH""#);

        let out = LouTranslate::new(&echo_args)
            .translate("hello", "unicode.dis,en-us-g1.ctb", Direction::Forward)
            .unwrap();
        assert_eq!(out, "--forward|unicode.dis,en-us-g1.ctb|hello");

        let out = LouTranslate::new(&echo_args)
            .translate("⠓⠊\n⠕", "en-us-g1.ctb", Direction::Backward)
            .unwrap();
        assert_eq!(out, "--backward|en-us-g1.ctb|⠓⠊\n⠕");

        let err = LouTranslate::new(&failing)
            .translate("hello", "missing.ctb", Direction::Forward)
            .unwrap_err();
        match err {
            EngineError::Failed {
                table,
                code,
                stderr,
            } => {
                assert_eq!(table, "missing.ctb");
                assert_eq!(code, Some(3));
                assert_eq!(stderr, "Cannot compile table");
            }
            other => panic!("attendu Failed, obtenu {other:?}"),
        }

        let err = LouTranslate::new(&failing).version().unwrap_err();
        assert!(matches!(err, EngineError::Unavailable { code: Some(3), .. }));
        assert!(!err.is_table_failure());
        assert!(err.to_string().contains(&failing.display().to_string()));

        let err = LouTranslate::new(&silent)
            .translate("hello", "en-us-g2.ctb", Direction::Forward)
            .unwrap_err();
        assert!(matches!(err, EngineError::EmptyOutput { .. }));
        assert!(err.is_table_failure());

        let out = LouTranslate::new(&table_path)
            .with_table_dir("/srv/tables")
            .translate("x", "t", Direction::Forward)
            .unwrap();
        assert_eq!(out, "/srv/tables");
    }
}
