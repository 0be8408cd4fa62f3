use std::{
    io::{self, ErrorKind, Write},
    path::Path,
    process::{Command, Output, Stdio},
    thread,
    time::Instant,
};

use tracing::{debug, warn};

use crate::domain::{CommandLine, RenderError};

/// Run `command` to completion, optionally in `cwd` and feeding `input` on stdin.
///
/// Stdout and stderr are always captured. Unless `quiet`, captured stderr is
/// forwarded to this process's stderr. A non-zero or signal exit is an error.
pub fn run_check(
    command: &CommandLine,
    cwd: Option<&Path>,
    input: Option<&[u8]>,
    quiet: bool,
) -> Result<Output, RenderError> {
    let started_at = Instant::now();
    debug!(
        target = "infra::execute",
        op = "execute::run_check",
        command = %command,
        cwd = ?cwd.map(Path::display),
        "Running layout command"
    );

    let mut process = Command::new(command.program());
    process
        .args(command.args())
        .stdin(if input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = cwd {
        process.current_dir(dir);
    }

    let mut child = process.spawn().map_err(|err| {
        warn!(
            target = "infra::execute",
            op = "execute::run_check",
            result = "error",
            elapsed_ms = started_at.elapsed().as_millis() as u64,
            error_code = "spawn",
            error = %err,
            "Failed to spawn layout command"
        );
        if err.kind() == ErrorKind::NotFound {
            RenderError::ExecutableNotFound {
                command: command.clone(),
                source: err,
            }
        } else {
            RenderError::Io {
                command: command.clone(),
                source: err,
            }
        }
    })?;

    // Stdin is written from a scoped thread so a full stdout pipe cannot deadlock the write.
    let (output, written) = thread::scope(|scope| {
        let writer = match (input, child.stdin.take()) {
            (Some(data), Some(mut stdin)) => Some(scope.spawn(move || -> io::Result<()> {
                match stdin.write_all(data) {
                    Err(err) if err.kind() == ErrorKind::BrokenPipe => Ok(()),
                    other => other,
                }
            })),
            _ => None,
        };
        let output = child.wait_with_output();
        let written = writer.map(|handle| {
            handle
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")))
        });
        (output, written)
    });

    let output = output.map_err(|err| RenderError::Io {
        command: command.clone(),
        source: err,
    })?;

    if let Some(Err(err)) = written {
        if output.status.success() {
            return Err(RenderError::Io {
                command: command.clone(),
                source: err,
            });
        }
    }

    if !quiet && !output.stderr.is_empty() {
        forward_stderr(&output.stderr);
    }

    if !output.status.success() {
        let exit_code = output.status.code();
        let exit_code_value = exit_code.map(i64::from).unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if quiet {
            warn!(
                target = "infra::execute",
                op = "execute::run_check",
                result = "error",
                elapsed_ms = started_at.elapsed().as_millis() as u64,
                exit_code = exit_code_value,
                error_code = "layout_command",
                command = %command,
                "Layout command failed"
            );
        } else {
            warn!(
                target = "infra::execute",
                op = "execute::run_check",
                result = "error",
                elapsed_ms = started_at.elapsed().as_millis() as u64,
                exit_code = exit_code_value,
                error_code = "layout_command",
                command = %command,
                stderr = %stderr,
                "Layout command failed"
            );
        }
        return Err(RenderError::Process {
            command: command.clone(),
            exit_code,
            stderr,
        });
    }

    debug!(
        target = "infra::execute",
        op = "execute::run_check",
        result = "ok",
        elapsed_ms = started_at.elapsed().as_millis() as u64,
        stdout_bytes = output.stdout.len(),
        "Layout command finished"
    );

    Ok(output)
}

fn forward_stderr(stderr: &[u8]) {
    let mut handle = io::stderr().lock();
    let _ = handle.write_all(stderr);
    let _ = handle.flush();
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::{fs, os::unix::fs::PermissionsExt, path::PathBuf};
    use tempfile::TempDir;

    fn script(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}")).expect("write script");
        let mut perms = fs::metadata(&path).expect("metadata").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).expect("set perms");
        path
    }

    fn command_for(program: &Path, args: &[&str]) -> CommandLine {
        let mut tokens = vec![program.display().to_string()];
        tokens.extend(args.iter().map(|arg| arg.to_string()));
        CommandLine::from(tokens)
    }

    #[test]
    fn captures_stdout_and_passes_arguments() {
        let dir = TempDir::new().expect("temp dir");
        let program = script(&dir, "echo-args", "echo \"$@\"\n");

        let output =
            run_check(&command_for(&program, &["-Kdot", "-Tsvg"]), None, None, true).expect("ok");
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "-Kdot -Tsvg");
    }

    #[test]
    fn runs_in_requested_directory() {
        let dir = TempDir::new().expect("temp dir");
        let work = dir.path().join("work");
        fs::create_dir(&work).expect("mkdir");
        let program = script(&dir, "pwd-tool", "pwd\n");

        let output = run_check(&command_for(&program, &[]), Some(&work), None, true).expect("ok");
        let reported = PathBuf::from(String::from_utf8_lossy(&output.stdout).trim());
        assert_eq!(
            fs::canonicalize(reported).expect("canonical"),
            fs::canonicalize(&work).expect("canonical")
        );
    }

    #[test]
    fn feeds_stdin() {
        let dir = TempDir::new().expect("temp dir");
        let program = script(&dir, "cat-tool", "cat\n");

        let output = run_check(
            &command_for(&program, &[]),
            None,
            Some(b"graph { a -- b }"),
            true,
        )
        .expect("ok");
        assert_eq!(output.stdout, b"graph { a -- b }");
    }

    #[test]
    fn input_larger_than_pipe_buffer_round_trips() {
        let dir = TempDir::new().expect("temp dir");
        let program = script(&dir, "cat-tool", "cat\n");
        let input = b"a -- b;\n".repeat(256 * 1024);

        let output =
            run_check(&command_for(&program, &[]), None, Some(input.as_slice()), true)
                .expect("ok");
        assert_eq!(output.stdout.len(), input.len());
        assert!(output.stdout == input);
    }

    #[test]
    fn non_zero_exit_carries_code_and_stderr() {
        let dir = TempDir::new().expect("temp dir");
        let program = script(&dir, "failing", "echo \"boom\" >&2\nexit 42\n");

        for quiet in [false, true] {
            let err = run_check(&command_for(&program, &["-Tsvg"]), None, None, quiet)
                .expect_err("expected failure");
            match err {
                RenderError::Process {
                    command,
                    exit_code,
                    stderr,
                } => {
                    assert_eq!(exit_code, Some(42));
                    assert!(stderr.contains("boom"), "stderr did not propagate: {stderr}");
                    assert_eq!(command.args(), ["-Tsvg"]);
                }
                other => panic!("unexpected error variant: {other:?}"),
            }
        }
    }

    #[test]
    fn killed_process_is_a_process_error() {
        let dir = TempDir::new().expect("temp dir");
        let program = script(&dir, "killed", "kill -9 $$\n");

        let err = run_check(&command_for(&program, &[]), None, None, true)
            .expect_err("expected failure");
        assert!(matches!(err, RenderError::Process { exit_code: None, .. }));
    }

    #[test]
    fn missing_executable_is_distinct() {
        let dir = TempDir::new().expect("temp dir");
        let program = dir.path().join("does-not-exist");

        let err = run_check(&command_for(&program, &["-V"]), None, None, true)
            .expect_err("expected failure");
        assert!(matches!(err, RenderError::ExecutableNotFound { .. }));
        assert!(!err.is_caller_error());
    }
}
