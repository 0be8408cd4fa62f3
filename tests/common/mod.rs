#![allow(dead_code)]

use std::{
    fs,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
};

use tempfile::TempDir;

/// Stand-in for Graphviz `dot`.
///
/// Records its arguments and working directory next to itself, writes `-O`
/// outputs under dot's own naming scheme, honours `-o<file>`, and echoes stdin
/// when no input file is given. Successful runs print `FAKE_WARNING` on stderr;
/// sources containing `FAIL` exit with status 1.
const FAKE_DOT: &str = r#"#!/bin/sh
set -eu
here="$(cd "$(dirname "$0")" && pwd)"
echo "$@" > "$here/args.log"
pwd > "$here/cwd.log"

fmt=""
out=""
auto=0
input=""
for arg in "$@"; do
  case "$arg" in
    -T*) fmt="${arg#-T}" ;;
    -O) auto=1 ;;
    -o*) out="${arg#-o}" ;;
    -K*|-n*) ;;
    *) input="$arg" ;;
  esac
done

format="${fmt%%:*}"

if [ -z "$input" ]; then
  data="$(cat)"
  case "$data" in
    *FAIL*) echo "Error: <stdin>: syntax error in line 1" >&2; exit 1 ;;
  esac
  echo "warning: fake layout" >&2
  case "$format" in
    svg) printf '<svg engine-input="%s"/>' "$data" ;;
    png) printf '\211PNG%s' "$data" ;;
    jpeg|jpg) printf '\377\330\377%s' "$data" ;;
    *) printf '%s' "$data" ;;
  esac
  exit 0
fi

if [ ! -f "$input" ]; then
  echo "Error: dot: can't open $input" >&2
  exit 2
fi
if grep -q FAIL "$input"; then
  echo "Error: $input: syntax error in line 1" >&2
  exit 1
fi

if [ "$auto" -eq 1 ]; then
  suffix="$(echo "$fmt" | awk -F: '{ for (i = NF; i > 0; i--) printf "%s%s", $i, (i > 1 ? "." : "") }')"
  out="$input.$suffix"
fi
echo "warning: fake layout" >&2
printf 'rendered %s\n' "$fmt" > "$out"
"#;

pub struct FakeDot {
    dir: TempDir,
    pub program: PathBuf,
}

impl FakeDot {
    pub fn install() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let program = dir.path().join("bin").join("dot");
        fs::create_dir_all(program.parent().expect("bin dir")).expect("create bin dir");
        fs::write(&program, FAKE_DOT).expect("write fake dot");
        let mut perms = fs::metadata(&program).expect("metadata").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&program, perms).expect("set perms");
        Self { dir, program }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write `text` to `relative` under the temp root and return its path.
    pub fn source(&self, relative: &str, text: &str) -> PathBuf {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create source dir");
        }
        fs::write(&path, text).expect("write source");
        path
    }

    pub fn was_invoked(&self) -> bool {
        self.log_path("args.log").exists()
    }

    pub fn last_args(&self) -> String {
        fs::read_to_string(self.log_path("args.log"))
            .expect("read args log")
            .trim()
            .to_string()
    }

    pub fn last_cwd(&self) -> PathBuf {
        let cwd = fs::read_to_string(self.log_path("cwd.log")).expect("read cwd log");
        fs::canonicalize(cwd.trim()).expect("canonical cwd")
    }

    fn log_path(&self, name: &str) -> PathBuf {
        self.program
            .parent()
            .expect("bin dir")
            .join(name)
    }
}

pub const FAKE_WARNING: &str = "warning: fake layout";

pub const HELLO: &str = "digraph { hello -> world }\n";
