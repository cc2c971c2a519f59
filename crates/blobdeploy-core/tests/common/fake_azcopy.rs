//! Shell-script stand-in for azcopy used by integration tests.
//!
//! The script appends its argument list to a log file (one invocation per
//! line), echoes it to stdout, and exits with the code configured for its
//! subcommand.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

pub struct FakeAzCopy {
    pub program: PathBuf,
    pub log: PathBuf,
}

impl FakeAzCopy {
    /// Installs the script under `dir`. `failing` lists subcommands that exit 1.
    pub fn install(dir: &Path, failing: &[&str]) -> Self {
        let program = dir.join("fake-azcopy");
        let log = dir.join("azcopy.log");
        let mut cases = String::new();
        for sub in failing {
            cases.push_str(&format!("  {sub}) exit 1 ;;\n"));
        }
        let script = format!(
            "#!/bin/sh\nprintf '%s\\n' \"$*\" >> '{}'\necho \"INFO: $*\"\ncase \"$1\" in\n{}esac\nexit 0\n",
            log.display(),
            cases
        );
        fs::write(&program, script).unwrap();
        fs::set_permissions(&program, fs::Permissions::from_mode(0o755)).unwrap();
        Self { program, log }
    }

    /// Logged invocations, one argument string per call.
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}
