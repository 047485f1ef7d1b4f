use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

use super::{CommandLine, Executor};

/// A `major.minor.patch` tool version, ordered lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ToolVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

/// The oldest supported samtools; assumed whenever probing fails.
pub const BASELINE: ToolVersion = ToolVersion::new(0, 1, 19);

lazy_static! {
    static ref RE_VERSION: Regex = Regex::new(r"(\d+)(?:\.(\d+))?(?:\.(\d+))?").unwrap();
}

impl ToolVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl FromStr for ToolVersion {
    type Err = anyhow::Error;

    /// Parses the first dotted number in `s`. Missing minor or patch components are zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = RE_VERSION
            .captures(s)
            .ok_or_else(|| anyhow::anyhow!("no version number in `{}`", s))?;
        let part = |i: usize| -> anyhow::Result<u32> {
            match caps.get(i) {
                Some(m) => Ok(m.as_str().parse::<u32>()?),
                None => Ok(0),
            }
        };
        Ok(Self::new(part(1)?, part(2)?, part(3)?))
    }
}

impl fmt::Display for ToolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Outcome of a version probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    Probed(ToolVersion),
    /// The tool could not tell us; callers use [`BASELINE`].
    Unknown { reason: String },
}

impl Probe {
    pub fn version(&self) -> ToolVersion {
        match self {
            Probe::Probed(v) => *v,
            Probe::Unknown { .. } => BASELINE,
        }
    }

    pub fn uses_baseline(&self) -> bool {
        matches!(self, Probe::Unknown { .. })
    }
}

/// Extracts the version from the first line of `<tool> --version`.
///
/// The line must mention the tool by name; the number after the name is parsed.
///
/// ```
/// use pbalign::libs::tool::{parse_version_line, ToolVersion};
///
/// assert_eq!(parse_version_line("samtools", "samtools 1.3.1"), Some(ToolVersion::new(1, 3, 1)));
/// assert_eq!(parse_version_line("samtools", "Program: bwa"), None);
/// ```
pub fn parse_version_line(tool: &str, line: &str) -> Option<ToolVersion> {
    let pos = line.find(tool)?;
    line[pos + tool.len()..].parse::<ToolVersion>().ok()
}

/// Asks `tool` for its version. Never fails: anything unexpected yields [`Probe::Unknown`].
pub fn probe(executor: &dyn Executor, tool: &str) -> Probe {
    let cmd = CommandLine::new(tool).arg("--version");

    // A non-zero exit is tolerated; old samtools prints usage and fails on --version
    let output = match executor.execute(&cmd) {
        Ok(output) => output,
        Err(e) => {
            return Probe::Unknown {
                reason: format!("`{}` could not be run: {}", cmd, e),
            }
        }
    };

    let first = output.stdout.lines().next().unwrap_or("").trim();
    match parse_version_line(tool, first) {
        Some(version) => {
            log::debug!("{} version {}", tool, version);
            Probe::Probed(version)
        }
        None => Probe::Unknown {
            reason: format!("unexpected `{}` output: {:?}", cmd, first),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::tool::CommandOutput;
    use std::io;

    struct Canned(io::Result<CommandOutput>);

    impl Executor for Canned {
        fn execute(&self, _cmd: &CommandLine) -> io::Result<CommandOutput> {
            match &self.0 {
                Ok(out) => Ok(out.clone()),
                Err(e) => Err(io::Error::new(e.kind(), e.to_string())),
            }
        }
    }

    fn stdout(text: &str, status: i32) -> Canned {
        Canned(Ok(CommandOutput {
            status: Some(status),
            stdout: text.to_string(),
            stderr: String::new(),
        }))
    }

    #[test]
    fn parse_versions() {
        assert_eq!("1.3.1".parse::<ToolVersion>().unwrap(), ToolVersion::new(1, 3, 1));
        assert_eq!(" 1.10".parse::<ToolVersion>().unwrap(), ToolVersion::new(1, 10, 0));
        assert_eq!("0.1.19-44428cd".parse::<ToolVersion>().unwrap(), BASELINE);
        assert!("".parse::<ToolVersion>().is_err());
        assert!("99999999999.1".parse::<ToolVersion>().is_err());
    }

    #[test]
    fn ordering_is_lexicographic() {
        assert!(ToolVersion::new(1, 2, 0) < ToolVersion::new(1, 10, 0));
        assert!(ToolVersion::new(0, 9, 99) < ToolVersion::new(1, 0, 0));
        assert!(BASELINE < ToolVersion::new(1, 0, 0));
    }

    #[test]
    fn probe_reads_first_line() {
        let exec = stdout("samtools 1.3.1\nUsing htslib 1.3.1\n", 0);
        assert_eq!(probe(&exec, "samtools"), Probe::Probed(ToolVersion::new(1, 3, 1)));
    }

    #[test]
    fn probe_falls_back_to_baseline() {
        // samtools 0.1.x has no --version and prints usage to stderr
        let exec = stdout("", 1);
        let p = probe(&exec, "samtools");
        assert!(p.uses_baseline());
        assert_eq!(p.version(), BASELINE);

        let exec = stdout("Program: pbindex\n", 0);
        assert!(probe(&exec, "samtools").uses_baseline());

        let exec = Canned(Err(io::Error::new(io::ErrorKind::NotFound, "gone")));
        let p = probe(&exec, "samtools");
        assert_eq!(p.version(), BASELINE);
        match p {
            Probe::Unknown { reason } => assert!(reason.contains("could not be run")),
            _ => unreachable!(),
        }
    }

    #[test]
    fn probe_accepts_failing_exit_with_version() {
        let exec = stdout("samtools 1.2\n", 1);
        assert_eq!(probe(&exec, "samtools").version(), ToolVersion::new(1, 2, 0));
    }
}
