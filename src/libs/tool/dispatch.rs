//! Version-dependent command construction.
//!
//! Each operation owns an ordered rule table. The first rule whose predicate accepts the probed
//! version builds the command; the last rule of every table accepts anything. Adding support for
//! a new tool release means adding a row.

use std::fmt;
use std::path::{Path, PathBuf};

use super::{CommandLine, ToolVersion};
use crate::libs::error::Error;

/// Memory per sort thread handed to `samtools sort -m`.
pub const SORT_MEMORY: &str = "768M";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `samtools sort`
    Sort,
    /// `samtools index`, writes `.bai`
    Index,
    /// `pbindex`, writes `.pbi`
    SecondaryIndex,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Sort => "sort",
            Operation::Index => "index",
            Operation::SecondaryIndex => "secondary index",
        };
        write!(f, "{}", name)
    }
}

/// Inputs to a command template.
#[derive(Debug, Clone, Copy)]
pub struct StageParams<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    /// Overall process budget of the run.
    pub nproc: usize,
}

/// One row of a dispatch table.
pub struct Rule {
    /// Short name of the command shape, reported in dry runs and logs.
    pub form: &'static str,
    /// The tool names its output `<input><suffix>` on its own.
    pub fixed_output: bool,
    pub applies: fn(&ToolVersion) -> bool,
    pub build: fn(&StageParams) -> CommandLine,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("form", &self.form).finish()
    }
}

fn any_version(_: &ToolVersion) -> bool {
    true
}

fn major_at_least_1(v: &ToolVersion) -> bool {
    v.major >= 1
}

// samtools 1.2 only accepts `index <in.bam>` and derives the .bai name itself
fn exactly_1_2(v: &ToolVersion) -> bool {
    v.major == 1 && v.minor == 2
}

static SORT_RULES: [Rule; 2] = [
    Rule {
        form: "sort-direct",
        fixed_output: false,
        applies: major_at_least_1,
        build: sort_direct,
    },
    Rule {
        form: "sort-prefix",
        fixed_output: false,
        applies: any_version,
        build: sort_prefix,
    },
];

static INDEX_RULES: [Rule; 2] = [
    Rule {
        form: "index-inferred",
        fixed_output: true,
        applies: exactly_1_2,
        build: index_inferred,
    },
    Rule {
        form: "index-explicit",
        fixed_output: false,
        applies: any_version,
        build: index_explicit,
    },
];

static SECONDARY_INDEX_RULES: [Rule; 1] = [Rule {
    form: "pbindex",
    fixed_output: true,
    applies: any_version,
    build: pbindex,
}];

/// Threads for `samtools sort`: a quarter of the process budget, at least one.
pub fn sort_threads(nproc: usize) -> usize {
    std::cmp::max(1, nproc / 4)
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn sort_direct(p: &StageParams) -> CommandLine {
    CommandLine::new("samtools")
        .arg("sort")
        .arg("--threads")
        .arg(sort_threads(p.nproc).to_string())
        .args(["-m", SORT_MEMORY])
        .arg("-o")
        .arg(path_str(p.output))
        .arg(path_str(p.input))
}

// samtools 0.1.x takes an output prefix and appends .bam on its own
fn sort_prefix(p: &StageParams) -> CommandLine {
    let output = path_str(p.output);
    let prefix = output
        .strip_suffix(Operation::Sort.output_suffix())
        .unwrap_or(&output)
        .to_string();

    CommandLine::new("samtools")
        .arg("sort")
        .arg("--threads")
        .arg(sort_threads(p.nproc).to_string())
        .args(["-m", SORT_MEMORY])
        .arg(path_str(p.input))
        .arg(prefix)
}

fn index_inferred(p: &StageParams) -> CommandLine {
    CommandLine::new("samtools")
        .arg("index")
        .arg(path_str(p.input))
}

fn index_explicit(p: &StageParams) -> CommandLine {
    CommandLine::new("samtools")
        .arg("index")
        .arg(path_str(p.input))
        .arg(path_str(p.output))
}

fn pbindex(p: &StageParams) -> CommandLine {
    CommandLine::new("pbindex").arg(path_str(p.input))
}

impl Operation {
    /// The external program this operation runs.
    pub fn tool(&self) -> &'static str {
        match self {
            Operation::Sort | Operation::Index => "samtools",
            Operation::SecondaryIndex => "pbindex",
        }
    }

    /// Suffix the declared output must carry.
    pub fn output_suffix(&self) -> &'static str {
        match self {
            Operation::Sort => ".bam",
            Operation::Index => ".bai",
            Operation::SecondaryIndex => ".pbi",
        }
    }

    pub fn rules(&self) -> &'static [Rule] {
        match self {
            Operation::Sort => &SORT_RULES,
            Operation::Index => &INDEX_RULES,
            Operation::SecondaryIndex => &SECONDARY_INDEX_RULES,
        }
    }

    /// Whether the command shape can differ between tool versions.
    pub fn is_version_sensitive(&self) -> bool {
        self.rules().len() > 1
    }

    pub fn check_output(&self, output: &Path) -> Result<(), Error> {
        let suffix = self.output_suffix();
        let name = output.to_string_lossy();
        if name.len() > suffix.len() && name.ends_with(suffix) {
            Ok(())
        } else {
            Err(Error::InvalidOutputName {
                operation: *self,
                path: output.to_path_buf(),
                suffix,
            })
        }
    }

    /// The first rule accepting `version`.
    pub fn select(&self, version: &ToolVersion) -> &'static Rule {
        let rules = self.rules();
        rules
            .iter()
            .find(|r| (r.applies)(version))
            .unwrap_or(&rules[rules.len() - 1])
    }
}

/// The name a fixed-output rule writes for `input`.
pub fn implied_output(operation: Operation, input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_os_string();
    name.push(operation.output_suffix());
    PathBuf::from(name)
}

/// Builds the command for `operation` under `version`. Pure; nothing is spawned.
///
/// A declared output the selected form cannot write is rejected with
/// [`Error::FixedOutputName`].
pub fn build_command(
    operation: Operation,
    version: &ToolVersion,
    params: &StageParams,
) -> Result<(CommandLine, &'static str), Error> {
    operation.check_output(params.output)?;
    let rule = operation.select(version);

    if rule.fixed_output {
        let expected = implied_output(operation, params.input);
        if params.output != expected {
            return Err(Error::FixedOutputName {
                operation,
                form: rule.form,
                path: params.output.to_path_buf(),
                expected,
            });
        }
    }

    Ok(((rule.build)(params), rule.form))
}
