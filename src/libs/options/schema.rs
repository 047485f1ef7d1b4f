//! The pbalign option grammar.
//!
//! One table drives the command-line parser, config-file validation and the default-fill pass,
//! so a name recognized in one place is recognized everywhere.

use super::Kind;

/// How an option is supplied on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Required positional argument at the given index (1-based).
    Positional(usize),
    /// `--name VALUE`, last occurrence wins.
    Single,
    /// `--name`, sets the option to true.
    Switch,
    /// `--name VALUE`, may be repeated; occurrences accumulate.
    Repeated,
}

#[derive(Debug, Clone, Copy)]
pub struct OptionSpec {
    pub name: &'static str,
    pub kind: Kind,
    pub role: Role,
    /// Raw default, converted with [`Kind::parse`]. `None` leaves the option unset.
    pub default: Option<&'static str>,
    pub choices: &'static [&'static str],
    pub group: &'static str,
    pub hidden: bool,
    pub help: &'static str,
}

pub const ALGORITHM_OPTIONS: &str = "algorithmOptions";
pub const CONFIG_FILE: &str = "configFile";

/// Config-file lines matching one of these exactly are skipped.
pub const RESERVED_LINES: &[&str] = &[
    "--version",
    "--configFile",
    "--verbose",
    "--debug",
    "--profile",
    "-v",
    "-vv",
    "-vvv",
    "--keepTmpFiles",
];

pub const ALGORITHM_CANDIDATES: &[&str] = &["blasr", "bowtie", "gmap"];
pub const HIT_POLICY_CANDIDATES: &[&str] = &["randombest", "allbest", "random", "all", "leftmost"];
pub const USECCS_CANDIDATES: &[&str] = &["useccs", "useccsall", "useccsdenovo"];

const GROUP_IO: &str = "Input and output";
const GROUP_INPUT: &str = "Optional input arguments";
const GROUP_ALIGN: &str = "Alignment options";
const GROUP_FILTER: &str = "Filter criteria options";
const GROUP_CMPH5: &str = "Options for cmp.h5";
const GROUP_MISC: &str = "Miscellaneous options";

const fn spec(
    name: &'static str,
    kind: Kind,
    role: Role,
    default: Option<&'static str>,
    group: &'static str,
    help: &'static str,
) -> OptionSpec {
    OptionSpec {
        name,
        kind,
        role,
        default,
        choices: &[],
        group,
        hidden: false,
        help,
    }
}

const fn with_choices(mut s: OptionSpec, choices: &'static [&'static str]) -> OptionSpec {
    s.choices = choices;
    s
}

const fn hidden(mut s: OptionSpec) -> OptionSpec {
    s.hidden = true;
    s
}

pub const OPTIONS: &[OptionSpec] = &[
    spec("inputFileName", Kind::Str, Role::Positional(1), None, GROUP_IO,
        "SubreadSet or unaligned .bam"),
    spec("referencePath", Kind::Str, Role::Positional(2), None, GROUP_IO,
        "ReferenceSet or FASTA file"),
    spec("outputFileName", Kind::Str, Role::Positional(3), None, GROUP_IO,
        "Output AlignmentSet file"),
    // Optional input
    spec("regionTable", Kind::Str, Role::Single, None, GROUP_INPUT,
        "Specify a region table for filtering reads"),
    spec(CONFIG_FILE, Kind::Str, Role::Single, None, GROUP_INPUT,
        "Specify a set of user-defined argument values"),
    spec("pulseFile", Kind::Str, Role::Single, None, GROUP_INPUT,
        "pls.h5, bas.h5 or FOFN files from which pulse metrics can be loaded for Quiver"),
    // Alignment
    with_choices(
        spec("algorithm", Kind::Str, Role::Single, Some("blasr"), GROUP_ALIGN,
            "Select an algorithm"),
        ALGORITHM_CANDIDATES,
    ),
    spec("maxHits", Kind::Int, Role::Single, Some("10"), GROUP_ALIGN,
        "The maximum number of matches of each read to the reference sequence that will be evaluated"),
    spec("minAnchorSize", Kind::Int, Role::Single, Some("12"), GROUP_ALIGN,
        "The length of the read that must match against the reference sequence"),
    with_choices(
        spec("useccs", Kind::Str, Role::Single, None, GROUP_ALIGN,
            "Map the ccsSequence to the genome first, then align subreads to that interval"),
        USECCS_CANDIDATES,
    ),
    spec("noSplitSubreads", Kind::Bool, Role::Switch, Some("false"), GROUP_ALIGN,
        "Do not split reads into subreads even if subread regions are available"),
    spec("concordant", Kind::Bool, Role::Switch, Some("false"), GROUP_ALIGN,
        "Map subreads of a ZMW to the same genomic location"),
    spec("nproc", Kind::Int, Role::Single, Some("8"), GROUP_ALIGN,
        "Number of threads"),
    spec(ALGORITHM_OPTIONS, Kind::Str, Role::Repeated, None, GROUP_ALIGN,
        "Pass alignment options through; may be repeated"),
    // Filter criteria
    spec("maxDivergence", Kind::Float, Role::Single, Some("30.0"), GROUP_FILTER,
        "The maximum allowed percentage divergence of a read from the reference sequence"),
    spec("minAccuracy", Kind::Float, Role::Single, Some("70.0"), GROUP_FILTER,
        "The minimum percentage accuracy of alignments that will be evaluated"),
    spec("minLength", Kind::Int, Role::Single, Some("50"), GROUP_FILTER,
        "The minimum aligned read length of alignments that will be evaluated"),
    spec("scoreCutoff", Kind::Int, Role::Single, None, GROUP_FILTER,
        "The worst score to output an alignment"),
    with_choices(
        spec("hitPolicy", Kind::Str, Role::Single, Some("randombest"), GROUP_FILTER,
            "Specify a policy for how to treat multiple hits"),
        HIT_POLICY_CANDIDATES,
    ),
    spec("filterAdapterOnly", Kind::Bool, Role::Switch, Some("false"), GROUP_FILTER,
        "Do not report adapter-only hits using annotations with the reference entry"),
    // cmp.h5
    hidden(spec("readType", Kind::Str, Role::Single, Some("standard"), GROUP_CMPH5,
        "The ReadType attribute in the cmp.h5 output")),
    spec("forQuiver", Kind::Bool, Role::Switch, Some("false"), GROUP_CMPH5,
        "Sort, load pulse QVs and repack the cmp.h5 so quiver can consume it directly"),
    spec("loadQVs", Kind::Bool, Role::Switch, Some("false"), GROUP_CMPH5,
        "Like --forQuiver, but --useccs may be specified"),
    spec("byread", Kind::Bool, Role::Switch, Some("false"), GROUP_CMPH5,
        "Load pulse information using -byread instead of -bymetric"),
    spec("metrics", Kind::Str, Role::Single,
        Some("DeletionQV,DeletionTag,InsertionQV,MergeQV,SubstitutionQV"), GROUP_CMPH5,
        "Comma-delimited list of metrics to load instead of the defaults required by quiver"),
    // Miscellaneous
    spec("seed", Kind::Int, Role::Single, Some("1"), GROUP_MISC,
        "Initialize the random number generator; zero means current system time is used"),
    spec("tmpDir", Kind::Str, Role::Single, Some("/scratch"), GROUP_MISC,
        "Specify a directory for saving temporary files"),
    hidden(spec("keepTmpFiles", Kind::Bool, Role::Switch, Some("false"), GROUP_MISC,
        "Keep all temporary and intermediate files")),
    spec("verbose", Kind::Bool, Role::Switch, Some("false"), GROUP_MISC,
        "Log informational messages"),
    spec("debug", Kind::Bool, Role::Switch, Some("false"), GROUP_MISC,
        "Log debugging messages"),
    spec("profile", Kind::Bool, Role::Switch, Some("false"), GROUP_MISC,
        "Print runtime profile at exit"),
];

pub fn find(name: &str) -> Option<&'static OptionSpec> {
    OPTIONS.iter().find(|s| s.name == name)
}
