//! Ordered execution of dependent tool invocations.
//!
//! A [`Pipeline`] is validated when it is built: every output name must fit its tool, and every
//! stage after the first must read something an earlier stage writes. The [`Sequencer`] then runs
//! stages one at a time, stopping at the first failure. Files written by earlier stages are left
//! where they are.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::libs::error::Error;
use crate::libs::options::OptionSet;
use crate::libs::tool::{
    build_command, implied_output, probe, CommandLine, Executor, Operation, Probe, StageParams,
    ToolVersion, BASELINE,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandStage {
    pub operation: Operation,
    pub input: PathBuf,
    pub output: PathBuf,
    /// Overall process budget; each operation derives its own thread count.
    pub nproc: usize,
}

impl CommandStage {
    pub fn new(
        operation: Operation,
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        nproc: usize,
    ) -> Self {
        Self {
            operation,
            input: input.into(),
            output: output.into(),
            nproc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    stages: Vec<CommandStage>,
}

impl Pipeline {
    pub fn new(stages: Vec<CommandStage>) -> Result<Self, Error> {
        for (i, stage) in stages.iter().enumerate() {
            stage.operation.check_output(&stage.output)?;

            if i > 0 && !stages[..i].iter().any(|prev| prev.output == stage.input) {
                return Err(Error::BrokenChain {
                    stage: i + 1,
                    operation: stage.operation,
                    input: stage.input.clone(),
                });
            }
        }

        Ok(Self { stages })
    }

    /// sort -> index -> secondary index, the post-processing of an aligned BAM.
    ///
    /// Both indexes are built from the sorted BAM. pbindex always writes `<sorted>.pbi`.
    pub fn bam_post(
        unsorted: impl AsRef<Path>,
        sorted: impl AsRef<Path>,
        bai: impl AsRef<Path>,
        nproc: usize,
    ) -> Result<Self, Error> {
        let sorted = sorted.as_ref();
        let pbi = implied_output(Operation::SecondaryIndex, sorted);
        Self::new(vec![
            CommandStage::new(Operation::Sort, unsorted.as_ref(), sorted, nproc),
            CommandStage::new(Operation::Index, sorted, bai.as_ref(), nproc),
            CommandStage::new(Operation::SecondaryIndex, sorted, pbi, nproc),
        ])
    }

    /// [`Pipeline::bam_post`] with the process budget taken from resolved options.
    ///
    /// A missing or non-positive `nproc` leaves the sort single-threaded.
    pub fn bam_post_from_options(
        options: &OptionSet,
        unsorted: impl AsRef<Path>,
        sorted: impl AsRef<Path>,
        bai: impl AsRef<Path>,
    ) -> Result<Self, Error> {
        let nproc = options
            .get_int("nproc")
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(1);
        Self::bam_post(unsorted, sorted, bai, nproc)
    }

    pub fn stages(&self) -> &[CommandStage] {
        &self.stages
    }
}

/// A stage's concrete command, as chosen for the probed tool version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedStage {
    /// 1-based position in the pipeline.
    pub stage: usize,
    pub operation: Operation,
    pub form: &'static str,
    pub command: CommandLine,
}

/// Runs pipelines synchronously, caching one version probe per tool.
pub struct Sequencer<'a> {
    executor: &'a dyn Executor,
    versions: HashMap<&'static str, Probe>,
}

impl<'a> Sequencer<'a> {
    pub fn new(executor: &'a dyn Executor) -> Self {
        Self {
            executor,
            versions: HashMap::new(),
        }
    }

    /// Uses `version` for `tool` instead of probing it.
    pub fn pin_version(&mut self, tool: &'static str, version: ToolVersion) {
        self.versions.insert(tool, Probe::Probed(version));
    }

    /// The probe result for `tool`, running the probe on first use.
    pub fn probe(&mut self, tool: &'static str) -> &Probe {
        let executor = self.executor;
        self.versions.entry(tool).or_insert_with(|| {
            let p = probe(executor, tool);
            if let Probe::Unknown { reason } = &p {
                log::warn!("{}: assuming version {} ({})", tool, BASELINE, reason);
            }
            p
        })
    }

    fn version_for(&mut self, operation: Operation) -> ToolVersion {
        if operation.is_version_sensitive() {
            self.probe(operation.tool()).version()
        } else {
            BASELINE
        }
    }

    fn plan_stage(&mut self, idx: usize, stage: &CommandStage) -> Result<PlannedStage, Error> {
        let version = self.version_for(stage.operation);
        let params = StageParams {
            input: &stage.input,
            output: &stage.output,
            nproc: stage.nproc,
        };
        let (command, form) = build_command(stage.operation, &version, &params)?;

        Ok(PlannedStage {
            stage: idx + 1,
            operation: stage.operation,
            form,
            command,
        })
    }

    /// Builds every stage's command without running any stage.
    pub fn plan(&mut self, pipeline: &Pipeline) -> Result<Vec<PlannedStage>, Error> {
        pipeline
            .stages()
            .iter()
            .enumerate()
            .map(|(i, stage)| self.plan_stage(i, stage))
            .collect()
    }

    /// Runs the stages in order and returns what was run.
    ///
    /// Every stage is planned before the first one starts. The first stage that cannot be
    /// launched or exits non-zero ends the run with [`Error::StageExecution`]; later stages are
    /// never attempted.
    pub fn run(&mut self, pipeline: &Pipeline) -> Result<Vec<PlannedStage>, Error> {
        let plan = self.plan(pipeline)?;
        let mut done = vec![];

        for planned in plan {
            log::info!(
                "Stage {} ({}, {}): {}",
                planned.stage,
                planned.operation,
                planned.form,
                planned.command
            );

            let failure = |status: Option<i32>, stderr: String| Error::StageExecution {
                stage: planned.stage,
                operation: planned.operation,
                command: planned.command.to_string(),
                status,
                stderr,
            };

            let output = self
                .executor
                .execute(&planned.command)
                .map_err(|e| failure(None, e.to_string()))?;
            if !output.success() {
                return Err(failure(output.status, output.stderr.trim().to_string()));
            }

            log::info!("Stage {} ({}) finished", planned.stage, planned.operation);
            done.push(planned);
        }

        Ok(done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::options::{Source, Value};
    use crate::libs::tool::CommandOutput;
    use std::cell::RefCell;
    use std::io;

    /// Records every command and answers with a scripted exit code.
    struct Scripted {
        version_line: &'static str,
        fail_on: Option<&'static str>,
        calls: RefCell<Vec<String>>,
    }

    impl Scripted {
        fn new(version_line: &'static str) -> Self {
            Self {
                version_line,
                fail_on: None,
                calls: RefCell::new(vec![]),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl Executor for Scripted {
        fn execute(&self, cmd: &CommandLine) -> io::Result<CommandOutput> {
            let line = cmd.to_string();
            self.calls.borrow_mut().push(line.clone());

            if cmd.get_args() == ["--version"] {
                return Ok(CommandOutput {
                    status: Some(0),
                    stdout: format!("{}\n", self.version_line),
                    stderr: String::new(),
                });
            }
            if let Some(word) = self.fail_on {
                if line.contains(word) {
                    return Ok(CommandOutput {
                        status: Some(1),
                        stdout: String::new(),
                        stderr: format!("[bam_sort] {} failed\n", word),
                    });
                }
            }
            Ok(CommandOutput {
                status: Some(0),
                ..Default::default()
            })
        }
    }

    fn post() -> Pipeline {
        Pipeline::bam_post("in.bam", "out.bam", "out.bam.bai", 8).unwrap()
    }

    #[test]
    fn runs_in_order_with_one_probe() {
        let exec = Scripted::new("samtools 1.3.1");
        let done = Sequencer::new(&exec).run(&post()).unwrap();

        assert_eq!(done.len(), 3);
        assert_eq!(
            exec.calls(),
            vec![
                "samtools --version",
                "samtools sort --threads 2 -m 768M -o out.bam in.bam",
                "samtools index out.bam out.bam.bai",
                "pbindex out.bam",
            ]
        );
    }

    #[test]
    fn old_samtools_forms() {
        let exec = Scripted::new("samtools 1.2");
        let done = Sequencer::new(&exec).run(&post()).unwrap();
        assert_eq!(done[0].form, "sort-direct");
        assert_eq!(done[1].command.to_string(), "samtools index out.bam");

        let exec = Scripted::new("Usage: samtools <command> [options]");
        let done = Sequencer::new(&exec).run(&post()).unwrap();
        assert_eq!(
            done[0].command.to_string(),
            "samtools sort --threads 2 -m 768M in.bam out"
        );
        assert_eq!(done[1].form, "index-explicit");
    }

    #[test]
    fn sort_failure_stops_the_run() {
        let mut exec = Scripted::new("samtools 1.3.1");
        exec.fail_on = Some("sort");

        let err = Sequencer::new(&exec).run(&post()).unwrap_err();
        match err {
            Error::StageExecution {
                stage,
                operation,
                status,
                stderr,
                ..
            } => {
                assert_eq!(stage, 1);
                assert_eq!(operation, Operation::Sort);
                assert_eq!(status, Some(1));
                assert!(stderr.contains("sort failed"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(exec.calls().iter().all(|c| !c.contains("index")));
    }

    #[test]
    fn pinned_version_skips_probe() {
        let exec = Scripted::new("samtools 1.3.1");
        let mut seq = Sequencer::new(&exec);
        seq.pin_version("samtools", ToolVersion::new(1, 2, 0));

        let plan = seq.plan(&post()).unwrap();
        assert_eq!(plan[1].form, "index-inferred");
        assert!(exec.calls().is_empty());
    }

    #[test]
    fn bad_output_name_fails_before_spawning() {
        let exec = Scripted::new("samtools 1.3.1");
        let err = Pipeline::bam_post("in.bam", "out.sorted", "out.bai", 8)
            .and_then(|p| Sequencer::new(&exec).run(&p))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidOutputName {
                operation: Operation::Sort,
                ..
            }
        ));
        assert!(exec.calls().is_empty());
    }

    #[test]
    fn unplaceable_index_fails_before_sorting() {
        let exec = Scripted::new("samtools 1.2");
        let pipeline = Pipeline::bam_post("in.bam", "out.bam", "idx/out.bai", 8).unwrap();

        let err = Sequencer::new(&exec).run(&pipeline).unwrap_err();
        assert!(matches!(
            err,
            Error::FixedOutputName {
                operation: Operation::Index,
                form: "index-inferred",
                ..
            }
        ));
        assert_eq!(exec.calls(), vec!["samtools --version"]);
    }

    #[test]
    fn pbi_is_named_after_the_sorted_bam() {
        let stages = post().stages().to_vec();
        assert_eq!(stages[2].output, PathBuf::from("out.bam.pbi"));
    }

    #[test]
    fn nproc_from_resolved_options() {
        let options = OptionSet::new().with("nproc", Some(Value::Int(16)), Source::ConfigFile);
        let pipeline =
            Pipeline::bam_post_from_options(&options, "in.bam", "out.bam", "out.bam.bai").unwrap();
        assert!(pipeline.stages().iter().all(|s| s.nproc == 16));

        let plan = Sequencer::new(&Scripted::new("samtools 1.3.1"))
            .plan(&pipeline)
            .unwrap();
        assert_eq!(
            plan[0].command.to_string(),
            "samtools sort --threads 4 -m 768M -o out.bam in.bam"
        );

        let pipeline =
            Pipeline::bam_post_from_options(&OptionSet::new(), "in.bam", "out.bam", "out.bam.bai")
                .unwrap();
        assert_eq!(pipeline.stages()[0].nproc, 1);
    }

    #[test]
    fn broken_chain() {
        let err = Pipeline::new(vec![
            CommandStage::new(Operation::Sort, "in.bam", "out.bam", 4),
            CommandStage::new(Operation::Index, "other.bam", "other.bam.bai", 4),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::BrokenChain { stage: 2, .. }));
    }
}
