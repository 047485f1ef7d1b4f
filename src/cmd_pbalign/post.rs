use clap::*;
use pbalign::libs::options::schema::CONFIG_FILE;
use pbalign::libs::options::{resolve, CliOptions, Value};
use pbalign::libs::pipeline::{Pipeline, Sequencer};
use pbalign::libs::tool::{Operation, SystemExecutor, ToolVersion};
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("post")
        .about("Sorts an aligned BAM and builds its .bai and .pbi indexes")
        .after_help(
            r###"
Stages, run strictly one after another:
1. samtools sort  <infile>  -> <outfile>
2. samtools index <outfile> -> --bai (default <outfile>.bai)
3. pbindex        <outfile> -> <outfile>.pbi

The samtools version is probed once with `samtools --version`:
* >= 1.0 sorts straight into <outfile>
* older (or unknown) releases get an output prefix and append .bam themselves
* exactly 1.2 builds the .bai under its own name, so --bai must be <outfile>.bai

Notes:
* <outfile> must end with .bam, --bai with .bai
* --nproc is resolved like `pbalign options`: command line, then --configFile, then 8
* Sort threads are nproc / 4, at least 1
* Every command is built before the first one runs
* The first failing stage stops the run; files already written are kept

Examples:
1. Post-process an alignment:
   pbalign post aligned.unsorted.bam aligned.bam --nproc 16

2. Take nproc from a pbalign config file:
   pbalign post aligned.unsorted.bam aligned.bam --configFile pbalign.config

3. Show the commands for samtools 1.2 without running anything:
   pbalign post aligned.unsorted.bam aligned.bam --assume-version 1.2 --dry-run

"###,
        )
        .arg(
            Arg::new("infile")
                .required(true)
                .index(1)
                .help("Unsorted BAM file"),
        )
        .arg(
            Arg::new("outfile")
                .required(true)
                .index(2)
                .help("Sorted BAM file, must end with .bam"),
        )
        .arg(
            Arg::new("bai")
                .long("bai")
                .num_args(1)
                .help("BAM index file. Default is <outfile>.bai"),
        )
        .arg(
            Arg::new("nproc")
                .long("nproc")
                .short('p')
                .num_args(1)
                .value_parser(value_parser!(i64).range(1..))
                .help("Number of processes available to the pipeline"),
        )
        .arg(
            Arg::new(CONFIG_FILE)
                .long(CONFIG_FILE)
                .num_args(1)
                .help("pbalign config file to read nproc from"),
        )
        .arg(
            Arg::new("assume_version")
                .long("assume-version")
                .num_args(1)
                .value_parser(value_parser!(ToolVersion))
                .help("Use this samtools version instead of probing it"),
        )
        .arg(
            Arg::new("dry_run")
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .help("Print `stage<TAB>form<TAB>command` for each stage and exit"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::SetTrue)
                .help("Log each stage"),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .action(ArgAction::SetTrue)
                .help("Also log every command and probed version"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    pbalign::init_logger(args.get_flag("verbose"), args.get_flag("debug"));

    //----------------------------
    // Args
    //----------------------------
    let infile = args.get_one::<String>("infile").unwrap();
    let outfile = args.get_one::<String>("outfile").unwrap();
    let bai = match args.get_one::<String>("bai") {
        Some(path) => path.to_string(),
        None => format!("{}.bai", outfile),
    };

    let mut cli = CliOptions::default();
    if let Some(path) = args.get_one::<String>(CONFIG_FILE) {
        cli = cli.set(CONFIG_FILE, Value::Str(path.to_string()));
    }
    if let Some(nproc) = args.get_one::<i64>("nproc") {
        cli = cli.set("nproc", Value::Int(*nproc));
    }
    let options = resolve(&cli)?;

    let pipeline = Pipeline::bam_post_from_options(&options, infile, outfile, &bai)?;

    //----------------------------
    // Operating
    //----------------------------
    let executor = SystemExecutor;
    let mut sequencer = Sequencer::new(&executor);
    if let Some(version) = args.get_one::<ToolVersion>("assume_version") {
        sequencer.pin_version(Operation::Sort.tool(), *version);
    }

    if args.get_flag("dry_run") {
        let mut writer = std::io::stdout().lock();
        for planned in sequencer.plan(&pipeline)? {
            writeln!(
                writer,
                "{}\t{}\t{}",
                planned.operation, planned.form, planned.command
            )?;
        }
        return Ok(());
    }

    log::info!("BamPostService: Sort and build index for {}", outfile);
    sequencer.run(&pipeline)?;

    Ok(())
}
