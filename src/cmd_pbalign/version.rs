use clap::*;
use pbalign::libs::tool::{probe, Probe, SystemExecutor};

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("version")
        .about("Probes the version of an external tool")
        .after_help(
            r###"
Runs `<tool> --version` and parses the number after the tool's name on the first line.

Output: `tool<TAB>version<TAB>status`, where status is
* probed   - the tool reported its version
* baseline - probing failed and the oldest supported version (0.1.19) is assumed

A failed probe is not an error; the exit code is 0 either way.

Examples:
   pbalign version samtools

"###,
        )
        .arg(
            Arg::new("tool")
                .required(true)
                .index(1)
                .help("Name of the tool on PATH"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::SetTrue)
                .help("Log informational messages"),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .action(ArgAction::SetTrue)
                .help("Also log the probe command"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    pbalign::init_logger(args.get_flag("verbose"), args.get_flag("debug"));

    let tool = args.get_one::<String>("tool").unwrap();
    let result = probe(&SystemExecutor, tool);

    let status = match &result {
        Probe::Probed(_) => "probed",
        Probe::Unknown { reason } => {
            log::info!("{}", reason);
            "baseline"
        }
    };
    println!("{}\t{}\t{}", tool, result.version(), status);

    Ok(())
}
