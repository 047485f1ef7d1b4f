use clap::*;
use pbalign::libs::contract::ResolvedToolContract;
use pbalign::libs::options::{cli, resolve, CliOptions};
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("contract")
        .about("Resolves pbalign options from a resolved tool contract")
        .after_help(
            r###"
The contract is translated into the equivalent command line:

    <input 1> <input 2> <output> --nproc N [--minAccuracy X] [--minLength Y]
        [--concordant] [--algorithmOptions="..."]

and resolved exactly like `pbalign options`.

Recognized task options:
* pbalign.task_options.min_accuracy
* pbalign.task_options.min_length
* pbalign.task_options.concordant
* pbalign.task_options.algorithm_options

Examples:
1. Resolve a contract:
   pbalign contract resolved_tool_contract.json

2. Show the translated command line:
   pbalign contract resolved_tool_contract.json --print-args

"###,
        )
        .arg(
            Arg::new("infile")
                .required(true)
                .index(1)
                .help("Resolved tool contract (JSON)"),
        )
        .arg(
            Arg::new("print_args")
                .long("print-args")
                .action(ArgAction::SetTrue)
                .help("Print the translated arguments, one per line, and exit"),
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
                .help("Log debug messages"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    pbalign::init_logger(args.get_flag("verbose"), args.get_flag("debug"));

    let infile = args.get_one::<String>("infile").unwrap();
    let rtc = ResolvedToolContract::load(infile)?;
    let translated = rtc.to_args()?;

    let mut writer = std::io::stdout().lock();

    if args.get_flag("print_args") {
        for arg in &translated {
            writeln!(writer, "{}", arg)?;
        }
        return Ok(());
    }

    let matches = cli::command("pbalign")
        .try_get_matches_from(std::iter::once("pbalign".to_string()).chain(translated))?;
    let options = resolve(&CliOptions::from_matches(&matches))?;
    writer.write_all(options.to_tsv().as_bytes())?;

    Ok(())
}
