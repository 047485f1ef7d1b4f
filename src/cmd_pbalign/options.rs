use clap::*;
use pbalign::libs::options::{cli, resolve, CliOptions};
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("options")
        .about("Resolves pbalign options from the command line, a config file and defaults")
        .after_help(
            r###"
Every recognized option is printed as `name<TAB>value<TAB>source`, where source is one of
`cli`, `config`, `default` or `unset`. Unset values print as `None`.

Precedence:
* Options given on the command line win
* Then values from --configFile
* Then built-in defaults

Config file:
* One `key=value` per line; keys may carry leading dashes
* Values may be wrapped in one pair of matching ' or " quotes
* Lines starting with # and blank lines are ignored
* --verbose, --debug, --profile, --keepTmpFiles, --configFile, --version, -v, -vv and -vvv
  lines are ignored
* An unknown key, or a line without exactly one '=', is an error

--algorithmOptions:
* May be given more than once; occurrences are joined with a space
* Given on the command line, it replaces the config file value
* One outer pair of matching quotes is removed

Examples:
1. Defaults only:
   pbalign options reads.bam ref.fa out.bam

2. With a config file, overriding one of its values:
   pbalign options reads.bam ref.fa out.bam --configFile pbalign.config --maxHits 5

3. Pass-through aligner options:
   pbalign options reads.bam ref.fa out.bam --algorithmOptions "-minMatch 12" --algorithmOptions "-bestn 10"

"###,
        )
        .args(cli::arguments())
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    pbalign::init_logger(args.get_flag("verbose"), args.get_flag("debug"));

    let cli = CliOptions::from_matches(args);
    let options = resolve(&cli)?;

    let mut writer = std::io::stdout().lock();
    writer.write_all(options.to_tsv().as_bytes())?;

    Ok(())
}
