extern crate clap;
use clap::*;

mod cmd_pbalign;

fn main() -> anyhow::Result<()> {
    let app = Command::new("pbalign")
        .version(crate_version!())
        .author(crate_authors!())
        .about("`pbalign` - option resolution and BAM post-processing for PacBio alignments")
        .propagate_version(true)
        .arg_required_else_help(true)
        .color(ColorChoice::Auto)
        .subcommand(cmd_pbalign::options::make_subcommand())
        .subcommand(cmd_pbalign::contract::make_subcommand())
        .subcommand(cmd_pbalign::version::make_subcommand())
        .subcommand(cmd_pbalign::post::make_subcommand())
        .after_help(
            r###"Subcommand groups:

* Options:
    * options  - Resolve command line, config file and defaults
    * contract - Resolve a resolved tool contract (JSON)

* Tools:
    * version - Probe the version of an external tool
    * post    - Sort a BAM, build its .bai and .pbi indexes

"###,
        );

    // Check which subcommand the user ran...
    match app.get_matches().subcommand() {
        Some(("options", sub_matches)) => cmd_pbalign::options::execute(sub_matches),
        Some(("contract", sub_matches)) => cmd_pbalign::contract::execute(sub_matches),
        Some(("version", sub_matches)) => cmd_pbalign::version::execute(sub_matches),
        Some(("post", sub_matches)) => cmd_pbalign::post::execute(sub_matches),
        _ => unreachable!(),
    }?;

    Ok(())
}
