//! Layered option resolution.
//!
//! Three pure passes over an immutable [`OptionSet`]:
//!
//! 1. [`defaults`] - every recognized option, with its built-in default or unset.
//! 2. [`overlay_config`] - values from the config file replace defaults.
//! 3. [`overlay_cli`] - explicit command-line values replace both.
//!
//! `algorithmOptions` does not take part in the plain overlays. [`reconcile_algorithm_options`]
//! picks the command-line occurrences (joined by a space) or else the config-file value, and
//! strips one layer of matching quotes from the result.

use itertools::Itertools;

use super::config::ConfigFile;
use super::schema::{self, OptionSpec, ALGORITHM_OPTIONS, CONFIG_FILE};
use super::{unquote, CliOptions, OptionSet, Source, Value};
use crate::libs::error::Error;

/// The default layer: one entry per schema option.
pub fn defaults(specs: &[OptionSpec]) -> OptionSet {
    specs.iter().fold(OptionSet::new(), |set, spec| {
        let value = spec.default.and_then(|raw| spec.kind.parse(raw));
        set.with(spec.name, value, Source::Default)
    })
}

/// Applies config-file values on top of `base`.
///
/// Fails on the first key missing from `specs`, or on a value that does not convert to the
/// option's kind or is not one of its choices.
pub fn overlay_config(
    base: &OptionSet,
    config: &ConfigFile,
    specs: &[OptionSpec],
) -> Result<OptionSet, Error> {
    let mut set = base.clone();
    let mut imported = vec![];

    for entry in config.entries() {
        let spec = specs
            .iter()
            .find(|s| s.name == entry.key)
            .ok_or_else(|| Error::UnknownOption {
                key: entry.key.clone(),
                path: config.path().to_path_buf(),
                line: entry.line,
            })?;

        let value = spec.kind.parse(&entry.value).ok_or_else(|| {
            Error::config(
                config.path(),
                entry.line,
                format!("`{}` is not a valid {} for {}", entry.value, spec.kind, spec.name),
            )
        })?;
        if !spec.choices.is_empty() && !spec.choices.contains(&entry.value.as_str()) {
            return Err(Error::config(
                config.path(),
                entry.line,
                format!(
                    "`{}` is not a valid choice for {} ({})",
                    entry.value,
                    spec.name,
                    spec.choices.join(", ")
                ),
            ));
        }

        imported.push(format!("{}={}", entry.key, entry.value));
        set = set.with(spec.name, Some(value), Source::ConfigFile);
    }

    log::info!(
        "ConfigParser: Import options from a config file {}: {}",
        config.path().display(),
        imported.join(", ")
    );

    Ok(set)
}

/// Applies explicit command-line values on top of `base`. `algorithmOptions` is skipped.
pub fn overlay_cli(base: &OptionSet, cli: &CliOptions) -> OptionSet {
    cli.iter()
        .filter(|(name, _)| *name != ALGORITHM_OPTIONS)
        .fold(base.clone(), |set, (name, value)| {
            if let Some(entry) = set.entry(name) {
                if entry.source == Source::ConfigFile && entry.value.as_ref() != Some(value) {
                    log::info!(
                        "{} from the config file is overridden on the command line: {}",
                        name,
                        value
                    );
                }
            }
            set.with(name, Some(value.clone()), Source::CommandLine)
        })
}

/// The final `algorithmOptions` value and where it came from.
pub fn reconcile_algorithm_options(
    cli: &CliOptions,
    config: Option<&ConfigFile>,
) -> Option<(String, Source)> {
    let picked = if !cli.algorithm_options().is_empty() {
        Some((cli.algorithm_options().iter().join(" "), Source::CommandLine))
    } else {
        config
            .and_then(|c| c.get(ALGORITHM_OPTIONS))
            .map(|v| (v.to_string(), Source::ConfigFile))
    };

    picked.map(|(value, source)| (unquote(&value).to_string(), source))
}

/// Resolves `cli` against the config file it names (if any) and the pbalign schema.
pub fn resolve(cli: &CliOptions) -> Result<OptionSet, Error> {
    let config = match cli.get(CONFIG_FILE) {
        Some(Value::Str(path)) => Some(ConfigFile::load(path)?),
        _ => None,
    };
    resolve_with(cli, config.as_ref(), schema::OPTIONS)
}

/// Resolution with the config file already parsed.
pub fn resolve_with(
    cli: &CliOptions,
    config: Option<&ConfigFile>,
    specs: &[OptionSpec],
) -> Result<OptionSet, Error> {
    let mut set = defaults(specs);
    if let Some(config) = config {
        set = overlay_config(&set, config, specs)?;
    }
    set = overlay_cli(&set, cli);

    set = match reconcile_algorithm_options(cli, config) {
        Some((value, source)) => set.with(ALGORITHM_OPTIONS, Some(Value::Str(value)), source),
        None => set.with(ALGORITHM_OPTIONS, None, Source::Unset),
    };

    let defaulted = set
        .iter()
        .filter(|(_, e)| e.source == Source::Default)
        .map(|(k, e)| format!("{}={}", k, e.value.as_ref().map(|v| v.to_string()).unwrap_or_default()))
        .join(", ");
    log::info!("Importing default options: {}", defaulted);

    Ok(set)
}
