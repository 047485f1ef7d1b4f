use clap::*;
use indexmap::IndexMap;

use super::schema::{OptionSpec, Role, ALGORITHM_OPTIONS, OPTIONS};
use super::{Kind, Value};

/// Builds one clap argument per schema entry.
///
/// No clap-side defaults are declared: an option absent from `ArgMatches` was not given on the
/// command line, and the default-fill pass supplies its value later.
pub fn arguments() -> Vec<Arg> {
    OPTIONS.iter().map(argument).collect()
}

fn argument(spec: &OptionSpec) -> Arg {
    let mut help = spec.help.to_string();
    if let Some(default) = spec.default {
        if spec.kind != Kind::Bool {
            help += &format!(". Default value is {}", default);
        }
    }

    let mut arg = Arg::new(spec.name)
        .help(help)
        .help_heading(spec.group)
        .hide(spec.hidden);

    arg = match spec.role {
        Role::Positional(index) => arg.index(index).required(true),
        Role::Switch => arg.long(spec.name).action(ArgAction::SetTrue),
        Role::Single => arg.long(spec.name).num_args(1),
        Role::Repeated => arg
            .long(spec.name)
            .num_args(1)
            .action(ArgAction::Append)
            .allow_hyphen_values(true),
    };

    if !spec.choices.is_empty() {
        arg = arg.value_parser(spec.choices.to_vec());
    } else {
        arg = match spec.kind {
            Kind::Int => arg.value_parser(value_parser!(i64)),
            Kind::Float => arg.value_parser(finite_float),
            Kind::Bool | Kind::Str => arg,
        };
    }

    arg
}

fn finite_float(raw: &str) -> Result<f64, String> {
    match Kind::Float.parse(raw) {
        Some(Value::Float(x)) => Ok(x),
        _ => Err(format!("`{}` is not a finite number", raw)),
    }
}

/// The full pbalign grammar as a standalone command.
pub fn command(name: &'static str) -> Command {
    Command::new(name).args(arguments())
}

/// Options given explicitly on the command line.
///
/// `algorithmOptions` is kept apart, as every occurrence in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOptions {
    values: IndexMap<String, Value>,
    algorithm_options: Vec<String>,
}

impl CliOptions {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let mut cli = Self::default();

        for spec in OPTIONS {
            let value = match (spec.role, spec.kind) {
                (Role::Repeated, _) => {
                    if let Some(many) = matches.get_many::<String>(spec.name) {
                        cli.algorithm_options.extend(many.cloned());
                    }
                    None
                }
                (Role::Switch, _) => matches.get_flag(spec.name).then_some(Value::Bool(true)),
                (_, Kind::Int) => matches.get_one::<i64>(spec.name).map(|i| Value::Int(*i)),
                (_, Kind::Float) => matches.get_one::<f64>(spec.name).map(|x| Value::Float(*x)),
                (_, Kind::Bool) | (_, Kind::Str) => matches
                    .get_one::<String>(spec.name)
                    .map(|s| Value::Str(s.clone())),
            };

            if let Some(value) = value {
                cli.values.insert(spec.name.to_string(), value);
            }
        }

        cli
    }

    /// Records `name` as explicitly given.
    pub fn set(mut self, name: &str, value: Value) -> Self {
        if name == ALGORITHM_OPTIONS {
            if let Value::Str(s) = value {
                self.algorithm_options.push(s);
            }
        } else {
            self.values.insert(name.to_string(), value);
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn algorithm_options(&self) -> &[String] {
        &self.algorithm_options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliOptions {
        let matches = command("pbalign").get_matches_from(args);
        CliOptions::from_matches(&matches)
    }

    #[test]
    fn only_explicit_values_are_kept() {
        let cli = parse(&["pbalign", "reads.bam", "ref.fa", "out.bam", "--maxHits", "3"]);
        assert_eq!(cli.get("maxHits"), Some(&Value::Int(3)));
        assert_eq!(cli.get("minAccuracy"), None);
        assert_eq!(cli.get("concordant"), None);
        assert_eq!(cli.get("inputFileName"), Some(&Value::Str("reads.bam".into())));
    }

    #[test]
    fn switches_and_floats() {
        let cli = parse(&[
            "pbalign", "r.bam", "ref.fa", "o.bam", "--concordant", "--minAccuracy", "82.5",
        ]);
        assert_eq!(cli.get("concordant"), Some(&Value::Bool(true)));
        assert_eq!(cli.get("minAccuracy"), Some(&Value::Float(82.5)));
    }

    #[test]
    fn algorithm_options_accumulate() {
        let cli = parse(&[
            "pbalign",
            "r.bam",
            "ref.fa",
            "o.bam",
            "--algorithmOptions",
            "-x 1",
            "--algorithmOptions=-y 2",
        ]);
        assert_eq!(cli.algorithm_options(), &["-x 1".to_string(), "-y 2".to_string()]);
        assert_eq!(cli.get(ALGORITHM_OPTIONS), None);
    }

    #[test]
    fn non_finite_floats_are_rejected() {
        for raw in ["nan", "inf", "-Infinity"] {
            let res = command("pbalign").try_get_matches_from([
                "pbalign", "r.bam", "ref.fa", "o.bam", "--minAccuracy", raw,
            ]);
            assert!(res.is_err(), "{}", raw);
        }
    }

    #[test]
    fn choices_are_enforced() {
        let res = command("pbalign").try_get_matches_from([
            "pbalign", "r.bam", "ref.fa", "o.bam", "--algorithm", "bwa",
        ]);
        assert!(res.is_err());
    }
}
