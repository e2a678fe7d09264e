use crate::{Error, Result};
use regex::{Captures, Regex};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

/// Runtime parameters substituted into `${name}` placeholders.
#[derive(Debug, Clone, Default)]
pub struct Params {
    values: BTreeMap<String, String>,
}

impl Params {
    /// Create empty params.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter value.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Get a parameter value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parse `key=value` pairs as given on the command line.
    pub fn from_args(args: &[String]) -> Result<Self> {
        args.iter().try_fold(Self::new(), |params, arg| {
            let (key, value) = arg.split_once('=').ok_or_else(|| {
                Error::Config(format!("invalid param '{}', expected key=value", arg))
            })?;
            Ok(params.set(key, value))
        })
    }
}

/// Parameter definition in a config's `params` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParamDef {
    #[serde(default)]
    pub required: bool,

    pub default: Option<String>,

    pub description: Option<String>,
}

fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder regex"))
}

/// Replace `${name}` placeholders in `template`.
///
/// Given values win over defaults. Declared optional params without a
/// default become empty; undeclared names are left untouched.
pub fn substitute(
    template: &str,
    params: &Params,
    defs: &HashMap<String, ParamDef>,
) -> Result<String> {
    let mut missing: Option<String> = None;
    let out = placeholder().replace_all(template, |caps: &Captures| {
        let name = &caps[1];
        if let Some(v) = params.get(name) {
            return v.to_string();
        }
        match defs.get(name) {
            Some(ParamDef {
                default: Some(d), ..
            }) => d.clone(),
            Some(def) if def.required => {
                missing.get_or_insert_with(|| name.to_string());
                String::new()
            }
            Some(_) => String::new(),
            None => caps[0].to_string(),
        }
    });

    match missing {
        Some(name) => Err(Error::Config(format!(
            "missing required parameter: {}",
            name
        ))),
        None => Ok(out.into_owned()),
    }
}

/// Substitute placeholders in every string of a YAML tree.
pub fn substitute_value(
    value: &mut serde_yaml::Value,
    params: &Params,
    defs: &HashMap<String, ParamDef>,
) -> Result<()> {
    use serde_yaml::Value;

    match value {
        Value::String(s) => *s = substitute(s, params, defs)?,
        Value::Mapping(map) => {
            for (_, v) in map.iter_mut() {
                substitute_value(v, params, defs)?;
            }
        }
        Value::Sequence(seq) => {
            for v in seq.iter_mut() {
                substitute_value(v, params, defs)?;
            }
        }
        _ => {}
    }
    Ok(())
}
