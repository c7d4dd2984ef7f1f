//! Key label engine
//!
//! A key label is `namespace:environment:type_name:suffix` with absent parts
//! left out. The first three parts depend only on the schema and are
//! memoized on it; the suffix is computed per instance by the schema's
//! custom label function.

use std::any::Any;

use tracing::warn;

use redis_model_core::{Config, Error, Result};

use crate::schema::Schema;

/// Separator between label segments
pub const LABEL_SEPARATOR: &str = ":";

/// `Admin::UserProfile` → `admin/user_profile`
///
/// Module separators become `/`, word boundaries in camel case become `_`,
/// runs of capitals are kept together (`HTTPServer` → `http_server`) and
/// hyphens become underscores.
pub fn underscore(type_name: &str) -> String {
    type_name
        .split("::")
        .map(underscore_segment)
        .collect::<Vec<_>>()
        .join("/")
}

fn underscore_segment(segment: &str) -> String {
    let chars: Vec<char> = segment.chars().collect();
    let mut out = String::with_capacity(segment.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();
            let after_word = prev.is_ascii_lowercase() || prev.is_ascii_digit();
            let ends_acronym =
                prev.is_ascii_uppercase() && next.map_or(false, |n| n.is_ascii_lowercase());
            if after_word || ends_acronym {
                out.push('_');
            }
        }
        match c {
            '-' => out.push('_'),
            c => out.push(c.to_ascii_lowercase()),
        }
    }
    out
}

/// Schema-wide part of the label, memoized on the schema
pub fn base_label<'s>(config: &Config, schema: &'s Schema) -> &'s str {
    schema.base_label.get_or_init(|| {
        let environment = config.environment();
        let type_segment = underscore(schema.type_name());
        [config.namespace(), environment.as_deref(), Some(type_segment.as_str())]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(LABEL_SEPARATOR)
    })
}

/// Full label of `instance` under `schema`
///
/// Without a label function, or when it yields nothing, the base label is
/// returned alone.
///
/// # Errors
///
/// Returns `Error::InvalidValue` if the schema has a label function and
/// `instance` is not the type it was written for.
pub fn compute_label(config: &Config, schema: &Schema, instance: &dyn Any) -> Result<String> {
    let base = base_label(config, schema);
    let suffix = match schema.label_fn() {
        Some(label_fn) => match label_fn.call(instance) {
            Some(suffix) => suffix,
            None => {
                warn!(
                    target: "redis_model::label",
                    type_name = %schema.type_name(),
                    expected = %label_fn.instance_type(),
                    "Label function called with an instance of another type"
                );
                return Err(Error::InvalidValue(format!(
                    "label function of {} expects {}",
                    schema.type_name(),
                    label_fn.instance_type()
                )));
            }
        },
        None => None,
    };
    Ok(match suffix {
        Some(suffix) => format!("{}{}{}", base, LABEL_SEPARATOR, suffix),
        None => base.to_string(),
    })
}

/// Join segments into one label
pub fn join_label<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    parts
        .into_iter()
        .map(|part| part.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(LABEL_SEPARATOR)
}
