//! Renders an [`ApplicationDescriptor`] into the YAML blueprint submitted to
//! the remote service.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ApplicationError, Result};

const APPLICATION_TEMPLATE: &str = "name: {{name}}
location: {{location}}
services:
  - type: {{type}}{{configuration}}
";

const CONFIGURATION_TEMPLATE: &str = "
    brooklyn.config:{{entries}}";

const ENTRY_TEMPLATE: &str = "
      {{key}}: {{value}}";

/// Single `brooklyn.config` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub key: String,
    pub value: String,
}

impl Configuration {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// In-memory application to be deployed.
///
/// Configuration entries keep the order they were supplied in. Duplicate keys
/// are emitted as given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationDescriptor {
    pub name: String,
    pub location: String,
    /// Catalog item reference, `id:version`.
    pub service_type: String,
    #[serde(default)]
    pub configurations: Vec<Configuration>,
}

impl ApplicationDescriptor {
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
        service_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            service_type: service_type.into(),
            configurations: Vec::new(),
        }
    }

    pub fn with_configuration(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.configurations.push(Configuration::new(key, value));
        self
    }

    /// Render the blueprint document.
    pub fn render(&self) -> Result<Vec<u8>> {
        render(self)
    }
}

/// Render `descriptor` as a YAML blueprint.
///
/// The `brooklyn.config` section is only present when there is at least one
/// configuration entry. Fields that would not survive as plain YAML scalars
/// are emitted double-quoted.
pub fn render(descriptor: &ApplicationDescriptor) -> Result<Vec<u8>> {
    validate(descriptor)?;

    let configuration = if descriptor.configurations.is_empty() {
        String::new()
    } else {
        let mut entries = String::new();
        for entry in &descriptor.configurations {
            entries.push_str(&render_template(
                ENTRY_TEMPLATE,
                &[
                    ("key", &*scalar(&entry.key)),
                    ("value", &*scalar(&entry.value)),
                ],
            )?);
        }
        render_template(CONFIGURATION_TEMPLATE, &[("entries", entries.as_str())])?
    };

    let document = render_template(
        APPLICATION_TEMPLATE,
        &[
            ("name", &*scalar(&descriptor.name)),
            ("location", &*scalar(&descriptor.location)),
            ("type", &*scalar(&descriptor.service_type)),
            ("configuration", configuration.as_str()),
        ],
    )?;

    debug!(definition = %document, "Rendered application definition");
    Ok(document.into_bytes())
}

fn validate(descriptor: &ApplicationDescriptor) -> Result<()> {
    if descriptor.service_type.trim().is_empty() {
        return Err(ApplicationError::InvalidDefinition(
            "service type must not be empty".into(),
        ));
    }

    let fields = [
        ("name", descriptor.name.as_str()),
        ("location", descriptor.location.as_str()),
        ("type", descriptor.service_type.as_str()),
    ];
    let entries = descriptor
        .configurations
        .iter()
        .flat_map(|c| {
            [
                ("configuration key", c.key.as_str()),
                ("configuration value", c.value.as_str()),
            ]
        });

    for (field, value) in fields.into_iter().chain(entries) {
        if value.contains(['\n', '\r']) {
            return Err(ApplicationError::InvalidDefinition(format!(
                "{field} must not contain line breaks: {value:?}"
            )));
        }
    }
    Ok(())
}

/// Plain scalar when YAML reads it back unchanged, double-quoted otherwise.
fn scalar(value: &str) -> Cow<'_, str> {
    const INDICATORS: &[char] = &[
        '-', '?', ':', ',', '[', ']', '{', '}', '#', '&', '*', '!', '|', '>', '\'', '"', '%',
        '@', '`',
    ];

    let plain = match value.chars().next() {
        None => false,
        Some(first) => {
            !INDICATORS.contains(&first)
                && value.trim() == value
                && !value.contains(": ")
                && !value.contains(" #")
                && !value.ends_with(':')
                && !value.chars().any(char::is_control)
        }
    };
    if plain {
        return Cow::Borrowed(value);
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\t' => quoted.push_str("\\t"),
            c if c.is_control() => quoted.push_str(&format!("\\u{:04x}", c as u32)),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    Cow::Owned(quoted)
}

/// Substitute `{{placeholder}}` markers in a single pass. Substituted values
/// are never rescanned.
fn render_template(template: &str, values: &[(&str, &str)]) -> Result<String> {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        output.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find("}}")
            .ok_or_else(|| ApplicationError::Render("unterminated placeholder".into()))?;
        let name = after[..end].trim();
        let value = values
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
            .ok_or_else(|| {
                ApplicationError::Render(format!("no value for placeholder '{name}'"))
            })?;
        output.push_str(value);
        rest = &after[end + 2..];
    }
    output.push_str(rest);

    Ok(output)
}
