//! Library side of the `propmap` binary: key inspection and the mapping demo.

use std::collections::BTreeMap;
use std::fmt;

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use propmap::{
    CommaSeparated, KeyError, Marshaller, ObjectType, Properties, PropertyInstance,
    PropertyKey, PropertyObject, PropmapConfig, Rfc3339, Unmarshaller,
};
use tracing::{debug, info};

/// Records grouped as `root / instance / field = value`, plus the keys that
/// do not follow the `root.instance.field` grammar.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct InspectReport {
    pub roots: BTreeMap<String, BTreeMap<String, BTreeMap<String, String>>>,
    pub malformed: Vec<(String, KeyError)>,
}

impl InspectReport {
    pub fn instance_count(&self) -> usize {
        self.roots.values().map(BTreeMap::len).sum()
    }

    fn insert(&mut self, root: &str, key: PropertyKey<'_>, value: &str) {
        self.roots
            .entry(root.to_string())
            .or_default()
            .entry(key.instance.to_string())
            .or_default()
            .insert(key.field.to_string(), value.to_string());
    }
}

/// Groups `properties` by root and instance.
///
/// With `root` set, only that namespace is inspected; otherwise the root of
/// each key is its first segment.
pub fn inspect(properties: &Properties, root: Option<&str>) -> InspectReport {
    let mut report = InspectReport::default();
    for (key, value) in properties.iter() {
        let (key_root, parsed) = match root {
            Some(root) => match PropertyKey::parse_in(root, key) {
                Some(parsed) => (root, parsed),
                None => continue,
            },
            None => match key.split_once('.') {
                Some((key_root, rest)) if !key_root.is_empty() => {
                    (key_root, PropertyKey::parse(rest))
                }
                _ => (key, Err(KeyError::MissingInstanceName)),
            },
        };
        match parsed {
            Ok(parsed) => report.insert(key_root, parsed, value),
            Err(e) => report.malformed.push((key.to_string(), e)),
        }
    }
    debug!(
        roots = report.roots.len(),
        instances = report.instance_count(),
        malformed = report.malformed.len(),
        "inspected records"
    );
    report
}

impl fmt::Display for InspectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (root, instances) in &self.roots {
            writeln!(f, "{root}")?;
            for (instance, fields) in instances {
                writeln!(f, "  {instance}")?;
                for (field, value) in fields {
                    writeln!(f, "    {field} = {value}")?;
                }
            }
        }
        if !self.malformed.is_empty() {
            writeln!(f, "malformed keys:")?;
            for (key, reason) in &self.malformed {
                writeln!(f, "  {key}: {reason}")?;
            }
        }
        Ok(())
    }
}

/// Demo type with default root and keys.
#[derive(Debug, Clone, Default, PartialEq, PropertyObject)]
pub struct Customer {
    #[property]
    pub name: String,
    #[property]
    pub phone: i64,
    #[property(name = "tags", converter = CommaSeparated<String>)]
    pub labels: Vec<String>,
}

/// Demo type with a renamed root, a dotted key and a timestamp.
#[derive(Debug, Clone, Default, PartialEq, PropertyObject)]
#[property_root(name = "server")]
pub struct Configuration {
    #[property(name = "listen.port")]
    pub port: u16,
    #[property]
    pub host: String,
    #[property(converter = Rfc3339)]
    pub deployed: DateTime<Utc>,
}

fn demo_customers() -> BTreeMap<String, Customer> {
    BTreeMap::from([
        (
            "dan".to_string(),
            Customer {
                name: "Daniel".to_string(),
                phone: 987,
                labels: vec!["vip".to_string()],
            },
        ),
        (
            "eve".to_string(),
            Customer {
                name: "Eve Ödegaard".to_string(),
                phone: 123,
                labels: Vec::new(),
            },
        ),
    ])
}

fn demo_configurations() -> Result<BTreeMap<String, Configuration>> {
    let deployed = Utc
        .with_ymd_and_hms(2024, 5, 1, 12, 30, 0)
        .single()
        .context("invalid demo timestamp")?;
    Ok(BTreeMap::from([(
        "primary".to_string(),
        Configuration {
            port: 8080,
            host: "localhost".to_string(),
            deployed,
        },
    )]))
}

/// Marshals the demo objects, reads them back and returns the written
/// document followed by a summary of what came back.
pub fn demo(config: PropmapConfig) -> Result<String> {
    let customers = demo_customers();
    let configurations = demo_configurations()?;

    // Both types go into one document, so the records are merged and stored in a single write.
    let marshaller = Marshaller::with_config(Vec::new(), config.clone());
    let mut records = marshaller.to_records(&customers)?;
    records.extend(marshaller.to_records(&configurations)?);
    let mut bytes = marshaller.close()?;
    records
        .store(&mut bytes, Some(&config.comment), &config.store_options())
        .context("failed to render demo document")?;
    info!(records = records.len(), "demo document written");

    let unmarshaller = Unmarshaller::load(bytes.as_slice())?;
    let instances = unmarshaller
        .unmarshal_many(&[ObjectType::of::<Customer>(), ObjectType::of::<Configuration>()])?;
    let count = instances.len();
    let back_customers: BTreeMap<String, Customer> =
        PropertyInstance::into_map::<Customer>(instances).into_iter().collect();
    let back_configurations: BTreeMap<String, Configuration> =
        unmarshaller.unmarshal::<Configuration>()?.into_iter().collect();
    unmarshaller.close();

    anyhow::ensure!(back_customers == customers, "customers did not round trip");
    anyhow::ensure!(
        back_configurations == configurations,
        "configurations did not round trip"
    );

    let mut out = String::from_utf8(bytes).context("demo document is not UTF-8")?;
    out.push_str(&format!("\n# {count} objects read back unchanged\n"));
    for (name, customer) in &back_customers {
        out.push_str(&format!("# Customer {name}: {customer:?}\n"));
    }
    for (name, configuration) in &back_configurations {
        out.push_str(&format!("# Configuration {name}: {configuration:?}\n"));
    }
    Ok(out)
}
