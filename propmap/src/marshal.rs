//! Named objects -> properties records.

use std::io::Write;

use propmap_codec::Properties;
use tracing::debug;

use crate::config::PropmapConfig;
use crate::descriptor::PropertyObject;
use crate::error::{PropmapError, PropmapResult};
use crate::key::{PropertyKey, is_valid_instance_name};
use crate::session::Session;

/// Writes typed objects to a byte sink as properties records.
///
/// Each `marshal*` call writes one complete document: comment, optional
/// timestamp line and the sorted records, in a single write. An empty input
/// writes nothing.
#[derive(Debug)]
pub struct Marshaller<W: Write> {
    writer: W,
    session: Session,
    config: PropmapConfig,
}

impl<W: Write> Marshaller<W> {
    pub fn new(writer: W) -> Self {
        Self::with_config(writer, PropmapConfig::default())
    }

    pub fn with_config(writer: W, config: PropmapConfig) -> Self {
        Self {
            writer,
            session: Session::new(),
            config,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &PropmapConfig {
        &self.config
    }

    /// Builds the records for `objects` without writing them.
    pub fn to_records<'a, T, I>(&self, objects: I) -> PropmapResult<Properties>
    where
        T: PropertyObject,
        I: IntoIterator<Item = (&'a String, &'a T)>,
    {
        build_records(
            &self.session,
            objects.into_iter().map(|(name, object)| (name.as_str(), object)),
        )
    }

    /// Builds the records for unnamed objects, naming each one from the
    /// session counter.
    pub fn to_records_anonymous<'a, T, I>(&self, objects: I) -> PropmapResult<Properties>
    where
        T: PropertyObject,
        I: IntoIterator<Item = &'a T>,
    {
        let named: Vec<(String, &T)> = objects
            .into_iter()
            .map(|object| (self.session.next_instance_name(), object))
            .collect();
        build_records(
            &self.session,
            named.iter().map(|(name, object)| (name.as_str(), *object)),
        )
    }

    /// Writes `objects` keyed by instance name, headed by `comment`.
    ///
    /// Returns the records that were written.
    pub fn marshal<'a, T, I>(&mut self, objects: I, comment: &str) -> PropmapResult<Properties>
    where
        T: PropertyObject,
        I: IntoIterator<Item = (&'a String, &'a T)>,
    {
        let records = self.to_records(objects)?;
        self.store(&records, comment)?;
        Ok(records)
    }

    /// [`marshal`](Self::marshal) with the configured comment.
    pub fn marshal_default<'a, T, I>(&mut self, objects: I) -> PropmapResult<Properties>
    where
        T: PropertyObject,
        I: IntoIterator<Item = (&'a String, &'a T)>,
    {
        let records = self.to_records(objects)?;
        let comment = self.config.comment.clone();
        self.store(&records, &comment)?;
        Ok(records)
    }

    /// Writes a single object under `name`.
    pub fn marshal_one<T: PropertyObject>(
        &mut self,
        name: &str,
        object: &T,
        comment: &str,
    ) -> PropmapResult<Properties> {
        let records = build_records(&self.session, std::iter::once((name, object)))?;
        self.store(&records, comment)?;
        Ok(records)
    }

    /// Writes unnamed objects, naming each one from the session counter.
    pub fn marshal_anonymous<'a, T, I>(&mut self, objects: I, comment: &str) -> PropmapResult<Properties>
    where
        T: PropertyObject,
        I: IntoIterator<Item = &'a T>,
    {
        let records = self.to_records_anonymous(objects)?;
        self.store(&records, comment)?;
        Ok(records)
    }

    /// Drops the session caches, flushes and returns the sink.
    pub fn close(mut self) -> PropmapResult<W> {
        self.session.clear();
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn store(&mut self, records: &Properties, comment: &str) -> PropmapResult<()> {
        if records.is_empty() {
            debug!("nothing to marshal");
            return Ok(());
        }
        records.store(&mut self.writer, Some(comment), &self.config.store_options())?;
        debug!(records = records.len(), "marshalled records");
        Ok(())
    }
}

fn build_records<'a, T, I>(session: &Session, objects: I) -> PropmapResult<Properties>
where
    T: PropertyObject,
    I: IntoIterator<Item = (&'a str, &'a T)>,
{
    let mut objects = objects.into_iter().peekable();
    if objects.peek().is_none() {
        return Ok(Properties::new());
    }

    let schema = session.resolve::<T>()?;
    let converters = session.converters();
    let mut records = Properties::new();

    for (instance, object) in objects {
        if !is_valid_instance_name(instance) {
            return Err(PropmapError::InvalidInstanceName {
                name: instance.to_string(),
                type_name: schema.type_name().to_string(),
            });
        }
        for field in schema.fields() {
            let key = PropertyKey::compose(schema.root_name(), instance, field.key());
            let value = match field.read(object, converters) {
                Ok(value) => value,
                Err(source) => {
                    return Err(PropmapError::Conversion {
                        key,
                        type_name: schema.type_name().to_string(),
                        field: field.name().to_string(),
                        source,
                    });
                }
            };
            records.set(key, value);
        }
    }
    Ok(records)
}
