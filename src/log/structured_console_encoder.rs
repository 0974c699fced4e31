//! log4rs encoder that renders a record through a pattern and then appends
//! its structured key/value pairs as `key=value`.
//!
//! Values containing whitespace or `=` are quoted so lines stay splittable.

use std::fmt::Write as _;

use log::{
    Record,
    kv::{Error, Key, Value, VisitSource},
};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::encode::{Color, Encode, Style, Write};
use serde::Deserialize;

const DEFAULT_PATTERN: &str = "{d} {l} {t} - {m}";

#[derive(Debug, Deserialize)]
pub struct StructuredConsoleEncoderConfig {
    pub pattern: Option<String>,
}

#[derive(Debug)]
pub struct StructuredConsoleEncoder {
    delegate: PatternEncoder,
}

impl StructuredConsoleEncoder {
    pub fn new(pattern: &str) -> Self {
        Self {
            delegate: PatternEncoder::new(pattern),
        }
    }
}

impl Encode for StructuredConsoleEncoder {
    fn encode(&self, w: &mut dyn Write, record: &Record) -> anyhow::Result<()> {
        self.delegate.encode(w, record)?;

        let mut pairs = PairCollector::default();
        if let Err(e) = record.key_values().visit(&mut pairs) {
            pairs.push("kv_error".to_string(), e.to_string());
        }

        for (key, value) in &pairs.0 {
            w.set_style(Style::new().text(Color::Cyan))?;
            write!(w, " {}=", key)?;
            w.set_style(&Style::default())?;
            w.write_all(value.as_bytes())?;
        }

        w.write_all(b"\n")?;
        Ok(())
    }
}

#[derive(Default)]
struct PairCollector(Vec<(String, String)>);

impl PairCollector {
    fn push(&mut self, key: String, raw: String) {
        self.0.push((key, quote_if_needed(raw)));
    }
}

impl<'kvs> VisitSource<'kvs> for PairCollector {
    fn visit_pair(&mut self, key: Key<'kvs>, value: Value<'kvs>) -> Result<(), Error> {
        let mut rendered = String::new();
        write!(rendered, "{}", value).map_err(|_| Error::msg("failed to render value"))?;
        self.push(key.to_string(), rendered);
        Ok(())
    }
}

fn quote_if_needed(value: String) -> String {
    if value.is_empty() || value.chars().any(|c| c.is_whitespace() || c == '=' || c == '"') {
        format!("{:?}", value)
    } else {
        value
    }
}

pub struct StructuredConsoleEncoderDeserializer;

impl log4rs::config::Deserialize for StructuredConsoleEncoderDeserializer {
    type Trait = dyn Encode;
    type Config = StructuredConsoleEncoderConfig;

    fn deserialize(
        &self,
        config: StructuredConsoleEncoderConfig,
        _: &log4rs::config::Deserializers,
    ) -> anyhow::Result<Box<dyn Encode>> {
        let pattern = config.pattern.as_deref().unwrap_or(DEFAULT_PATTERN);
        Ok(Box::new(StructuredConsoleEncoder::new(pattern)))
    }
}
