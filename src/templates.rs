//! Ready-made providers.

use std::sync::Arc;

use serde_json::Value;

use crate::environment::Environment;
use crate::errors::Result;
use crate::meta_template::PatternRegistrar;
use crate::provider::{format_resolved, TemplateExpressionProvider};

/// A provider with every default: it renders each matched span as `""`.
pub struct DefaultTemplate {
    environment: Arc<Environment>,
    patterns: Vec<(String, String)>,
}

impl DefaultTemplate {
    pub fn new(environment: Arc<Environment>) -> Self {
        Self { environment, patterns: Vec::new() }
    }

    pub fn with_pattern(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.patterns.push((start.into(), end.into()));
        self
    }
}

impl TemplateExpressionProvider for DefaultTemplate {
    fn environment(&self) -> &Environment {
        &self.environment
    }

    fn register(&self, patterns: &mut PatternRegistrar<'_>) -> Result<()> {
        for (start, end) in &self.patterns {
            patterns.add_pattern(start, end)?;
        }
        Ok(())
    }
}

/// Renders the value found at the address between the delimiters; misses
/// render as nothing.
pub struct DataTemplate {
    environment: Arc<Environment>,
    start: String,
    end: String,
}

impl DataTemplate {
    pub const START: &'static str = "{~D:";
    pub const END: &'static str = "~}";

    pub fn new(environment: Arc<Environment>) -> Self {
        Self::with_delimiters(environment, Self::START, Self::END)
    }

    pub fn with_delimiters(
        environment: Arc<Environment>,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        Self { environment, start: start.into(), end: end.into() }
    }
}

impl TemplateExpressionProvider for DataTemplate {
    fn environment(&self) -> &Environment {
        &self.environment
    }

    fn template_hash(&self) -> &str {
        "Data"
    }

    fn register(&self, patterns: &mut PatternRegistrar<'_>) -> Result<()> {
        patterns.add_pattern(&self.start, &self.end)
    }

    fn render(
        &self,
        template_hash: &str,
        record: &Value,
        context: Option<&[Value]>,
        _scope: Option<&mut Value>,
        _state: Option<&Value>,
    ) -> String {
        self.resolve_state_from_address(template_hash, record, context, None)
            .map(|value| format_resolved(Some(&*value)))
            .unwrap_or_default()
    }
}
