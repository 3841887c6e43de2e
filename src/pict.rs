use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::environment::{Environment, PictSettings};
use crate::errors::Result;
use crate::meta_template::{MetaTemplate, PatternRegistrar};
use crate::provider::TemplateExpressionProvider;

/// The host: shared environment plus the pattern table providers register
/// into.
#[derive(Debug, Default)]
pub struct Pict {
    environment: Arc<Environment>,
    meta_template: MetaTemplate,
}

impl Pict {
    pub fn new(settings: PictSettings) -> Self {
        Self {
            environment: Arc::new(Environment::new(settings)),
            meta_template: MetaTemplate::new(),
        }
    }

    pub fn environment(&self) -> &Arc<Environment> {
        &self.environment
    }

    pub fn meta_template(&self) -> &MetaTemplate {
        &self.meta_template
    }

    pub fn meta_template_mut(&mut self) -> &mut MetaTemplate {
        &mut self.meta_template
    }

    /// Build a provider from this host's environment, let it register its
    /// patterns, and hand it back.
    pub fn add_template<P, F>(&mut self, build: F) -> Result<Arc<P>>
    where
        P: TemplateExpressionProvider + 'static,
        F: FnOnce(Arc<Environment>) -> P,
    {
        let provider = Arc::new(build(Arc::clone(&self.environment)));
        let handle: Arc<dyn TemplateExpressionProvider> = provider.clone();
        let mut registrar = PatternRegistrar::new(&mut self.meta_template, handle);
        provider.register(&mut registrar)?;
        debug!(template = provider.template_hash(), "added template provider");
        Ok(provider)
    }

    pub fn parse_template(&self, template: &str, record: &Value, context: Option<&[Value]>) -> String {
        self.meta_template.parse_template(template, record, context, None, None)
    }

    /// Parse with a caller-owned scope carried across every expression in
    /// `template`, plus an optional catch-all state.
    pub fn parse_template_scoped(
        &self,
        template: &str,
        record: &Value,
        context: Option<&[Value]>,
        scope: Option<&mut Value>,
        state: Option<&Value>,
    ) -> String {
        self.meta_template.parse_template(template, record, context, scope, state)
    }

    pub async fn parse_template_async(
        &self,
        template: &str,
        record: &Value,
        context: Option<&[Value]>,
    ) -> Result<String> {
        self.parse_template_async_scoped(template, record, context, None, None)
            .await
    }

    pub async fn parse_template_async_scoped(
        &self,
        template: &str,
        record: &Value,
        context: Option<&[Value]>,
        scope: Option<&mut Value>,
        state: Option<&Value>,
    ) -> Result<String> {
        self.meta_template
            .parse_template_async(template, record, context, scope, state)
            .await
    }

    /// Callback form of [`parse_template_async`](Self::parse_template_async):
    /// drives the parse to completion on the current thread, then invokes
    /// `callback` exactly once.
    pub fn parse_template_with_callback<F>(
        &self,
        template: &str,
        record: &Value,
        context: Option<&[Value]>,
        callback: F,
    ) where
        F: FnOnce(Result<String>),
    {
        self.parse_template_with_callback_scoped(template, record, context, None, None, callback);
    }

    pub fn parse_template_with_callback_scoped<F>(
        &self,
        template: &str,
        record: &Value,
        context: Option<&[Value]>,
        scope: Option<&mut Value>,
        state: Option<&Value>,
        callback: F,
    ) where
        F: FnOnce(Result<String>),
    {
        let result = futures::executor::block_on(
            self.parse_template_async_scoped(template, record, context, scope, state),
        );
        callback(result);
    }
}
