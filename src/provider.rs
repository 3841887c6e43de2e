//! Template expression providers.
//!
//! A provider owns one delimiter syntax. The host scans a template string,
//! and for every span bounded by one of the provider's delimiter pairs it
//! calls [`TemplateExpressionProvider::render`] (or `render_async`) with the
//! text between the delimiters.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use pict_template::{format_resolved, Environment, PatternRegistrar, Pict, TemplateExpressionProvider};
//! use serde_json::{json, Value};
//!
//! struct Shout { environment: Arc<Environment> }
//!
//! impl TemplateExpressionProvider for Shout {
//!     fn environment(&self) -> &Environment { &self.environment }
//!     fn register(&self, patterns: &mut PatternRegistrar<'_>) -> pict_template::Result<()> {
//!         patterns.add_pattern("<<", ">>")
//!     }
//!     fn render(&self, hash: &str, record: &Value, context: Option<&[Value]>,
//!               _scope: Option<&mut Value>, _state: Option<&Value>) -> String {
//!         let value = self.resolve_state_from_address(hash, record, context, None);
//!         format_resolved(value.as_deref()).to_uppercase()
//!     }
//! }
//!
//! let mut pict = Pict::default();
//! pict.add_template(|environment| Shout { environment }).unwrap();
//! let out = pict.parse_template("hi <<Record.name>>, <<name>>", &json!({"name": "ada"}), None);
//! assert_eq!(out, "hi ADA, UNDEFINED");
//! ```

use std::borrow::Cow;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::environment::Environment;
use crate::errors::Result;
use crate::manifest::{get_value_by_hash, AddressRoot, Node};
use crate::meta_template::PatternRegistrar;

/// Hash used by providers that do not name themselves.
pub const DEFAULT_TEMPLATE_HASH: &str = "Default";

#[async_trait]
pub trait TemplateExpressionProvider: Send + Sync {
    /// The host handle this provider was built with.
    fn environment(&self) -> &Environment;

    fn template_hash(&self) -> &str {
        DEFAULT_TEMPLATE_HASH
    }

    /// Called once when the provider is added to a host. Each
    /// `add_pattern` call on the registrar adds one more delimiter pair.
    fn register(&self, _patterns: &mut PatternRegistrar<'_>) -> Result<()> {
        Ok(())
    }

    /// Render the text found between a matched delimiter pair.
    fn render(
        &self,
        _template_hash: &str,
        _record: &Value,
        _context: Option<&[Value]>,
        _scope: Option<&mut Value>,
        _state: Option<&Value>,
    ) -> String {
        String::new()
    }

    /// Asynchronous form of [`render`](Self::render). The default completes on
    /// first poll with whatever `render` returns; override this directly for
    /// work that really suspends.
    async fn render_async(
        &self,
        template_hash: &str,
        record: &Value,
        context: Option<&[Value]>,
        scope: Option<&mut Value>,
        state: Option<&Value>,
    ) -> Result<String> {
        Ok(self.render(template_hash, record, context, scope, state))
    }

    /// Resolve a dotted address against the merged root data object.
    ///
    /// The root exposes `Pict`/`Fable`, `AppData`, `Bundle`, `Context` and
    /// `Record`, layered over the keys of `root` when one is given. `None`
    /// means the address did not resolve.
    fn resolve_state_from_address<'a>(
        &'a self,
        address: &str,
        record: &'a Value,
        context: Option<&'a [Value]>,
        root: Option<&'a Map<String, Value>>,
    ) -> Option<Cow<'a, Value>> {
        let root = RootData::new(self.environment(), record, context, root);
        get_value_by_hash(root, address)
    }
}

/// Per-call overlay of host references, context and record over an
/// optional caller-supplied object. The caller's object is never modified.
#[derive(Debug, Clone, Copy)]
pub struct RootData<'a> {
    environment: &'a Environment,
    context: &'a [Value],
    record: &'a Value,
    custom: Option<&'a Map<String, Value>>,
}

impl<'a> RootData<'a> {
    /// A missing context defaults to a single-element sequence holding the
    /// host itself.
    pub fn new(
        environment: &'a Environment,
        record: &'a Value,
        context: Option<&'a [Value]>,
        custom: Option<&'a Map<String, Value>>,
    ) -> Self {
        let context = context.unwrap_or_else(|| std::slice::from_ref(environment.as_value()));
        Self { environment, context, record, custom }
    }

    pub fn context(&self) -> &'a [Value] {
        self.context
    }
}

impl<'a> AddressRoot<'a> for RootData<'a> {
    fn member(&self, key: &str) -> Option<Node<'a>> {
        match key {
            "Pict" | "Fable" => Some(Node::Value(self.environment.as_value())),
            "AppData" => Some(Node::Value(self.environment.app_data())),
            "Bundle" => Some(Node::Value(self.environment.bundle())),
            "Context" => Some(Node::List(self.context)),
            "Record" => Some(Node::Value(self.record)),
            _ => self.custom.and_then(|custom| custom.get(key)).map(Node::Value),
        }
    }
}

/// Display a resolved value the way template output usually wants it:
/// strings bare, misses as `undefined`, everything else as compact JSON.
pub fn format_resolved(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
