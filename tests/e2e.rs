use std::sync::Arc;

use pict_template::{
    format_resolved, Environment, PatternRegistrar, Pict, Result, TemplateExpressionProvider,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Map, Value};

struct NonceTemplate {
    environment: Arc<Environment>,
}

impl TemplateExpressionProvider for NonceTemplate {
    fn environment(&self) -> &Environment {
        &self.environment
    }

    fn register(&self, patterns: &mut PatternRegistrar<'_>) -> Result<()> {
        patterns.add_pattern("0", "0")
    }
}

struct MustacheTemplate {
    environment: Arc<Environment>,
}

impl TemplateExpressionProvider for MustacheTemplate {
    fn environment(&self) -> &Environment {
        &self.environment
    }

    fn register(&self, patterns: &mut PatternRegistrar<'_>) -> Result<()> {
        patterns.add_pattern("{{", "}}")
    }

    fn render(
        &self,
        _template_hash: &str,
        _record: &Value,
        _context: Option<&[Value]>,
        _scope: Option<&mut Value>,
        _state: Option<&Value>,
    ) -> String {
        "THIS TEMPLATE MUSTACHE YOU SOME QUESTIONS".to_string()
    }
}

struct ContextTemplate {
    environment: Arc<Environment>,
}

impl TemplateExpressionProvider for ContextTemplate {
    fn environment(&self) -> &Environment {
        &self.environment
    }

    fn register(&self, patterns: &mut PatternRegistrar<'_>) -> Result<()> {
        patterns.add_pattern("{{", "}}")
    }

    fn render(
        &self,
        template_hash: &str,
        record: &Value,
        context: Option<&[Value]>,
        _scope: Option<&mut Value>,
        _state: Option<&Value>,
    ) -> String {
        let value = self.resolve_state_from_address(template_hash, record, context, None);
        format!("WE GOT {} WHILE PARSING YOUR TEMPLATE", format_resolved(value.as_deref()))
    }
}

struct CustomRootTemplate {
    environment: Arc<Environment>,
    root: Map<String, Value>,
}

impl CustomRootTemplate {
    fn new(environment: Arc<Environment>) -> Self {
        let mut root = Map::new();
        root.insert("CustomObjectData".into(), json!("Terminat0r"));
        Self { environment, root }
    }
}

impl TemplateExpressionProvider for CustomRootTemplate {
    fn environment(&self) -> &Environment {
        &self.environment
    }

    fn register(&self, patterns: &mut PatternRegistrar<'_>) -> Result<()> {
        patterns.add_pattern("{>", "<}")
    }

    fn render(
        &self,
        template_hash: &str,
        record: &Value,
        context: Option<&[Value]>,
        _scope: Option<&mut Value>,
        _state: Option<&Value>,
    ) -> String {
        let value = self.resolve_state_from_address(template_hash, record, context, Some(&self.root));
        format!("WE GOT {} WHILE PARSING YOUR TEMPLATE", format_resolved(value.as_deref()))
    }
}

fn message() -> Value {
    json!({"message": "Hello, World!"})
}

#[test]
fn template_that_does_nothing() {
    let mut pict = Pict::default();
    let provider = pict.add_template(|environment| NonceTemplate { environment }).unwrap();
    assert_eq!(provider.template_hash(), "Default");
    assert_eq!(pict.parse_template("00", &json!({}), None), "");
}

#[test]
fn fixed_output_ignores_inputs() {
    let mut pict = Pict::default();
    pict.add_template(|environment| MustacheTemplate { environment }).unwrap();
    let out = pict.parse_template("Tell me your message in your language... {{message}}", &message(), None);
    assert_eq!(
        out,
        "Tell me your message in your language... THIS TEMPLATE MUSTACHE YOU SOME QUESTIONS"
    );
}

#[test]
fn record_qualified_address_resolves() {
    let mut pict = Pict::default();
    pict.add_template(|environment| ContextTemplate { environment }).unwrap();
    let out = pict.parse_template("Tell me your message in your language... {{Record.message}}", &message(), None);
    assert_eq!(
        out,
        "Tell me your message in your language... WE GOT Hello, World! WHILE PARSING YOUR TEMPLATE"
    );
}

#[test]
fn unqualified_address_is_undefined() {
    let mut pict = Pict::default();
    pict.add_template(|environment| ContextTemplate { environment }).unwrap();
    let out = pict.parse_template("Tell me your message in your language... {{message}}", &message(), None);
    assert_eq!(
        out,
        "Tell me your message in your language... WE GOT undefined WHILE PARSING YOUR TEMPLATE"
    );
}

#[test]
fn custom_data_root() {
    let mut pict = Pict::default();
    pict.add_template(CustomRootTemplate::new).unwrap();
    let out = pict.parse_template(
        "Tell me your message in your language... {>CustomObjectData<} {>Record.Message<}",
        &message(),
        None,
    );
    assert_eq!(
        out,
        "Tell me your message in your language... WE GOT Terminat0r WHILE PARSING YOUR TEMPLATE WE GOT undefined WHILE PARSING YOUR TEMPLATE"
    );
}

#[test]
fn context_array() {
    let mut pict = Pict::default();
    pict.add_template(|environment| ContextTemplate { environment }).unwrap();
    let context = [json!({"OtherData": "Good stuff."})];
    let out = pict.parse_template(
        "Tell me your message in your language... {{Context[0].OtherData}}",
        &message(),
        Some(context.as_slice()),
    );
    assert_eq!(
        out,
        "Tell me your message in your language... WE GOT Good stuff. WHILE PARSING YOUR TEMPLATE"
    );
    let missing = pict.parse_template("{{Context[3].OtherData}}", &message(), Some(context.as_slice()));
    assert_eq!(missing, "WE GOT undefined WHILE PARSING YOUR TEMPLATE");
}

#[test]
fn unmatched_text_is_untouched() {
    let mut pict = Pict::default();
    pict.add_template(|environment| ContextTemplate { environment }).unwrap();
    let template = "no expressions { here } or {{ there";
    assert_eq!(pict.parse_template(template, &message(), None), template);
}
