pub mod errors;
pub mod environment;
pub mod manifest;
pub mod meta_template;
pub mod pict;
pub mod provider;
pub mod templates;
mod parser;

pub use environment::{Environment, PictSettings};
pub use errors::{Result, TemplateError};
pub use manifest::get_value_by_hash;
pub use meta_template::{MetaTemplate, Pattern, PatternRegistrar};
pub use pict::Pict;
pub use provider::{format_resolved, RootData, TemplateExpressionProvider, DEFAULT_TEMPLATE_HASH};
pub use templates::{DataTemplate, DefaultTemplate};

/// Re-exported so providers can write `#[pict_template::async_trait]` when
/// overriding `render_async`.
pub use async_trait::async_trait;
