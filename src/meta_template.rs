use std::cmp::Reverse;
use std::ops::Range;
use std::sync::Arc;

use itertools::Itertools;
use serde_json::Value;
use tracing::{debug, trace};

use crate::errors::{Result, TemplateError};
use crate::provider::TemplateExpressionProvider;

/// One registered delimiter pair and the provider that renders it.
#[derive(Clone)]
pub struct Pattern {
    start: String,
    end: String,
    provider: Arc<dyn TemplateExpressionProvider>,
}

impl Pattern {
    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn end(&self) -> &str {
        &self.end
    }

    pub fn provider(&self) -> &Arc<dyn TemplateExpressionProvider> {
        &self.provider
    }
}

impl std::fmt::Debug for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pattern")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("provider", &self.provider.template_hash())
            .finish()
    }
}

struct Span<'p> {
    at: usize,
    body: Range<usize>,
    resume: usize,
    pattern: &'p Pattern,
}

/// The pattern table and scan loop.
///
/// Scanning is left to right. At each position the longest matching start
/// delimiter is tried first, ties going to the most recent registration; a
/// candidate whose end delimiter never appears is skipped. Spans do not nest.
#[derive(Clone, Default, Debug)]
pub struct MetaTemplate {
    patterns: Vec<Pattern>,
    // Indices into `patterns` in the order candidates are tried.
    priority: Vec<usize>,
}

impl MetaTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a delimiter pair for both the synchronous and asynchronous
    /// render paths of `provider`. Registration is additive.
    pub fn add_pattern_both(
        &mut self,
        start: impl Into<String>,
        end: impl Into<String>,
        provider: Arc<dyn TemplateExpressionProvider>,
    ) -> Result<()> {
        let (start, end) = (start.into(), end.into());
        if start.is_empty() || end.is_empty() {
            return Err(TemplateError::InvalidPattern(format!(
                "delimiters must be non-empty (start {start:?}, end {end:?})"
            )));
        }
        debug!(%start, %end, provider = provider.template_hash(), "registering template pattern");
        self.patterns.push(Pattern { start, end, provider });
        self.priority = self
            .patterns
            .iter()
            .enumerate()
            .sorted_by_key(|(idx, p)| (Reverse(p.start.len()), Reverse(*idx)))
            .map(|(idx, _)| idx)
            .collect();
        Ok(())
    }

    /// Registered patterns, oldest first.
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn parse_template(
        &self,
        template: &str,
        record: &Value,
        context: Option<&[Value]>,
        mut scope: Option<&mut Value>,
        state: Option<&Value>,
    ) -> String {
        let mut out = String::with_capacity(template.len());
        let mut scanner = Scanner::new(self, template);
        let mut cursor = 0;
        while let Some(span) = scanner.next_span(cursor) {
            out.push_str(&template[cursor..span.at]);
            let hash = &template[span.body.clone()];
            trace!(start = %span.pattern.start, hash, "rendering template expression");
            let rendered = span
                .pattern
                .provider
                .render(hash, record, context, scope.as_deref_mut(), state);
            out.push_str(&rendered);
            cursor = span.resume;
        }
        out.push_str(&template[cursor..]);
        out
    }

    /// Same scan as [`parse_template`](Self::parse_template), awaiting each
    /// provider in order. The first provider error stops the parse.
    pub async fn parse_template_async(
        &self,
        template: &str,
        record: &Value,
        context: Option<&[Value]>,
        mut scope: Option<&mut Value>,
        state: Option<&Value>,
    ) -> Result<String> {
        let mut out = String::with_capacity(template.len());
        let mut scanner = Scanner::new(self, template);
        let mut cursor = 0;
        while let Some(span) = scanner.next_span(cursor) {
            out.push_str(&template[cursor..span.at]);
            let hash = &template[span.body.clone()];
            trace!(start = %span.pattern.start, hash, "rendering template expression asynchronously");
            let rendered = span
                .pattern
                .provider
                .render_async(hash, record, context, scope.as_deref_mut(), state)
                .await?;
            out.push_str(&rendered);
            cursor = span.resume;
        }
        out.push_str(&template[cursor..]);
        Ok(out)
    }
}

/// Where a pattern's end delimiter was last seen during one parse.
#[derive(Debug, Clone, Copy, PartialEq)]
enum EndSearch {
    Unsearched,
    At(usize),
    // Not present after the last search start, so not after any later one.
    Missing,
}

/// One pass over a template. Remembers end delimiter positions so each end
/// is searched over any stretch of the template at most once.
struct Scanner<'m, 't> {
    meta: &'m MetaTemplate,
    template: &'t str,
    ends: Vec<EndSearch>,
}

impl<'m, 't> Scanner<'m, 't> {
    fn new(meta: &'m MetaTemplate, template: &'t str) -> Self {
        Self {
            meta,
            template,
            ends: vec![EndSearch::Unsearched; meta.patterns.len()],
        }
    }

    fn next_span(&mut self, from: usize) -> Option<Span<'m>> {
        if self.meta.patterns.is_empty() {
            return None;
        }
        let template = self.template;
        template[from..]
            .char_indices()
            .find_map(|(offset, _)| self.span_at(from + offset))
    }

    fn span_at(&mut self, at: usize) -> Option<Span<'m>> {
        let (meta, template) = (self.meta, self.template);
        let rest = &template[at..];
        for &idx in &meta.priority {
            let pattern = &meta.patterns[idx];
            if !rest.starts_with(pattern.start.as_str()) {
                continue;
            }
            let body_start = at + pattern.start.len();
            if let Some(body_end) = self.end_after(idx, body_start) {
                return Some(Span {
                    at,
                    body: body_start..body_end,
                    resume: body_end + pattern.end.len(),
                    pattern,
                });
            }
        }
        None
    }

    fn end_after(&mut self, idx: usize, from: usize) -> Option<usize> {
        match self.ends[idx] {
            EndSearch::Missing => return None,
            EndSearch::At(pos) if pos >= from => return Some(pos),
            _ => {}
        }
        let end = self.meta.patterns[idx].end.as_str();
        let found = self.template[from..].find(end).map(|offset| from + offset);
        self.ends[idx] = found.map_or(EndSearch::Missing, EndSearch::At);
        found
    }
}

/// Handed to [`TemplateExpressionProvider::register`]; binds every pattern
/// it adds to the provider being registered.
pub struct PatternRegistrar<'a> {
    meta: &'a mut MetaTemplate,
    provider: Arc<dyn TemplateExpressionProvider>,
}

impl<'a> PatternRegistrar<'a> {
    pub fn new(meta: &'a mut MetaTemplate, provider: Arc<dyn TemplateExpressionProvider>) -> Self {
        Self { meta, provider }
    }

    pub fn add_pattern(&mut self, match_start: &str, match_end: &str) -> Result<()> {
        self.meta
            .add_pattern_both(match_start, match_end, Arc::clone(&self.provider))
    }
}
