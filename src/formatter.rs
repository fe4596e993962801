//! Formatting entry point
//!
//! A [`Formatter`] owns the bundle resolver and an optional diagnostic
//! sink; everything else is rebuilt from scratch by each `format` call, so
//! one formatter can serve concurrent callers.

use crate::bundle::{BuiltinBundles, BundleResolver};
use crate::config::{parse_bool, Params, Properties};
use crate::diagnostics::{DiagnosticSink, Diagnostics, TracingSink};
use crate::render::RenderingEngine;
use crate::syntax::{self, CharClassConfig, RenderConfig, Tokenizer, DEFAULT_SYNTAX_NAME};

/// Parameter naming the syntax bundle
pub const SYNTAX_PARAM: &str = "syntax";
/// Parameter enabling diagnostics
pub const LOG_PARAM: &str = "log";

/// Configuration resolved for one call
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// All layers merged, special styles backfilled
    pub properties: Properties,
    pub classes: CharClassConfig,
    pub render: RenderConfig,
}

/// Source to HTML formatter
pub struct Formatter {
    resolver: Box<dyn BundleResolver>,
    sink: Option<Box<dyn DiagnosticSink>>,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter {
    /// Formatter resolving the built-in bundles
    pub fn new() -> Self {
        Self::with_resolver(BuiltinBundles)
    }

    pub fn with_resolver(resolver: impl BundleResolver + 'static) -> Self {
        Self {
            resolver: Box::new(resolver),
            sink: None,
        }
    }

    /// Builder: send diagnostics here instead of `tracing`
    pub fn with_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Format `body` as an HTML fragment
    ///
    /// `None` yields an empty string. Every other input yields a complete
    /// fragment; configuration problems are reported to the diagnostic
    /// sink (when `log=true`) and otherwise ignored.
    pub fn format(&self, body: Option<&str>, params: &Params) -> String {
        let Some(body) = body else {
            return String::new();
        };

        let diag = self.diagnostics(params);
        let resolved = self.resolve(params, &diag);

        let mut tokenizer = Tokenizer::new(trim_source(body), resolved.classes);
        RenderingEngine::new(&resolved.render, diag).render_document(&mut tokenizer)
    }

    /// Merge defaults, the named bundle and `params` into typed settings
    pub fn resolve(&self, params: &Params, diag: &Diagnostics<'_>) -> ResolvedConfig {
        let mut properties = syntax::default_properties();

        let syntax_name = params.get_str(SYNTAX_PARAM);
        if let Some(name) = syntax_name {
            match self.resolver.resolve(name) {
                Ok(bundle) => properties.merge(&bundle),
                Err(e) => diag.error(|| format!("Could not get resource: {e}")),
            }
        }

        // The bundle's keywords survive an immediate `colorcode.keywords`
        let bundle_keywords = properties.get(syntax::KEYWORDS).map(str::to_string);

        for (key, value) in params.strings() {
            properties.set(key, value);
        }

        let render = RenderConfig::from_properties(
            &mut properties,
            bundle_keywords.as_deref(),
            syntax_name.unwrap_or(DEFAULT_SYNTAX_NAME),
            diag,
        );
        let classes = CharClassConfig::from_properties(&properties);

        ResolvedConfig {
            properties,
            classes,
            render,
        }
    }

    fn diagnostics(&self, params: &Params) -> Diagnostics<'_> {
        if !params.get_str(LOG_PARAM).is_some_and(parse_bool) {
            return Diagnostics::silent();
        }
        match &self.sink {
            Some(sink) => Diagnostics::new(Some(&**sink)),
            None => Diagnostics::new(Some(&TracingSink)),
        }
    }
}

/// Drop leading and trailing whitespace and control characters
fn trim_source(body: &str) -> &str {
    body.trim_matches(|c: char| c <= ' ')
}
