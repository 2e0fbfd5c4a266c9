//! Epitaph rendering for the preview page.
//!
//! The escaped literal text is always computed first and is the fallback for
//! every other branch. Only in challenge mode is the submitted source filtered
//! and evaluated as a template, and its output is then embedded as is.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::context::RenderContext;
use crate::filter::InputFilter;
use crate::renderer::TemplateRenderer;

/// Appended when the epitaph was shown without evaluation.
pub const SAFE_MODE_MARKER: &str = "<!-- safe mode: no template is evaluated -->";

/// Appended when evaluation failed and the literal text is shown instead.
pub const RENDER_ERROR_MARKER: &str = "<!-- render error; text shown in safe mode -->";

pub const DEFAULT_INSCRIPTION: &str = "Em memória";
pub const DEFAULT_EPITAPH: &str = "— Rest in peace —";

/// Escapes `input` for literal display inside HTML.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Result of rendering one epitaph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Challenge mode off: escaped literal text.
    SafeText(String),
    /// Challenge mode on: template output, not re-escaped.
    Evaluated(String),
    /// Evaluation failed: escaped literal text of the unfiltered input.
    EvaluationFailed(String),
}

impl RenderOutcome {
    pub fn body(&self) -> &str {
        match self {
            Self::SafeText(s) | Self::Evaluated(s) | Self::EvaluationFailed(s) => s,
        }
    }

    pub fn marker(&self) -> Option<&'static str> {
        match self {
            Self::SafeText(_) => Some(SAFE_MODE_MARKER),
            Self::Evaluated(_) => None,
            Self::EvaluationFailed(_) => Some(RENDER_ERROR_MARKER),
        }
    }

    /// The HTML fragment embedded into the preview page.
    pub fn to_html(&self) -> String {
        match self.marker() {
            Some(marker) => format!("{}{marker}", self.body()),
            None => self.body().to_string(),
        }
    }
}

/// Chooses between literal display and template evaluation.
pub struct RenderSelector {
    challenge_mode: bool,
    filter: InputFilter,
    renderer: Box<dyn TemplateRenderer + Send + Sync>,
}

impl RenderSelector {
    pub fn new(
        challenge_mode: bool,
        filter: InputFilter,
        renderer: Box<dyn TemplateRenderer + Send + Sync>,
    ) -> Self {
        Self {
            challenge_mode,
            filter,
            renderer,
        }
    }

    /// Renders `raw` once. Never fails: evaluation errors become
    /// [`RenderOutcome::EvaluationFailed`].
    pub fn render(&self, raw: &str, context: &RenderContext) -> RenderOutcome {
        let safe = escape_html(raw);
        if !self.challenge_mode {
            return RenderOutcome::SafeText(safe);
        }

        let filtered = self.filter.filter(raw);
        debug!("Evaluating epitaph template for '{}'", context.user.username);
        match self.renderer.render(&filtered, context.to_value()) {
            Ok(rendered) => RenderOutcome::Evaluated(rendered),
            Err(e) => {
                warn!("Epitaph evaluation failed, showing literal text: {e}");
                RenderOutcome::EvaluationFailed(safe)
            }
        }
    }

    /// Renders `raw` on the blocking pool, giving up after `limit`.
    ///
    /// A render that overruns keeps its blocking thread until its fuel runs
    /// out, but the caller gets the escaped fallback immediately.
    pub async fn render_within(
        self: Arc<Self>,
        raw: String,
        context: RenderContext,
        limit: Duration,
    ) -> RenderOutcome {
        let fallback = escape_html(&raw);
        let task = tokio::task::spawn_blocking(move || self.render(&raw, &context));
        match tokio::time::timeout(limit, task).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => {
                warn!("Epitaph evaluation task failed, showing literal text: {e}");
                RenderOutcome::EvaluationFailed(fallback)
            }
            Err(_) => {
                warn!("Epitaph evaluation exceeded {limit:?}, showing literal text");
                RenderOutcome::EvaluationFailed(fallback)
            }
        }
    }
}

/// Raw fields of the preview form. Missing fields fall back to defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreviewForm {
    pub inscription: Option<String>,
    pub nome: Option<String>,
    pub inscricao: Option<String>,
    pub epitaph_template: Option<String>,
    pub shape: Option<String>,
    pub material: Option<String>,
    pub ornament: Option<String>,
    pub font: Option<String>,
    pub born: Option<String>,
    pub died: Option<String>,
}

/// The tombstone described by a preview form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tombstone {
    pub inscription: String,
    pub shape: String,
    pub material: String,
    pub ornament: String,
    pub font: String,
    pub born: String,
    pub died: String,
}

fn or_default(value: &Option<String>, default: &str) -> String {
    value.clone().unwrap_or_else(|| default.to_string())
}

impl PreviewForm {
    pub fn epitaph_template(&self) -> &str {
        self.epitaph_template.as_deref().unwrap_or(DEFAULT_EPITAPH)
    }

    /// Resolves the tombstone fields. The inscription may arrive under any of
    /// its aliases; the first non-empty one is used.
    pub fn tombstone(&self) -> Tombstone {
        let inscription = [&self.inscription, &self.nome, &self.inscricao]
            .into_iter()
            .flatten()
            .find(|value| !value.is_empty())
            .cloned()
            .unwrap_or_else(|| DEFAULT_INSCRIPTION.to_string());

        Tombstone {
            inscription,
            shape: or_default(&self.shape, "classic"),
            material: or_default(&self.material, "granite"),
            ornament: or_default(&self.ornament, "skull"),
            font: or_default(&self.font, "gothic"),
            born: or_default(&self.born, "1900"),
            died: or_default(&self.died, "2000"),
        }
    }
}
