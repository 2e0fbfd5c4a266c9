//! Page templates of the service.
//! These are trusted templates rendered in a strict environment; user input
//! only ever reaches them as escaped values, except for the epitaph fragment
//! produced by [`RenderSelector`](crate::preview::RenderSelector).

use minijinja::{context, Environment, UndefinedBehavior, Value};

use crate::config::Meta;
use crate::context::{User, THEME};
use crate::error::Result;
use crate::preview::{RenderOutcome, Tombstone};

const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");
const PREVIEW_TEMPLATE: &str = include_str!("../templates/preview.html");

/// Renders the listing and preview pages.
pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    /// Builds the page environment. Missing variables are errors and `.html`
    /// templates are auto-escaped.
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.add_template("index.html", INDEX_TEMPLATE)?;
        env.add_template("preview.html", PREVIEW_TEMPLATE)?;
        Ok(Self { env })
    }

    pub fn index(&self, user: &User, meta: &Meta) -> Result<String> {
        let tmpl = self.env.get_template("index.html")?;
        Ok(tmpl.render(context! { user, meta, theme => THEME })?)
    }

    pub fn preview(
        &self,
        tombstone: &Tombstone,
        outcome: &RenderOutcome,
        user: &User,
        meta: &Meta,
    ) -> Result<String> {
        let tmpl = self.env.get_template("preview.html")?;
        let epitaph = Value::from_safe_string(outcome.to_html());
        Ok(tmpl.render(context! { tombstone, epitaph, user, meta })?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> Meta {
        Meta {
            release: "r1".to_string(),
            support: "s@example.com".to_string(),
        }
    }

    #[test]
    fn test_index_lists_theme_options() {
        let pages = PageRenderer::new().unwrap();
        let html = pages.index(&User::guest(), &meta()).unwrap();
        assert!(html.contains("visitante"));
        assert!(html.contains(r#"<option value="obelisk">"#));
        assert!(html.contains(r#"<option value="raven">"#));
        assert!(html.contains("release r1"));
    }

    #[test]
    fn test_preview_escapes_fields_but_not_epitaph() {
        let pages = PageRenderer::new().unwrap();
        let tombstone = Tombstone {
            inscription: "<i>Igor</i>".to_string(),
            shape: "classic".to_string(),
            material: "granite".to_string(),
            ornament: "bat".to_string(),
            font: "runes".to_string(),
            born: "1850".to_string(),
            died: "1931".to_string(),
        };
        let outcome = RenderOutcome::Evaluated("<b>49</b>".to_string());
        let html = pages
            .preview(&tombstone, &outcome, &User::guest(), &meta())
            .unwrap();
        assert!(html.contains("&lt;i&gt;Igor"));
        assert!(!html.contains("<i>Igor"));
        assert!(html.contains("<b>49</b>"));
    }
}
