//! Template renderer used for challenge-mode epitaphs.
//! Evaluates untrusted template source with MiniJinja under a fuel budget and
//! a recursion ceiling, so loops or recursive macros authored in the input
//! cannot run unbounded. Fuel only counts template instructions, so `range`
//! is also capped to keep the work done per instruction small.
use crate::error::Result;
use minijinja::{AutoEscape, Environment, ErrorKind, UndefinedBehavior, Value};

/// Maximum nesting depth of template constructs.
pub const RECURSION_LIMIT: usize = 64;

/// Maximum number of items a template may create with `range`.
pub const MAX_RANGE: u32 = 1_000;

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders a template string with the given context.
    ///
    /// # Arguments
    /// * `template` - Template source to evaluate
    /// * `context` - Variables visible to the template
    ///
    /// # Returns
    /// * `Result<String>` - Rendered output
    fn render(&self, template: &str, context: Value) -> Result<String>;
}

/// `range` with at most [`MAX_RANGE`] items.
fn bounded_range(
    lower: u32,
    upper: Option<u32>,
    step: Option<u32>,
) -> std::result::Result<Value, minijinja::Error> {
    let (start, end) = match upper {
        Some(upper) => (lower, upper),
        None => (0, lower),
    };
    let step = step.unwrap_or(1);
    if step == 0 {
        return Err(minijinja::Error::new(
            ErrorKind::InvalidOperation,
            "range step must not be zero",
        ));
    }
    if end.saturating_sub(start).div_ceil(step) > MAX_RANGE {
        return Err(minijinja::Error::new(
            ErrorKind::InvalidOperation,
            format!("range may not exceed {MAX_RANGE} items"),
        ));
    }
    let items: Vec<u32> = (start..end).step_by(step as usize).collect();
    Ok(Value::from(items))
}

/// MiniJinja-based template rendering engine.
pub struct MiniJinjaRenderer {
    /// MiniJinja environment instance
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    /// Creates a renderer with the given evaluation budget.
    ///
    /// Interpolated values are HTML-escaped unless marked `safe`. Undefined
    /// names render as empty, while control constructs and attribute access
    /// run as written.
    pub fn new(fuel: u64) -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Lenient);
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        env.set_recursion_limit(RECURSION_LIMIT);
        env.set_fuel(Some(fuel));
        env.add_function("range", bounded_range);
        Self { env }
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        MiniJinjaRenderer::new(crate::config::DEFAULT_FUEL)
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    /// Renders a template string using MiniJinja.
    ///
    /// # Errors
    /// * `Error::TemplateError` if the source does not parse, a runtime
    ///   operation fails or the fuel budget is exhausted
    fn render(&self, template: &str, context: Value) -> Result<String> {
        Ok(self.env.render_str(template, context)?)
    }
}
