//! Evaluation context for epitaph templates.
//! Assembles the data a challenge-mode template can reach: the current user,
//! their latest order, the theme options and release metadata.

use serde::{Deserialize, Serialize};

use crate::config::Meta;

/// An order record. Fields are opaque and passed through to templates as stored.
pub type Order = serde_json::Map<String, serde_json::Value>;

/// A user record as held in the user store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub plan: String,
    #[serde(default)]
    pub orders: Vec<Order>,
    /// Any additional stored fields, kept so templates see the full record.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl User {
    /// Placeholder handed out when the store cannot be read.
    pub fn guest() -> Self {
        Self {
            username: "visitante".to_string(),
            email: "visitante@spooku.edu".to_string(),
            plan: "Convidado".to_string(),
            orders: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }

    /// The most recent order, or an empty record when there is none.
    pub fn latest_order(&self) -> Order {
        self.orders.last().cloned().unwrap_or_default()
    }
}

/// Fixed tombstone customisation options, keyed by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub shapes: &'static [&'static str],
    pub materials: &'static [&'static str],
    pub ornaments: &'static [&'static str],
    pub fonts: &'static [&'static str],
}

pub const THEME: Theme = Theme {
    shapes: &["classic", "obelisk", "cross", "tablet"],
    materials: &["granite", "marble", "sandstone", "basalt"],
    ornaments: &["skull", "bat", "cobweb", "rose", "raven"],
    fonts: &["gothic", "cursive", "runes", "serif"],
};

/// Values that look hidden but only mirror what [`Meta`] already exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decoys {
    pub build: String,
    pub contact: String,
}

impl From<&Meta> for Decoys {
    fn from(meta: &Meta) -> Self {
        Self {
            build: meta.release.clone(),
            contact: meta.support.clone(),
        }
    }
}

/// Data exposed to a challenge-mode template. Built per request.
#[derive(Debug, Clone, Serialize)]
pub struct RenderContext {
    pub user: User,
    pub order: Order,
    pub theme: Theme,
    pub meta: Meta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decoys: Option<Decoys>,
}

impl RenderContext {
    /// Converts the context into a template value.
    pub fn to_value(&self) -> minijinja::Value {
        minijinja::Value::from_serialize(self)
    }
}

/// Builds the evaluation context for `user`.
///
/// `decoys` is only present in challenge mode and always equals `meta`
/// field for field, so no secret ever reaches a template.
pub fn build_context(user: User, challenge_mode: bool, meta: &Meta) -> RenderContext {
    let order = user.latest_order();
    let decoys = challenge_mode.then(|| Decoys::from(meta));
    RenderContext {
        user,
        order,
        theme: THEME,
        meta: meta.clone(),
        decoys,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn meta() -> Meta {
        Meta {
            release: "abc123".to_string(),
            support: "help@example.com".to_string(),
        }
    }

    #[test]
    fn test_latest_order() {
        let mut user = User::guest();
        assert!(user.latest_order().is_empty());

        let first = json!({"id": 1}).as_object().cloned().unwrap();
        let second = json!({"id": 2}).as_object().cloned().unwrap();
        user.orders = vec![first, second.clone()];
        assert_eq!(user.latest_order(), second);
    }

    #[test]
    fn test_decoys_only_in_challenge_mode() {
        let ctx = build_context(User::guest(), false, &meta());
        assert!(ctx.decoys.is_none());
        let value = serde_json::to_value(&ctx).unwrap();
        assert!(value.get("decoys").is_none());

        let ctx = build_context(User::guest(), true, &meta());
        let decoys = ctx.decoys.unwrap();
        assert_eq!(decoys.build, ctx.meta.release);
        assert_eq!(decoys.contact, ctx.meta.support);
    }

    #[test]
    fn test_theme_serializes_as_mapping() {
        let value = serde_json::to_value(THEME).unwrap();
        assert_eq!(value["shapes"][0], "classic");
        assert_eq!(value["ornaments"].as_array().unwrap().len(), 5);
    }
}
