//! Loosely typed effect options.
//!
//! Options arrive as a JSON object from whoever produced the instruction.
//! Readers take a default for every key; unknown keys are ignored. Numeric
//! values are passed through without range checks, so a negative radius or an
//! opacity above one reaches the render state unchanged. Values of the wrong
//! JSON type (or non-finite numbers) fall back to the default.

use serde_json::{Map, Value};
use tracing::debug;

use crate::color::Rgba;

pub type Options = Map<String, Value>;

/// Shallow merge: keys in `overlay` replace keys in `base`.
pub fn merge(base: &Options, overlay: Options) -> Options {
    let mut out = base.clone();
    for (k, v) in overlay {
        out.insert(k, v);
    }
    out
}

/// Typed, defaulting view over an [`Options`] map.
#[derive(Debug, Copy, Clone)]
pub struct OptionsView<'a> {
    options: &'a Options,
}

impl<'a> OptionsView<'a> {
    pub fn new(options: &'a Options) -> Self {
        Self { options }
    }

    pub fn number(&self, key: &str, default: f64) -> f64 {
        match self.options.get(key) {
            None | Some(Value::Null) => default,
            Some(v) => match v.as_f64() {
                Some(n) if n.is_finite() => n,
                _ => {
                    debug!(key, value = %v, default, "option is not a number; using default");
                    default
                }
            },
        }
    }

    /// Non-negative integer option; fractional numbers are rounded.
    pub fn count(&self, key: &str, default: usize) -> usize {
        match self.options.get(key) {
            None | Some(Value::Null) => default,
            Some(v) => match v.as_u64() {
                Some(n) => n as usize,
                None => match v.as_f64() {
                    Some(n) if n.is_finite() && n >= 0.0 => n.round() as usize,
                    _ => {
                        debug!(key, value = %v, default, "option is not a count; using default");
                        default
                    }
                },
            },
        }
    }

    pub fn flag(&self, key: &str, default: bool) -> bool {
        match self.options.get(key) {
            Some(Value::Bool(b)) => *b,
            None | Some(Value::Null) => default,
            Some(v) => {
                debug!(key, value = %v, default, "option is not a boolean; using default");
                default
            }
        }
    }

    pub fn color(&self, key: &str, default: Rgba) -> Rgba {
        match self.options.get(key) {
            None | Some(Value::Null) => default,
            Some(v) => Rgba::from_value(v).unwrap_or_else(|| {
                debug!(key, value = %v, "option is not a colour; using default");
                default
            }),
        }
    }

    pub fn text(&self, key: &str) -> Option<&'a str> {
        self.options.get(key).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::{Options, OptionsView, merge};
    use crate::color::Rgba;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn opts(v: serde_json::Value) -> Options {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn missing_and_mistyped_values_use_defaults() {
        let o = opts(json!({"a": 2.5, "b": "x", "c": null, "flag": "yes"}));
        let view = OptionsView::new(&o);
        assert_eq!(view.number("a", 1.0), 2.5);
        assert_eq!(view.number("b", 1.0), 1.0);
        assert_eq!(view.number("c", 1.0), 1.0);
        assert_eq!(view.number("missing", 7.0), 7.0);
        assert!(view.flag("flag", true));
    }

    #[test]
    fn out_of_range_numbers_pass_through() {
        let o = opts(json!({"baseRadius": -50.0, "opacity": 3}));
        let view = OptionsView::new(&o);
        assert_eq!(view.number("baseRadius", 5000.0), -50.0);
        assert_eq!(view.number("opacity", 0.5), 3.0);
    }

    #[test]
    fn counts_round_and_reject_negatives() {
        let o = opts(json!({"a": 12, "b": 7.6, "c": -3}));
        let view = OptionsView::new(&o);
        assert_eq!(view.count("a", 1), 12);
        assert_eq!(view.count("b", 1), 8);
        assert_eq!(view.count("c", 1), 1);
    }

    #[test]
    fn colours_and_text() {
        let o = opts(json!({"color": "#00ff00", "bad": {}, "curve": "great_circle"}));
        let view = OptionsView::new(&o);
        assert_eq!(view.color("color", Rgba::WHITE), Rgba::rgb8(0, 255, 0));
        assert_eq!(view.color("bad", Rgba::WHITE), Rgba::WHITE);
        assert_eq!(view.text("curve"), Some("great_circle"));
    }

    #[test]
    fn merge_is_shallow_and_overrides() {
        let base = opts(json!({"a": 1, "nested": {"x": 1, "y": 2}}));
        let merged = merge(&base, opts(json!({"nested": {"x": 5}, "b": true})));
        assert_eq!(
            serde_json::Value::Object(merged),
            json!({"a": 1, "nested": {"x": 5}, "b": true})
        );
    }
}
