use std::borrow::Cow;
use std::collections::HashMap;

/// Values bound during a single `parse` call.
///
/// This is the typed result surface: a map keyed by target identifier, plus
/// the variadic rest collector. Values borrow from argv where possible;
/// constants injected by `SetConst` actions are owned.
#[derive(Debug, Clone, Default)]
pub struct Bindings<'a> {
    values: HashMap<String, Vec<Cow<'a, str>>>,
    rest: Vec<&'a str>,
}

impl<'a> Bindings<'a> {
    /// The effective value for a target: the last occurrence wins.
    pub fn get(&self, target: &str) -> Option<&str> {
        self.values
            .get(target)
            .and_then(|v| v.last().map(|s| s.as_ref()))
    }

    /// Every value bound to a target, in occurrence order.
    pub fn get_all(&self, target: &str) -> Option<&[Cow<'a, str>]> {
        self.values.get(target).map(|v| v.as_slice())
    }

    /// Whether any value was bound to a target.
    pub fn is_set(&self, target: &str) -> bool {
        self.values.contains_key(target)
    }

    /// Tokens captured by the rest slot, in positional order.
    pub fn rest(&self) -> &[&'a str] {
        self.rest.as_slice()
    }

    /// Iterate over `(target, values)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Cow<'a, str>])> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub(crate) fn push_value(&mut self, target: &str, value: Cow<'a, str>) {
        self.values.entry(target.to_string()).or_default().push(value);
    }

    pub(crate) fn push_rest(&mut self, token: &'a str) {
        self.rest.push(token);
    }
}
