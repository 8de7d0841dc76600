use std::borrow::Cow;

use tracing::debug;

use crate::bindings::Bindings;
use crate::error::{ConfigError, ParseError};

/// A named positional slot, bound by position rather than by flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub(crate) name: String,
    pub(crate) required: bool,
}

impl Slot {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn required(&self) -> bool {
        self.required
    }
}

/// The trailing variadic collector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestSlot {
    pub(crate) name: String,
    pub(crate) min: usize,
}

impl RestSlot {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min(&self) -> usize {
        self.min
    }
}

/// Ordered positional slots (required before optional) plus an optional
/// trailing rest collector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionalSpec {
    slots: Vec<Slot>,
    rest: Option<RestSlot>,
}

impl PositionalSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a required slot. Required slots must precede optional ones,
    /// and all named slots must precede the rest slot.
    pub fn required(&mut self, name: impl Into<String>) -> Result<(), ConfigError> {
        let name = name.into();
        if self.slots.iter().any(|s| !s.required) {
            return Err(ConfigError::RequiredAfterOptional { slot: name });
        }
        self.push(Slot { name, required: true })
    }

    /// Declare an optional slot; unfilled optional slots keep the caller's
    /// default.
    pub fn optional(&mut self, name: impl Into<String>) -> Result<(), ConfigError> {
        self.push(Slot {
            name: name.into(),
            required: false,
        })
    }

    /// Declare the trailing variadic collector with a minimum length.
    pub fn rest(&mut self, name: impl Into<String>, min: usize) -> Result<(), ConfigError> {
        let name = name.into();
        if self.rest.is_some() {
            return Err(ConfigError::RestAlreadyDeclared { slot: name });
        }
        if self.slots.iter().any(|s| s.name == name) {
            return Err(ConfigError::DuplicateSlot { slot: name });
        }
        self.rest = Some(RestSlot { name, min });
        Ok(())
    }

    fn push(&mut self, slot: Slot) -> Result<(), ConfigError> {
        if self.rest.is_some() {
            return Err(ConfigError::SlotAfterRest { slot: slot.name });
        }
        if self
            .slots
            .iter()
            .any(|s| s.name == slot.name)
            || self.rest.as_ref().is_some_and(|r| r.name == slot.name)
        {
            return Err(ConfigError::DuplicateSlot { slot: slot.name });
        }
        self.slots.push(slot);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty() && self.rest.is_none()
    }

    pub fn slots(&self) -> &[Slot] {
        self.slots.as_slice()
    }

    pub fn rest_slot(&self) -> Option<&RestSlot> {
        self.rest.as_ref()
    }

    /// Assign leftover tokens to the declared slots.
    ///
    /// Check order: required-slot shortage first, then surplus without a
    /// rest slot, then the rest minimum. With a rest slot declared a surplus
    /// can never be an error, so the last two checks are mutually exclusive.
    pub(crate) fn bind<'a>(
        &self,
        tokens: Vec<&'a str>,
        bindings: &mut Bindings<'a>,
    ) -> Result<(), ParseError> {
        let required = self.slots.iter().filter(|s| s.required).count();
        if tokens.len() < required {
            return Err(ParseError::MissingPositionals {
                missing: required - tokens.len(),
            });
        }

        let mut tokens = tokens.into_iter();
        for slot in &self.slots {
            match tokens.next() {
                Some(token) => {
                    debug!(slot = %slot.name, value = token, "bound positional slot");
                    bindings.push_value(&slot.name, Cow::Borrowed(token));
                }
                None => {
                    // Only optional slots can be unfilled here.
                    debug!(slot = %slot.name, "positional slot left at its default");
                }
            }
        }

        let surplus: Vec<&str> = tokens.collect();
        match &self.rest {
            Some(rest) => {
                if surplus.len() < rest.min {
                    return Err(ParseError::RestTooFew {
                        slot: rest.name.clone(),
                        min: rest.min,
                        got: surplus.len(),
                    });
                }
                for token in surplus {
                    bindings.push_rest(token);
                }
                Ok(())
            }
            None => match surplus.first() {
                Some(first) => Err(ParseError::UnexpectedPositional {
                    token: (*first).to_string(),
                }),
                None => Ok(()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_required_one_optional() -> PositionalSpec {
        let mut spec = PositionalSpec::new();
        spec.required("source").unwrap();
        spec.required("dest").unwrap();
        spec.optional("mode").unwrap();
        spec
    }

    #[test]
    fn rejects_required_after_optional() {
        let mut spec = PositionalSpec::new();
        spec.optional("mode").unwrap();
        let err = spec.required("source").unwrap_err();
        assert_eq!(
            err,
            ConfigError::RequiredAfterOptional {
                slot: "source".to_string()
            }
        );
    }

    #[test]
    fn rejects_duplicate_slot_names() {
        let mut spec = PositionalSpec::new();
        spec.required("source").unwrap();
        assert!(matches!(
            spec.optional("source"),
            Err(ConfigError::DuplicateSlot { .. })
        ));
        assert!(matches!(
            spec.rest("source", 0),
            Err(ConfigError::DuplicateSlot { .. })
        ));
    }

    #[test]
    fn rejects_slots_after_rest() {
        let mut spec = PositionalSpec::new();
        spec.rest("files", 0).unwrap();
        assert!(matches!(
            spec.optional("mode"),
            Err(ConfigError::SlotAfterRest { .. })
        ));
        assert!(matches!(
            spec.rest("more", 0),
            Err(ConfigError::RestAlreadyDeclared { .. })
        ));
    }

    #[test]
    fn arity_with_two_required_and_one_optional() {
        let spec = two_required_one_optional();

        let mut b = Bindings::default();
        let err = spec.bind(vec!["a"], &mut b).unwrap_err();
        assert_eq!(err, ParseError::MissingPositionals { missing: 1 });

        let mut b = Bindings::default();
        spec.bind(vec!["a", "b"], &mut b).unwrap();
        assert_eq!(b.get("source"), Some("a"));
        assert_eq!(b.get("dest"), Some("b"));
        assert!(!b.is_set("mode"));

        let mut b = Bindings::default();
        spec.bind(vec!["a", "b", "c"], &mut b).unwrap();
        assert_eq!(b.get("mode"), Some("c"));
    }

    #[test]
    fn surplus_without_rest_names_first_unexpected_token() {
        let spec = two_required_one_optional();
        let mut b = Bindings::default();
        let err = spec.bind(vec!["a", "b", "c", "d", "e"], &mut b).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedPositional {
                token: "d".to_string()
            }
        );
    }

    #[test]
    fn rest_collects_surplus_and_enforces_minimum() {
        let mut spec = PositionalSpec::new();
        spec.required("cmd").unwrap();
        spec.rest("args", 2).unwrap();

        let mut b = Bindings::default();
        let err = spec.bind(vec!["run", "one"], &mut b).unwrap_err();
        assert_eq!(
            err,
            ParseError::RestTooFew {
                slot: "args".to_string(),
                min: 2,
                got: 1,
            }
        );

        let mut b = Bindings::default();
        spec.bind(vec!["run", "one", "two", "three"], &mut b).unwrap();
        assert_eq!(b.get("cmd"), Some("run"));
        assert_eq!(b.rest(), &["one", "two", "three"]);
    }
}
