//! Default-value registry used when an item is created without a value.

use std::collections::HashMap;

use super::{Value, ValueKind, ValueTag};

type Constructor = Box<dyn Fn() -> Value + Send>;

/// Maps a value kind to the constructor of its default value.
///
/// Kinds without a registered constructor fall back to
/// [`Value::default_for`].
#[derive(Default)]
pub struct ValueFactory {
    constructors: HashMap<ValueTag, Constructor>,
}

impl ValueFactory {
    /// Creates a factory with only the built-in defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the default for `T`.
    pub fn register<T, F>(&mut self, constructor: F)
    where
        T: ValueKind,
        F: Fn() -> T + Send + 'static,
    {
        self.constructors
            .insert(T::TAG, Box::new(move || constructor().into()));
    }

    /// Builds the default value for `tag`.
    #[must_use]
    pub fn create(&self, tag: ValueTag) -> Value {
        self.constructors
            .get(&tag)
            .map_or_else(|| Value::default_for(tag), |constructor| constructor())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::SliderValue;

    #[test]
    fn test_registered_default_wins() {
        let mut factory = ValueFactory::new();
        assert_eq!(factory.create(ValueTag::Slider), SliderValue::default().into());

        factory.register(|| SliderValue::new(5, 0, 10));
        assert_eq!(factory.create(ValueTag::Slider), SliderValue::new(5, 0, 10).into());
    }
}
