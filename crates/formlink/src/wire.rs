//! Closed sets of wire strings and typed attribute access.

use param_tree::ParameterTree;

use crate::FormError;

/// A value that travels as one of a fixed set of attribute strings.
pub trait WireValue: Sized + Copy + 'static {
    /// Human readable name of the set, used in error messages.
    const KIND: &'static str;

    /// Every member of the set, in declaration order.
    const ALL: &'static [Self];

    fn as_str(self) -> &'static str;

    fn from_wire(value: &str) -> Option<Self>;
}

/// Read a mandatory attribute and map it onto a closed set.
pub fn read<T: WireValue>(tree: &ParameterTree, key: &str) -> Result<T, FormError> {
    let value = tree.attribute(key)?;
    T::from_wire(value).ok_or_else(|| FormError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        kind: T::KIND,
    })
}

pub fn write<T: WireValue>(tree: &mut ParameterTree, key: &str, value: T) {
    tree.set_attribute(key, value.as_str());
}

/// Read a mandatory non-negative count.
pub fn read_count(tree: &ParameterTree, key: &str) -> Result<usize, FormError> {
    let value = tree.int_attribute(key)?;
    usize::try_from(value).map_err(|_| FormError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        kind: "count",
    })
}

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident ($kind:literal) {
            $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $crate::wire::WireValue for $name {
            const KIND: &'static str = $kind;
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }

            fn from_wire(value: &str) -> Option<Self> {
                match value {
                    $($wire => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::wire::WireValue::as_str(*self))
            }
        }
    };
}

pub(crate) use wire_enum;

#[cfg(test)]
mod tests {
    use super::*;

    wire_enum! {
        enum Colour ("colour") {
            Red => "red",
            Green => "green",
        }
    }

    #[test]
    fn wire_enum_maps_both_ways() {
        for colour in Colour::ALL {
            assert_eq!(Colour::from_wire(colour.as_str()), Some(*colour));
        }
        assert_eq!(Colour::Green.to_string(), "green");
        assert_eq!(Colour::from_wire("Red"), None);
    }

    #[test]
    fn read_reports_the_offending_value() {
        let mut tree = ParameterTree::new();
        tree.set_attribute("colour", "blue");
        match read::<Colour>(&tree, "colour") {
            Err(FormError::InvalidValue { key, value, kind }) => {
                assert_eq!(key, "colour");
                assert_eq!(value, "blue");
                assert_eq!(kind, "colour");
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(matches!(
            read::<Colour>(&tree, "missing"),
            Err(FormError::Tree(_))
        ));
    }

    #[test]
    fn counts_reject_negative_values() {
        let mut tree = ParameterTree::new();
        tree.set_int_attribute("n", 4).set_int_attribute("neg", -1);
        assert_eq!(read_count(&tree, "n").unwrap(), 4);
        assert!(matches!(
            read_count(&tree, "neg"),
            Err(FormError::InvalidValue { .. })
        ));
    }
}
