//! `define_port_error!`: port error enums with struct variants.
//!
//! Each variant gets a `#[error]` message and a snake-case constructor that
//! takes one `impl Into<_>` argument per field, in declaration order.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $($field:ident : $ty:ty),+ $(,)? } => $message:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $($field: $ty),+ },
            )+
        }

        impl $name {
            $(
                ::paste::paste! {
                    /// Build this variant from its fields.
                    pub fn [<$variant:snake>]($($field: impl Into<$ty>),+) -> Self {
                        Self::$variant { $($field: $field.into()),+ }
                    }
                }
            )+
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum StoreFault {
            Unreadable { path: String } => "cannot read {path}",
            Short { path: String, len: usize } => "{path} truncated at {len} bytes",
        }
    }

    #[test]
    fn string_fields_accept_str() {
        let err = StoreFault::unreadable("gatepass_data.json");
        assert_eq!(
            err,
            StoreFault::Unreadable {
                path: "gatepass_data.json".to_owned()
            }
        );
        assert_eq!(err.to_string(), "cannot read gatepass_data.json");
    }

    #[test]
    fn constructor_arguments_follow_field_order() {
        let err = StoreFault::short("gatepass_data.json", 12_usize);
        assert_eq!(err.to_string(), "gatepass_data.json truncated at 12 bytes");
    }
}
