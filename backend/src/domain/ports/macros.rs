//! Helper macro for generating domain port error enums.
//!
//! Every driven port exposes a small `thiserror` enum plus snake_case
//! constructor helpers whose `String` fields accept `impl Into<String>`.
//! The macro keeps those enums uniform without hand-writing the builders.

macro_rules! define_port_error {
    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        ::paste::paste! {
            #[doc = concat!("Construct the `", stringify!($variant), "` variant.")]
            pub fn [<$variant:snake>]($( $field: impl Into<$ty> ),*) -> Self {
                Self::$variant { $( $field: $field.into() ),* }
            }
        }
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $($field:ident : $ty:ty),* $(,)? } => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $($field : $ty),* },
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant { $($field : $ty),* });
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        /// Regression coverage for the generated constructors.
        pub enum ExamplePortError {
            Unavailable { message: String } => "unavailable: {message}",
            Conflict { key: String, attempts: u32 } => "conflict on {key} after {attempts} tries",
        }
    }

    #[test]
    fn string_fields_accept_str() {
        let err = ExamplePortError::unavailable("backend down");
        assert_eq!(err.to_string(), "unavailable: backend down");
    }

    #[test]
    fn mixed_fields_keep_their_types() {
        let err = ExamplePortError::conflict("042137", 3_u32);
        assert_eq!(err.to_string(), "conflict on 042137 after 3 tries");
    }
}
