//! Helper macro for port error enums.
//!
//! `define_port_error!` derives `thiserror::Error` for the enum and emits a
//! snake_case constructor per variant whose `String` fields accept anything
//! convertible into the field type.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            #[doc = "Construct the `" $variant "` variant."]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            #[doc = "Construct the `" $variant "` variant."]
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum SampleStoreError {
            Unavailable => "store unavailable",
            Missing { path: String } => "missing resource {path}",
            Truncated { path: String, bytes: u64 } => "{path} truncated after {bytes} bytes",
        }
    }

    #[test]
    fn unit_variants_get_constructors() {
        assert_eq!(SampleStoreError::unavailable(), SampleStoreError::Unavailable);
    }

    #[test]
    fn string_fields_accept_str() {
        let err = SampleStoreError::missing("about/syllabus.html");
        assert_eq!(err.to_string(), "missing resource about/syllabus.html");
    }

    #[test]
    fn other_field_types_are_preserved() {
        let err = SampleStoreError::truncated("info/updates.html", 12_u64);
        assert_eq!(err.to_string(), "info/updates.html truncated after 12 bytes");
    }
}
