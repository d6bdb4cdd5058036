//! Helper macro for declaring domain port error enums.
//!
//! Port errors share one shape: a `thiserror` enum plus a snake_case
//! constructor per variant whose string fields accept anything
//! `Into<String>`. The macro keeps that boilerplate in one place.

macro_rules! define_port_error {
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

        ::paste::paste! {
            impl $name {
                $(
                    pub fn [<$variant:snake>]( $( $($field: impl Into<$ty>),* )? ) -> Self {
                        Self::$variant $( { $($field: $field.into()),* } )?
                    }
                )*
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    define_port_error! {
        pub enum ExamplePortError {
            Backend { message: String } => "backend: {message}",
            Evicted { count: u32 } => "evicted {count} entries",
            Timeout { message: String, millis: u32 } => "timeout: {message} ({millis}ms)",
            Unavailable => "backend unavailable",
        }
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = ExamplePortError::backend("connection refused");
        assert_eq!(err.to_string(), "backend: connection refused");
    }

    #[test]
    fn constructors_preserve_non_string_types() {
        let err = ExamplePortError::evicted(42_u32);
        assert_eq!(err.to_string(), "evicted 42 entries");
    }

    #[test]
    fn constructors_support_mixed_fields() {
        let err = ExamplePortError::timeout("slow scan", 250_u32);
        assert_eq!(err.to_string(), "timeout: slow scan (250ms)");
    }

    #[test]
    fn unit_variants_get_constructors_too() {
        let err = ExamplePortError::unavailable();
        assert_eq!(err.to_string(), "backend unavailable");
    }
}
