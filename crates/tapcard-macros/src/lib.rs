#[macro_export]
macro_rules! impl_default_for {
    ($name:ident) => {
        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

/// Id newtype over a `String`, the calling crate needs `serde` and `derive_more`
#[macro_export]
macro_rules! new_type {
    ($name:ident, String) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        #[derive(::derive_more::Deref, ::derive_more::Display, ::derive_more::From)]
        #[serde(transparent)]
        pub struct $name(String);

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_impl_default_for() {
        struct Counter(u8);

        impl Counter {
            fn new() -> Self {
                Self(7)
            }
        }

        impl_default_for!(Counter);
        assert_eq!(Counter::default().0, 7);
    }
}
