#![cfg_attr(docsrs, doc(cfg(feature = "serde")))]

//! Provides [`serde::Serialize`] support for [`Spanned`] and the date and
//! time types.
//!
//! Dates and times serialize as their RFC 3339 text, the way they are written
//! in a document. The impls for [`Table`](crate::Table),
//! [`Item`](crate::Item) and [`Value`](crate::Value) live in `value.rs`.

use crate::{Date, LocalDateTime, OffsetDateTime, Spanned, Time};

impl<T> serde::Serialize for Spanned<T>
where
    T: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.value.serialize(serializer)
    }
}

macro_rules! serialize_as_text {
    ($($ty:ty),*) => {
        $(
            impl serde::Serialize for $ty {
                fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
                where
                    S: serde::Serializer,
                {
                    serializer.collect_str(self)
                }
            }
        )*
    };
}

serialize_as_text!(Date, Time, LocalDateTime, OffsetDateTime);
