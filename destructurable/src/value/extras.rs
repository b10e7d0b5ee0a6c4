//! `Destructure` implementations for optional third-party types.
//!
//! Date, time and identifier types are leaves: they destructure to opaque
//! scalars rendered through their `Display` form.

#[allow(unused_imports)]
use super::{Destructure, Value};
#[allow(unused_imports)]
use crate::tree::{OpaqueValue, Scalar};

#[allow(unused_macros)]
macro_rules! impl_opaque {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Destructure for $ty {
                fn value(&self) -> Value<'_> {
                    Value::Scalar(self.capture())
                }

                fn capture(&self) -> Scalar {
                    Scalar::Opaque(OpaqueValue::new(*self))
                }

                fn display_string(&self) -> String {
                    self.to_string()
                }
            }
        )+
    };
}

#[cfg(feature = "chrono")]
mod chrono_impls {
    use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};

    use super::{Destructure, OpaqueValue, Scalar, Value};

    impl_opaque!(
        NaiveDate,
        NaiveTime,
        NaiveDateTime,
        DateTime<Utc>,
        DateTime<FixedOffset>,
        DateTime<Local>,
        chrono::Duration,
    );
}

#[cfg(feature = "time")]
mod time_impls {
    use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime, Time};

    use super::{Destructure, OpaqueValue, Scalar, Value};

    impl_opaque!(Date, Time, PrimitiveDateTime, OffsetDateTime, Duration);
}

#[cfg(feature = "uuid")]
mod uuid_impls {
    use uuid::Uuid;

    use super::{Destructure, OpaqueValue, Scalar, Value};

    impl_opaque!(Uuid);
}
