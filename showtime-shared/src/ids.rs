use serde::{Deserialize, Serialize};
use std::fmt;

/// Declares an opaque string identifier.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Identifier of a city in the catalog
    CityId
);
string_id!(
    /// Identifier of a theater in the catalog
    TheaterId
);
string_id!(
    /// Identifier of a single screening of a movie
    ShowId
);
string_id!(
    /// Seat label, unique within one show (e.g. "A1")
    SeatId
);
string_id!(
    /// Identifier of a pending hold on a set of seats
    ReservationId
);
string_id!(
    /// Identifier of a confirmed booking
    BookingId
);
