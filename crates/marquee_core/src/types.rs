//! Core type definitions for Marquee.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident($inner:ty)) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub $inner);

        impl $name {
            /// Creates a new identifier.
            #[must_use]
            pub const fn new(id: $inner) -> Self {
                Self(id)
            }

            /// Returns the raw value.
            #[must_use]
            pub const fn get(self) -> $inner {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$inner> for $name {
            fn from(id: $inner) -> Self {
                Self(id)
            }
        }
    };
}

numeric_id! {
    /// Theatre number, derived from the registering transaction's id.
    TheatreNo(u64)
}

numeric_id! {
    /// Show identifier, allocated from `NEXT_SHOW_ID`.
    ShowId(u64)
}

numeric_id! {
    /// Ticket number, allocated from `NEXT_TICKET_ID`.
    TicketNo(u64)
}

numeric_id! {
    /// Sales window number, `1..=windows`.
    WindowNo(u32)
}

/// Document type discriminator stored in every entity's `docType` field.
///
/// Also the key prefix: an entity lives at `<DOCTYPE><id>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocType {
    /// A registered theatre.
    Theatre,
    /// A ticket sales window.
    Window,
    /// A scheduled show.
    Show,
    /// A sold ticket.
    Ticket,
}

impl DocType {
    /// Returns the discriminator string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Theatre => "THEATRE",
            Self::Window => "WINDOW",
            Self::Show => "SHOW",
            Self::Ticket => "TICKET",
        }
    }

    /// Builds the ledger key for an entity of this type.
    #[must_use]
    pub fn key(self, id: impl fmt::Display) -> String {
        format!("{}{id}", self.as_str())
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_prefixed_by_doc_type() {
        assert_eq!(DocType::Show.key(ShowId::new(42)), "SHOW42");
        assert_eq!(DocType::Theatre.key(TheatreNo::new(1183)), "THEATRE1183");
        assert_eq!(DocType::Ticket.key(TicketNo::new(7)), "TICKET7");
        assert_eq!(DocType::Window.key(WindowNo::new(2)), "WINDOW2");
    }

    #[test]
    fn doc_type_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&DocType::Ticket).unwrap(), r#""TICKET""#);
        let parsed: DocType = serde_json::from_str(r#""WINDOW""#).unwrap();
        assert_eq!(parsed, DocType::Window);
    }

    #[test]
    fn ids_serialize_as_plain_numbers() {
        assert_eq!(serde_json::to_string(&ShowId::new(9)).unwrap(), "9");
        let no: TicketNo = serde_json::from_str("12").unwrap();
        assert_eq!(no, TicketNo::new(12));
    }

    #[test]
    fn id_ordering() {
        assert!(ShowId::new(1) < ShowId::new(2));
    }
}
