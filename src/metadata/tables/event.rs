use std::sync::Arc;

use crate::metadata::{tables::TypeDefRc, token::Token, typesystem::TypeDefOrRef};

/// A reference to an `Event`
pub type EventRc = Arc<Event>;

/// The `Event` table holds the events defined in a module.
#[derive(Debug)]
pub struct Event {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// The event name
    pub name: String,
    /// a 2-byte bitmask of type `EventAttributes`
    pub flags: u32,
    /// The delegate type of the event
    pub event_type: Option<TypeDefOrRef>,
    /// The declaring type
    pub declaring_type: Option<TypeDefRc>,
}

impl Event {
    /// Creates an event
    #[must_use]
    pub fn new(
        rid: u32,
        name: &str,
        event_type: Option<TypeDefOrRef>,
        declaring_type: Option<TypeDefRc>,
    ) -> Self {
        Event {
            rid,
            token: Token::from_parts(Token::EVENT, rid),
            name: name.to_string(),
            flags: 0,
            event_type,
            declaring_type,
        }
    }
}
