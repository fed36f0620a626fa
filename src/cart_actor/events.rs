use crate::model::{CartSession, SessionId};

/// Broadcast after every change to a session; drives the cart badge.
#[derive(Debug, Clone, PartialEq)]
pub struct CartChanged {
    pub session: SessionId,
    pub item_count: u32,
    pub total: f64,
    pub version: u64,
}

impl From<&CartSession> for CartChanged {
    fn from(session: &CartSession) -> Self {
        Self {
            session: session.id,
            item_count: session.cart.item_count(),
            total: session.cart.total(session.delivery),
            version: session.version,
        }
    }
}
