//! Static list of card UIDs allowed to operate the gate.

use parkgate_core::CardUid;

/// Immutable authorization list.
///
/// Provisioned once at startup; the control loop only reads it. Lookup is a
/// linear scan over the constant-time UID comparison, so timing reveals the
/// list length but not which entry matched.
///
/// # Examples
///
/// ```
/// use parkgate_controller::AuthorizationList;
/// use parkgate_core::CardUid;
///
/// let known = CardUid::new([0xD3, 0xA7, 0xB1, 0x28]);
/// let list = AuthorizationList::from_uids(vec![known]);
///
/// assert!(list.is_authorized(&known));
/// assert!(!list.is_authorized(&CardUid::new([0, 0, 0, 0])));
/// ```
#[derive(Debug, Clone)]
pub struct AuthorizationList {
    uids: Vec<CardUid>,
}

impl AuthorizationList {
    /// Build a list from provisioned UIDs.
    #[must_use]
    pub fn from_uids(uids: Vec<CardUid>) -> Self {
        Self { uids }
    }

    /// Check whether a card is allowed to operate the gate.
    #[must_use]
    pub fn is_authorized(&self, uid: &CardUid) -> bool {
        self.uids.iter().any(|known| known == uid)
    }

    /// Number of provisioned cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.uids.len()
    }

    /// Whether no cards are provisioned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.uids.is_empty()
    }
}
