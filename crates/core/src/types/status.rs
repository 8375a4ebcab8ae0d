//! Status enums for orders and viewer roles.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Who is looking at the storefront.
///
/// The API only knows `user` and `admin`; `Guest` is the role of a visitor
/// that has not signed in. Navigation and page actions are keyed on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    /// Not signed in.
    Guest,
    /// A shopper.
    #[default]
    User,
    /// A catalog and order manager.
    Admin,
}

impl Role {
    /// Parse a role string from the API.
    ///
    /// Matching is case-insensitive. Anything that is not `admin` or
    /// `guest` is treated as a regular user.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Self::Admin,
            "guest" => Self::Guest,
            _ => Self::User,
        }
    }

    /// Wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    /// Whether this role may keep favourites, a cart and place orders.
    #[must_use]
    pub const fn can_shop(self) -> bool {
        matches!(self, Self::User)
    }

    /// Whether this role may add, edit and delete books and manage orders.
    #[must_use]
    pub const fn can_manage_catalog(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// Delivery status of an order.
///
/// The API stores free-form labels; the four known ones map onto variants
/// and anything else is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum OrderStatus {
    #[default]
    OrderPlaced,
    OutForDelivery,
    Delivered,
    Cancelled,
    Other(String),
}

/// Display tone of an order status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusTone {
    /// Placed but not yet moving.
    Pending,
    /// Cancelled by the store or the customer.
    Cancelled,
    /// Anything past placement.
    Complete,
}

impl StatusTone {
    /// CSS modifier used by the templates.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Pending => "status-pending",
            Self::Cancelled => "status-cancelled",
            Self::Complete => "status-complete",
        }
    }
}

impl OrderStatus {
    /// Statuses an admin can pick from, in menu order.
    pub const ALL: [Self; 4] = [
        Self::OrderPlaced,
        Self::OutForDelivery,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Parse a status label (case-insensitive).
    #[must_use]
    pub fn parse(label: &str) -> Self {
        let trimmed = label.trim();
        match trimmed.to_lowercase().as_str() {
            "order placed" => Self::OrderPlaced,
            "out for delivery" => Self::OutForDelivery,
            "delivered" => Self::Delivered,
            "cancelled" | "canceled" => Self::Cancelled,
            _ => Self::Other(trimmed.to_owned()),
        }
    }

    /// Parse a label, accepting only the selectable statuses.
    #[must_use]
    pub fn parse_known(label: &str) -> Option<Self> {
        match Self::parse(label) {
            Self::Other(_) => None,
            known => Some(known),
        }
    }

    /// Label as the API spells it.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::OrderPlaced => "Order Placed",
            Self::OutForDelivery => "Out for delivery",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
            Self::Other(label) => label,
        }
    }

    /// Badge tone: "placed" is pending, "cancel" is cancelled, the rest complete.
    #[must_use]
    pub fn tone(&self) -> StatusTone {
        let label = self.label().to_lowercase();
        if label.contains("placed") {
            StatusTone::Pending
        } else if label.contains("cancel") {
            StatusTone::Cancelled
        } else {
            StatusTone::Complete
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_is_lenient() {
        assert_eq!(Role::parse("ADMIN"), Role::Admin);
        assert_eq!(Role::parse("user"), Role::User);
        assert_eq!(Role::parse("something-else"), Role::User);
        assert_eq!(Role::default(), Role::User);
    }

    #[test]
    fn test_role_capabilities() {
        assert!(Role::User.can_shop());
        assert!(!Role::Admin.can_shop());
        assert!(!Role::Guest.can_shop());
        assert!(Role::Admin.can_manage_catalog());
        assert!(!Role::User.can_manage_catalog());
    }

    #[test]
    fn test_status_roundtrips_known_labels() {
        for status in OrderStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            let back: OrderStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn test_status_keeps_unknown_labels() {
        let status: OrderStatus = serde_json::from_str("\"Returned\"").unwrap();
        assert_eq!(status, OrderStatus::Other("Returned".to_string()));
        assert_eq!(status.label(), "Returned");
        assert_eq!(OrderStatus::parse_known("Returned"), None);
    }

    #[test]
    fn test_status_tone() {
        assert_eq!(OrderStatus::OrderPlaced.tone(), StatusTone::Pending);
        assert_eq!(OrderStatus::Cancelled.tone(), StatusTone::Cancelled);
        assert_eq!(OrderStatus::Delivered.tone(), StatusTone::Complete);
        assert_eq!(OrderStatus::OutForDelivery.tone(), StatusTone::Complete);
        assert_eq!(
            OrderStatus::parse("order CANCELLED by user").tone(),
            StatusTone::Cancelled
        );
    }
}
