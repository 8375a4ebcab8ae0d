//! Role-based navigation.
//!
//! Each role sees a fixed, enumerated set of links. Nothing here is keyed on
//! link titles.

use crate::types::Role;

/// A top-level navigation link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavEntry {
    Home,
    AllBooks,
    Cart,
    Profile,
    AdminProfile,
    LogIn,
    SignUp,
}

impl NavEntry {
    /// Links shown to `role`, in display order.
    #[must_use]
    pub const fn for_role(role: Role) -> &'static [Self] {
        match role {
            Role::Guest => &[Self::Home, Self::AllBooks, Self::LogIn, Self::SignUp],
            Role::User => &[Self::Home, Self::AllBooks, Self::Cart, Self::Profile],
            Role::Admin => &[Self::Home, Self::AllBooks, Self::AdminProfile],
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::AllBooks => "All Books",
            Self::Cart => "Cart",
            Self::Profile => "Profile",
            Self::AdminProfile => "Admin Profile",
            Self::LogIn => "LogIn",
            Self::SignUp => "SignUp",
        }
    }

    #[must_use]
    pub const fn href(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::AllBooks => "/all-books",
            Self::Cart => "/cart",
            Self::Profile | Self::AdminProfile => "/profile",
            Self::LogIn => "/LogIn",
            Self::SignUp => "/SignUp",
        }
    }
}

/// A section of the profile page sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileSection {
    Favourites,
    OrderHistory,
    Settings,
    AllOrders,
    AddBook,
}

impl ProfileSection {
    #[must_use]
    pub const fn for_role(role: Role) -> &'static [Self] {
        match role {
            Role::Guest => &[],
            Role::User => &[Self::Favourites, Self::OrderHistory, Self::Settings],
            Role::Admin => &[Self::AllOrders, Self::AddBook],
        }
    }

    /// Section rendered at `/profile`.
    #[must_use]
    pub const fn index_for(role: Role) -> Option<Self> {
        match role {
            Role::Guest => None,
            Role::User => Some(Self::Favourites),
            Role::Admin => Some(Self::AllOrders),
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Favourites => "Favourites",
            Self::OrderHistory => "Order History",
            Self::Settings => "Settings",
            Self::AllOrders => "All Orders",
            Self::AddBook => "Add Book",
        }
    }

    #[must_use]
    pub const fn href(self) -> &'static str {
        match self {
            Self::Favourites | Self::AllOrders => "/profile",
            Self::OrderHistory => "/profile/orderHistory",
            Self::Settings => "/profile/settings",
            Self::AddBook => "/profile/add-book",
        }
    }
}
