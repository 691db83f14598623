use serde::{Deserialize, Serialize};

use crate::models::cleanermodel::CleanerRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Manager,
    Csr,
    Technician,
    Customer,
}

impl From<CleanerRole> for UserRole {
    fn from(role: CleanerRole) -> Self {
        match role {
            CleanerRole::Supervisor => UserRole::Manager,
            CleanerRole::LeadCleaner => UserRole::Csr,
            CleanerRole::Cleaner => UserRole::Technician,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    BookingsView,
    BookingsEdit,
    BookingsAssign,
    CustomersView,
    CustomersEdit,
    CleanersView,
    InvoicesView,
    InvoicesCreate,
    InvoicesEdit,
    PayoutsView,
    PayoutsCreate,
    PayoutsEdit,
}

/// Static role/permission table. Staff roles are ordered by reach:
/// admin > manager > csr > technician; customers hold no staff permission.
pub fn has_permission(role: UserRole, permission: Permission) -> bool {
    use Permission::*;
    use UserRole::*;

    let allowed: &[UserRole] = match permission {
        BookingsView => &[Admin, Manager, Csr, Technician],
        BookingsEdit | BookingsAssign => &[Admin, Manager, Csr],
        CustomersView | CustomersEdit => &[Admin, Manager, Csr],
        CleanersView => &[Admin, Manager],
        InvoicesView | InvoicesCreate => &[Admin, Manager, Csr],
        InvoicesEdit => &[Admin, Manager],
        PayoutsView => &[Admin, Manager],
        PayoutsCreate | PayoutsEdit => &[Admin],
    };

    allowed.contains(&role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn technicians_only_view_bookings() {
        assert!(has_permission(UserRole::Technician, Permission::BookingsView));
        assert!(!has_permission(UserRole::Technician, Permission::BookingsAssign));
        assert!(!has_permission(UserRole::Technician, Permission::InvoicesView));
    }

    #[test]
    fn customers_hold_no_staff_permission() {
        for permission in [
            Permission::BookingsView,
            Permission::InvoicesCreate,
            Permission::PayoutsView,
        ] {
            assert!(!has_permission(UserRole::Customer, permission));
        }
    }

    #[test]
    fn only_admin_creates_payouts() {
        assert!(has_permission(UserRole::Admin, Permission::PayoutsCreate));
        assert!(!has_permission(UserRole::Manager, Permission::PayoutsCreate));
    }

    #[test]
    fn cleaner_roles_map_to_staff_roles() {
        assert_eq!(UserRole::from(CleanerRole::Supervisor), UserRole::Manager);
        assert_eq!(UserRole::from(CleanerRole::LeadCleaner), UserRole::Csr);
        assert_eq!(UserRole::from(CleanerRole::Cleaner), UserRole::Technician);
    }
}
