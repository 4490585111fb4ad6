//! Static screen -> role table and the access gate built on it.

use crate::error::DoelError;
use crate::models::AppRole;
use AppRole::*;

pub const SCREEN_IDS: [&str; 11] = [
    "dashboard",
    "coachRegister",
    "ticketSalesRecord",
    "scheduling",
    "inventory",
    "finance",
    "hr",
    "maintenance",
    "reports",
    "settings",
    "userManagement",
];

/// Roles allowed to view a screen. Unknown screen ids map to None and are
/// denied everywhere.
pub fn allowed_roles(screen: &str) -> Option<&'static [AppRole]> {
    match screen {
        "dashboard" => Some(&[
            SuperAdmin,
            ManagingDirector,
            Director,
            Admin,
            Accounts,
            Hr,
            It,
            Sales,
            Purchase,
            Marketing,
            Manager,
            Counter,
            Driver,
            Supervisor,
        ]),
        "coachRegister" => Some(&[SuperAdmin, Admin, ManagingDirector, Director, Manager]),
        "ticketSalesRecord" => Some(&[
            SuperAdmin,
            Admin,
            ManagingDirector,
            Director,
            Accounts,
            Manager,
            Counter,
        ]),
        "scheduling" => Some(&[
            SuperAdmin,
            ManagingDirector,
            Director,
            Manager,
            Admin,
            It,
            Supervisor,
        ]),
        "inventory" => Some(&[
            SuperAdmin,
            ManagingDirector,
            Director,
            Purchase,
            Admin,
            Supervisor,
        ]),
        "finance" => Some(&[SuperAdmin, ManagingDirector, Director, Accounts]),
        "hr" => Some(&[SuperAdmin, ManagingDirector, Director, Hr, Manager]),
        "maintenance" => Some(&[
            SuperAdmin,
            ManagingDirector,
            Director,
            It,
            Admin,
            Supervisor,
        ]),
        "reports" => Some(&[
            SuperAdmin,
            ManagingDirector,
            Director,
            Accounts,
            Marketing,
            Manager,
            Supervisor,
        ]),
        "settings" => Some(&[
            SuperAdmin,
            It,
            ManagingDirector,
            Director,
            Admin,
            Accounts,
            Hr,
            Sales,
            Purchase,
            Marketing,
            Manager,
            Counter,
            Driver,
            Supervisor,
        ]),
        "userManagement" => Some(&[SuperAdmin, It]),
        _ => None,
    }
}

/// Deny-by-default gate check. Never fails; a missing table entry is a deny.
pub fn has_permission(screen: &str, role: AppRole) -> bool {
    allowed_roles(screen)
        .map(|roles| roles.contains(&role))
        .unwrap_or(false)
}

pub const ACCESS_DENIED_MESSAGE: &str = "Authorization required for this module.";

/// Guard used by domain handlers: same table, surfaced as a 403.
pub fn require_screen(role: Option<AppRole>, screen: &str) -> Result<AppRole, DoelError> {
    let role = role.ok_or_else(|| DoelError::Auth("No active session.".to_string()))?;
    if has_permission(screen, role) {
        Ok(role)
    } else {
        Err(DoelError::Forbidden(ACCESS_DENIED_MESSAGE.to_string()))
    }
}
