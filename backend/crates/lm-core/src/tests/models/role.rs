use crate::{Permission, Role};

#[test]
fn test_role_parse_is_case_insensitive() {
    assert_eq!(Role::parse("Manager"), Some(Role::Manager));
    assert_eq!(Role::parse(" SUPER_ADMIN "), Some(Role::SuperAdmin));
    assert_eq!(Role::parse("intern"), None);
}

#[test]
fn test_super_admin_has_every_permission() {
    for permission in [
        Permission::UsersRead,
        Permission::UsersWrite,
        Permission::ReportsRead,
        Permission::LeaveRead,
        Permission::LeaveWrite,
        Permission::LeaveApprove,
    ] {
        assert!(Role::SuperAdmin.has_permission(permission));
    }
}

#[test]
fn test_manager_can_approve_but_not_write_users() {
    assert!(Role::Manager.has_permission(Permission::LeaveApprove));
    assert!(Role::Manager.has_permission(Permission::UsersRead));
    assert!(!Role::Manager.has_permission(Permission::UsersWrite));
    assert!(!Role::Manager.has_permission(Permission::LeaveWrite));
}

#[test]
fn test_employee_can_only_manage_own_leave() {
    assert!(Role::Employee.has_permission(Permission::LeaveRead));
    assert!(Role::Employee.has_permission(Permission::LeaveWrite));
    assert!(!Role::Employee.has_permission(Permission::LeaveApprove));
}

#[test]
fn test_unknown_role_name_has_no_permissions() {
    assert!(!Role::name_has_permission("contractor", Permission::LeaveRead));
    assert!(Role::name_has_permission("admin", Permission::UsersWrite));
}
