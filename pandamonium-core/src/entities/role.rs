//! Role - permissions granted to members of a bamboo
//!
//! Roles sit in a 0-100 hierarchy inside their bamboo and carry a set of
//! permission flags, stored as individual boolean columns.

use uuid::Uuid;

use crate::entities::Entity;
use crate::error::ValidationError;
use crate::filters;
use crate::record::{Constraint, FieldDef, FieldKind, FieldValue, Record, TableSchema, UUID_FIELD};

pub static ROLE_SCHEMA: TableSchema = TableSchema {
    table: "roles",
    fields: &[
        UUID_FIELD,
        FieldDef::constrained(
            "name",
            FieldKind::Text,
            Constraint::MaxLen {
                max: 50,
                message: filters::ROLE_NAME_MESSAGE,
            },
        ),
        FieldDef::new("color", FieldKind::Text),
        FieldDef::constrained(
            "hierarchy",
            FieldKind::Int,
            Constraint::IntRange {
                min: 0,
                max: 100,
                message: filters::ROLE_HIERARCHY_MESSAGE,
            },
        ),
        FieldDef::new("bamboo_uuid", FieldKind::Uuid),
        FieldDef::new("admin", FieldKind::Bool),
        FieldDef::new("perm_managing_channels", FieldKind::Bool),
        FieldDef::new("perm_managing_roles", FieldKind::Bool),
        FieldDef::new("perm_delete", FieldKind::Bool),
        FieldDef::new("perm_ban", FieldKind::Bool),
        FieldDef::new("perm_kick", FieldKind::Bool),
        FieldDef::new("perm_mute", FieldKind::Bool),
    ],
};

/// Permission flags carried by a role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RolePermissions {
    /// Grants everything below.
    pub admin: bool,
    /// Add, edit and remove branches.
    pub managing_channels: bool,
    /// Add, edit and remove roles.
    pub managing_roles: bool,
    /// Delete other members' messages.
    pub delete: bool,
    pub ban: bool,
    pub kick: bool,
    pub mute: bool,
}

/// One role of a bamboo.
#[derive(Debug, Clone)]
pub struct Role {
    record: Record,
}

impl Role {
    pub fn new(
        name: &str,
        color: &str,
        hierarchy: i64,
        bamboo_uuid: Uuid,
        permissions: RolePermissions,
    ) -> Self {
        let record = Record::new(&ROLE_SCHEMA, None, vec![
            name.into(),
            color.into(),
            hierarchy.into(),
            bamboo_uuid.into(),
            permissions.admin.into(),
            permissions.managing_channels.into(),
            permissions.managing_roles.into(),
            permissions.delete.into(),
            permissions.ban.into(),
            permissions.kick.into(),
            permissions.mute.into(),
        ]);

        Self { record }
    }

    pub fn name(&self) -> Option<&str> {
        self.record.get("name").and_then(FieldValue::as_text)
    }

    pub fn color(&self) -> Option<&str> {
        self.record.get("color").and_then(FieldValue::as_text)
    }

    pub fn hierarchy(&self) -> Option<i64> {
        self.record.get("hierarchy").and_then(FieldValue::as_int)
    }

    pub fn bamboo_uuid(&self) -> Option<Uuid> {
        self.record.get("bamboo_uuid").and_then(FieldValue::as_uuid)
    }

    pub fn permissions(&self) -> RolePermissions {
        let flag = |column: &str| {
            self.record
                .get(column)
                .and_then(FieldValue::as_bool)
                .unwrap_or(false)
        };

        RolePermissions {
            admin: flag("admin"),
            managing_channels: flag("perm_managing_channels"),
            managing_roles: flag("perm_managing_roles"),
            delete: flag("perm_delete"),
            ban: flag("perm_ban"),
            kick: flag("perm_kick"),
            mute: flag("perm_mute"),
        }
    }

    /// Move the role in the hierarchy; the new position goes through the
    /// range constraint.
    pub fn set_hierarchy(&mut self, hierarchy: i64) -> Result<(), ValidationError> {
        self.record.set("hierarchy", hierarchy.into())
    }
}

impl Entity for Role {
    const SCHEMA: &'static TableSchema = &ROLE_SCHEMA;

    fn record(&self) -> &Record {
        &self.record
    }

    fn record_mut(&mut self) -> &mut Record {
        &mut self.record
    }

    fn from_record(record: Record) -> Self {
        Self { record }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_role() {
        let bamboo = Uuid::new_v4();
        let role = Role::new(
            "modération",
            "#00aa55",
            50,
            bamboo,
            RolePermissions {
                kick: true,
                mute: true,
                ..RolePermissions::default()
            },
        );

        assert!(role.is_valid());
        assert_eq!(role.name(), Some("modération"));
        assert_eq!(role.hierarchy(), Some(50));
        assert_eq!(role.bamboo_uuid(), Some(bamboo));

        let permissions = role.permissions();
        assert!(permissions.kick);
        assert!(permissions.mute);
        assert!(!permissions.admin);
        assert!(!permissions.ban);
    }

    #[test]
    fn test_hierarchy_bounds() {
        let ok = Role::new("haut", "#ffffff", 100, Uuid::new_v4(), RolePermissions::default());
        assert!(ok.is_valid());

        let too_high = Role::new("haut", "#ffffff", 101, Uuid::new_v4(), RolePermissions::default());
        assert!(!too_high.is_valid());
        assert_eq!(
            too_high.first_error().map(|error| error.message.as_str()),
            Some(filters::ROLE_HIERARCHY_MESSAGE)
        );

        let negative = Role::new("bas", "#000000", -1, Uuid::new_v4(), RolePermissions::default());
        assert!(!negative.is_valid());
    }

    #[test]
    fn test_set_hierarchy_validates() {
        let mut role = Role::new("test", "#123456", 10, Uuid::new_v4(), RolePermissions::default());
        role.set_hierarchy(101).unwrap_err();
        assert!(!role.is_valid());
        assert_eq!(role.hierarchy(), Some(10));
    }
}
