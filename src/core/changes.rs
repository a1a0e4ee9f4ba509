use std::collections::HashSet;

use crate::core::models::user::User;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UserField {
    Account,
    Email,
    Password,
    Role,
    Tokens,
    Cart,
}

impl UserField {
    pub const ALL: [UserField; 6] = [
        UserField::Account,
        UserField::Email,
        UserField::Password,
        UserField::Role,
        UserField::Tokens,
        UserField::Cart,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            UserField::Account => "account",
            UserField::Email => "email",
            UserField::Password => "password",
            UserField::Role => "role",
            UserField::Tokens => "tokens",
            UserField::Cart => "cart",
        }
    }
}

/// Fields that differ between a candidate write and the last committed record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeSet {
    modified: HashSet<UserField>,
}

impl ChangeSet {
    /// With no committed record every field counts as modified.
    pub fn between(previous: Option<&User>, candidate: &User) -> Self {
        let Some(previous) = previous else {
            return ChangeSet {
                modified: UserField::ALL.into_iter().collect(),
            };
        };

        let modified = UserField::ALL
            .into_iter()
            .filter(|field| match field {
                UserField::Account => previous.account != candidate.account,
                UserField::Email => previous.email != candidate.email,
                UserField::Password => previous.password != candidate.password,
                UserField::Role => previous.role != candidate.role,
                UserField::Tokens => previous.tokens != candidate.tokens,
                UserField::Cart => previous.cart != candidate.cart,
            })
            .collect();
        ChangeSet { modified }
    }

    pub fn is_modified(&self, field: UserField) -> bool {
        self.modified.contains(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.modified.is_empty()
    }

    /// Modified field names in declaration order, for logging.
    pub fn field_names(&self) -> Vec<&'static str> {
        UserField::ALL
            .into_iter()
            .filter(|f| self.modified.contains(f))
            .map(|f| f.name())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::user::{CartItem, Role};
    use chrono::Utc;

    fn committed() -> User {
        let now = Utc::now();
        User {
            id: "u1".to_string(),
            account: "bob1234".to_string(),
            email: "bob@example.com".to_string(),
            password: "$2b$10$abcdefghijklmnopqrstuv".to_string(),
            role: Role::User,
            tokens: vec!["t1".to_string()],
            cart: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn insert_marks_every_field() {
        let changes = ChangeSet::between(None, &committed());
        for field in UserField::ALL {
            assert!(changes.is_modified(field));
        }
    }

    #[test]
    fn unchanged_record_has_empty_change_set() {
        let user = committed();
        let changes = ChangeSet::between(Some(&user), &user.clone());
        assert!(changes.is_empty());
    }

    #[test]
    fn role_only_update_touches_only_role() {
        let previous = committed();
        let mut candidate = previous.clone();
        candidate.role = Role::Admin;

        let changes = ChangeSet::between(Some(&previous), &candidate);
        assert_eq!(changes.field_names(), vec!["role"]);
        assert!(!changes.is_modified(UserField::Password));
        assert!(!changes.is_modified(UserField::Tokens));
    }

    #[test]
    fn detects_token_and_cart_changes() {
        let previous = committed();
        let mut candidate = previous.clone();
        candidate.tokens.push("t2".to_string());
        candidate.cart.push(CartItem {
            product: "p1".to_string(),
            quantity: 1,
        });

        let changes = ChangeSet::between(Some(&previous), &candidate);
        assert_eq!(changes.field_names(), vec!["tokens", "cart"]);
    }
}
