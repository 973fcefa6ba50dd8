use indexmap::IndexMap;

use super::UserId;

/// Case-insensitive username → internal id table
///
/// Keys are lowercased on the way in. Values are the ids the predictor was
/// trained with (the usernames with their original letter case).
#[derive(Debug, Clone, Default)]
pub struct UsernameTable {
    ids: IndexMap<String, UserId>,
}

impl UsernameTable {
    pub fn new<U, I>(rows: impl IntoIterator<Item = (U, I)>) -> Self
    where
        U: AsRef<str>,
        I: Into<String>,
    {
        Self {
            ids: rows
                .into_iter()
                .map(|(username, id)| (username.as_ref().to_lowercase(), UserId(id.into())))
                .collect(),
        }
    }

    /// Builds a table whose ids are the correctly-cased usernames themselves
    pub fn from_usernames<U: AsRef<str>>(usernames: impl IntoIterator<Item = U>) -> Self {
        Self::new(
            usernames
                .into_iter()
                .map(|u| (u.as_ref().to_string(), u.as_ref().to_string())),
        )
    }

    /// Maps a username to its internal id, falling back to the lowercased name
    pub fn resolve(&self, username: &str) -> UserId {
        let key = username.to_lowercase();
        match self.ids.get(&key) {
            Some(id) => id.clone(),
            None => UserId(key),
        }
    }

    /// Known (lowercased) usernames in table order
    pub fn usernames(&self) -> impl Iterator<Item = &str> {
        self.ids.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_mapped_username_ignores_case() {
        let table = UsernameTable::from_usernames(["Xinil", "ZeroCrystal"]);
        assert_eq!(table.resolve("xinil"), UserId::from("Xinil"));
        assert_eq!(table.resolve("XINIL"), UserId::from("Xinil"));
        assert_eq!(table.resolve("zerocrystal"), UserId::from("ZeroCrystal"));
    }

    #[test]
    fn test_resolve_unmapped_username_is_lowercased() {
        let table = UsernameTable::from_usernames(["Xinil"]);
        assert_eq!(table.resolve("SomeNewUser"), UserId::from("somenewuser"));
    }

    #[test]
    fn test_resolve_uses_stored_id() {
        let table = UsernameTable::new([("Archaeon", "user-2187")]);
        assert_eq!(table.resolve("ARCHAEON"), UserId::from("user-2187"));
    }

    #[test]
    fn test_usernames_are_lowercased_in_order() {
        let table = UsernameTable::from_usernames(["Xinil", "ZeroCrystal", "Archaeon"]);
        let names: Vec<&str> = table.usernames().collect();
        assert_eq!(names, vec!["xinil", "zerocrystal", "archaeon"]);
        assert_eq!(table.len(), 3);
    }
}
