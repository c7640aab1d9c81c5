/// An account that can sign in.
///
/// repogen:entity
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    #[repogen(primary_key)]
    pub id: i64,
    pub email: String,
    pub password_hash: String,
}

/// Not marked, so no repository is generated for it.
pub struct Session {
    pub token: String,
}
