use super::prelude::*;

#[derive(Default)]
pub struct UserQueries;

#[Object]
impl UserQueries {
    /// Get the current authenticated user with their saved books
    async fn me(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let user = ctx.require_user("Could not authenticate user.")?;
        let db = ctx.data_unchecked::<Database>();

        let record = db
            .users()
            .get_by_id(&user.user_id)
            .await
            .map_err(|e| internal_error("Failed to load user", e))?;

        if record.is_none() {
            tracing::warn!(user_id = %user.user_id, "Token refers to a user that no longer exists");
        }
        Ok(record.map(User::from))
    }

    /// List every user
    async fn get_users(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let db = ctx.data_unchecked::<Database>();
        let records = db
            .users()
            .list_all()
            .await
            .map_err(|e| internal_error("Failed to list users", e))?;

        Ok(records.into_iter().map(User::from).collect())
    }

    /// Look up a user by username
    async fn get_user(&self, ctx: &Context<'_>, username: String) -> Result<Option<User>> {
        let db = ctx.data_unchecked::<Database>();
        let record = db
            .users()
            .get_by_username(&username)
            .await
            .map_err(|e| internal_error("Failed to load user", e))?;

        Ok(record.map(User::from))
    }
}
