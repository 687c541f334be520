#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq)]
pub struct Phone {
    pub phone_id: i64,
    pub client_id: i64,
    pub phone_number: String,
}
