#[derive(Debug, Clone)]
pub struct DirectorGeneral {
    pub id: i64,
    pub last_name: String,
    pub first_name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub status: String,
    pub created_at: String,
}
