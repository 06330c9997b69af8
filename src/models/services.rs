use crate::schema::services;

#[derive(Clone, Debug, Queryable, Insertable)]
#[table_name = "services"]
pub struct ServiceData {
    pub sid: u64,
    pub name: String,
    pub duration_minutes: i32,
}
