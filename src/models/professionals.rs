use crate::schema::professionals;

#[derive(Clone, Debug, Queryable, Insertable)]
#[table_name = "professionals"]
pub struct ProfessionalData {
    pub pid: String,
    pub name: String,
    pub is_active: bool,
}
