use sea_query::Iden;

#[derive(Iden, Clone)]
pub enum User {
    Table,
    Id,
    Email,
    Password,
    FirstName,
    LastName,
    Role,
    CreatedAt,
}

#[derive(Iden, Clone)]
pub enum Session {
    Table,
    Id,
    UserId,
    ExpiresAt,
}
