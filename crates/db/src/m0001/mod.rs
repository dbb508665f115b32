mod session;
mod user;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "paddock",
    "m0001",
    vec_box![],
    vec_box![
        user::CreateTable,
        user::CreateUk1,
        session::CreateTable,
        session::CreateIdx1,
        session::CreateIdx2
    ]
);
