use sea_orm::sea_query::{
    Index, IndexCreateStatement, MysqlQueryBuilder, PostgresQueryBuilder, SqliteQueryBuilder,
};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, DbErr};
use tracing::info;

/// Ensure required database indexes exist.
///
/// Schema sync doesn't cover composite non-unique indexes, so they are
/// created manually on startup. Failures are logged and tolerated.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    use crate::entity::{question, submission};

    // Scoreboard, stats and export queries:
    // SELECT * FROM submission WHERE race_id = ? ORDER BY created_at
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_submission_race_created")
        .table(submission::Entity)
        .col(submission::Column::RaceId)
        .col(submission::Column::CreatedAt)
        .to_owned();
    create_index(db, &stmt, "idx_submission_race_created").await;

    // Question resolution filters by race:
    // SELECT * FROM question WHERE race_id = ? ORDER BY id
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_question_race")
        .table(question::Entity)
        .col(question::Column::RaceId)
        .to_owned();
    create_index(db, &stmt, "idx_question_race").await;

    Ok(())
}

async fn create_index(db: &DatabaseConnection, stmt: &IndexCreateStatement, name: &str) {
    let sql = match db.get_database_backend() {
        DbBackend::Postgres => stmt.to_string(PostgresQueryBuilder),
        DbBackend::Sqlite => stmt.to_string(SqliteQueryBuilder),
        DbBackend::MySql => stmt.to_string(MysqlQueryBuilder),
        _ => unreachable!("unsupported database backend"),
    };

    match db.execute_unprepared(&sql).await {
        Ok(_) => {
            info!("Ensured index {} exists", name);
        }
        Err(e) => {
            tracing::warn!("Failed to create index {}: {}", name, e);
        }
    }
}
