mod audit_repo;
mod cycle_repo;
mod participation_repo;
mod role_repo;
mod session_repo;
mod stage_repo;
mod user_repo;

pub use audit_repo::AuditLogRepo;
pub use cycle_repo::CycleRepo;
pub use participation_repo::ParticipationRepo;
pub use role_repo::RoleRepo;
pub use session_repo::SessionRepo;
pub use stage_repo::StageRepo;
pub use user_repo::UserRepo;

use formativa_core::types::DbId;
use sqlx::postgres::PgArguments;
use sqlx::query::{QueryAs, QueryScalar};
use sqlx::Postgres;

/// A deferred bind value for dynamically assembled WHERE clauses.
///
/// Filter builders collect these alongside `$n` placeholders so the same
/// clause can back both the listing query and its COUNT twin.
pub(crate) enum Bind {
    Id(DbId),
    Text(String),
}

/// Bind collected filter values onto a `query_as` query, in order.
pub(crate) fn bind_filter<'q, T>(
    mut q: QueryAs<'q, Postgres, T, PgArguments>,
    values: &'q [Bind],
) -> QueryAs<'q, Postgres, T, PgArguments> {
    for value in values {
        q = match value {
            Bind::Id(id) => q.bind(*id),
            Bind::Text(text) => q.bind(text.as_str()),
        };
    }
    q
}

/// Bind collected filter values onto a `query_scalar` query, in order.
pub(crate) fn bind_filter_scalar<'q, T>(
    mut q: QueryScalar<'q, Postgres, T, PgArguments>,
    values: &'q [Bind],
) -> QueryScalar<'q, Postgres, T, PgArguments> {
    for value in values {
        q = match value {
            Bind::Id(id) => q.bind(*id),
            Bind::Text(text) => q.bind(text.as_str()),
        };
    }
    q
}
