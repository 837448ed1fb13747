use crate::application::ports::facility_repository::RepositoryError;

pub mod facility_repository_sqlx;
pub mod tag_resolver_sqlx;

impl RepositoryError {
    pub(crate) fn query(context: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |e| RepositoryError::Query {
            context,
            source: e.into(),
        }
    }

    pub(crate) fn write(context: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |e| RepositoryError::Write {
            context,
            source: e.into(),
        }
    }
}
