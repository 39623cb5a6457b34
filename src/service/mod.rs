pub mod export_service;
pub mod file_service;
pub mod folder_service;

#[cfg(test)]
mod tests;

/// true when sqlite is reporting a unique-index violation. The composite
/// unique indexes are the real guards against duplicate names - the services'
/// own pre-checks only exist for friendlier messages, so a violation escaping
/// a race must always be caught and treated as a name conflict
pub(crate) fn is_constraint_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(inner, _)
            if inner.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
