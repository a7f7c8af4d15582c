//! Normalization helpers for user-supplied board text.

use super::{BoardDomainError, TitledEntity};

/// Longest title, in characters, accepted for boards, columns, and tasks.
///
/// Matches the `VARCHAR(255)` bound on `boards.title`.
pub const MAX_TITLE_LENGTH: usize = 255;

/// Trims a title and rejects it when nothing remains or it is too long.
pub(super) fn normalize_title(
    raw: impl Into<String>,
    entity: TitledEntity,
) -> Result<String, BoardDomainError> {
    let raw_title = raw.into();
    let trimmed = raw_title.trim();
    check_title(trimmed, entity)?;
    Ok(trimmed.to_owned())
}

/// Checks a title already held by the aggregate, such as one read from storage.
pub(super) fn check_title(title: &str, entity: TitledEntity) -> Result<(), BoardDomainError> {
    if title.trim().is_empty() {
        return Err(BoardDomainError::EmptyTitle(entity));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(BoardDomainError::TitleTooLong {
            entity,
            max: MAX_TITLE_LENGTH,
        });
    }
    Ok(())
}

/// Trims each tag and drops the ones left empty.
pub(super) fn normalize_tags(tags: impl IntoIterator<Item = String>) -> Vec<String> {
    tags.into_iter()
        .filter_map(|tag| {
            let trimmed = tag.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        })
        .collect()
}
