use std::{borrow::Cow, collections::HashSet};

use validator::{ValidationError, ValidationErrors};

use crate::model::is_known_genre;

/// Genres must be known, unique, and at most `max` of them.
pub fn check_genres(
    errors: &mut ValidationErrors,
    field: &'static str,
    genres: &[String],
    max: Option<usize>,
) {
    if let Some(max) = max {
        if genres.len() > max {
            errors.add(
                field,
                ValidationError::new("genres_length")
                    .with_message(Cow::from(format!("At most {} genres are allowed", max))),
            );
        }
    }

    if let Some(unknown) = genres.iter().find(|g| !is_known_genre(g)) {
        errors.add(
            field,
            ValidationError::new("genres_unknown")
                .with_message(Cow::from(format!("Unknown genre: {}", unknown))),
        );
    }

    let unique: HashSet<&String> = genres.iter().collect();
    if unique.len() != genres.len() {
        errors.add(
            field,
            ValidationError::new("genres_duplicate")
                .with_message(Cow::from("Genres must not repeat")),
        );
    }
}

pub fn check_length(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) {
    let length = value.chars().count();
    if length < min || length > max {
        errors.add(
            field,
            ValidationError::new("length").with_message(Cow::from(format!(
                "Length must be between {} and {}",
                min, max
            ))),
        );
    }
}

pub fn into_result(errors: ValidationErrors) -> Result<(), ValidationErrors> {
    if !errors.errors().is_empty() {
        return Err(errors);
    }

    Ok(())
}
