//! Add/change/delete handlers registered on the default admin site.

use super::{AdminError, AdminForm, AdminRecord, AdminResult, FieldErrors};
use crate::model::post::{PostChanges, PostDraft, DEFAULT_SITE_ID};
use crate::model::term::{TermChanges, TermDraft};
use crate::repo::ContentStore;
use crate::service::content_service::ContentService;
use chrono::{DateTime, NaiveDateTime};
use std::collections::BTreeSet;

const REQUIRED: &str = "This field is required.";
const INVALID_NUMBER: &str = "Enter a whole number.";
const INVALID_DATETIME: &str = "Enter a valid date/time.";
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

pub(super) fn add_category<S: ContentStore>(
    service: &mut ContentService<S>,
    form: &AdminForm,
) -> AdminResult<AdminRecord> {
    let category = service.create_category(&term_draft(form))?;
    Ok(AdminRecord {
        id: category.id,
        label: category.name,
    })
}

pub(super) fn change_category<S: ContentStore>(
    service: &mut ContentService<S>,
    id: i64,
    form: &AdminForm,
) -> AdminResult<AdminRecord> {
    let category = service.update_category(id, &term_changes(form))?;
    Ok(AdminRecord {
        id: category.id,
        label: category.name,
    })
}

pub(super) fn delete_category<S: ContentStore>(
    service: &mut ContentService<S>,
    id: i64,
) -> AdminResult<AdminRecord> {
    let category = service.get_category(id)?;
    service.delete_category(id)?;
    Ok(AdminRecord {
        id,
        label: category.name,
    })
}

pub(super) fn add_tag<S: ContentStore>(
    service: &mut ContentService<S>,
    form: &AdminForm,
) -> AdminResult<AdminRecord> {
    let tag = service.create_tag(&term_draft(form))?;
    Ok(AdminRecord {
        id: tag.id,
        label: tag.name,
    })
}

pub(super) fn change_tag<S: ContentStore>(
    service: &mut ContentService<S>,
    id: i64,
    form: &AdminForm,
) -> AdminResult<AdminRecord> {
    let tag = service.update_tag(id, &term_changes(form))?;
    Ok(AdminRecord {
        id: tag.id,
        label: tag.name,
    })
}

pub(super) fn delete_tag<S: ContentStore>(
    service: &mut ContentService<S>,
    id: i64,
) -> AdminResult<AdminRecord> {
    let tag = service.get_tag(id)?;
    service.delete_tag(id)?;
    Ok(AdminRecord { id, label: tag.name })
}

/// Creates a post. The slug is prepopulated from the title when left blank.
pub(super) fn add_post<S: ContentStore>(
    service: &mut ContentService<S>,
    form: &AdminForm,
) -> AdminResult<AdminRecord> {
    let mut errors = FieldErrors::default();

    if form.non_blank("title").is_none() {
        errors.add("title", REQUIRED);
    }
    let pub_date = match form.non_blank("pub_date") {
        Some(raw) => parse_datetime(raw, &mut errors),
        None => {
            errors.add("pub_date", REQUIRED);
            None
        }
    };
    let author_id = match form.non_blank("author") {
        Some(raw) => parse_id("author", raw, &mut errors),
        None => {
            errors.add("author", REQUIRED);
            None
        }
    };
    let site_id = match form.non_blank("site") {
        Some(raw) => parse_id("site", raw, &mut errors),
        None => Some(DEFAULT_SITE_ID),
    };
    let category_id = optional_id(form, "category", &mut errors);
    let tag_ids = tag_ids(form, &mut errors);

    let (Some(pub_date), Some(author_id), Some(site_id)) = (pub_date, author_id, site_id) else {
        return Err(AdminError::Invalid(errors));
    };
    if !errors.is_empty() {
        return Err(AdminError::Invalid(errors));
    }

    let draft = PostDraft {
        title: form.value("title").unwrap_or_default().to_string(),
        text: form.value("text").unwrap_or_default().to_string(),
        slug: form.non_blank("slug").map(str::to_string),
        pub_date,
        site_id,
        author_id,
        category_id,
        tag_ids,
    };
    let post = service.create_post(&draft)?;
    Ok(AdminRecord {
        id: post.id,
        label: post.title,
    })
}

/// Updates only the fields present in the form.
pub(super) fn change_post<S: ContentStore>(
    service: &mut ContentService<S>,
    id: i64,
    form: &AdminForm,
) -> AdminResult<AdminRecord> {
    let mut errors = FieldErrors::default();
    let mut changes = PostChanges {
        title: form.value("title").map(str::to_string),
        text: form.value("text").map(str::to_string),
        slug: form.value("slug").map(str::to_string),
        ..PostChanges::default()
    };

    if form.contains("pub_date") {
        match form.non_blank("pub_date") {
            Some(raw) => changes.pub_date = parse_datetime(raw, &mut errors),
            None => errors.add("pub_date", REQUIRED),
        }
    }
    if form.contains("author") {
        match form.non_blank("author") {
            Some(raw) => changes.author_id = parse_id("author", raw, &mut errors),
            None => errors.add("author", REQUIRED),
        }
    }
    if form.contains("site") {
        changes.site_id = match form.non_blank("site") {
            Some(raw) => parse_id("site", raw, &mut errors),
            None => Some(DEFAULT_SITE_ID),
        };
    }
    if form.contains("category") {
        changes.category_id = Some(optional_id(form, "category", &mut errors));
    }
    if form.contains("tags") {
        changes.tag_ids = Some(tag_ids(form, &mut errors));
    }
    if !errors.is_empty() {
        return Err(AdminError::Invalid(errors));
    }

    let post = service.update_post(id, &changes)?;
    Ok(AdminRecord {
        id: post.id,
        label: post.title,
    })
}

pub(super) fn delete_post<S: ContentStore>(
    service: &mut ContentService<S>,
    id: i64,
) -> AdminResult<AdminRecord> {
    let post = service.get_post(id)?;
    service.delete_post(id)?;
    Ok(AdminRecord {
        id,
        label: post.title,
    })
}

fn term_draft(form: &AdminForm) -> TermDraft {
    TermDraft::new(
        form.value("name").unwrap_or_default(),
        form.value("description").unwrap_or_default(),
    )
}

fn term_changes(form: &AdminForm) -> TermChanges {
    TermChanges {
        name: form.value("name").map(str::to_string),
        description: form.value("description").map(str::to_string),
    }
}

fn parse_id(field: &'static str, raw: &str, errors: &mut FieldErrors) -> Option<i64> {
    match raw.trim().parse::<i64>() {
        Ok(id) => Some(id),
        Err(_) => {
            errors.add(field, INVALID_NUMBER);
            None
        }
    }
}

fn optional_id(form: &AdminForm, field: &'static str, errors: &mut FieldErrors) -> Option<i64> {
    form.non_blank(field)
        .and_then(|raw| parse_id(field, raw, errors))
}

/// Collects tag ids from repeated and/or comma-separated `tags` values.
fn tag_ids(form: &AdminForm, errors: &mut FieldErrors) -> BTreeSet<i64> {
    form.values("tags")
        .iter()
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .filter_map(|value| parse_id("tags", value, errors))
        .collect()
}

/// Parses RFC 3339 or a naive `YYYY-MM-DD HH:MM[:SS]` (taken as UTC) into
/// epoch milliseconds.
fn parse_datetime(raw: &str, errors: &mut FieldErrors) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.timestamp_millis());
    }
    let naive = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok());
    match naive {
        Some(naive) => Some(naive.and_utc().timestamp_millis()),
        None => {
            errors.add("pub_date", INVALID_DATETIME);
            None
        }
    }
}
