//! Admin site: an explicit routing table from entity kind to CRUD handlers.
//!
//! # Responsibility
//! - Map [`EntityKind`] to the add/change/delete handlers for that record.
//! - Translate store outcomes into admin messages and field errors.
//!
//! # Invariants
//! - Only registered kinds are dispatched; anything else is rejected.
//! - A failed action reports errors and leaves storage untouched.

use crate::model::EntityKind;
use crate::repo::{ContentStore, RepoError};
use crate::service::content_service::ContentService;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod form;
mod handlers;

pub use form::{AdminForm, FieldErrors};

pub type AdminResult<T> = Result<T, AdminError>;

/// Error surfaced to the admin user.
#[derive(Debug)]
pub enum AdminError {
    /// Kind has no registered handlers.
    UnknownEntity(String),
    /// Form rejected; nothing was written.
    Invalid(FieldErrors),
    NotFound { entity: EntityKind, key: String },
    Store(RepoError),
}

impl Display for AdminError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownEntity(name) => write!(f, "no admin registered for `{name}`"),
            Self::Invalid(errors) => write!(f, "please correct the errors below: {errors}"),
            Self::NotFound { entity, key } => write!(f, "{entity} with ID \"{key}\" doesn't exist"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AdminError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for AdminError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => {
                let mut errors = FieldErrors::default();
                errors.add(err.field(), err.to_string());
                Self::Invalid(errors)
            }
            RepoError::NotFound { entity, key } => Self::NotFound { entity, key },
            other => Self::Store(other),
        }
    }
}

/// Action requested by an admin user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminAction {
    Add { kind: EntityKind, form: AdminForm },
    Change { kind: EntityKind, id: i64, form: AdminForm },
    Delete { kind: EntityKind, id: i64 },
}

impl AdminAction {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Add { kind, .. } | Self::Change { kind, .. } | Self::Delete { kind, .. } => *kind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminVerb {
    Added,
    Changed,
    Deleted,
}

impl AdminVerb {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Changed => "changed",
            Self::Deleted => "deleted",
        }
    }
}

/// Record touched by a handler: its id and display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminRecord {
    pub id: i64,
    pub label: String,
}

/// Successful admin action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminOutcome {
    pub kind: EntityKind,
    pub verb: AdminVerb,
    pub record: AdminRecord,
}

impl AdminOutcome {
    /// User-facing confirmation, e.g. `The post "Hello" was added successfully.`
    pub fn message(&self) -> String {
        format!(
            "The {} \"{}\" was {} successfully.",
            self.kind,
            self.record.label,
            self.verb.as_str()
        )
    }
}

pub type AddHandler<S> = fn(&mut ContentService<S>, &AdminForm) -> AdminResult<AdminRecord>;
pub type ChangeHandler<S> = fn(&mut ContentService<S>, i64, &AdminForm) -> AdminResult<AdminRecord>;
pub type DeleteHandler<S> = fn(&mut ContentService<S>, i64) -> AdminResult<AdminRecord>;

/// Handlers registered for one entity kind.
pub struct ModelAdmin<S: ContentStore> {
    pub add: AddHandler<S>,
    pub change: ChangeHandler<S>,
    pub delete: DeleteHandler<S>,
}

/// Routing table consulted by [`AdminSite::dispatch`].
pub struct AdminSite<S: ContentStore> {
    registry: BTreeMap<EntityKind, ModelAdmin<S>>,
}

impl<S: ContentStore> AdminSite<S> {
    /// Creates an empty site with nothing registered.
    pub fn empty() -> Self {
        Self {
            registry: BTreeMap::new(),
        }
    }

    /// Creates a site with Category, Tag and Post registered.
    pub fn new() -> Self {
        let mut site = Self::empty();
        site.register(
            EntityKind::Category,
            ModelAdmin {
                add: handlers::add_category,
                change: handlers::change_category,
                delete: handlers::delete_category,
            },
        );
        site.register(
            EntityKind::Tag,
            ModelAdmin {
                add: handlers::add_tag,
                change: handlers::change_tag,
                delete: handlers::delete_tag,
            },
        );
        site.register(
            EntityKind::Post,
            ModelAdmin {
                add: handlers::add_post,
                change: handlers::change_post,
                delete: handlers::delete_post,
            },
        );
        site
    }

    /// Registers (or replaces) the handlers for `kind`.
    pub fn register(&mut self, kind: EntityKind, admin: ModelAdmin<S>) {
        self.registry.insert(kind, admin);
    }

    pub fn is_registered(&self, kind: EntityKind) -> bool {
        self.registry.contains_key(&kind)
    }

    pub fn registered_kinds(&self) -> Vec<EntityKind> {
        self.registry.keys().copied().collect()
    }

    /// Routes `action` to the handler registered for its kind.
    pub fn dispatch(
        &self,
        service: &mut ContentService<S>,
        action: &AdminAction,
    ) -> AdminResult<AdminOutcome> {
        let kind = action.kind();
        let admin = self
            .registry
            .get(&kind)
            .ok_or_else(|| AdminError::UnknownEntity(kind.to_string()))?;

        let (verb, result) = match action {
            AdminAction::Add { form, .. } => (AdminVerb::Added, (admin.add)(service, form)),
            AdminAction::Change { id, form, .. } => {
                (AdminVerb::Changed, (admin.change)(service, *id, form))
            }
            AdminAction::Delete { id, .. } => (AdminVerb::Deleted, (admin.delete)(service, *id)),
        };

        match result {
            Ok(record) => {
                debug!(
                    "event=admin_action module=admin status=ok kind={kind} verb={} id={}",
                    verb.as_str(),
                    record.id
                );
                Ok(AdminOutcome { kind, verb, record })
            }
            Err(err) => {
                warn!(
                    "event=admin_action module=admin status=error kind={kind} verb={}",
                    verb.as_str()
                );
                Err(err)
            }
        }
    }
}

impl<S: ContentStore> Default for AdminSite<S> {
    fn default() -> Self {
        Self::new()
    }
}
