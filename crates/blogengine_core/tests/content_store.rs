use blogengine_core::db::{open_db, open_db_in_memory};
use blogengine_core::{
    CategoryChanges, CategoryDraft, ContentService, EntityKind, Post, PostChanges, PostDraft,
    RepoError, SqliteContentStore, TagChanges, TagDraft, ValidationError,
};
use rusqlite::Connection;
use std::collections::BTreeSet;
use std::sync::{Arc, Barrier};
use std::thread;

const PUB_DATE: i64 = 1_700_000_000_000;

fn service(conn: &mut Connection) -> ContentService<SqliteContentStore<'_>> {
    ContentService::new(SqliteContentStore::try_new(conn).unwrap())
}

fn validation(err: RepoError) -> ValidationError {
    match err {
        RepoError::Validation(inner) => inner,
        other => panic!("expected validation error, got {other}"),
    }
}

#[test]
fn category_create_then_get_returns_equal_record() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = service(&mut conn);

    let created = service
        .create_category(&CategoryDraft::new(
            "python",
            "The python programming language",
        ))
        .unwrap();
    assert_eq!(created.name, "python");
    assert_eq!(created.description, "The python programming language");
    assert_eq!(created.slug, "python");

    assert_eq!(service.get_category(created.id).unwrap(), created);
    assert_eq!(service.get_category_by_slug("python").unwrap(), created);
    assert_eq!(service.list_categories().unwrap(), vec![created]);
}

#[test]
fn term_descriptions_are_stored_verbatim() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = service(&mut conn);

    let category = service
        .create_category(&CategoryDraft::new("python", "  indented\n"))
        .unwrap();
    assert_eq!(category.description, "  indented\n");
    assert_eq!(service.get_category(category.id).unwrap(), category);

    let tag = service.create_tag(&TagDraft::new("rust", "\tleading tab ")).unwrap();
    assert_eq!(service.get_tag(tag.id).unwrap().description, "\tleading tab ");

    let changed = service
        .update_tag(
            tag.id,
            &TagChanges {
                description: Some(" spaced ".to_string()),
                ..TagChanges::default()
            },
        )
        .unwrap();
    assert_eq!(changed.description, " spaced ");
}

#[test]
fn tag_create_then_get_returns_equal_record() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = service(&mut conn);

    let created = service
        .create_tag(&TagDraft::new("Web Development", "Sites and services"))
        .unwrap();
    assert_eq!(created.slug, "web-development");
    assert_eq!(service.get_tag(created.id).unwrap(), created);
    assert_eq!(service.get_tag_by_slug("web-development").unwrap(), created);
}

#[test]
fn post_create_then_get_returns_equal_record() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = service(&mut conn);
    let category = service
        .create_category(&CategoryDraft::new("python", ""))
        .unwrap();
    let tag_a = service.create_tag(&TagDraft::new("django", "")).unwrap();
    let tag_b = service.create_tag(&TagDraft::new("testing", "")).unwrap();

    let draft = PostDraft::new("Test post title", "This is body of test post", PUB_DATE, 7)
        .with_slug("test-post-title")
        .with_category(category.id)
        .with_tags([tag_b.id, tag_a.id, tag_b.id]);
    let created = service.create_post(&draft).unwrap();

    let expected = Post {
        id: created.id,
        title: "Test post title".to_string(),
        text: "This is body of test post".to_string(),
        slug: "test-post-title".to_string(),
        pub_date: PUB_DATE,
        site_id: 1,
        author_id: 7,
        category_id: Some(category.id),
        tag_ids: BTreeSet::from([tag_a.id, tag_b.id]),
    };
    assert_eq!(created, expected);
    assert_eq!(service.get_post(created.id).unwrap(), expected);
    assert_eq!(service.get_post_by_slug("test-post-title").unwrap(), expected);
}

#[test]
fn post_slug_is_prepopulated_from_title() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = service(&mut conn);

    let created = service
        .create_post(&PostDraft::new("My First Post!", "", PUB_DATE, 1))
        .unwrap();
    assert_eq!(created.slug, "my-first-post");
}

#[test]
fn second_post_with_same_slug_is_rejected_without_side_effects() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = service(&mut conn);

    service
        .create_post(&PostDraft::new("First", "", PUB_DATE, 1).with_slug("same"))
        .unwrap();
    let err = service
        .create_post(&PostDraft::new("Second", "", PUB_DATE, 1).with_slug("same"))
        .unwrap_err();

    assert_eq!(
        validation(err),
        ValidationError::SlugTaken {
            entity: EntityKind::Post,
            slug: "same".to_string()
        }
    );
    assert_eq!(service.list_posts().unwrap().len(), 1);
}

#[test]
fn category_and_tag_names_and_slugs_are_unique() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = service(&mut conn);

    service
        .create_category(&CategoryDraft::new("Web Dev", ""))
        .unwrap();
    let err = service
        .create_category(&CategoryDraft::new("web dev", ""))
        .unwrap_err();
    assert!(matches!(validation(err), ValidationError::NameTaken { .. }));

    let err = service
        .create_category(&CategoryDraft::new("Web-Dev", ""))
        .unwrap_err();
    assert!(matches!(validation(err), ValidationError::SlugTaken { .. }));

    service.create_tag(&TagDraft::new("Web Dev", "")).unwrap();
    let err = service.create_tag(&TagDraft::new("WEB DEV", "")).unwrap_err();
    assert_eq!(validation(err).entity(), EntityKind::Tag);
}

#[test]
fn required_fields_are_enforced() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = service(&mut conn);

    let err = service
        .create_post(&PostDraft::new("   ", "body", PUB_DATE, 1))
        .unwrap_err();
    assert_eq!(
        validation(err),
        ValidationError::Required {
            entity: EntityKind::Post,
            field: "title"
        }
    );

    let err = service
        .create_category(&CategoryDraft::new("", "no name"))
        .unwrap_err();
    assert_eq!(validation(err).field(), "name");
}

#[test]
fn unknown_references_are_rejected() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = service(&mut conn);

    let err = service
        .create_post(&PostDraft::new("Title", "", PUB_DATE, 1).with_category(42))
        .unwrap_err();
    assert_eq!(validation(err), ValidationError::UnknownCategory(42));

    let err = service
        .create_post(&PostDraft::new("Title", "", PUB_DATE, 1).with_tags([9]))
        .unwrap_err();
    assert_eq!(validation(err), ValidationError::UnknownTag(9));
    assert!(service.list_posts().unwrap().is_empty());
}

#[test]
fn update_title_and_text_leaves_other_fields_unchanged() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = service(&mut conn);
    let category = service
        .create_category(&CategoryDraft::new("python", ""))
        .unwrap();
    let tag = service.create_tag(&TagDraft::new("python", "")).unwrap();
    let original = service
        .create_post(
            &PostDraft::new("My first post", "This is my first blog post", PUB_DATE, 3)
                .with_category(category.id)
                .with_tags([tag.id]),
        )
        .unwrap();

    let changes = PostChanges {
        title: Some("My second post".to_string()),
        text: Some("This is my second blog post".to_string()),
        ..PostChanges::default()
    };
    let updated = service.update_post(original.id, &changes).unwrap();

    assert_eq!(updated.title, "My second post");
    assert_eq!(updated.text, "This is my second blog post");
    assert_eq!(updated.slug, original.slug);
    assert_eq!(updated.pub_date, original.pub_date);
    assert_eq!(updated.author_id, original.author_id);
    assert_eq!(updated.category_id, original.category_id);
    assert_eq!(updated.tag_ids, original.tag_ids);
    assert_eq!(service.get_post(original.id).unwrap(), updated);
}

#[test]
fn update_rechecks_slug_uniqueness_against_other_posts_only() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = service(&mut conn);
    let first = service
        .create_post(&PostDraft::new("First", "", PUB_DATE, 1))
        .unwrap();
    let second = service
        .create_post(&PostDraft::new("Second", "", PUB_DATE, 1))
        .unwrap();

    let keep_own_slug = PostChanges {
        slug: Some(first.slug.clone()),
        ..PostChanges::default()
    };
    service.update_post(first.id, &keep_own_slug).unwrap();

    let steal_slug = PostChanges {
        slug: Some(first.slug.clone()),
        ..PostChanges::default()
    };
    let err = service.update_post(second.id, &steal_slug).unwrap_err();
    assert!(matches!(validation(err), ValidationError::SlugTaken { .. }));
    assert_eq!(service.get_post(second.id).unwrap().slug, "second");
}

#[test]
fn update_replaces_tag_set_and_clears_category() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = service(&mut conn);
    let category = service
        .create_category(&CategoryDraft::new("python", ""))
        .unwrap();
    let tag_a = service.create_tag(&TagDraft::new("a", "")).unwrap();
    let tag_b = service.create_tag(&TagDraft::new("b", "")).unwrap();
    let post = service
        .create_post(
            &PostDraft::new("Title", "", PUB_DATE, 1)
                .with_category(category.id)
                .with_tags([tag_a.id]),
        )
        .unwrap();

    let changes = PostChanges {
        category_id: Some(None),
        tag_ids: Some(BTreeSet::from([tag_b.id])),
        ..PostChanges::default()
    };
    let updated = service.update_post(post.id, &changes).unwrap();
    assert_eq!(updated.category_id, None);
    assert_eq!(updated.tag_ids, BTreeSet::from([tag_b.id]));
}

#[test]
fn missing_ids_report_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = service(&mut conn);

    assert!(service.get_post(99).unwrap_err().is_not_found());
    assert!(service.get_post_by_slug("nope").unwrap_err().is_not_found());
    assert!(service
        .update_post(99, &PostChanges::default())
        .unwrap_err()
        .is_not_found());
    assert!(service.delete_post(99).unwrap_err().is_not_found());
    assert!(service
        .update_category(99, &CategoryChanges::default())
        .unwrap_err()
        .is_not_found());
    assert!(service.delete_tag(99).unwrap_err().is_not_found());
    assert!(service.get_tag_by_slug("nope").unwrap_err().is_not_found());
}

#[test]
fn renaming_category_rederives_slug() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = service(&mut conn);
    let category = service
        .create_category(&CategoryDraft::new("python", "The python programming language"))
        .unwrap();

    let changes = CategoryChanges {
        name: Some("Perl".to_string()),
        description: None,
    };
    let renamed = service.update_category(category.id, &changes).unwrap();
    assert_eq!(renamed.name, "Perl");
    assert_eq!(renamed.slug, "perl");
    assert_eq!(renamed.description, "The python programming language");
    assert!(service.get_category_by_slug("python").unwrap_err().is_not_found());

    let tag = service.create_tag(&TagDraft::new("python", "")).unwrap();
    let renamed_tag = service
        .update_tag(
            tag.id,
            &TagChanges {
                name: None,
                description: Some("snakes".to_string()),
            },
        )
        .unwrap();
    assert_eq!(renamed_tag.slug, "python");
    assert_eq!(renamed_tag.description, "snakes");
}

#[test]
fn deleting_category_or_tag_keeps_posts() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = service(&mut conn);
    let category = service
        .create_category(&CategoryDraft::new("python", ""))
        .unwrap();
    let tag = service.create_tag(&TagDraft::new("django", "")).unwrap();
    let post = service
        .create_post(
            &PostDraft::new("Title", "", PUB_DATE, 1)
                .with_category(category.id)
                .with_tags([tag.id]),
        )
        .unwrap();

    service.delete_category(category.id).unwrap();
    service.delete_tag(tag.id).unwrap();

    let reloaded = service.get_post(post.id).unwrap();
    assert_eq!(reloaded.category_id, None);
    assert!(reloaded.tag_ids.is_empty());
    assert!(service.list_categories().unwrap().is_empty());
    assert!(service.list_tags().unwrap().is_empty());
}

#[test]
fn deleting_post_removes_it_and_its_tag_links() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let mut service = service(&mut conn);
        let tag = service.create_tag(&TagDraft::new("python", "")).unwrap();
        let post = service
            .create_post(&PostDraft::new("Title", "", PUB_DATE, 1).with_tags([tag.id]))
            .unwrap();

        service.delete_post(post.id).unwrap();
        assert!(service.get_post_by_slug("title").unwrap_err().is_not_found());
        assert!(service.list_posts().unwrap().is_empty());
    }

    let links: i64 = conn
        .query_row("SELECT COUNT(*) FROM post_tags;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(links, 0);
}

#[test]
fn concurrent_writers_with_same_slug_leave_one_post() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blog.sqlite3");
    let connections = vec![open_db(&path).unwrap(), open_db(&path).unwrap()];
    let barrier = Arc::new(Barrier::new(connections.len()));

    let writers: Vec<_> = connections
        .into_iter()
        .enumerate()
        .map(|(idx, mut conn)| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut service = service(&mut conn);
                let draft = PostDraft::new(format!("Writer {idx}"), "", PUB_DATE, 1)
                    .with_slug("shared-slug");
                barrier.wait();
                service.create_post(&draft).map(|post| post.id)
            })
        })
        .collect();
    let results: Vec<_> = writers
        .into_iter()
        .map(|writer| writer.join().unwrap())
        .collect();

    assert_eq!(results.iter().filter(|result| result.is_ok()).count(), 1);
    let err = results.into_iter().find_map(Result::err).unwrap();
    assert_eq!(
        validation(err),
        ValidationError::SlugTaken {
            entity: EntityKind::Post,
            slug: "shared-slug".to_string(),
        }
    );

    let mut conn = open_db(&path).unwrap();
    let posts = service(&mut conn).list_posts().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].slug, "shared-slug");
}
