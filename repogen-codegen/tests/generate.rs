//! End-to-end tests for a generation run over real files.

use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use repogen_codegen::{ErrorKind, Pipeline};
use repogen_config::Config;
use repogen_core::WriteResult;
use tempfile::TempDir;

const USER_FIXTURE: &str = include_str!("fixtures/user.rs");

/// Write `src` into a temp dir as `name` and return the dir and the file path.
fn source_file(name: &str, src: &str) -> (TempDir, PathBuf) {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let path = temp.path().join(name);
    fs::write(&path, src).expect("Failed to write source");
    (temp, path)
}

fn pipeline() -> Pipeline {
    Pipeline::new(Config::default()).expect("templates should compile")
}

fn generated_path(source: &Path) -> PathBuf {
    source.with_file_name("user_gen.rs")
}

/// Names of the methods defined on `<entity>Repository`.
fn repository_methods(content: &str, entity: &str) -> Vec<String> {
    let file = syn::parse_file(content).expect("generated file should parse");
    let wrapper = format!("{}Repository", entity);
    file.items
        .iter()
        .filter_map(|item| match item {
            syn::Item::Impl(imp) => Some(imp),
            _ => None,
        })
        .filter(|imp| matches!(&*imp.self_ty, syn::Type::Path(p) if p.path.is_ident(&wrapper)))
        .flat_map(|imp| imp.items.iter())
        .filter_map(|item| match item {
            syn::ImplItem::Fn(f) => Some(f.sig.ident.to_string()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_zero_markers_emit_header_only() {
    let (_temp, source) = source_file("user.rs", "pub struct User { pub id: i64 }\n");

    let outcome = pipeline().run(&source).unwrap();

    assert!(outcome.entities.is_empty());
    assert_eq!(outcome.write, Some(WriteResult::Written));
    let content = fs::read_to_string(generated_path(&source)).unwrap();
    insta::assert_snapshot!(content.trim_end(), @"//! Code generated by repogen from `user`. DO NOT EDIT.");
}

#[test]
fn test_user_repository() {
    let (_temp, source) = source_file("user.rs", USER_FIXTURE);

    let outcome = pipeline().run(&source).unwrap();

    assert_eq!(outcome.destination, generated_path(&source));
    assert_eq!(outcome.entities, vec!["User"]);

    let content = fs::read_to_string(&outcome.destination).unwrap();
    assert_eq!(content, outcome.content);
    assert!(content.starts_with("//! Code generated by repogen from `user`. DO NOT EDIT."));
    assert!(content.contains("use sqlx::PgPool;"));
    assert!(content.contains("use super::user::User;"));
    assert!(content.contains("pub struct UserRepository {"));
    assert!(content.contains("pool: PgPool,"));
    assert!(content.contains("pub async fn get(&self, id: i64) -> Result<User, sqlx::Error>"));
    assert!(content.contains("\"SELECT * FROM users WHERE id = $1 LIMIT 1\""));
    assert!(content.contains("\"UPDATE users SET email = $1, password_hash = $2 WHERE id = $3\""));
    assert!(content.contains("pub async fn delete(&self, entity: &User)"));
    assert!(!content.contains("SessionRepository"));

    assert_eq!(
        repository_methods(&content, "User"),
        vec!["new", "get", "create", "update", "delete"]
    );
}

#[test]
fn test_missing_primary_field_writes_nothing() {
    let (_temp, source) = source_file(
        "user.rs",
        r#"
/// repogen:entity
pub struct User {
    pub id: i64,
    pub email: String,
}
"#,
    );

    let err = pipeline().run(&source).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Semantic);
    assert!(!generated_path(&source).exists());
}

#[test]
fn test_failure_in_later_entity_writes_nothing() {
    let (_temp, source) = source_file(
        "user.rs",
        r#"
/// repogen:entity
pub struct User {
    #[primary]
    pub id: i64,
}

/// repogen:entity
pub struct Audit {
    pub at: i64,
}
"#,
    );

    let err = pipeline().run(&source).unwrap_err();

    assert!(err.to_string().contains("'Audit'"));
    assert!(!generated_path(&source).exists());
}

#[test]
fn test_output_is_deterministic() {
    let (_temp, source) = source_file("user.rs", USER_FIXTURE);
    let pipeline = pipeline();

    let first = pipeline.run(&source).unwrap();
    let first_bytes = fs::read(&first.destination).unwrap();
    let second = pipeline.run(&source).unwrap();
    let second_bytes = fs::read(&second.destination).unwrap();

    assert_eq!(first_bytes, second_bytes);
    assert_eq!(second.write, Some(WriteResult::Unchanged));
}

#[test]
fn test_two_entities_share_imports() {
    let (_temp, source) = source_file(
        "models.rs",
        r#"
/// repogen:entity
pub struct User {
    #[primary]
    pub id: i64,
}

/// repogen:entity
pub struct Account {
    #[primary]
    pub id: i64,
    pub owner: i64,
}
"#,
    );

    let outcome = pipeline().preview(&source).unwrap();

    assert_eq!(outcome.entities, vec!["User", "Account"]);
    assert_eq!(outcome.content.matches("use sqlx::PgPool;").count(), 1);
    assert!(outcome.content.contains("use super::models::{Account, User};"));

    let user = outcome.content.find("pub struct UserRepository").unwrap();
    let account = outcome.content.find("pub struct AccountRepository").unwrap();
    assert!(user < account);
}

#[test]
fn test_preview_does_not_write() {
    let (_temp, source) = source_file("user.rs", USER_FIXTURE);

    let outcome = pipeline().preview(&source).unwrap();

    assert_eq!(outcome.write, None);
    assert!(outcome.content.contains("UserRepository"));
    assert!(!outcome.destination.exists());
}

#[test]
fn test_mod_rs_imports_from_super() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("models");
    fs::create_dir(&dir).unwrap();
    let source = dir.join("mod.rs");
    fs::write(&source, USER_FIXTURE).unwrap();

    let outcome = pipeline().preview(&source).unwrap();

    assert_eq!(outcome.destination, dir.join("mod_gen.rs"));
    assert!(outcome.content.starts_with("//! Code generated by repogen from `models`."));
    assert!(outcome.content.contains("use super::User;"));
}

#[test]
fn test_mysql_backend() {
    let (_temp, source) = source_file("user.rs", USER_FIXTURE);
    let config = Config::from_str(
        r#"
        [database]
        backend = "mysql"
        table_prefix = "app_"
        "#,
    )
    .unwrap();

    let outcome = Pipeline::new(config).unwrap().preview(&source).unwrap();

    assert!(outcome.content.contains("use sqlx::MySqlPool;"));
    assert!(outcome.content.contains("\"DELETE FROM app_users WHERE id = ?\""));
}

#[test]
fn test_custom_suffix() {
    let (_temp, source) = source_file("user.rs", USER_FIXTURE);
    let config = Config::from_str("[generator]\nsuffix = \"_repo\"\n").unwrap();

    let outcome = Pipeline::new(config).unwrap().run(&source).unwrap();

    assert_eq!(outcome.destination, source.with_file_name("user_repo.rs"));
    assert!(outcome.destination.exists());
}

#[test]
fn test_invalid_source_is_parse_error() {
    let (_temp, source) = source_file("user.rs", "pub struct User {\n    id u32,\n}\n");

    let err = pipeline().run(&source).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Parse);
    assert!(!generated_path(&source).exists());
}

#[test]
fn test_missing_source_is_io_error() {
    let temp = TempDir::new().unwrap();

    let err = pipeline().run(temp.path().join("absent.rs")).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(err.to_string().starts_with("scan: failed to read"));
}

#[test]
fn test_module_name_that_is_not_an_identifier() {
    let (_temp, source) = source_file("user-models.rs", USER_FIXTURE);

    let err = pipeline().run(&source).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Serialization);
    assert!(!source.with_file_name("user-models_gen.rs").exists());
}

#[test]
fn test_non_rust_extension() {
    let (_temp, source) = source_file("user.txt", "pub struct User;\n");

    let outcome = pipeline().run(&source).unwrap();

    assert_eq!(outcome.destination, source.with_file_name("user.txt_gen.rs"));
}

#[test]
fn test_key_types_are_imported() {
    let (_temp, source) = source_file(
        "user.rs",
        r#"
use uuid::Uuid;

pub struct UserId(pub i64);

/// repogen:entity
pub struct User {
    #[repogen(primary_key)]
    pub id: UserId,
    pub email: String,
}

/// repogen:entity
pub struct Session {
    #[repogen(primary_key)]
    pub token: Uuid,
    pub user_id: i64,
}
"#,
    );

    let outcome = pipeline().run(&source).unwrap();

    assert!(outcome.content.contains("use super::user::{Session, User, UserId};"));
    assert!(outcome.content.contains("use uuid::Uuid;"));
    assert!(outcome.content.contains("pub async fn get(&self, id: UserId)"));
    assert!(outcome.content.contains("pub async fn get(&self, token: Uuid)"));
}

#[test]
fn test_private_field_writes_nothing() {
    let (_temp, source) = source_file(
        "user.rs",
        r#"
/// repogen:entity
pub struct User {
    #[primary]
    pub id: i64,
    password_hash: String,
}
"#,
    );

    let err = pipeline().run(&source).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Semantic);
    assert!(err.to_string().starts_with("generate: 'User'"));
    assert!(!generated_path(&source).exists());
}
