#![allow(dead_code)]

use restpath::config::RouterConfig;
use restpath::router::Router;
use restpath::typed::RestRequest;
use std::io::Write;
use tempfile::NamedTempFile;
use uuid::Uuid;

#[derive(Debug, Default, PartialEq, RestRequest)]
#[route("/Complex/{Id}/{Name}/Unique/{UniqueId}")]
pub struct Complex {
    pub id: i32,
    pub name: String,
    pub unique_id: Uuid,
}

#[derive(Debug, Default, PartialEq, RestRequest)]
#[route("/music/artists/{mbz_guid}.{content_type}", "GET")]
pub struct ArtistInfo {
    pub mbz_guid: Uuid,
    pub content_type: String,
}

#[derive(Debug, Default, PartialEq, RestRequest)]
#[route("/content/literal", "GET")]
pub struct LiteralContent;

#[derive(Debug, Default, PartialEq, RestRequest)]
#[route("/content/{Version}", "GET")]
pub struct VersionedContent {
    pub version: String,
}

#[derive(Debug, Default, PartialEq, RestRequest)]
#[route("/content/{Slug*}", "GET")]
pub struct SlugContent {
    pub slug: Option<String>,
}

#[derive(Debug, Default, PartialEq, RestRequest)]
#[route("/content/{Slug*}/literal")]
pub struct AnchoredSlug {
    pub slug: Option<String>,
}

#[derive(Debug, Default, PartialEq, RestRequest)]
#[route("/content", "GET")]
pub struct GetContent;

#[derive(Debug, Default, PartialEq, RestRequest)]
#[route("/content")]
pub struct AnyContent;

#[derive(Debug, Default, PartialEq, RestRequest)]
#[route("/users/{Name}", "PUT")]
#[route("/users/{Name}/tags/{Tags}", "PUT", summary = "Replace tags")]
pub struct UpdateUser {
    pub name: String,
    pub tags: Vec<String>,
    pub active: bool,
    #[rest(rename = "display-name")]
    pub display: Option<String>,
    #[rest(field)]
    pub legacy_code: Option<u32>,
    #[rest(skip)]
    pub cache: Vec<u8>,
}

#[derive(Debug, Default, PartialEq, RestRequest)]
#[route("/files/{ignore}/{Path*}", "GET", priority = 1)]
pub struct FetchFile {
    pub path: Option<String>,
}

/// Router over every fixture type, validation on.
pub fn fixture_router() -> Router {
    fixture_router_with(RouterConfig::default())
}

pub fn fixture_router_with(config: RouterConfig) -> Router {
    Router::builder(config)
        .register::<Complex>()
        .and_then(|b| b.register::<ArtistInfo>())
        .and_then(|b| b.register::<LiteralContent>())
        .and_then(|b| b.register::<VersionedContent>())
        .and_then(|b| b.register::<SlugContent>())
        .and_then(|b| b.register::<AnchoredSlug>())
        .and_then(|b| b.register::<GetContent>())
        .and_then(|b| b.register::<AnyContent>())
        .and_then(|b| b.register::<UpdateUser>())
        .and_then(|b| b.register::<FetchFile>())
        .expect("fixture routes are valid")
        .build()
}

/// Write `contents` to a fresh temporary file.
pub fn temp_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}
