mod common;

use common::{fixture_router, fixture_router_with, ArtistInfo, Complex, UpdateUser};
use http::Method;
use restpath::config::RouterConfig;
use restpath::router::Router;
use restpath::typed::{MemberKind, RequestData, RestRequest};
use uuid::Uuid;

fn hydrate<T: 'static>(router: &Router, verb: Method, path: &str, data: &RequestData) -> T {
    let matched = router.resolve(&verb, path).expect("route should match");
    *router
        .create_request(&matched, data)
        .expect("binding should succeed")
        .downcast::<T>()
        .expect("route should produce the requested type")
}

#[test]
fn test_complex_round_trip() {
    let router = fixture_router();
    let req: Complex = hydrate(
        &router,
        Method::GET,
        "/complex/5/Is Alive/unique/4583B364-BBDC-427F-A289-C2923DEBD547",
        &RequestData::new(),
    );
    assert_eq!(req.id, 5);
    assert_eq!(req.name, "Is Alive");
    assert_eq!(
        req.unique_id,
        Uuid::parse_str("4583B364-BBDC-427F-A289-C2923DEBD547").unwrap()
    );
}

#[test]
fn test_hybrid_component_hydrates_guid() {
    let router = fixture_router();
    let req: ArtistInfo = hydrate(
        &router,
        Method::GET,
        "/music/artists/E0A387F5-48F0-40E0-AAEA-483DD7EE7484.xml",
        &RequestData::new(),
    );
    assert_eq!(
        req.mbz_guid,
        Uuid::parse_str("e0a387f5-48f0-40e0-aaea-483dd7ee7484").unwrap()
    );
    assert_eq!(req.content_type, "xml");
}

#[test]
fn test_binding_error_names_the_field() {
    let router = fixture_router();
    let matched = router
        .resolve(&Method::GET, "/complex/five/x/unique/4583B364-BBDC-427F-A289-C2923DEBD547")
        .unwrap();
    let err = router
        .create_request(&matched, &RequestData::new())
        .unwrap_err();
    assert_eq!(err.request_type, "Complex");
    assert_eq!(err.field, "id");
    assert_eq!(err.value, "five");
    assert_eq!(err.expected, "i32");
}

#[test]
fn test_query_and_form_fill_unbound_members() {
    let router = fixture_router();
    let data = RequestData::from_query_string("active=TRUE&display-name=Mac&name=ignored")
        .with_form("Display_Name", "Conor");
    let req: UpdateUser = hydrate(&router, Method::PUT, "/users/McGregor/tags/a,b,c", &data);
    assert_eq!(req.name, "McGregor");
    assert_eq!(req.tags, ["a", "b", "c"]);
    assert!(req.active);
    assert_eq!(req.display.as_deref(), Some("Conor"));
    assert_eq!(req.legacy_code, None);
    assert!(req.cache.is_empty());
}

#[test]
fn test_public_fields_bind_only_in_compat_mode() {
    let data = RequestData::new().with_query("LegacyCode", "42");

    let strict: UpdateUser = hydrate(&fixture_router(), Method::PUT, "/users/a", &data);
    assert_eq!(strict.legacy_code, None);

    let compat_router = fixture_router_with(RouterConfig {
        bind_public_fields: true,
        ..RouterConfig::default()
    });
    let compat: UpdateUser = hydrate(&compat_router, Method::PUT, "/users/a", &data);
    assert_eq!(compat.legacy_code, Some(42));
}

#[test]
fn test_derived_descriptor_shape() {
    let descriptor = UpdateUser::descriptor();
    assert_eq!(descriptor.type_name(), "UpdateUser");
    assert_eq!(descriptor.len(), 5);
    assert!(descriptor.member("cache").is_none());
    assert_eq!(descriptor.member("displayname").unwrap().name(), "display-name");
    assert_eq!(
        descriptor.member("legacy_code").unwrap().kind(),
        MemberKind::Field
    );

    let routes = UpdateUser::routes();
    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0].path, "/users/{Name}");
    assert_eq!(routes[1].verbs.as_deref(), Some("PUT"));
}

#[test]
fn test_unset_members_keep_defaults() {
    let router = fixture_router();
    let req: UpdateUser = hydrate(&router, Method::PUT, "/users/Ann", &RequestData::new());
    assert_eq!(
        req,
        UpdateUser {
            name: "Ann".to_string(),
            ..UpdateUser::default()
        }
    );
}

#[test]
fn test_invalid_query_value_is_a_binding_error() {
    let router = fixture_router();
    let matched = router.resolve(&Method::PUT, "/users/Ann").unwrap();
    let err = router
        .create_request(&matched, &RequestData::new().with_query("active", "sometimes"))
        .unwrap_err();
    assert_eq!(err.field, "active");
    assert_eq!(err.expected, "bool");
}
