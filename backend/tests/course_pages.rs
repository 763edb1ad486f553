//! Catalogue and course section endpoints over the on-disk content store.

#[expect(
    dead_code,
    reason = "Shared helpers include functions used only by other integration suites."
)]
mod support;

use std::collections::BTreeMap;
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use mockable::Clock;
use rstest::{fixture, rstest};
use serde_json::Value;

use courseware::domain::{
    Account, AccountService, FeatureFlags, GroupName, INFO_SECTION_MISSING, StaticAssets,
    TRACE_ID_HEADER, UserId, Username, password_digest,
};
use courseware::inbound::http::courses::{CourseSummary, SectionResponse};
use courseware::inbound::http::state::{HttpState, HttpStatePorts};
use courseware::outbound::content::FsCourseStore;
use courseware::outbound::memory::{
    InMemoryAccountRepository, InMemoryEnrollmentRepository, InMemoryWikiRepository,
};
use courseware::test_support::fixtures::{CIRCUITS, ContentFixture, FUTURE, FixtureClock, TOY};
use courseware::test_support::harness::PASSWORD;
use support::{Get, get, init_app, login_as};

struct Site {
    _content: ContentFixture,
    state: HttpState,
    accounts: Arc<InMemoryAccountRepository>,
}

impl Site {
    async fn account(&self, username: &str, is_staff: bool, groups: &[&str]) {
        let name = Username::new(username).expect("username");
        let digest = password_digest(&name, PASSWORD);
        let account = Account::new(UserId::random(), name, digest)
            .with_active(true)
            .with_staff(is_staff)
            .with_capabilities(groups.iter().copied().map(GroupName::new).collect());
        AccountService::new(self.accounts.clone())
            .provision(account)
            .await
            .expect("provision account");
    }
}

fn site(flags: FeatureFlags, assets: StaticAssets) -> Site {
    let content = ContentFixture::create().expect("content fixture");
    let store = Arc::new(FsCourseStore::open(content.root()).expect("open content store"));
    let clock: Arc<dyn Clock + Send + Sync> = Arc::new(FixtureClock::default());
    let accounts = Arc::new(InMemoryAccountRepository::new());
    let ports = HttpStatePorts {
        courses: store.clone(),
        resources: store,
        accounts: accounts.clone(),
        enrollments: Arc::new(InMemoryEnrollmentRepository::new()),
        wiki: Arc::new(InMemoryWikiRepository::new()),
        clock,
    };
    Site {
        _content: content,
        state: HttpState::new(ports, flags, assets),
        accounts,
    }
}

#[fixture]
fn default_site() -> Site {
    site(FeatureFlags::default(), StaticAssets::default())
}

#[rstest]
#[actix_web::test]
async fn catalogue_skips_broken_directories(default_site: Site) {
    let app = init_app(default_site.state.clone()).await;
    let res = get(&app, "/api/v1/courses", Get::default()).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key(TRACE_ID_HEADER));

    let body: BTreeMap<String, Vec<CourseSummary>> = actix_test::read_body_json(res).await;
    let ids: Vec<&str> = body.values().flatten().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, [CIRCUITS, FUTURE, TOY]);
}

#[rstest]
#[actix_web::test]
async fn catalogue_uses_configured_asset_base() {
    let site = site(
        FeatureFlags::default(),
        StaticAssets::new("https://cdn.test/assets"),
    );
    let app = init_app(site.state.clone()).await;
    let res = get(&app, "/api/v1/courses", Get::default()).await;
    let body: BTreeMap<String, Vec<CourseSummary>> = actix_test::read_body_json(res).await;
    let toy = body["edX"]
        .iter()
        .find(|c| c.id == TOY)
        .expect("toy listed");
    assert_eq!(
        toy.image_url,
        "https://cdn.test/assets/toy/images/course_image.jpg"
    );
}

#[rstest]
#[actix_web::test]
async fn about_overview_is_read_from_disk_and_rewritten(default_site: Site) {
    let app = init_app(default_site.state.clone()).await;
    let res = get(
        &app,
        &format!("/api/v1/courses/{TOY}/about/overview"),
        Get::default(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: SectionResponse = actix_test::read_body_json(res).await;
    let html = body.html.expect("overview");
    assert!(html.contains("/static/toy/images/toy.png"), "{html}");
    assert!(!html.contains("\"/static/images/"), "{html}");
}

#[rstest]
#[actix_web::test]
async fn missing_about_file_is_null(default_site: Site) {
    let app = init_app(default_site.state.clone()).await;
    let res = get(
        &app,
        &format!("/api/v1/courses/{TOY}/about/syllabus"),
        Get::default(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["html"], Value::Null);
    let mut fields: Vec<&str> = body
        .as_object()
        .expect("section object")
        .keys()
        .map(String::as_str)
        .collect();
    fields.sort_unstable();
    assert_eq!(fields, ["html", "section"]);
}

#[rstest]
#[case("handouts", "/static/toy/handouts/sample.pdf")]
#[case("updates", "Welcome!")]
#[case("guest_handouts", INFO_SECTION_MISSING)]
#[actix_web::test]
async fn info_sections_of_started_course(
    default_site: Site,
    #[case] section: &str,
    #[case] needle: &str,
) {
    let app = init_app(default_site.state.clone()).await;
    let res = get(
        &app,
        &format!("/api/v1/courses/{TOY}/info/{section}"),
        Get::default(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: SectionResponse = actix_test::read_body_json(res).await;
    assert!(body.html.as_deref().is_some_and(|html| html.contains(needle)));
}

#[rstest]
#[case(FeatureFlags::default(), StatusCode::NOT_FOUND)]
#[case(FeatureFlags { disable_start_dates: true, ..FeatureFlags::default() }, StatusCode::OK)]
#[actix_web::test]
async fn info_of_future_course_depends_on_start_dates(
    #[case] flags: FeatureFlags,
    #[case] expected: StatusCode,
) {
    let site = site(flags, StaticAssets::default());
    let app = init_app(site.state.clone()).await;
    let res = get(
        &app,
        &format!("/api/v1/courses/{FUTURE}/info/updates"),
        Get::default(),
    )
    .await;
    assert_eq!(res.status(), expected);
}

#[rstest]
#[case::student("student", false, &[][..])]
#[case::course_staff("instructor", false, &["staff_future"][..])]
#[case::global_staff("admin", true, &[][..])]
#[actix_web::test]
async fn unopened_course_info_is_hidden_from_every_viewer(
    default_site: Site,
    #[case] username: &str,
    #[case] is_staff: bool,
    #[case] groups: &[&str],
) {
    default_site.account(username, is_staff, groups).await;
    let app = init_app(default_site.state.clone()).await;
    let cookie = login_as(&app, username).await;
    let signed_in = || Get {
        cookie: Some(&cookie),
        ..Get::default()
    };

    let res = get(
        &app,
        &format!("/api/v1/courses/{FUTURE}/info/updates"),
        signed_in(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["message"], "This course has not yet started.");

    let res = get(
        &app,
        &format!("/api/v1/courses/{FUTURE}/about/title"),
        signed_in(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[rstest]
#[case("about", "bogus")]
#[case("info", "overview")]
#[actix_web::test]
async fn unknown_section_key_reports_context(
    default_site: Site,
    #[case] context: &str,
    #[case] key: &str,
) {
    let app = init_app(default_site.state.clone()).await;
    let res = get(
        &app,
        &format!("/api/v1/courses/{TOY}/{context}/{key}"),
        Get::default(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["message"], format!("Invalid {context} key {key}"));
    assert_eq!(body["details"]["context"], context);
    assert_eq!(body["details"]["key"], key);
    assert!(body["traceId"].is_string());
}
