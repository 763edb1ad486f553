//! OpenAPI document coverage for the courseware payloads.

use courseware::ApiDoc;
use courseware::test_support::openapi::{get_property, unwrap_object_schema};
use rstest::{fixture, rstest};
use utoipa::OpenApi;
use utoipa::openapi::OpenApi as Document;

// utoipa names schemas after their Rust type.
const ERROR_SCHEMA: &str = "Error";
const COURSE_SUMMARY_SCHEMA: &str = "CourseSummary";
const SECTION_RESPONSE_SCHEMA: &str = "SectionResponse";

#[fixture]
fn document() -> Document {
    ApiDoc::openapi()
}

fn schema<'a>(doc: &'a Document, name: &str) -> &'a utoipa::openapi::schema::Object {
    let components = doc.components.as_ref().expect("components");
    let schema = components
        .schemas
        .get(name)
        .unwrap_or_else(|| panic!("schema {name} registered"));
    unwrap_object_schema(schema, name)
}

#[rstest]
#[case(ERROR_SCHEMA, &["code", "message", "traceId", "details"])]
#[case(COURSE_SUMMARY_SCHEMA, &["id", "org", "number", "run", "title", "start", "imageUrl"])]
#[case(SECTION_RESPONSE_SCHEMA, &["section", "html"])]
fn schemas_expose_wire_fields(document: Document, #[case] name: &str, #[case] fields: &[&str]) {
    let object = schema(&document, name);
    for field in fields {
        get_property(object, field);
    }
}

#[rstest]
#[case("/api/v1/accounts", "post")]
#[case("/api/v1/accounts/activate/{key}", "post")]
#[case("/api/v1/logout", "post")]
#[case("/api/v1/courses/{org}/{number}/{run}/enrollment", "post")]
#[case("/api/v1/courses/{org}/{number}/{run}/staff-access", "get")]
#[case("/courses/{org}/{number}/{run}/wiki/{path}", "get")]
#[case("/health/live", "get")]
fn paths_are_documented(document: Document, #[case] path: &str, #[case] method: &str) {
    let json = serde_json::to_value(&document).expect("serialise document");
    assert!(
        json["paths"][path][method].is_object(),
        "{method} {path} missing"
    );
}

#[rstest]
fn document_serialises(document: Document) {
    let json = document.to_pretty_json().expect("valid JSON");
    assert!(json.contains("Courseware API"));
}
