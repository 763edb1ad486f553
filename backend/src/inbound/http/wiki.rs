//! Wiki page handlers.
//!
//! These routes serve HTML at site level rather than under `/api/v1`, since
//! course pages link to them directly.
//!
//! ```text
//! GET /wiki/{path}
//! GET /courses/{org}/{number}/{run}/wiki/{path}
//! GET /courses/{org}/{number}/{run}/course_wiki
//! ```

use actix_web::http::header::{self, ContentType};
use actix_web::{HttpRequest, HttpResponse, get, web};
use serde::Deserialize;

use crate::domain::{Error, WikiOutcome, WikiPage};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::current_viewer;
use crate::inbound::http::courses::CoursePath;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Course pages linked from the navigator, as `(label, page)`.
const NAVIGATOR_LINKS: [(&str, &str); 4] = [
    ("Course Info", "info"),
    ("Courseware", "courseware"),
    ("Progress", "progress"),
    ("Wiki", "course_wiki"),
];

/// Course and article segments taken from a course wiki URL.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Path)]
pub struct CourseWikiPath {
    pub org: String,
    pub number: String,
    pub run: String,
    /// Article path inside the wiki, possibly empty.
    pub path: String,
}

impl CourseWikiPath {
    fn raw_id(&self) -> String {
        format!("{}/{}/{}", self.org, self.number, self.run)
    }
}

/// Browse the root wiki.
#[utoipa::path(
    get,
    path = "/wiki/{path}",
    params(("path" = String, Path, description = "Article path")),
    responses(
        (status = 200, description = "Article page", content_type = "text/html", body = String),
        (status = 302, description = "Redirect into the referring course's wiki"),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Root wiki disabled", body = Error),
        (status = 404, description = "Unknown article", body = Error)
    ),
    tags = ["wiki"],
    operation_id = "getRootWikiPage"
)]
#[get("/wiki/{path:.*}")]
pub async fn root_page(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let viewer = current_viewer(&state, &session).await?;
    let referer = req
        .headers()
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok());
    let outcome = state.wiki.root_page(&viewer, &path, referer).await?;
    Ok(respond(outcome))
}

/// Browse a course's wiki.
#[utoipa::path(
    get,
    path = "/courses/{org}/{number}/{run}/wiki/{path}",
    params(CourseWikiPath),
    responses(
        (status = 200, description = "Article page with course navigator",
            content_type = "text/html", body = String),
        (status = 302, description = "Course unavailable; redirect to the root wiki"),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not enrolled in the course", body = Error),
        (status = 404, description = "Unknown article", body = Error)
    ),
    tags = ["wiki"],
    operation_id = "getCourseWikiPage"
)]
#[get("/courses/{org}/{number}/{run}/wiki/{path:.*}")]
pub async fn course_page(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<CourseWikiPath>,
) -> ApiResult<HttpResponse> {
    let viewer = current_viewer(&state, &session).await?;
    let outcome = state
        .wiki
        .course_page(&viewer, &path.raw_id(), &path.path)
        .await?;
    Ok(respond(outcome))
}

/// Open a course's wiki, creating its home article on first use.
#[utoipa::path(
    get,
    path = "/courses/{org}/{number}/{run}/course_wiki",
    params(CoursePath),
    responses(
        (status = 302, description = "Redirect to the course's wiki article"),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not enrolled in the course", body = Error),
        (status = 404, description = "Unknown or unopened course", body = Error)
    ),
    tags = ["wiki"],
    operation_id = "openCourseWiki"
)]
#[get("/courses/{org}/{number}/{run}/course_wiki")]
pub async fn course_home(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<CoursePath>,
) -> ApiResult<HttpResponse> {
    let viewer = current_viewer(&state, &session).await?;
    let outcome = state.wiki.course_home(&viewer, &path.raw_id()).await?;
    Ok(respond(outcome))
}

fn redirect(target: String) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, target))
        .finish()
}

fn respond(outcome: WikiOutcome) -> HttpResponse {
    match outcome {
        WikiOutcome::Redirect(target) => redirect(target),
        WikiOutcome::Page(page) => HttpResponse::Ok()
            .content_type(ContentType::html())
            .body(render_page(&page)),
    }
}

/// Render an article page; course pages carry the course navigator.
pub fn render_page(page: &WikiPage) -> String {
    let title = escape_html(page.article.title());
    let mut html = format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n<body>\n"
    );
    if let Some(course) = &page.course {
        html.push_str(&format!(
            "<nav class=\"course-navigator\" aria-label=\"{}\">\n<ol>\n",
            escape_html(course.title())
        ));
        for (label, target) in NAVIGATOR_LINKS {
            html.push_str(&format!(
                "<li><a href=\"{}\">{label}</a></li>\n",
                escape_html(&course.id().page_url(target))
            ));
        }
        html.push_str("</ol>\n</nav>\n");
    }
    html.push_str(&format!(
        "<article data-path=\"{}\">\n<h1>{title}</h1>\n</article>\n</body>\n</html>\n",
        escape_html(page.article.path().as_str())
    ));
    html
}

/// Escape text for use in HTML content and double-quoted attributes.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{WikiArticle, WikiPath};
    use crate::test_support::fixtures::toy_course;
    use rstest::rstest;

    #[rstest]
    #[case("plain", "plain")]
    #[case("<b>\"x\" & 'y'</b>", "&lt;b&gt;&quot;x&quot; &amp; &#x27;y&#x27;&lt;/b&gt;")]
    fn escapes_markup(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(escape_html(raw), expected);
    }

    #[rstest]
    fn course_pages_render_the_navigator() {
        let page = WikiPage {
            article: WikiArticle::new(WikiPath::parse("toy"), "Toy <Course>"),
            course: Some(toy_course()),
        };
        let html = render_page(&page);
        assert!(html.contains("<title>Toy &lt;Course&gt;</title>"));
        for (label, target) in [
            ("Course Info", "info"),
            ("Courseware", "courseware"),
            ("Progress", "progress"),
            ("Wiki", "course_wiki"),
        ] {
            let link = format!("<a href=\"/courses/edX/toy/2012_Fall/{target}\">{label}</a>");
            assert!(html.contains(&link), "missing {link} in {html}");
        }
    }

    #[rstest]
    fn root_pages_have_no_navigator() {
        let page = WikiPage {
            article: WikiArticle::new(WikiPath::parse("/some/page/"), "Some page"),
            course: None,
        };
        let html = render_page(&page);
        assert!(!html.contains("course-navigator"));
        assert!(html.contains("data-path=\"some/page\""));
    }
}
