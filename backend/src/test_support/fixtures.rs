//! Course fixtures shared by unit and integration tests.

use std::io;
use std::path::Path;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use tempfile::TempDir;

use super::cap_fs::write_file;
use crate::domain::ports::ResourcePath;
use crate::domain::{Course, CourseId, SectionContext};
use crate::outbound::memory::InMemoryCourseStore;

/// Identifier of the open toy course.
pub const TOY: &str = "edX/toy/2012_Fall";
/// Identifier of a course that opens in the future.
pub const FUTURE: &str = "edX/future/2030_Spring";
/// Identifier of an open course from another organisation.
pub const CIRCUITS: &str = "MITx/6.002x/2012_Fall";

/// Overview fragment of the toy course, as stored.
pub const TOY_OVERVIEW: &str =
    r#"<section><h2>About</h2><img src="/static/images/toy.png"/></section>"#;
/// Handouts fragment of the toy course, as stored.
pub const TOY_HANDOUTS: &str = r#"<ol><li><a href='/static/handouts/sample.pdf'>Sample</a></li></ol>"#;
/// Updates fragment of the toy course, as stored.
pub const TOY_UPDATES: &str = "<ol><li><h2>Welcome!</h2></li></ol>";

/// Clock frozen at a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixtureClock(pub DateTime<Utc>);

impl Default for FixtureClock {
    fn default() -> Self {
        Self(fixture_now())
    }
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

fn utc(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Instant the fixture clock reports.
#[must_use]
pub fn fixture_now() -> DateTime<Utc> {
    utc(2026, 10, 18)
}

fn id(raw: &str) -> CourseId {
    raw.parse().unwrap_or_else(|err| panic!("fixture id {raw}: {err}"))
}

/// The toy course: started, with a display name.
#[must_use]
pub fn toy_course() -> Course {
    Course::new(id(TOY), "toy")
        .with_start(utc(2012, 9, 1))
        .with_display_name("Toy Course")
}

/// A course whose start lies after [`fixture_now`].
#[must_use]
pub fn future_course() -> Course {
    Course::new(id(FUTURE), "future")
        .with_start(utc(2030, 3, 1))
        .with_display_name("Future Course")
}

/// An open course from a second organisation.
#[must_use]
pub fn circuits_course() -> Course {
    Course::new(id(CIRCUITS), "circuits").with_display_name("Circuits and Electronics")
}

/// In-memory store holding the fixture courses and the toy course's
/// resources, plus one errored directory.
#[must_use]
pub fn fixture_store() -> InMemoryCourseStore {
    let toy = toy_course();
    InMemoryCourseStore::default()
        .with_course(toy.clone())
        .with_course(future_course())
        .with_course(circuits_course())
        .with_errored("broken", "malformed course.json")
        .with_resource(
            &toy,
            ResourcePath::section(SectionContext::About, "overview"),
            TOY_OVERVIEW,
        )
        .with_resource(
            &toy,
            ResourcePath::section(SectionContext::Info, "handouts"),
            TOY_HANDOUTS,
        )
        .with_resource(
            &toy,
            ResourcePath::section(SectionContext::Info, "updates"),
            TOY_UPDATES,
        )
}

/// The fixture courses laid out on disk the way the filesystem store reads
/// them.
pub struct ContentFixture {
    dir: TempDir,
}

impl ContentFixture {
    /// Write the fixture tree into a fresh temporary directory.
    pub fn create() -> io::Result<Self> {
        let dir = tempfile::tempdir()?;
        let root = dir.path();
        write_file(
            &root.join("toy/course.json"),
            br#"{"org": "edX", "course": "toy", "run": "2012_Fall",
                "display_name": "Toy Course", "start": "2012-09-01T00:00:00Z"}"#,
        )?;
        write_file(&root.join("toy/about/overview.html"), TOY_OVERVIEW.as_bytes())?;
        write_file(&root.join("toy/info/handouts.html"), TOY_HANDOUTS.as_bytes())?;
        write_file(&root.join("toy/info/updates.html"), TOY_UPDATES.as_bytes())?;
        write_file(&root.join("toy/images/course_image.jpg"), b"\xff\xd8\xff")?;
        write_file(
            &root.join("future/course.json"),
            br#"{"org": "edX", "course": "future", "run": "2030_Spring",
                "display_name": "Future Course", "start": "2030-03-01T00:00:00Z"}"#,
        )?;
        write_file(
            &root.join("circuits/course.json"),
            br#"{"org": "MITx", "course": "6.002x", "run": "2012_Fall",
                "display_name": "Circuits and Electronics"}"#,
        )?;
        write_file(&root.join("broken/course.json"), b"{\"org\": ")?;
        Ok(Self { dir })
    }

    /// Content root.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.dir.path()
    }
}
