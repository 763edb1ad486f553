//! Named content slots on course about and info pages.
//!
//! Each page context accepts a closed set of keys. Parsing anything else is a
//! caller bug and yields [`SectionKeyError::InvalidKey`], which is distinct
//! from a missing resource.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Page context a section key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionContext {
    /// Course about (marketing) page.
    About,
    /// Course info (handouts and updates) page.
    Info,
}

impl SectionContext {
    /// Resource directory holding this context's HTML fragments.
    #[must_use]
    pub const fn directory(self) -> &'static str {
        match self {
            Self::About => "about",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for SectionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.directory())
    }
}

/// A key that is not part of the context's allow-list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SectionKeyError {
    /// Unknown section key.
    #[error("Invalid {context} key {key}")]
    InvalidKey {
        /// Context the key was looked up in.
        context: SectionContext,
        /// Raw key as supplied by the caller.
        key: String,
    },
}

macro_rules! section_keys {
    (
        $(#[$outer:meta])*
        $name:ident, $context:expr, {
            $( $(#[$variant_meta:meta])* $variant:ident => $key:literal ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$variant_meta])* $variant, )*
        }

        impl $name {
            /// Every key accepted in this context.
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];

            /// Wire form of the key, also the resource file stem.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $key, )*
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = SectionKeyError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $key => Ok(Self::$variant), )*
                    _ => Err(SectionKeyError::InvalidKey {
                        context: $context,
                        key: s.to_owned(),
                    }),
                }
            }
        }
    };
}

section_keys! {
    /// Sections of the course about page.
    AboutSection, SectionContext::About, {
        /// Long-form overview.
        Overview => "overview",
        /// Course title, taken from metadata.
        Title => "title",
        /// Owning organisation, taken from the course id.
        University => "university",
        /// Course number, taken from the course id.
        Number => "number",
        ShortDescription => "short_description",
        Description => "description",
        /// Start, end, exam dates and similar.
        KeyDates => "key_dates",
        Video => "video",
        CourseStaffShort => "course_staff_short",
        CourseStaffExtended => "course_staff_extended",
        Requirements => "requirements",
        Syllabus => "syllabus",
        Textbook => "textbook",
        Faq => "faq",
        MoreInfo => "more_info",
        Instructors => "instructors",
        Effort => "effort",
        EndDate => "end_date",
        Prerequisites => "prerequisites",
    }
}

section_keys! {
    /// Sections of the course info page.
    InfoSection, SectionContext::Info, {
        Handouts => "handouts",
        GuestHandouts => "guest_handouts",
        Updates => "updates",
        GuestUpdates => "guest_updates",
    }
}

impl AboutSection {
    /// Whether the section is read from `about/<key>.html` rather than
    /// derived from course metadata.
    #[must_use]
    pub const fn is_file_backed(self) -> bool {
        !matches!(self, Self::Title | Self::University | Self::Number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn about_keys_parse_from_their_wire_form() {
        for key in AboutSection::ALL {
            assert_eq!(key.as_str().parse::<AboutSection>(), Ok(*key));
        }
    }

    #[rstest]
    fn info_keys_parse_from_their_wire_form() {
        for key in InfoSection::ALL {
            assert_eq!(key.as_str().parse::<InfoSection>(), Ok(*key));
        }
    }

    #[rstest]
    #[case("handouts")]
    #[case("Syllabus")]
    #[case("")]
    fn about_rejects_keys_outside_its_list(#[case] raw: &str) {
        let err = raw.parse::<AboutSection>().expect_err("unknown key");
        assert_eq!(
            err,
            SectionKeyError::InvalidKey {
                context: SectionContext::About,
                key: raw.to_owned(),
            }
        );
    }

    #[rstest]
    fn info_rejects_about_keys() {
        let err = "syllabus".parse::<InfoSection>().expect_err("unknown key");
        assert_eq!(err.to_string(), "Invalid info key syllabus");
    }

    #[rstest]
    #[case(AboutSection::Title, false)]
    #[case(AboutSection::University, false)]
    #[case(AboutSection::Number, false)]
    #[case(AboutSection::Syllabus, true)]
    #[case(AboutSection::Overview, true)]
    fn metadata_keys_are_not_file_backed(#[case] key: AboutSection, #[case] expected: bool) {
        assert_eq!(key.is_file_backed(), expected);
    }
}
