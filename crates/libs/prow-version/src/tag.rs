//! Major/minor components of a Kubernetes release tag.

use std::sync::LazyLock;

use regex::Regex;

static RELEASE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v(\d+)\.(\d+)(\.\d+)?([-].*)?$").expect("release tag pattern is valid")
});

/// Major and minor version as the Go linker receives them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MajorMinor {
    pub major: String,
    /// Carries a trailing `+` for pre-release and build tags.
    pub minor: String,
}

/// Split a release tag into major and minor components.
///
/// Returns `None` when the tag is not of the form `vMAJOR.MINOR[.PATCH][-SUFFIX]`.
///
/// # Examples
///
/// ```rust
/// use prow_version::parse_major_minor;
///
/// let version = parse_major_minor("v1.19.0-beta.1").unwrap();
/// assert_eq!(version.major, "1");
/// assert_eq!(version.minor, "19+");
/// ```
pub fn parse_major_minor(tag: &str) -> Option<MajorMinor> {
    let captures = RELEASE_TAG.captures(tag)?;
    let mut minor = captures[2].to_string();
    if captures.get(4).is_some() {
        minor.push('+');
    }
    Some(MajorMinor {
        major: captures[1].to_string(),
        minor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(tag: &str) -> Option<(String, String)> {
        parse_major_minor(tag).map(|v| (v.major, v.minor))
    }

    #[test]
    fn release_tag() {
        assert_eq!(parts("v1.18.2"), Some(("1".into(), "18".into())));
        assert_eq!(parts("v1.8"), Some(("1".into(), "8".into())));
    }

    #[test]
    fn pre_release_tag_marks_minor() {
        assert_eq!(parts("v1.19.0-beta.1"), Some(("1".into(), "19+".into())));
        assert_eq!(parts("v1.7-alpha"), Some(("1".into(), "7+".into())));
    }

    #[test]
    fn not_a_release_tag() {
        assert_eq!(parts(""), None);
        assert_eq!(parts("1.18.2"), None);
        assert_eq!(parts("v1"), None);
        assert_eq!(parts("v1.18.2+build"), None);
        assert_eq!(parts("v1.18.2.3"), None);
    }
}
