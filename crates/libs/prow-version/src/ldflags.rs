//! Linker flag assembly.

use tracing::warn;

use crate::{manifest::Manifest, tag::parse_major_minor, tree_state::TreeState};

/// Import path prefix of the dependency carrying the Kubernetes version.
pub const KUBERNETES_PACKAGE: &str = "k8s.io/kubernetes";

/// Vendored packages whose version variables are set at link time.
pub const VERSION_PACKAGES: [&str; 2] = [
    "k8s.io/minikube/vendor/k8s.io/kubernetes/pkg/version",
    "k8s.io/minikube/vendor/k8s.io/client-go/pkg/version",
];

/// Everything the version packages are stamped with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    pub commit: String,
    pub version: String,
    pub major: String,
    pub minor: String,
    pub tree_state: TreeState,
    pub build_date: String,
}

impl VersionInfo {
    /// Collect version information for the first dependency under `package`.
    ///
    /// A manifest without such a dependency yields empty version fields,
    /// as does a tag that is not a release tag.
    pub fn from_manifest(
        manifest: &Manifest,
        package: &str,
        tree_state: TreeState,
        build_date: String,
    ) -> Self {
        let (commit, version) = match manifest.find_dependency(package) {
            Some(dep) => (dep.rev.clone(), dep.comment.clone()),
            None => {
                warn!("No dependency matching {package} in manifest");
                (String::new(), String::new())
            }
        };
        let major_minor = parse_major_minor(&version).unwrap_or_default();

        Self {
            commit,
            version,
            major: major_minor.major,
            minor: major_minor.minor,
            tree_state,
            build_date,
        }
    }

    /// Linker variable names and values, in flag order.
    pub fn fields(&self) -> [(&'static str, String); 6] {
        [
            ("gitCommit", self.commit.clone()),
            ("gitVersion", self.version.clone()),
            ("gitMajor", self.major.clone()),
            ("gitMinor", self.minor.clone()),
            ("gitTreeState", self.tree_state.to_string()),
            ("buildDate", self.build_date.clone()),
        ]
    }

    /// `-X <package>.<field>=<value>` for every field, repeated for each
    /// package, joined by spaces.
    pub fn ldflags(&self, packages: &[&str]) -> String {
        let fields = self.fields();
        packages
            .iter()
            .flat_map(|package| {
                fields
                    .iter()
                    .map(move |(field, value)| format!("-X {package}.{field}={value}"))
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REV: &str = "fc32d2f3698e36b93322a3465f63a14e9f0eaead";

    fn manifest(import_path: &str, tag: &str) -> Manifest {
        Manifest::from_json(&format!(
            r#"{{"ImportPath": "k8s.io/minikube", "Deps": [
                {{"ImportPath": "github.com/docker/machine/libmachine", "Rev": "deadbeef"}},
                {{"ImportPath": "{import_path}", "Comment": "{tag}", "Rev": "{REV}"}}
            ]}}"#
        ))
        .expect("valid manifest")
    }

    fn info(manifest: &Manifest) -> VersionInfo {
        VersionInfo::from_manifest(
            manifest,
            KUBERNETES_PACKAGE,
            TreeState::Clean,
            String::from("2020-10-16T00:00:00Z"),
        )
    }

    #[test]
    fn matching_dependency_is_copied_verbatim() {
        let info = info(&manifest("k8s.io/kubernetes/pkg/api", "v1.18.2"));
        assert_eq!(info.commit, REV);
        assert_eq!(info.version, "v1.18.2");
        assert_eq!((info.major.as_str(), info.minor.as_str()), ("1", "18"));

        let flags = info.ldflags(&VERSION_PACKAGES);
        assert!(flags.contains(&format!(
            "-X k8s.io/minikube/vendor/k8s.io/kubernetes/pkg/version.gitCommit={REV}"
        )));
        assert!(flags.contains(
            "-X k8s.io/minikube/vendor/k8s.io/client-go/pkg/version.gitVersion=v1.18.2"
        ));
    }

    #[test]
    fn full_flag_string() {
        let info = info(&manifest("k8s.io/kubernetes/pkg/api", "v1.19.0-beta.1"));
        let expected = [
            format!("-X a/version.gitCommit={REV}"),
            String::from("-X a/version.gitVersion=v1.19.0-beta.1"),
            String::from("-X a/version.gitMajor=1"),
            String::from("-X a/version.gitMinor=19+"),
            String::from("-X a/version.gitTreeState=clean"),
            String::from("-X a/version.buildDate=2020-10-16T00:00:00Z"),
        ];
        let single = expected.join(" ");
        assert_eq!(info.ldflags(&["a/version"]), single);
        assert_eq!(
            info.ldflags(&["a/version", "b/version"]),
            format!("{single} {}", single.replace("a/version", "b/version"))
        );
    }

    #[test]
    fn no_matching_dependency_gives_blank_fields() {
        let info = info(&manifest("k8s.io/client-go/pkg/api", "v5.0.0"));
        assert_eq!(info.commit, "");
        assert_eq!(info.version, "");
        assert_eq!(info.major, "");
        assert_eq!(info.minor, "");

        let flags = info.ldflags(&VERSION_PACKAGES[..1]);
        assert!(flags.starts_with(
            "-X k8s.io/minikube/vendor/k8s.io/kubernetes/pkg/version.gitCommit= -X"
        ));
        assert!(flags.contains("gitTreeState=clean"));
    }

    #[test]
    fn dirty_tree() {
        let mut info = info(&manifest("k8s.io/kubernetes/pkg/api", "v1.18.2"));
        info.tree_state = TreeState::Dirty;
        assert!(info.ldflags(&VERSION_PACKAGES).contains("gitTreeState=dirty"));
    }
}
