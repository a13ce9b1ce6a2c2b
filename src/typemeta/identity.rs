//! Type identity of a manifest document.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when an `apiVersion` string cannot be split into group and
/// version.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupVersionParseError {
    #[error("unexpected GroupVersion string {input:?}: too many '/'")]
    TooManySlashes { input: String },

    #[error("unexpected GroupVersion string {input:?}: version cannot be empty")]
    EmptyVersion { input: String },
}

/// A Kubernetes API group and version, written as `group/version`, or just
/// `version` for the core group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupVersion {
    pub group: String,
    pub version: String,
}

impl FromStr for GroupVersion {
    type Err = GroupVersionParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (group, version) = match input.split_once('/') {
            Some((_, rest)) if rest.contains('/') => {
                return Err(GroupVersionParseError::TooManySlashes {
                    input: input.to_string(),
                })
            }
            Some((group, version)) => (group, version),
            None => ("", input),
        };

        if version.is_empty() {
            return Err(GroupVersionParseError::EmptyVersion {
                input: input.to_string(),
            });
        }

        Ok(GroupVersion {
            group: group.to_string(),
            version: version.to_string(),
        })
    }
}

impl fmt::Display for GroupVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}", self.version)
        } else {
            write!(f, "{}/{}", self.group, self.version)
        }
    }
}

/// TypeIdentity names the schema of a resource: group, version and kind.
///
/// The group may be empty (core resources such as `v1 Pod`); version and
/// kind never are once an identity has been built through [`TypeIdentity::parse`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeIdentity {
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl TypeIdentity {
    pub fn new(group: impl Into<String>, version: impl Into<String>, kind: impl Into<String>) -> Self {
        TypeIdentity {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
        }
    }

    /// Builds an identity from an `apiVersion` string and a kind.
    pub fn parse(api_version: &str, kind: impl Into<String>) -> Result<Self, GroupVersionParseError> {
        let gv: GroupVersion = api_version.parse()?;
        Ok(TypeIdentity {
            group: gv.group,
            version: gv.version,
            kind: kind.into(),
        })
    }

    pub fn group_version(&self) -> GroupVersion {
        GroupVersion {
            group: self.group.clone(),
            version: self.version.clone(),
        }
    }

    /// Renders the identity back into its `apiVersion` form.
    pub fn api_version(&self) -> String {
        self.group_version().to_string()
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, Kind={}", self.group_version(), self.kind)
    }
}

/// The type fields every manifest document carries at its top level.
///
/// Only these two fields are decoded; the rest of the document is skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TypeMeta {
    #[serde(rename = "apiVersion", default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
}

impl TypeMeta {
    /// Decodes the type fields of a single YAML (or JSON) document.
    pub fn from_yaml_slice(document: &[u8]) -> Result<TypeMeta, serde_yaml::Error> {
        serde_yaml::from_slice(document)
    }

    /// Returns the apiVersion and kind when both are present and non-empty.
    pub fn identity_fields(&self) -> Option<(&str, &str)> {
        let api_version = self.api_version.as_deref().filter(|s| !s.is_empty())?;
        let kind = self.kind.as_deref().filter(|s| !s.is_empty())?;
        Some((api_version, kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("v1", "", "v1")]
    #[case("apps/v1", "apps", "v1")]
    #[case("batch/v1beta1", "batch", "v1beta1")]
    #[case("/v1", "", "v1")]
    fn valid_group_version(#[case] input: &str, #[case] group: &str, #[case] version: &str) {
        let gv: GroupVersion = input.parse().expect("valid group version");
        assert_eq!(gv, GroupVersion { group: group.into(), version: version.into() });
    }

    #[rstest]
    #[case("a/b/c", GroupVersionParseError::TooManySlashes { input: "a/b/c".into() })]
    #[case("apps/", GroupVersionParseError::EmptyVersion { input: "apps/".into() })]
    #[case("", GroupVersionParseError::EmptyVersion { input: "".into() })]
    fn invalid_group_version(#[case] input: &str, #[case] error: GroupVersionParseError) {
        let err = input.parse::<GroupVersion>().expect_err("invalid group version");
        assert_eq!(err, error);
    }

    #[test]
    fn test_type_identity_display() {
        let deployment = TypeIdentity::parse("apps/v1", "Deployment").unwrap();
        assert_eq!(deployment.to_string(), "apps/v1, Kind=Deployment");
        assert_eq!(deployment.api_version(), "apps/v1");

        let pod = TypeIdentity::parse("v1", "Pod").unwrap();
        assert_eq!(pod, TypeIdentity::new("", "v1", "Pod"));
        assert_eq!(pod.to_string(), "v1, Kind=Pod");
    }

    #[test]
    fn test_type_meta_ignores_other_fields() {
        let doc = b"apiVersion: apps/v1\nkind: Deployment\nspec:\n  replicas: 3\n";
        let meta = TypeMeta::from_yaml_slice(doc).unwrap();
        assert_eq!(meta.identity_fields(), Some(("apps/v1", "Deployment")));
    }

    #[test]
    fn test_type_meta_missing_fields() {
        let meta = TypeMeta::from_yaml_slice(b"kind: Service\n").unwrap();
        assert_eq!(meta.api_version, None);
        assert_eq!(meta.identity_fields(), None);

        let meta = TypeMeta::from_yaml_slice(b"apiVersion: v1\nkind: \"\"\n").unwrap();
        assert_eq!(meta.identity_fields(), None);
    }
}
