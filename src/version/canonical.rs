use super::{Version, VersionError};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

pub fn parse_version_string(text: &str) -> Result<Version, VersionError> {
    text.parse()
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if let Some(id) = &self.pre_release {
            write!(f, "-{}", id)?;
        }
        if let Some(build_id) = &self.nightly {
            write!(f, ".{}", build_id)?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = |reason| VersionError::malformed(s, reason);

        let (major, rest) = split_number(s).ok_or_else(|| malformed("expected a major number"))?;
        let rest = rest
            .strip_prefix('.')
            .ok_or_else(|| malformed("expected '.' after the major number"))?;
        let (minor, rest) = split_number(rest).ok_or_else(|| malformed("expected a minor number"))?;

        let (pre_release, rest) = match rest.strip_prefix('-') {
            Some(tail) => {
                let (id, rest) = tail.find('.').map_or((tail, ""), |i| tail.split_at(i));
                if id.is_empty() {
                    return Err(malformed("empty pre-release id"));
                }
                (Some(id), rest)
            }
            None => (None, rest),
        };

        let nightly = match rest {
            "" => None,
            _ => match rest.strip_prefix('.') {
                Some("") => return Err(malformed("empty nightly build id")),
                Some(build_id) => Some(build_id),
                None => return Err(malformed("unexpected characters after the minor number")),
            },
        };

        let mut version = Version::new(major, minor);
        if let Some(id) = pre_release {
            version = version.with_pre_release(id).map_err(|_| malformed("invalid pre-release id"))?;
        }
        if let Some(build_id) = nightly {
            version = version.with_nightly(build_id).map_err(|_| malformed("invalid nightly build id"))?;
        }
        Ok(version)
    }
}

/// Splits a leading run of ASCII digits off `s`. `None` when there are no
/// digits or the number overflows.
fn split_number(s: &str) -> Option<(u32, &str)> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    let number = s[..end].parse().ok()?;
    Some((number, &s[end..]))
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}
