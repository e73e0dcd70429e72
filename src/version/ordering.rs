use super::Version;
use std::cmp::Ordering;

impl Version {
    /// Three-way release comparison: major, then minor, then nightly build
    /// id. Pre-release ids never take part.
    ///
    /// `Equal` here does not imply `==`: `1.0.5.0` and `1.0.5` are the same
    /// release but have different canonical forms.
    pub fn compare(&self, other: &Version) -> Ordering {
        self.major
            .cmp(&other.major)
            .then_with(|| self.minor.cmp(&other.minor))
            .then_with(|| compare_nightly(self.nightly_build_id(), other.nightly_build_id()))
    }

    pub fn is_newer_than(&self, other: &Version) -> bool {
        self.compare(other) == Ordering::Greater
    }

    pub fn is_older_than(&self, other: &Version) -> bool {
        self.compare(other) == Ordering::Less
    }

    pub fn is_same_release_as(&self, other: &Version) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

fn compare_nightly(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => try_structured_compare(a, b).unwrap_or_else(|| a.cmp(b)),
        (a, b) => a.unwrap_or("").cmp(b.unwrap_or("")),
    }
}

/// Compares two dot-separated build ids component by component, missing
/// trailing components counting as zero. Stops at the first differing
/// component; `None` if a component up to that point is not a 32-bit integer.
pub fn try_structured_compare(a: &str, b: &str) -> Option<Ordering> {
    let a = components(a);
    let b = components(b);

    let max_len = a.len().max(b.len());
    for i in 0..max_len {
        let x = numeric_component(&a, i)?;
        let y = numeric_component(&b, i)?;
        if x != y {
            return Some(x.cmp(&y));
        }
    }

    Some(Ordering::Equal)
}

/// Splits on '.', dropping trailing empty components (`"5."` is `"5"`).
fn components(build_id: &str) -> Vec<&str> {
    let mut parts: Vec<&str> = build_id.split('.').collect();
    if build_id.contains('.') {
        while parts.last() == Some(&"") {
            parts.pop();
        }
    }
    parts
}

fn numeric_component(parts: &[&str], i: usize) -> Option<i32> {
    match parts.get(i) {
        Some(part) => part.parse().ok(),
        None => Some(0),
    }
}

/// Orders possibly-missing versions; a known version always ranks above an
/// unknown one.
pub fn compare_optional(a: Option<&Version>, b: Option<&Version>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.compare(b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

/// Sorts oldest first, keeping the input order of equal releases.
pub fn sort_versions(versions: &mut [Version]) {
    // Mixed numeric and free-form build ids are not guaranteed transitive,
    // and `slice::sort_by` may panic on such comparators.
    for i in 1..versions.len() {
        let mut j = i;
        while j > 0 && versions[j - 1].is_newer_than(&versions[j]) {
            versions.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// The newest version, the earliest one winning ties.
pub fn newest<'a, I>(versions: I) -> Option<&'a Version>
where
    I: IntoIterator<Item = &'a Version>,
{
    versions.into_iter().fold(None, |best, candidate| match best {
        Some(best) if !candidate.is_newer_than(best) => Some(best),
        _ => Some(candidate),
    })
}
